use anyhow::Result;

use mushaf_core::schema::Database;
use mushaf_search::{filter_chapters, search_verses, Query};

use crate::display::truncate;

pub fn run_search(db: &Database, query: &str, limit: usize) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Search query is empty");
    }
    let Some(parsed) = Query::parse(query) else {
        anyhow::bail!("Search query is empty");
    };

    let chapters = db.load_chapters()?;
    let by_name: Vec<_> = filter_chapters(&chapters, query)
        .into_iter()
        .filter(|c| {
            parsed.matches(&c.name)
                || parsed.matches(&c.original_name)
                || parsed.matches(c.origin.label())
        })
        .collect();

    if !by_name.is_empty() {
        println!("Chapters:");
        for chapter in &by_name {
            println!("  {:>3}. {} ({})", chapter.number, chapter.name, chapter.original_name);
        }
        println!();
    }

    let hits = search_verses(&chapters, query);
    if hits.is_empty() {
        if by_name.is_empty() {
            println!("No matches for '{query}'");
        }
        return Ok(());
    }

    println!("Verses ({} matches):", hits.len());
    for hit in hits.iter().take(limit) {
        println!(
            "  {:<8} {:<14} {}",
            hit.key().to_string(),
            hit.chapter.name,
            truncate(&hit.verse.translation, 70)
        );
        log::debug!("{} matched on {}", hit.key(), hit.field);
    }
    if hits.len() > limit {
        println!("  … {} more (use --limit to show more)", hits.len() - limit);
    }
    Ok(())
}
