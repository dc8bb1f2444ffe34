use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

use mushaf_core::schema::Database;
use mushaf_etl::{build_pipeline, incomplete_chapters, pipeline, Dataset};

pub async fn run_import(
    dataset: PathBuf,
    words: Option<PathBuf>,
    db_path: PathBuf,
) -> Result<()> {
    log::info!("Starting import of {}", dataset.display());

    let workflow = build_pipeline(dataset.clone(), words, db_path.clone())?;

    let state_path = pipeline::state_db_path(&db_path);
    let mut store = treadle::SqliteStateStore::open(&state_path)
        .await
        .context("Failed to open pipeline state")?;

    // Each run is its own work item so a re-import is never skipped as done.
    let run_id = Utc::now().format("%Y%m%dT%H%M%S%.3f").to_string();
    let job = Dataset::for_run(dataset.clone(), &run_id);

    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    workflow.advance(&job, &mut store).await?;

    let db = Database::open(&db_path).context("Failed to open database")?;
    let chapters = db.load_chapters()?;
    let verses: usize = chapters.iter().map(|c| c.verses.len()).sum();
    let incomplete = incomplete_chapters(&chapters);

    println!("\n✓ Imported {} verses from {}", verses, dataset.display());
    if incomplete.is_empty() {
        println!("  All {} chapters complete", chapters.len());
    } else {
        println!(
            "  {} of {} chapters incomplete: {}",
            incomplete.len(),
            chapters.len(),
            summarize_numbers(&incomplete)
        );
    }
    Ok(())
}

/// Format chapter numbers compactly, e.g. `1-3, 7, 110-114`.
pub(crate) fn summarize_numbers(numbers: &[u16]) -> String {
    let mut ranges: Vec<(u16, u16)> = Vec::new();
    for &n in numbers {
        match ranges.last_mut() {
            Some((_, end)) if n == *end + 1 => *end = n,
            _ => ranges.push((n, n)),
        }
    }
    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_numbers() {
        assert_eq!(summarize_numbers(&[1, 2, 3, 7, 110, 111]), "1-3, 7, 110-111");
        assert_eq!(summarize_numbers(&[]), "");
    }
}
