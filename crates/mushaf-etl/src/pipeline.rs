use std::path::PathBuf;
use treadle::Workflow;

use crate::{AuditStage, ImportStage};

/// Build the import + audit pipeline.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_pipeline(
    dataset: PathBuf,
    words: Option<PathBuf>,
    db_path: PathBuf,
) -> treadle::Result<Workflow> {
    let import_stage = ImportStage::new(dataset, words, db_path.clone());
    let audit_stage = AuditStage::new(db_path);

    Workflow::builder()
        .stage("import", import_stage)
        .stage("audit", audit_stage)
        .dependency("audit", "import")
        .build()
}

/// Path of the pipeline state database kept next to the main database.
#[must_use]
pub fn state_db_path(db_path: &std::path::Path) -> PathBuf {
    db_path.with_extension("pipeline.db")
}
