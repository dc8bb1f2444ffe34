mod annotations;
mod db;
mod migrations;
mod tracking;

pub use db::{ContentCounts, Database};
pub use migrations::{Migration, MIGRATIONS};
