//! Excel input/output for leaderboards
//!
//! - Load: results workbook → raw per-category tables
//! - Export: ranked snapshot → Excel (.xlsx), one worksheet per category

mod exporter;
mod loader;

pub use exporter::LeaderboardExporter;
pub use loader::{read_table, SheetLoader};
