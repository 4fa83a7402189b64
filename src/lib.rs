//! Intergames Leaderboard - ranked competition tables from a results workbook
//!
//! Reads one sheet per category from a spreadsheet, ranks the athletes by
//! their grand total and serves the ranked tables on a web dashboard.
//!
//! # Pipeline
//!
//! - Load: category sheets → raw tables (header on a fixed row)
//! - Rank: drop empty and grand-total rows, sort by total, number positions,
//!   keep the leading columns
//! - Cache: one snapshot per (workbook, categories, options)
//!
//! # Example
//!
//! ```no_run
//! use intergames_leaderboard::config::LeaderboardConfig;
//! use intergames_leaderboard::core::LeaderboardCache;
//!
//! let config = LeaderboardConfig::default();
//! let cache = LeaderboardCache::new();
//! let snapshot = cache.load(&config.source, &config.categories, &config.pipeline_options())?;
//!
//! if let Some(table) = snapshot.get("RX FEM") {
//!     for row in &table.rows {
//!         println!("{} {:?}", row.position, row.cells);
//!     }
//! }
//! # Ok::<(), intergames_leaderboard::error::LeaderboardError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod watch;

// Re-export commonly used types
pub use config::LeaderboardConfig;
pub use error::{LeaderboardError, LeaderboardResult};
pub use types::{CategoryTable, CategoryWarning, CellValue, LeaderboardSnapshot, RankedRow};
