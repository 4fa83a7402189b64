//! Leaderboard pipeline: load sheets, rank each category, cache the result

pub mod cache;
pub mod transformer;

pub use cache::{CacheKey, CacheStats, LeaderboardCache};
pub use transformer::transform;

use crate::config::PipelineOptions;
use crate::error::LeaderboardResult;
use crate::excel::SheetLoader;
use crate::types::LeaderboardSnapshot;
use std::path::Path;

/// Read `categories` from the workbook at `path` and rank each of them.
///
/// Tables come back in the order the categories were given. Missing columns
/// only produce per-table warnings; a missing file or sheet fails the whole
/// load.
///
/// # Example
/// ```no_run
/// use intergames_leaderboard::config::LeaderboardConfig;
/// use intergames_leaderboard::core::load_leaderboard;
///
/// let config = LeaderboardConfig::default();
/// let snapshot = load_leaderboard(&config.source, &config.categories, &config.pipeline_options())?;
/// for table in &snapshot.tables {
///     println!("{}: {} athletes", table.category, table.row_count());
/// }
/// # Ok::<(), intergames_leaderboard::error::LeaderboardError>(())
/// ```
pub fn load_leaderboard(
    path: &Path,
    categories: &[String],
    options: &PipelineOptions,
) -> LeaderboardResult<LeaderboardSnapshot> {
    let raw_tables = SheetLoader::new(path)
        .with_header_row(options.header_row)
        .load(categories)?;

    let tables = raw_tables
        .iter()
        .map(|raw| transform(raw, &options.columns))
        .collect();

    let snapshot = LeaderboardSnapshot::new(path.to_path_buf(), tables);
    tracing::info!(
        source = %path.display(),
        categories = snapshot.len(),
        warnings = snapshot.warnings().count(),
        "leaderboard loaded"
    );
    Ok(snapshot)
}
