//! Source workbook watching
//!
//! Spreadsheet editors usually save through a temporary file and a rename,
//! so the parent directory is watched and events are matched by file name.

use crate::error::{LeaderboardError, LeaderboardResult};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

/// Quiet period before a burst of file events is reported
const DEBOUNCE: Duration = Duration::from_millis(300);

/// Keeps a watch alive; dropping it stops the watch.
pub struct FileWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

/// Call `on_change` after each debounced change to the file at `path`.
///
/// # Errors
/// `Watch` if the file does not exist or the OS watcher cannot be created.
pub fn watch_file<F>(path: &Path, mut on_change: F) -> LeaderboardResult<FileWatcher>
where
    F: FnMut() + Send + 'static,
{
    let canonical = path.canonicalize().map_err(|e| {
        LeaderboardError::Watch(format!("Cannot watch {}: {}", path.display(), e))
    })?;
    let parent = canonical
        .parent()
        .ok_or_else(|| LeaderboardError::Watch("Cannot determine parent directory".to_string()))?
        .to_path_buf();
    let file_name: OsString = canonical
        .file_name()
        .ok_or_else(|| LeaderboardError::Watch("Path has no file name".to_string()))?
        .to_os_string();

    let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| match result {
        Ok(events) => {
            let relevant = events
                .iter()
                .any(|event| event.path.file_name() == Some(file_name.as_os_str()));
            if relevant {
                tracing::info!("source workbook changed");
                on_change();
            }
        }
        Err(e) => tracing::warn!("file watcher error: {}", e),
    })
    .map_err(|e| LeaderboardError::Watch(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(&parent, RecursiveMode::NonRecursive)
        .map_err(|e| LeaderboardError::Watch(format!("Failed to watch directory: {}", e)))?;

    tracing::debug!(directory = %parent.display(), "watching for changes");
    Ok(FileWatcher {
        _debouncer: debouncer,
    })
}
