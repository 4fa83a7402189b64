use std::path::PathBuf;
use thiserror::Error;

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Cannot open spreadsheet {}: {reason}", path.display())]
    FileAccess { path: PathBuf, reason: String },

    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl LeaderboardError {
    /// True for errors caused by the source file or its sheet layout,
    /// as opposed to local configuration or runtime failures.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            LeaderboardError::FileAccess { .. } | LeaderboardError::SheetNotFound { .. }
        )
    }
}
