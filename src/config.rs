//! Leaderboard configuration
//!
//! Loaded from a YAML file and validated against the embedded JSON Schema
//! before deserializing. Every field is optional; the defaults describe the
//! Intergames Bunker 2025 workbook.

use crate::error::{LeaderboardError, LeaderboardResult};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Sheet names ranked by default, in display order
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "SCALED FEM",
    "SCALED MASC",
    "INTER FEM",
    "INTER MASC",
    "MASTER FEM",
    "MASTER MASC",
    "RX FEM",
    "RX MASC",
];

/// Zero-based sheet row holding the real header (Excel row 4)
pub const DEFAULT_HEADER_ROW: usize = 3;

/// Position column plus seven data columns
pub const DEFAULT_MAX_COLUMNS: usize = 8;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "leaderboard.yaml";

/// Column names and the column contract used by the transformer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Team/athlete column, used to find the aggregate row
    pub identifier: String,
    /// Numeric score column used for ranking
    pub total: String,
    /// Identifier value marking the grand-total summary row
    pub aggregate_label: String,
    /// Label of the inserted rank column
    pub position: String,
    /// Columns kept after ranking, Position included
    pub max_columns: usize,
    /// Expected names of the kept data columns, in order
    pub expected: Option<Vec<String>>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            identifier: "Equipe/Atleta".to_string(),
            total: "Total Geral".to_string(),
            aggregate_label: "Total Geral".to_string(),
            position: "Posição".to_string(),
            max_columns: DEFAULT_MAX_COLUMNS,
            expected: None,
        }
    }
}

/// Everything that affects the pipeline output besides the file itself.
///
/// Part of the cache key, so it must stay `Hash + Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineOptions {
    pub header_row: usize,
    pub columns: ColumnConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            columns: ColumnConfig::default(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub title: String,
    pub subtitle: String,
    /// Spreadsheet path; relative paths resolve against the config file
    pub source: PathBuf,
    pub header_row: usize,
    pub categories: Vec<String>,
    pub columns: ColumnConfig,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            title: "INTERGAMES BUNKER 2025".to_string(),
            subtitle: "Leaderboard".to_string(),
            source: PathBuf::from("Bnkr Intergames Leaderboard V2.xlsx"),
            header_row: DEFAULT_HEADER_ROW,
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            columns: ColumnConfig::default(),
        }
    }
}

impl LeaderboardConfig {
    /// Load a configuration file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Yaml` for malformed YAML and
    /// `Config` when the document violates the schema.
    pub fn load(path: &Path) -> LeaderboardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if config.source.is_relative() {
            if let Some(dir) = path.parent() {
                config.source = dir.join(&config.source);
            }
        }

        tracing::debug!(
            config = %path.display(),
            source = %config.source.display(),
            categories = config.categories.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration YAML. Relative paths are kept as-is.
    pub fn from_yaml_str(content: &str) -> LeaderboardResult<Self> {
        let yaml: Value = serde_yaml::from_str(content)?;

        // An empty document means "all defaults"
        if yaml.is_null() {
            return Ok(Self::default());
        }

        validate_against_schema(&yaml)?;
        let config: Self = serde_yaml::from_value(yaml)?;
        Ok(config)
    }

    /// Configuration for a command-line run.
    ///
    /// Uses `config_path` when given, else `leaderboard.yaml` in the current
    /// directory if present, else the defaults. `source` overrides the
    /// configured workbook.
    pub fn resolve(config_path: Option<&Path>, source: Option<PathBuf>) -> LeaderboardResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(source) = source {
            config.source = source;
        }
        Ok(config)
    }

    /// Options handed to the loader and transformer
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            header_row: self.header_row,
            columns: self.columns.clone(),
        }
    }
}

/// Validate configuration YAML against the embedded JSON Schema
fn validate_against_schema(yaml: &Value) -> LeaderboardResult<()> {
    let schema_str = include_str!("../schema/leaderboard.schema.json");
    let schema_value: serde_json::Value = serde_json::from_str(schema_str)
        .map_err(|e| LeaderboardError::Config(format!("Failed to parse schema: {}", e)))?;

    let compiled_schema = JSONSchema::compile(&schema_value)
        .map_err(|e| LeaderboardError::Config(format!("Failed to compile schema: {}", e)))?;

    let json_value: serde_json::Value = serde_json::to_value(yaml).map_err(|e| {
        LeaderboardError::Config(format!("Failed to convert YAML to JSON: {}", e))
    })?;

    if let Err(errors) = compiled_schema.validate(&json_value) {
        let error_messages: Vec<String> = errors.map(|e| format!("  - {}", e)).collect();
        return Err(LeaderboardError::Config(format!(
            "Schema validation failed:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}
