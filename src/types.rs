use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

//==============================================================================
// Cell Values
//==============================================================================

/// A single spreadsheet cell after loading.
///
/// Serializes untagged: `Empty` becomes JSON `null`, so an invalid or missing
/// total shows up as `null` in API responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Check if the cell holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric value, if the cell is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text value, if the cell is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lenient numeric coercion: unparseable values become `None`.
    ///
    /// Numbers pass through (NaN and infinities count as invalid), text is
    /// parsed after trimming, booleans map to 1/0.
    pub fn coerce_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Empty => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

//==============================================================================
// Raw Sheet Data
//==============================================================================

/// One sheet as read from the workbook, header row already applied.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub category: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(category: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            category: category.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

//==============================================================================
// Ranked Output
//==============================================================================

/// A row of a ranked table: its position plus the kept data cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub position: usize,
    pub cells: Vec<CellValue>,
}

impl RankedRow {
    /// Number of columns this row occupies, Position included
    pub fn width(&self) -> usize {
        self.cells.len() + 1
    }
}

/// Recoverable per-category problem, attached to that category's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryWarning {
    /// An expected column is absent; the step needing it was skipped
    MissingColumn { category: String, column: String },
    /// Kept columns differ from the configured column contract
    ColumnOrderMismatch {
        category: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl fmt::Display for CategoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryWarning::MissingColumn { category, column } => write!(
                f,
                "Column '{}' not found in sheet '{}'",
                column, category
            ),
            CategoryWarning::ColumnOrderMismatch {
                category,
                expected,
                found,
            } => write!(
                f,
                "Columns in sheet '{}' do not match the expected layout (expected [{}], found [{}])",
                category,
                expected.join(", "),
                found.join(", ")
            ),
        }
    }
}

/// Final ranked table for one category.
///
/// `columns[0]` is the Position column; every row's `cells` line up with
/// `columns[1..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub category: String,
    pub columns: Vec<String>,
    pub rows: Vec<RankedRow>,
    /// False when the total column was missing and rows kept sheet order
    pub ranked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CategoryWarning>,
}

impl CategoryTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index into `RankedRow::cells` for a data column name
    pub fn cell_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .skip(1)
            .position(|c| c == column)
    }

    /// Iterate over one column's values, in rank order
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a CellValue>> {
        let idx = self.cell_index(column)?;
        Some(self.rows.iter().map(move |row| &row.cells[idx]))
    }
}

//==============================================================================
// Snapshot
//==============================================================================

/// All ranked tables built from one read of the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
    pub source: PathBuf,
    pub loaded_at: DateTime<Utc>,
    /// In the order the categories were requested
    pub tables: Vec<CategoryTable>,
}

impl LeaderboardSnapshot {
    pub fn new(source: PathBuf, tables: Vec<CategoryTable>) -> Self {
        Self {
            source,
            loaded_at: Utc::now(),
            tables,
        }
    }

    /// Look up a category's table by exact name
    pub fn get(&self, category: &str) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.category.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Every warning across all categories
    pub fn warnings(&self) -> impl Iterator<Item = &CategoryWarning> {
        self.tables.iter().flat_map(|t| t.warnings.iter())
    }
}
