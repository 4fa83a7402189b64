//! Spreadsheet loader - workbook sheets → raw tables

use crate::error::{LeaderboardError, LeaderboardResult};
use crate::types::{CellValue, RawTable};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader, Sheets};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads category sheets from a results workbook.
///
/// The workbook is opened read-only for the duration of one `load` call.
pub struct SheetLoader {
    path: PathBuf,
    header_row: usize,
}

impl SheetLoader {
    /// Create a loader using the default header row
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            header_row: crate::config::DEFAULT_HEADER_ROW,
        }
    }

    /// Zero-based sheet row holding the column names
    #[must_use]
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Load one raw table per category, in the order given.
    ///
    /// Every category is checked against the workbook's sheet names before
    /// any sheet is read, so a bad name never yields a partial result.
    ///
    /// # Errors
    /// `FileAccess` if the workbook cannot be opened or a sheet cannot be
    /// decoded, `SheetNotFound` if a category has no sheet of that exact name.
    pub fn load(&self, categories: &[String]) -> LeaderboardResult<Vec<RawTable>> {
        let mut workbook: Sheets<BufReader<File>> =
            open_workbook_auto(&self.path).map_err(|e| LeaderboardError::FileAccess {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let available = workbook.sheet_names();
        if let Some(missing) = categories.iter().find(|c| !available.contains(c)) {
            return Err(LeaderboardError::SheetNotFound {
                sheet: missing.clone(),
                available,
            });
        }

        let mut tables = Vec::with_capacity(categories.len());
        for category in categories {
            let range =
                workbook
                    .worksheet_range(category)
                    .map_err(|e| LeaderboardError::FileAccess {
                        path: self.path.clone(),
                        reason: format!("failed to read sheet '{}': {}", category, e),
                    })?;

            let table = read_table(category, &range, self.header_row);
            tracing::debug!(
                category = %category,
                columns = table.columns.len(),
                rows = table.row_count(),
                "read sheet"
            );
            tables.push(table);
        }

        Ok(tables)
    }
}

/// Build a raw table from a worksheet range.
///
/// Row and column numbers are absolute sheet coordinates: the header is sheet
/// row `header_row` and columns start at column A, whatever the range's used
/// area. A sheet that ends before the header row gives an empty table.
pub fn read_table(category: &str, range: &Range<Data>, header_row: usize) -> RawTable {
    let (Some(_), Some((end_row, end_col))) = (range.start(), range.end()) else {
        return RawTable::new(category, Vec::new());
    };

    let header_row = header_row as u32;
    if header_row > end_row {
        return RawTable::new(category, Vec::new());
    }

    let header_cells: Vec<CellValue> = (0..=end_col)
        .map(|col| cell_at(range, header_row, col))
        .collect();
    let mut table = RawTable::new(category, column_names(&header_cells));

    for row in (header_row + 1)..=end_row {
        let cells = (0..=end_col).map(|col| cell_at(range, row, col)).collect();
        table.push_row(cells);
    }

    table
}

fn cell_at(range: &Range<Data>, row: u32, col: u32) -> CellValue {
    range
        .get_value((row, col))
        .map(data_to_cell_value)
        .unwrap_or_default()
}

/// Convert a calamine cell to a `CellValue`
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        // Blank strings carry no value; treat them like untouched cells
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        // Times and dates are shown as written; only the total column is numeric
        Data::DateTime(dt) => CellValue::Text(excel_datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Readable text for a date/time cell.
///
/// Durations and time-of-day values (serial below one day) render as
/// `hh:mm:ss`; calendar dates as `YYYY-MM-DD hh:mm:ss`.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if dt.is_duration() || (0.0..1.0).contains(&serial) {
        return clock_text(serial);
    }
    match dt.as_datetime() {
        // Round to the nearest second; format truncates
        Some(datetime) => (datetime + chrono::Duration::milliseconds(500))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => serial.to_string(),
    }
}

/// `hh:mm:ss` from a fraction of a day; hours may exceed 24
fn clock_text(days: f64) -> String {
    let seconds = (days.abs() * 86_400.0).round() as u64;
    format!(
        "{}{:02}:{:02}:{:02}",
        if days < 0.0 { "-" } else { "" },
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

/// Header names from the header row cells.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, …
/// so every column stays addressable by name.
fn column_names(header: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                CellValue::Empty => format!("Unnamed: {}", idx),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_column_names_blank_and_duplicates() {
        let header = vec![
            text("Equipe/Atleta"),
            CellValue::Empty,
            text("Prova"),
            text("Prova"),
            text("Prova"),
            CellValue::Number(2025.0),
        ];
        assert_eq!(
            column_names(&header),
            vec!["Equipe/Atleta", "Unnamed: 1", "Prova", "Prova.1", "Prova.2", "2025"]
        );
    }

    #[test]
    fn test_data_to_cell_value() {
        assert_eq!(data_to_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(data_to_cell_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(data_to_cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(data_to_cell_value(&Data::String("N/A".into())), text("N/A"));
        assert_eq!(data_to_cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(data_to_cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_clock_text() {
        assert_eq!(clock_text(332.0 / 86_400.0), "00:05:32");
        assert_eq!(clock_text(0.0), "00:00:00");
        assert_eq!(clock_text(1.5), "36:00:00");
        assert_eq!(clock_text(-90.0 / 86_400.0), "-00:01:30");
        // Float noise rounds to the nearest second
        assert_eq!(clock_text(0.003_842_592_5), "00:05:32");
    }

    #[test]
    fn test_read_table_uses_absolute_header_row() {
        // Used area starts at B2, so relative and absolute coordinates differ
        let mut range: Range<Data> = Range::new((1, 1), (5, 2));
        range.set_value((1, 1), Data::String("LEADERBOARD".into()));
        range.set_value((3, 1), Data::String("Equipe/Atleta".into()));
        range.set_value((3, 2), Data::String("Total Geral".into()));
        range.set_value((4, 1), Data::String("Ana".into()));
        range.set_value((4, 2), Data::Float(42.0));
        range.set_value((5, 1), Data::String("Bia".into()));

        let table = read_table("RX FEM", &range, 3);
        assert_eq!(table.columns, vec!["Unnamed: 0", "Equipe/Atleta", "Total Geral"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0],
            vec![CellValue::Empty, text("Ana"), CellValue::Number(42.0)]
        );
        assert_eq!(table.rows[1], vec![CellValue::Empty, text("Bia"), CellValue::Empty]);
    }

    #[test]
    fn test_read_table_sheet_shorter_than_header() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("title".into()));
        let table = read_table("RX FEM", &range, 3);
        assert!(table.columns.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_read_table_empty_range() {
        let range: Range<Data> = Range::empty();
        let table = read_table("RX FEM", &range, 3);
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_file_access_error() {
        let loader = SheetLoader::new("/nonexistent/results.xlsx");
        let err = loader.load(&["RX FEM".to_string()]).unwrap_err();
        assert!(matches!(err, LeaderboardError::FileAccess { .. }));
    }
}
