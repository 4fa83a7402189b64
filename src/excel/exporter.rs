//! Ranked leaderboard exporter - snapshot → Excel (.xlsx)

use crate::error::{LeaderboardError, LeaderboardResult};
use crate::types::{CategoryTable, CellValue, LeaderboardSnapshot};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Excel worksheet names are limited to 31 characters
const MAX_SHEET_NAME_LEN: usize = 31;

/// Writes each ranked category table to its own worksheet.
pub struct LeaderboardExporter<'a> {
    snapshot: &'a LeaderboardSnapshot,
}

impl<'a> LeaderboardExporter<'a> {
    pub fn new(snapshot: &'a LeaderboardSnapshot) -> Self {
        Self { snapshot }
    }

    /// Export all category tables to an .xlsx file
    pub fn export(&self, output_path: &Path) -> LeaderboardResult<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for table in &self.snapshot.tables {
            let worksheet = workbook.add_worksheet();
            Self::export_table(worksheet, table, &header_format)?;
        }

        workbook
            .save(output_path)
            .map_err(|e| LeaderboardError::Export(format!("Failed to save workbook: {}", e)))?;

        tracing::info!(
            output = %output_path.display(),
            sheets = self.snapshot.len(),
            "exported leaderboard"
        );
        Ok(())
    }

    fn export_table(
        worksheet: &mut Worksheet,
        table: &CategoryTable,
        header_format: &Format,
    ) -> LeaderboardResult<()> {
        worksheet
            .set_name(sanitize_sheet_name(&table.category))
            .map_err(|e| LeaderboardError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (col_idx, name) in table.columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col_idx as u16, name, header_format)
                .map_err(|e| LeaderboardError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            worksheet
                .write_number(excel_row, 0, row.position as f64)
                .map_err(|e| LeaderboardError::Export(format!("Failed to write position: {}", e)))?;

            for (cell_idx, cell) in row.cells.iter().enumerate() {
                let col = (cell_idx + 1) as u16;
                let result = match cell {
                    CellValue::Empty => continue,
                    CellValue::Number(n) => worksheet.write_number(excel_row, col, *n),
                    CellValue::Text(s) => worksheet.write_string(excel_row, col, s),
                    CellValue::Bool(b) => worksheet.write_boolean(excel_row, col, *b),
                };
                result.map_err(|e| {
                    LeaderboardError::Export(format!("Failed to write cell: {}", e))
                })?;
            }
        }

        worksheet.autofit();
        Ok(())
    }
}

/// Make a category name acceptable as a worksheet name
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let trimmed = cleaned.trim_matches('\'');
    if trimmed.is_empty() {
        "Sheet".to_string()
    } else {
        trimmed.to_string()
    }
}
