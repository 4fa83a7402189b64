//! Shared fixtures: results workbooks laid out like the event spreadsheet
//! (banner rows, header on row 4, one sheet per category).

#![allow(dead_code)]

use intergames_leaderboard::CellValue;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: [&str; 9] = [
    "Equipe/Atleta",
    "Box",
    "WOD 1",
    "WOD 2",
    "WOD 3",
    "WOD 4",
    "Total Geral",
    "Observações",
    "Juiz",
];

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

/// A sheet: header names plus data rows (written below the header)
pub struct SheetSpec {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetSpec {
    pub fn new(name: &str, header: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Standard 9-column layout; `athletes` are (name, total) pairs
    pub fn standard(name: &str, athletes: &[(&str, CellValue)]) -> Self {
        let rows = athletes
            .iter()
            .enumerate()
            .map(|(i, (athlete, total))| {
                vec![
                    text(athlete),
                    text("Bunker"),
                    num(i as f64),
                    num(10.0),
                    num(20.0),
                    num(30.0),
                    total.clone(),
                    text("ok"),
                    text("Juiz A"),
                ]
            })
            .collect();
        Self::new(name, &HEADER, rows)
    }
}

/// Write sheets with three banner rows above the header (header on row 4)
pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    let mut workbook = Workbook::new();
    for spec in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&spec.name).unwrap();
        ws.write_string(0, 0, "INTERGAMES BUNKER 2025").unwrap();
        ws.write_string(2, 0, "Leaderboard").unwrap();

        for (col, name) in spec.header.iter().enumerate() {
            ws.write_string(3, col as u16, name).unwrap();
        }
        for (r, row) in spec.rows.iter().enumerate() {
            let excel_row = 4 + r as u32;
            for (c, cell) in row.iter().enumerate() {
                let col = c as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Number(n) => {
                        ws.write_number(excel_row, col, *n).unwrap();
                    }
                    CellValue::Text(s) => {
                        ws.write_string(excel_row, col, s).unwrap();
                    }
                    CellValue::Bool(b) => {
                        ws.write_boolean(excel_row, col, *b).unwrap();
                    }
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Workbook in a fresh temp dir; keep the `TempDir` alive while using the path
pub fn workbook(sheets: &[SheetSpec]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("leaderboard.xlsx");
    write_workbook(&path, sheets);
    (dir, path)
}

/// One sheet per default category with a few athletes each, including the
/// grand-total row, a blank row and an invalid total
pub fn event_workbook() -> (TempDir, PathBuf) {
    let categories = intergames_leaderboard::config::DEFAULT_CATEGORIES;
    let sheets: Vec<SheetSpec> = categories
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let base = (i as f64) * 10.0;
            let mut spec = SheetSpec::standard(
                name,
                &[
                    ("Ana", num(base + 50.0)),
                    ("Bia", num(base + 80.0)),
                    ("Total Geral", num(999.0)),
                    ("Caio", text("N/A")),
                    ("Duda", num(base + 65.0)),
                ],
            );
            spec.rows.insert(2, vec![CellValue::Empty; HEADER.len()]);
            spec
        })
        .collect();
    workbook(&sheets)
}
