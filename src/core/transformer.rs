//! Per-category ranking pipeline
//!
//! Applied independently to every raw sheet:
//! 1. drop rows with no values
//! 2. remove the aggregate ("Total Geral") row
//! 3. coerce the total column to numbers and sort descending, invalid last
//! 4. insert the Position column
//! 5. keep the first `max_columns` columns
//!
//! Missing columns degrade the affected step and attach a warning to the
//! table instead of failing.

use crate::config::ColumnConfig;
use crate::types::{CategoryTable, CategoryWarning, CellValue, RankedRow, RawTable};
use std::cmp::Ordering;

/// Rank one raw sheet. The input table is left untouched.
pub fn transform(raw: &RawTable, columns: &ColumnConfig) -> CategoryTable {
    let mut warnings = Vec::new();

    let mut rows: Vec<Vec<CellValue>> = raw
        .rows
        .iter()
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .cloned()
        .collect();

    match raw.column_index(&columns.identifier) {
        Some(idx) => {
            let before = rows.len();
            rows.retain(|row| row[idx].as_text() != Some(columns.aggregate_label.as_str()));
            tracing::debug!(
                category = %raw.category,
                removed = before - rows.len(),
                "removed aggregate rows"
            );
        }
        None => warnings.push(CategoryWarning::MissingColumn {
            category: raw.category.clone(),
            column: columns.identifier.clone(),
        }),
    }

    let ranked = match raw.column_index(&columns.total) {
        Some(idx) => {
            for row in rows.iter_mut() {
                row[idx] = row[idx]
                    .coerce_number()
                    .map(CellValue::Number)
                    .unwrap_or(CellValue::Empty);
            }
            // Stable: tied totals keep sheet order
            rows.sort_by(|a, b| compare_totals(a[idx].as_number(), b[idx].as_number()));
            true
        }
        None => {
            warnings.push(CategoryWarning::MissingColumn {
                category: raw.category.clone(),
                column: columns.total.clone(),
            });
            false
        }
    };

    let keep = columns.max_columns.saturating_sub(1).min(raw.columns.len());

    let kept = &raw.columns[..keep];
    let mut table_columns = Vec::with_capacity(keep + 1);
    table_columns.push(position_label(&columns.position, kept));
    table_columns.extend(kept.iter().cloned());

    let ranked_rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, mut cells)| {
            cells.truncate(keep);
            RankedRow {
                position: i + 1,
                cells,
            }
        })
        .collect();

    if let Some(expected) = &columns.expected {
        let found = &table_columns[1..];
        if expected.as_slice() != found {
            warnings.push(CategoryWarning::ColumnOrderMismatch {
                category: raw.category.clone(),
                expected: expected.clone(),
                found: found.to_vec(),
            });
        }
    }

    for warning in &warnings {
        tracing::warn!(category = %raw.category, "{}", warning);
    }

    CategoryTable {
        category: raw.category.clone(),
        columns: table_columns,
        rows: ranked_rows,
        ranked,
        warnings,
    }
}

/// The rank column's name, suffixed `.1`, `.2`, … if a kept column already uses it
fn position_label(label: &str, kept: &[String]) -> String {
    if !kept.iter().any(|c| c == label) {
        return label.to_string();
    }
    (1..)
        .map(|n| format!("{}.{}", label, n))
        .find(|candidate| !kept.contains(candidate))
        .unwrap_or_else(|| label.to_string())
}

/// Descending by value; `None` sorts after every number
fn compare_totals(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn sheet(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        let mut table = RawTable::new("RX FEM", columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    fn names(table: &CategoryTable) -> Vec<String> {
        table.rows.iter().map(|r| r.cells[0].to_string()).collect()
    }

    #[test]
    fn test_ranks_by_total_and_drops_aggregate() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![
                vec![text("A"), num(50.0)],
                vec![text("Total Geral"), num(999.0)],
                vec![text("B"), num(80.0)],
                vec![text("C"), text("N/A")],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());

        assert_eq!(table.columns, vec!["Posição", "Equipe/Atleta", "Total Geral"]);
        assert_eq!(names(&table), vec!["B", "A", "C"]);
        assert_eq!(
            table.rows.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(table.rows[0].cells[1], num(80.0));
        assert_eq!(table.rows[1].cells[1], num(50.0));
        assert_eq!(table.rows[2].cells[1], CellValue::Empty);
        assert!(table.ranked);
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn test_drops_fully_empty_rows_only() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral", "Box"],
            vec![
                vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
                vec![text("A"), num(10.0), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Empty, text("orphan")],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1].cells[2], text("orphan"));
    }

    #[test]
    fn test_numeric_text_totals_are_coerced() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![
                vec![text("A"), text(" 12.5 ")],
                vec![text("B"), num(100.0)],
                vec![text("C"), text("70")],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(names(&table), vec!["B", "C", "A"]);
        assert_eq!(table.rows[2].cells[1], num(12.5));
    }

    #[test]
    fn test_ties_keep_sheet_order() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![
                vec![text("first"), num(30.0)],
                vec![text("second"), num(30.0)],
                vec![text("nobody"), CellValue::Empty],
                vec![text("third"), num(30.0)],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(names(&table), vec!["first", "second", "third", "nobody"]);
    }

    #[test]
    fn test_negative_and_zero_totals_rank_above_invalid() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![
                vec![text("dns"), text("DNS")],
                vec![text("neg"), num(-5.0)],
                vec![text("zero"), num(0.0)],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(names(&table), vec!["zero", "neg", "dns"]);
    }

    #[test]
    fn test_missing_identifier_column_keeps_aggregate_and_warns() {
        let raw = sheet(
            &["Atleta", "Total Geral"],
            vec![
                vec![text("A"), num(1.0)],
                vec![text("Total Geral"), num(999.0)],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(table.row_count(), 2);
        assert_eq!(names(&table), vec!["Total Geral", "A"]);
        assert!(table.ranked);
        assert_eq!(
            table.warnings,
            vec![CategoryWarning::MissingColumn {
                category: "RX FEM".to_string(),
                column: "Equipe/Atleta".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_total_column_keeps_order_with_positions() {
        let raw = sheet(
            &["Equipe/Atleta", "Pontos"],
            vec![
                vec![text("A"), num(1.0)],
                vec![text("Total Geral"), num(3.0)],
                vec![text("B"), num(2.0)],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert!(!table.ranked);
        assert_eq!(names(&table), vec!["A", "B"]);
        assert_eq!(table.rows[1].position, 2);
        assert_eq!(table.rows[1].cells[1], num(2.0));
        assert_eq!(
            table.warnings,
            vec![CategoryWarning::MissingColumn {
                category: "RX FEM".to_string(),
                column: "Total Geral".to_string(),
            }]
        );
    }

    #[test]
    fn test_trims_to_eight_columns() {
        let columns = [
            "Equipe/Atleta",
            "Box",
            "WOD 1",
            "WOD 2",
            "WOD 3",
            "WOD 4",
            "Total Geral",
            "Notas",
            "Extra",
        ];
        let raw = sheet(
            &columns,
            vec![(0..9).map(|i| num(i as f64)).collect()],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(table.column_count(), 8);
        assert_eq!(table.columns[7], "Total Geral");
        assert_eq!(table.rows[0].width(), 8);
    }

    #[test]
    fn test_narrow_sheet_is_not_padded() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral", "Box"],
            vec![vec![text("A"), num(1.0), text("Bunker")]],
        );

        let table = transform(&raw, &ColumnConfig::default());
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.rows[0].width(), 4);
    }

    #[test]
    fn test_total_beyond_cutoff_still_drives_order() {
        let columns = ["Equipe/Atleta", "A", "B", "C", "D", "E", "F", "Total Geral"];
        let mut low: Vec<CellValue> = vec![text("low")];
        low.extend((0..6).map(|_| CellValue::Empty));
        low.push(num(1.0));
        let mut high: Vec<CellValue> = vec![text("high")];
        high.extend((0..6).map(|_| CellValue::Empty));
        high.push(num(2.0));
        let raw = sheet(&columns, vec![low, high]);

        let table = transform(&raw, &ColumnConfig::default());
        assert!(!table.columns.contains(&"Total Geral".to_string()));
        assert_eq!(names(&table), vec!["high", "low"]);
    }

    #[test]
    fn test_column_contract_mismatch_warns() {
        let raw = sheet(
            &["Total Geral", "Equipe/Atleta"],
            vec![vec![num(5.0), text("A")]],
        );
        let config = ColumnConfig {
            expected: Some(vec!["Equipe/Atleta".to_string(), "Total Geral".to_string()]),
            ..ColumnConfig::default()
        };

        let table = transform(&raw, &config);
        assert!(matches!(
            table.warnings.as_slice(),
            [CategoryWarning::ColumnOrderMismatch { .. }]
        ));
    }

    #[test]
    fn test_column_contract_match_is_silent() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![vec![text("A"), num(5.0)]],
        );
        let config = ColumnConfig {
            expected: Some(vec!["Equipe/Atleta".to_string(), "Total Geral".to_string()]),
            ..ColumnConfig::default()
        };

        assert!(transform(&raw, &config).warnings.is_empty());
    }

    #[test]
    fn test_sheet_with_own_position_column_gets_suffixed_rank_label() {
        let raw = sheet(
            &["Posição", "Equipe/Atleta", "Total Geral", "Posição.1"],
            vec![
                vec![num(2.0), text("A"), num(10.0), CellValue::Empty],
                vec![num(1.0), text("B"), num(20.0), CellValue::Empty],
            ],
        );

        let table = transform(&raw, &ColumnConfig::default());

        assert_eq!(
            table.columns,
            vec!["Posição.2", "Posição", "Equipe/Atleta", "Total Geral", "Posição.1"]
        );
        assert_eq!(table.cell_index("Posição"), Some(0));
        assert_eq!(names(&table), vec!["1", "2"]);
        assert_eq!(table.rows[0].position, 1);
    }

    #[test]
    fn test_input_not_mutated() {
        let raw = sheet(
            &["Equipe/Atleta", "Total Geral"],
            vec![
                vec![text("A"), text("N/A")],
                vec![text("B"), num(2.0)],
            ],
        );
        let before = raw.clone();
        let _ = transform(&raw, &ColumnConfig::default());
        assert_eq!(raw, before);
    }

    #[test]
    fn test_compare_totals() {
        assert_eq!(compare_totals(Some(2.0), Some(1.0)), Ordering::Less);
        assert_eq!(compare_totals(Some(1.0), None), Ordering::Less);
        assert_eq!(compare_totals(None, Some(1.0)), Ordering::Greater);
        assert_eq!(compare_totals(None, None), Ordering::Equal);
    }
}
