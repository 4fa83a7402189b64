//! HTML dashboard rendering
//!
//! Server-side rendered page: title, category selector, and the selected
//! category's ranked table. Selection travels as the `category` query
//! parameter, so the page works without client-side scripting.

use crate::config::LeaderboardConfig;
use crate::error::LeaderboardError;
use crate::types::{CategoryTable, LeaderboardSnapshot};
use std::fmt::Write;

/// Pixel height of one table row
pub const ROW_HEIGHT_PX: usize = 35;
/// Pixel height of the header row plus borders
pub const HEADER_HEIGHT_PX: usize = 38;

/// Table height that shows every row without an inner scrollbar
pub fn table_height(rows: usize) -> usize {
    rows * ROW_HEIGHT_PX + HEADER_HEIGHT_PX
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem; color: #1f2933; }
h1 { margin-bottom: 0.2rem; }
.selector { display: flex; flex-wrap: wrap; gap: 0.4rem; margin: 1rem 0; }
.selector button { padding: 0.4rem 0.9rem; border: 1px solid #cbd2d9; border-radius: 6px; background: #fff; cursor: pointer; }
.selector button.active { background: #e12d39; border-color: #e12d39; color: #fff; }
.table-wrap { overflow: auto; width: 100%; }
table { border-collapse: collapse; width: 100%; }
th, td { height: 34px; padding: 0 0.6rem; border-bottom: 1px solid #e4e7eb; text-align: left; white-space: nowrap; }
th { background: #f5f7fa; }
.notice { padding: 0.8rem 1rem; border-radius: 6px; margin: 1rem 0; }
.info { background: #e6f6ff; }
.warning { background: #fffbea; }
.error { background: #ffe3e3; }
"#;

/// Render the full dashboard page.
///
/// `snapshot` is the outcome of loading the leaderboard; a load error
/// replaces the selector with an error notice.
pub fn render_dashboard(
    config: &LeaderboardConfig,
    snapshot: Result<&LeaderboardSnapshot, &LeaderboardError>,
    selected: Option<&str>,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{}</h1>\n<h2>{}</h2>\n",
        escape_html(&config.title),
        escape_html(&config.subtitle)
    );

    match snapshot {
        Err(err) => {
            push_notice(
                &mut body,
                "error",
                &format!("Could not load the leaderboard: {}", err),
            );
        }
        Ok(snapshot) if snapshot.is_empty() => {
            push_notice(
                &mut body,
                "error",
                "No leaderboard was loaded. Check that the configured categories match the sheet names in the workbook.",
            );
        }
        Ok(snapshot) => {
            // Layout problems of every sheet, whichever category is open
            for warning in snapshot.warnings() {
                push_notice(&mut body, "warning", &warning.to_string());
            }
            let table = selected.and_then(|name| snapshot.get(name));
            render_selector(&mut body, snapshot, table.map(|t| t.category.as_str()));
            match (table, selected) {
                (Some(table), _) => render_table(&mut body, table),
                (None, Some(name)) => push_notice(
                    &mut body,
                    "warning",
                    &format!("Unknown category '{}'. Select one of the categories above.", name),
                ),
                (None, None) => push_notice(
                    &mut body,
                    "info",
                    "Select a category above to view its leaderboard.",
                ),
            }
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&config.title),
        STYLE,
        body
    )
}

fn render_selector(out: &mut String, snapshot: &LeaderboardSnapshot, active: Option<&str>) {
    out.push_str("<form class=\"selector\" method=\"get\" action=\"/\">\n");
    for category in snapshot.categories() {
        let class = if Some(category) == active {
            " class=\"active\""
        } else {
            ""
        };
        let name = escape_html(category);
        let _ = writeln!(
            out,
            "<button type=\"submit\" name=\"category\" value=\"{}\"{}>{}</button>",
            name, class, name
        );
    }
    out.push_str("</form>\n");
}

fn render_table(out: &mut String, table: &CategoryTable) {
    let _ = writeln!(out, "<h3>Classificação: {}</h3>", escape_html(&table.category));

    let _ = writeln!(
        out,
        "<div class=\"table-wrap\" style=\"height: {}px\">\n<table>\n<thead><tr>",
        table_height(table.row_count())
    );
    for column in &table.columns {
        let _ = write!(out, "<th>{}</th>", escape_html(column));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for row in &table.rows {
        let _ = write!(out, "<tr><td>{}</td>", row.position);
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell.to_string()));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
}

fn push_notice(out: &mut String, kind: &str, message: &str) {
    let _ = writeln!(
        out,
        "<div class=\"notice {}\">{}</div>",
        kind,
        escape_html(message)
    );
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
