use crate::config::LeaderboardConfig;
use crate::core::load_leaderboard;
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::excel::LeaderboardExporter;
use crate::types::{CategoryTable, LeaderboardSnapshot};
use crate::watch::watch_file;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::mpsc::channel;

/// Categories to load: the configured list, or just `only` when given
fn selected_categories(config: &LeaderboardConfig, only: Option<&str>) -> Vec<String> {
    match only {
        Some(category) => vec![category.to_string()],
        None => config.categories.clone(),
    }
}

fn load(config: &LeaderboardConfig, only: Option<&str>) -> LeaderboardResult<LeaderboardSnapshot> {
    load_leaderboard(
        &config.source,
        &selected_categories(config, only),
        &config.pipeline_options(),
    )
}

/// Render a ranked table as aligned plain-text lines (header first)
pub(crate) fn format_table(table: &CategoryTable) -> Vec<String> {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.row_count() + 1);
    grid.push(table.columns.clone());
    for row in &table.rows {
        let mut line = Vec::with_capacity(row.width());
        line.push(row.position.to_string());
        line.extend(row.cells.iter().map(|c| c.to_string()));
        grid.push(line);
    }

    let mut widths = vec![0; table.column_count()];
    for line in &grid {
        for (idx, value) in line.iter().enumerate() {
            widths[idx] = widths[idx].max(value.chars().count());
        }
    }

    grid.iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(value, width)| {
                    let pad = width - value.chars().count();
                    format!("{}{}", value, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn print_table(table: &CategoryTable) {
    println!(
        "\n{}",
        format!("🏆 Classificação: {}", table.category).bold().cyan()
    );
    for warning in &table.warnings {
        println!("   {} {}", "⚠️".yellow(), warning.to_string().yellow());
    }

    let lines = format_table(table);
    let rule_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut lines = lines.into_iter();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
        println!("{}", "─".repeat(rule_width));
    }
    for line in lines {
        println!("{}", line);
    }
    if table.rows.is_empty() {
        println!("{}", "   (no athletes)".dimmed());
    }
}

fn print_banner(config: &LeaderboardConfig) {
    println!("{}", format!("🔥 {}", config.title).bold().green());
    println!("   {}", config.subtitle);
    println!("   Source: {}", config.source.display());
}

/// Execute the show command
pub fn show(config: &LeaderboardConfig, category: Option<String>) -> LeaderboardResult<()> {
    print_banner(config);

    let snapshot = load(config, category.as_deref())?;
    if snapshot.is_empty() {
        println!(
            "\n{}",
            "❌ No leaderboard was loaded. Check the configured categories."
                .bold()
                .red()
        );
        return Ok(());
    }

    for table in &snapshot.tables {
        print_table(table);
    }
    println!();
    Ok(())
}

/// Execute the check command
pub fn check(config: &LeaderboardConfig) -> LeaderboardResult<()> {
    println!("{}", "✅ Checking leaderboard workbook".bold().green());
    println!("   Source: {}\n", config.source.display());

    let snapshot = load(config, None)?;

    for table in &snapshot.tables {
        let status = if table.warnings.is_empty() {
            "✅".to_string()
        } else {
            "⚠️".to_string()
        };
        println!(
            "   {} {:<16} {:>4} athletes{}",
            status,
            table.category.bright_blue(),
            table.row_count(),
            if table.ranked { "" } else { " (unranked)" }
        );
        for warning in &table.warnings {
            println!("      {}", warning.to_string().yellow());
        }
    }

    let warnings = snapshot.warnings().count();
    println!();
    if warnings == 0 {
        println!("{}", "✅ All categories ranked".bold().green());
    } else {
        println!(
            "{}",
            format!("⚠️  {} warning(s) across {} categories", warnings, snapshot.len())
                .bold()
                .yellow()
        );
    }
    Ok(())
}

/// Execute the export command
pub fn export(config: &LeaderboardConfig, output: PathBuf, verbose: bool) -> LeaderboardResult<()> {
    println!("{}", "🔥 Leaderboard - Excel Export".bold().green());
    println!("   Source: {}", config.source.display());
    println!("   Output: {}\n", output.display());

    let snapshot = load(config, None)?;

    if verbose {
        for table in &snapshot.tables {
            println!(
                "   📊 {}: {} rows, {} columns",
                table.category.bright_blue(),
                table.row_count(),
                table.column_count()
            );
        }
        println!();
    }

    LeaderboardExporter::new(&snapshot).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the watch command
pub fn watch(config: &LeaderboardConfig, category: Option<String>) -> LeaderboardResult<()> {
    println!("{}", "👁️  Leaderboard - Watch Mode".bold().green());
    println!("   Watching: {}", config.source.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    let (tx, rx) = channel();
    let _watcher = watch_file(&config.source, move || {
        let _ = tx.send(());
    })?;

    run_watch_action(config, category.as_deref());

    while rx.recv().is_ok() {
        println!(
            "\n{} {}",
            "🔄 Change detected at".cyan(),
            chrono::Local::now().format("%H:%M:%S").to_string().cyan()
        );
        run_watch_action(config, category.as_deref());
    }

    Err(LeaderboardError::Watch("watcher stopped unexpectedly".to_string()))
}

fn run_watch_action(config: &LeaderboardConfig, category: Option<&str>) {
    match load(config, category) {
        Ok(snapshot) => {
            for table in &snapshot.tables {
                print_table(table);
            }
            println!();
        }
        Err(e) => println!("{} {}", "❌ Load failed:".bold().red(), e),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
