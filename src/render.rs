//! Plain-text rendering of dashboard payloads: summary blocks, tables,
//! pagination footers, and the in-place export progress line.

use std::io::Write;

use crossterm::style::Stylize;
use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};
use serde_json::{Map, Value};

use crate::pages::statistics::{BinningResult, StationSummary};
use crate::pagination::PageInfo;

/// Widest a table cell is allowed to grow before truncation.
const MAX_CELL_WIDTH: usize = 28;

fn fmt_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}

/// Prints a `label: value` summary block.
pub fn summary(entries: &[(&str, u64)]) {
    for (label, value) in entries {
        println!("{:<16} {}", format!("{}:", label), value);
    }
    println!();
}

/// Prints a named label/count breakdown (the text rendering of the
/// dashboard charts).
pub fn breakdown(title: &str, entries: &[(&'static str, u64)]) {
    println!("{}", title.to_string().bold());
    for (label, count) in entries {
        println!("  {:<22} {}", label, count);
    }
    println!();
}

/// Prints a row table with computed column widths.
pub fn table(columns: &[String], rows: &[Map<String, Value>]) {
    if rows.is_empty() {
        println!("No data available");
        return;
    }

    let mut widths: Vec<usize> = columns
        .iter()
        .map(|c| c.chars().count().min(MAX_CELL_WIDTH))
        .collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let cell = row.get(column).map(fmt_value).unwrap_or_default();
            widths[i] = widths[i].max(cell.chars().count()).min(MAX_CELL_WIDTH);
        }
    }

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<w$}", clip(c, widths[i]), w = widths[i]))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let cell = row
                    .get(column)
                    .map(fmt_value)
                    .unwrap_or_else(|| "-".to_string());
                format!("{:<w$}", clip(&cell, widths[i]), w = widths[i])
            })
            .collect();
        println!("{}", cells.join("  "));
    }
    println!();
}

/// Prints `Page X of Y` plus the windowed page strip.
pub fn page_footer(info: PageInfo) {
    let strip: Vec<String> = info
        .window()
        .iter()
        .map(|p| {
            if *p == info.page {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    println!(
        "Page {} of {}   {}",
        info.page,
        info.total_pages,
        strip.join(" ")
    );
}

/// Per-station throughput table for zone 2/3 combined statistics.
pub fn station_table(stations: &[StationSummary]) {
    println!(
        "{}",
        format!(
            "{:<32} {:>10} {:>10} {:>10} {:>12} {:>8}",
            "Station", "Total", "OK", "NG", "Avg cycle", "OK %"
        )
        .bold()
    );
    let mut total = 0u64;
    let mut ok = 0u64;
    let mut ng = 0u64;
    for station in stations {
        println!(
            "{:<32} {:>10} {:>10} {:>10} {:>12.1} {:>7.2}%",
            station.station.replace('_', " "),
            station.total,
            station.ok,
            station.ng,
            station.avgcytime,
            station.ok_percent()
        );
        total += station.total;
        ok += station.ok;
        ng += station.ng;
    }
    let ok_percent = if total > 0 {
        ok as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    println!(
        "{:<32} {:>10} {:>10} {:>10} {:>12} {:>7.2}%",
        "Total", total, ok, ng, "-", ok_percent
    );
    println!();
}

/// Grade-range table for one binning analysis.
pub fn binning_table(title: &str, result: &BinningResult) {
    println!("{}", title.to_string().bold());
    if let Some(error) = &result.error {
        println!("  Unavailable: {}", error);
        println!();
        return;
    }
    println!(
        "  {:<10} {:>10} {:>10} {:>8} {:>8}",
        "Grade", "V min", "V max", "Count", "Pct"
    );
    for grade in &result.grades {
        println!(
            "  {:<10} {:>10.4} {:>10.4} {:>8} {:>7.2}%",
            grade.grade_name, grade.vmin, grade.vmax, grade.count, grade.pct
        );
    }
    println!(
        "  Accepted: {} of {} ({:.2}%)",
        result.accepted_count, result.total_cells, result.accepted_pct
    );
    println!();
}

/// Redraws the export progress indicator in place.
pub fn progress_line(percent: u8) {
    let mut out = std::io::stdout();
    let _ = execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine));
    let _ = write!(out, "Export progress: {:>3}%", percent);
    let _ = out.flush();
}

/// Ends the progress line so following output starts on a fresh row.
pub fn finish_progress_line() {
    println!();
}
