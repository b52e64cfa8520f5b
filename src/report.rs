//! Status report table

use crate::constants::report::{
    DIRTY, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, NOT_APPLICABLE, UNKNOWN,
};
use colored::*;

const HEADERS: [&str; 4] = ["Repository", "Branch", "Uncommitted", "Unpushed"];
const UNCOMMITTED_WIDTH: usize = 13;
const UNPUSHED_WIDTH: usize = 10;

/// Status of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub branch: String,
    pub uncommitted: String,
    pub unpushed: String,
}

impl ReportRow {
    /// A row with every metric still unknown
    pub fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            branch: UNKNOWN.to_string(),
            uncommitted: UNKNOWN.to_string(),
            unpushed: UNKNOWN.to_string(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.uncommitted == DIRTY
    }

    pub fn unpushed_count(&self) -> Option<u64> {
        self.unpushed.parse().ok()
    }

    pub fn needs_attention(&self) -> bool {
        self.is_dirty() || self.unpushed_count().is_some_and(|count| count > 0)
    }
}

/// Render rows as a table sorted by repository name
///
/// Repository and branch columns size to their longest value plus padding,
/// clamped to a fixed range; longer values are truncated.
pub fn format_report(rows: &[ReportRow]) -> String {
    let mut rows: Vec<&ReportRow> = rows.iter().collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let widths = [
        column_width(rows.iter().map(|row| row.name.as_str())),
        column_width(rows.iter().map(|row| row.branch.as_str())),
        UNCOMMITTED_WIDTH,
        UNPUSHED_WIDTH,
    ];

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(border(&widths, '┌', '┬', '┐'));
    lines.push(table_row(
        &widths,
        HEADERS.map(|_| Box::new(|s: &str| s.bold()) as Painter),
        HEADERS,
    ));
    lines.push(border(&widths, '├', '┼', '┤'));
    for row in rows {
        lines.push(table_row(
            &widths,
            painters(row),
            [
                row.name.as_str(),
                row.branch.as_str(),
                row.uncommitted.as_str(),
                row.unpushed.as_str(),
            ],
        ));
    }
    lines.push(border(&widths, '└', '┴', '┘'));
    lines.join("\n")
}

type Painter = Box<dyn Fn(&str) -> ColoredString>;

fn painters(row: &ReportRow) -> [Painter; 4] {
    let name: Painter = if row.needs_attention() {
        Box::new(|s: &str| s.red())
    } else {
        Box::new(|s: &str| s.green())
    };
    let uncommitted: Painter = if row.is_dirty() {
        Box::new(|s: &str| s.red())
    } else {
        Box::new(|s: &str| s.green())
    };
    let unpushed: Painter = if row.unpushed == NOT_APPLICABLE {
        Box::new(|s: &str| s.normal())
    } else if row.unpushed_count().is_some_and(|count| count > 0) {
        Box::new(|s: &str| s.red())
    } else {
        Box::new(|s: &str| s.green())
    };
    [name, Box::new(|s: &str| s.normal()), uncommitted, unpushed]
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    let longest = values.map(|value| value.chars().count()).max().unwrap_or(0);
    (longest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

fn border(widths: &[usize; 4], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|width| "─".repeat(*width)).collect();
    format!("{left}{}{right}", segments.join(&mid.to_string()))
}

fn table_row(widths: &[usize; 4], painters: [Painter; 4], cells: [&str; 4]) -> String {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(painters.iter())
        .map(|((cell, width), paint)| {
            // color after padding so escape codes do not count towards the width
            let text = fit(cell, width - 2);
            format!(" {} ", paint(text.as_str()))
        })
        .collect();
    format!("│{}│", rendered.join("│"))
}

fn fit(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len <= width {
        format!("{value:<width$}")
    } else {
        let mut truncated: String = value.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}
