use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::schema::SalaryStatsReport;

// ------------------------------------------------------------
// Table rendering
// ------------------------------------------------------------
//
// Layout:
//
//   +HeadHunter Moscow---+-----------------+-----
//   | Language | Vacancies found | Vacancies ...
//   +----------+-----------------+-----
//   | Python   |               3 |
//   +----------+-----------------+-----
//
// - Widths are measured in chars, so Cyrillic titles and names line up
// - Numeric columns are right-justified
// - The title is dropped from the border when it does not fit
//
const HEADERS: [&str; 4] = [
    "Language",
    "Vacancies found",
    "Vacancies processed",
    "Average salary",
];

/// Renders one provider report as an ASCII table (no trailing newline).
pub fn render_table(report: &SalaryStatsReport) -> String {
    let rows: Vec<[String; 4]> = report
        .iter()
        .map(|(category, stats)| {
            [
                category.to_string(),
                stats.vacancies_found.to_string(),
                stats.vacancies_processed.to_string(),
                stats.average_salary.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = border_line(&widths);
    let mut lines = Vec::with_capacity(rows.len() + 4);

    lines.push(titled_border(&border, &report.title));
    lines.push(row_line(&HEADERS.map(String::from), &widths, false));
    lines.push(border.clone());
    for row in &rows {
        lines.push(row_line(row, &widths, true));
    }
    lines.push(border);

    lines.join("\n")
}

fn border_line(widths: &[usize; 4]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn titled_border(border: &str, title: &str) -> String {
    let title_width = title.chars().count();
    if title.is_empty() || title_width + 2 > border.len() {
        return border.to_string();
    }

    // border is pure ASCII, so char and byte offsets agree
    format!("+{}{}", title, &border[1 + title_width..])
}

fn row_line(cells: &[String; 4], widths: &[usize; 4], justify_numbers: bool) -> String {
    let mut line = String::from("|");
    for (column, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let padding = " ".repeat(width - cell.chars().count());
        if justify_numbers && column > 0 {
            line.push_str(&format!(" {padding}{cell} |"));
        } else {
            line.push_str(&format!(" {cell}{padding} |"));
        }
    }
    line
}

// ------------------------------------------------------------
// JSON rendering
// ------------------------------------------------------------

/// Serializes as `{ "<title>": { "<category>": stats, ... }, ... }`,
/// keeping both provider and category order.
struct ReportsByTitle<'a>(&'a [SalaryStatsReport]);

impl Serialize for ReportsByTitle<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for report in self.0 {
            map.serialize_entry(&report.title, report)?;
        }
        map.end()
    }
}

/// Renders all provider reports as one pretty-printed JSON object.
pub fn render_json(reports: &[SalaryStatsReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportsByTitle(reports))
}
