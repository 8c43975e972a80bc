//! Plain-text per-building summary table for the console log.
//!
//! One row per building plus a totals row, with thousands separators and
//! each building's share of campus consumption.

use energy_core::formatting::{format_number, percentage};
use energy_core::models::BuildingSummary;

const HEADERS: [&str; 7] = ["Building", "Readings", "Mean", "Min", "Max", "Total kWh", "Share"];

/// Render `summaries` as an aligned text table ending in a TOTAL row.
///
/// Returns an empty string when there is nothing to show.
pub fn render_summary_table(summaries: &[BuildingSummary]) -> String {
    if summaries.is_empty() {
        return String::new();
    }

    let campus_total: f64 = summaries.iter().map(|s| s.sum).sum();
    let mut rows: Vec<[String; 7]> = summaries
        .iter()
        .map(|s| {
            [
                s.building.clone(),
                format_number(s.readings as f64, 0),
                format_number(s.mean, 2),
                format_number(s.min, 2),
                format_number(s.max, 2),
                format_number(s.sum, 2),
                format!("{:.1}%", percentage(s.sum, campus_total, 1)),
            ]
        })
        .collect();

    let readings: usize = summaries.iter().map(|s| s.readings).sum();
    rows.push([
        "TOTAL".to_string(),
        format_number(readings as f64, 0),
        String::new(),
        String::new(),
        String::new(),
        format_number(campus_total, 2),
        String::new(),
    ]);

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

/// First column left-aligned, the rest right-aligned.
fn push_line(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, w))| {
            if i == 0 {
                format!("{:<w$}", cell, w = *w)
            } else {
                format!("{:>w$}", cell, w = *w)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_summaries() -> Vec<BuildingSummary> {
        vec![
            BuildingSummary {
                building: "Building_A".to_string(),
                mean: 15.0,
                min: 10.0,
                max: 20.0,
                sum: 30.0,
                readings: 2,
            },
            BuildingSummary {
                building: "Science_Block".to_string(),
                mean: 1_250.5,
                min: 1_000.0,
                max: 1_501.0,
                sum: 2_501.0,
                readings: 2,
            },
        ]
    }

    #[test]
    fn test_render_empty() {
        assert!(render_summary_table(&[]).is_empty());
    }

    #[test]
    fn test_render_has_header_rows_and_total() {
        let text = render_summary_table(&make_summaries());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Building"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[2].starts_with("Building_A"));
        assert!(lines[3].contains("2,501.00"));
        assert!(lines[4].starts_with("TOTAL"));
        assert!(lines[4].contains("2,531.00"));
    }

    #[test]
    fn test_render_share_column() {
        let text = render_summary_table(&make_summaries());
        // 30 / 2531 ≈ 1.2%
        assert!(text.lines().nth(2).unwrap().ends_with("1.2%"));
    }

    #[test]
    fn test_render_columns_aligned() {
        let text = render_summary_table(&make_summaries());
        let lines: Vec<&str> = text.lines().collect();
        // Data rows end in the share column, so they share a width.
        assert_eq!(lines[2].len(), lines[3].len());
    }
}
