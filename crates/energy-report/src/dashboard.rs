//! Three-panel PNG dashboard: daily trends, per-building totals and an
//! hour-of-day scatter.

use std::ops::Range;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use energy_core::error::{EnergyError, Result};
use energy_core::models::{BuildingSummary, DailyTotal, UnifiedTable};
use energy_data::analysis::CampusAnalysis;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

pub const DASHBOARD_FILE: &str = "dashboard.png";

const CANVAS_SIZE: (u32, u32) = (1000, 1800);
const TITLE: &str = "Campus Energy-Use Dashboard";
const FONT: &str = "sans-serif";

/// Series colours, assigned by building order and reused cyclically.
const PALETTE: [RGBColor; 8] = [
    RGBColor(0x4C, 0xAF, 0x50),
    RGBColor(0x21, 0x96, 0xF3),
    RGBColor(0xFF, 0x98, 0x00),
    RGBColor(0x9C, 0x27, 0xB0),
    RGBColor(0xF4, 0x43, 0x36),
    RGBColor(0x00, 0x96, 0x88),
    RGBColor(0x79, 0x55, 0x48),
    RGBColor(0x60, 0x7D, 0x8B),
];

pub fn building_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Y-axis range covering `values` plus 10% headroom, always including zero
/// and never degenerate.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((hi - lo) * 0.1).max(1.0);
    let lo = if lo < 0.0 { lo - pad } else { 0.0 };
    lo..hi + pad
}

/// Label for an x position on the bar chart: the building name at integer
/// positions, empty elsewhere.
pub fn bar_label(summaries: &[BuildingSummary], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    summaries
        .get(rounded as usize)
        .map(|s| s.building.clone())
        .unwrap_or_default()
}

/// Render the dashboard PNG to `path`.
///
/// An empty table is a no-op that logs and returns `Ok`.
pub fn generate_dashboard(
    table: &UnifiedTable,
    analysis: &CampusAnalysis,
    path: &Path,
) -> Result<()> {
    if table.is_empty() {
        info!("No data to visualize.");
        return Ok(());
    }

    let root = BitMapBackend::new(path, CANVAS_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let body = root.titled(TITLE, (FONT, 32)).map_err(render_err)?;
    let panels = body.split_evenly((3, 1));

    draw_daily_trends(&panels[0], &analysis.summaries, &analysis.daily_totals)?;
    draw_building_totals(&panels[1], &analysis.summaries)?;
    draw_hourly_scatter(&panels[2], table, &analysis.summaries)?;

    root.present().map_err(render_err)?;
    info!("Dashboard saved as '{}'", path.display());
    Ok(())
}

// ── Panels ────────────────────────────────────────────────────────────────────

fn draw_daily_trends<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    summaries: &[BuildingSummary],
    daily: &[DailyTotal],
) -> Result<()> {
    let (Some(first), Some(last)) = (
        daily.iter().map(|d| d.day).min(),
        daily.iter().map(|d| d.day).max(),
    ) else {
        return Ok(());
    };
    let span = ((last - first).num_days() as f64).max(1.0);
    let day_offset = |day: NaiveDate| (day - first).num_days() as f64;
    let day_label = |x: &f64| {
        (first + Duration::days(x.round() as i64))
            .format("%m-%d")
            .to_string()
    };

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Consumption Trends", (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..span, value_range(daily.iter().map(|d| d.kwh_sum)))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_label_formatter(&day_label)
        .y_desc("Total kWh")
        .draw()
        .map_err(render_err)?;

    for (i, summary) in summaries.iter().enumerate() {
        let color = building_color(i);
        let points: Vec<(f64, f64)> = daily
            .iter()
            .filter(|d| d.building == summary.building)
            .map(|d| (day_offset(d.day), d.kwh_sum))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(render_err)?
            .label(summary.building.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_building_totals<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    summaries: &[BuildingSummary],
) -> Result<()> {
    let n = summaries.len().max(1);
    let label = |x: &f64| bar_label(summaries, *x);

    let mut chart = ChartBuilder::on(area)
        .caption("Total Energy Consumption per Building", (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            -0.5f64..(n as f64 - 0.5),
            value_range(summaries.iter().map(|s| s.sum)),
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label)
        .y_desc("Total kWh")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(summaries.iter().enumerate().map(|(i, s)| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, s.sum)], building_color(i).filled())
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_hourly_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &UnifiedTable,
    summaries: &[BuildingSummary],
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Peak Hour Consumption Analysis", (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            -0.5f64..23.5f64,
            value_range(table.records().iter().map(|r| r.kwh)),
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(24)
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .x_desc("Hour of Day (0-23)")
        .y_desc("kWh")
        .draw()
        .map_err(render_err)?;

    for (i, summary) in summaries.iter().enumerate() {
        let Some(building) = table.building(&summary.building) else {
            continue;
        };
        let color = building_color(i);
        chart
            .draw_series(
                building
                    .readings()
                    .map(|r| Circle::new((r.hour() as f64, r.kwh), 3, color.mix(0.5).filled())),
            )
            .map_err(render_err)?
            .label(summary.building.clone())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn render_err(e: impl std::fmt::Display) -> EnergyError {
    EnergyError::Render(e.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use energy_core::models::MeterReading;
    use energy_data::analysis::analyze_table;
    use tempfile::TempDir;

    fn summary(name: &str, sum: f64) -> BuildingSummary {
        BuildingSummary {
            building: name.to_string(),
            mean: sum,
            min: sum,
            max: sum,
            sum,
            readings: 1,
        }
    }

    #[test]
    fn test_value_range_includes_zero_and_headroom() {
        let r = value_range(vec![10.0, 50.0]);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 50.0);
    }

    #[test]
    fn test_value_range_handles_negative_values() {
        let r = value_range(vec![-20.0, 5.0]);
        assert!(r.start < -20.0);
        assert!(r.end > 5.0);
    }

    #[test]
    fn test_value_range_empty_is_not_degenerate() {
        let r = value_range(Vec::new());
        assert!(r.end > r.start);
    }

    #[test]
    fn test_bar_label_only_at_integer_positions() {
        let summaries = vec![summary("Gym", 1.0), summary("Library", 2.0)];
        assert_eq!(bar_label(&summaries, 0.0), "Gym");
        assert_eq!(bar_label(&summaries, 1.0), "Library");
        assert_eq!(bar_label(&summaries, 0.5), "");
        assert_eq!(bar_label(&summaries, 2.0), "");
        assert_eq!(bar_label(&summaries, -1.0), "");
    }

    #[test]
    fn test_building_color_cycles() {
        assert_eq!(building_color(0).rgb(), building_color(PALETTE.len()).rgb());
        assert_ne!(building_color(0).rgb(), building_color(1).rgb());
    }

    #[test]
    fn test_generate_dashboard_empty_table_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DASHBOARD_FILE);
        let table = UnifiedTable::new();
        let mut populated = UnifiedTable::new();
        populated.insert_building(
            "A",
            vec![MeterReading::new(
                NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                1.0,
            )],
        );
        let analysis = analyze_table(&populated).unwrap();

        generate_dashboard(&table, &analysis, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_dashboard_renders_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DASHBOARD_FILE);
        let at = |day: u32, hour: u32| {
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
        };
        let mut table = UnifiedTable::new();
        table.insert_building(
            "Building_A",
            vec![
                MeterReading::new(at(1, 0), 10.0),
                MeterReading::new(at(1, 1), 20.0),
                MeterReading::new(at(3, 5), 12.0),
            ],
        );
        table.insert_building(
            "Building_B",
            vec![
                MeterReading::new(at(1, 0), 5.0),
                MeterReading::new(at(2, 13), 7.5),
            ],
        );
        let analysis = analyze_table(&table).unwrap();

        generate_dashboard(&table, &analysis, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&bytes[12..16], b"IHDR");
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        assert_eq!((width, height), CANVAS_SIZE);
    }
}
