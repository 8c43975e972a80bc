//! File artifacts: the cleaned unified table, the per-building summary and
//! the executive summary text.

use std::path::{Path, PathBuf};

use energy_core::error::{EnergyError, Result};
use energy_core::models::{BuildingSummary, CampusHeadline, UnifiedTable};
use energy_core::time_utils::format_timestamp;
use energy_data::analysis::CampusAnalysis;
use serde::Serialize;
use tracing::{error, info};

pub const CLEANED_DATA_FILE: &str = "cleaned_energy_data.csv";
pub const BUILDING_SUMMARY_FILE: &str = "building_summary.csv";
pub const SUMMARY_TEXT_FILE: &str = "summary.txt";

#[derive(Serialize)]
struct CleanedRow<'a> {
    timestamp: String,
    kwh: f64,
    #[serde(rename = "Building")]
    building: &'a str,
    hour: u32,
}

/// Outcome of writing the report artifacts for one run.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, EnergyError)>,
}

impl ReportOutcome {
    /// Record the result of writing `path`, logging failures.
    pub fn record(&mut self, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => self.written.push(path),
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                self.failed.push((path, e));
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write the unified table as `timestamp,kwh,Building,hour`, one line per row.
pub fn write_cleaned_data(table: &UnifiedTable, path: &Path) -> Result<()> {
    let csv_err = |source: csv::Error| EnergyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in table.records() {
        writer
            .serialize(CleanedRow {
                timestamp: format_timestamp(&record.timestamp),
                kwh: record.kwh,
                building: table.building_name(record.building),
                hour: record.hour(),
            })
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write per-building statistics as `Building,mean,min,max,sum`.
pub fn write_building_summary(summaries: &[BuildingSummary], path: &Path) -> Result<()> {
    let csv_err = |source: csv::Error| EnergyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for summary in summaries {
        writer.serialize(summary).map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Fixed-template executive summary.
pub fn render_summary_text(headline: &CampusHeadline) -> String {
    format!(
        "--- Executive Summary ---\n\
         Total Campus Consumption: {:.2} kWh\n\
         Highest Consuming Building: {}\n\
         Peak Load Time (Hour): {}:00\n\
         Data processed for {} buildings.\n",
        headline.total_kwh, headline.top_building, headline.peak_hour, headline.building_count
    )
}

/// Write all three text artifacts into `out_dir`.
///
/// Each artifact is attempted even if an earlier one failed. The summary
/// text is also echoed to stdout.
pub fn generate_reports(
    table: &UnifiedTable,
    analysis: &CampusAnalysis,
    out_dir: &Path,
) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();

    let cleaned = out_dir.join(CLEANED_DATA_FILE);
    outcome.record(cleaned.clone(), write_cleaned_data(table, &cleaned));

    let summary_csv = out_dir.join(BUILDING_SUMMARY_FILE);
    outcome.record(
        summary_csv.clone(),
        write_building_summary(&analysis.summaries, &summary_csv),
    );

    let text = render_summary_text(&analysis.headline);
    let summary_txt = out_dir.join(SUMMARY_TEXT_FILE);
    let write_result =
        std::fs::write(&summary_txt, &text).map_err(|source| EnergyError::FileWrite {
            path: summary_txt.clone(),
            source,
        });
    outcome.record(summary_txt, write_result);

    println!("\n{}", text);
    info!("Wrote {} report files to {}", outcome.written.len(), out_dir.display());

    outcome
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use energy_core::models::MeterReading;
    use energy_data::analysis::analyze_table;
    use tempfile::TempDir;

    fn reading(s: &str, kwh: f64) -> MeterReading {
        MeterReading::new(
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap(),
            kwh,
        )
    }

    fn scenario_table() -> UnifiedTable {
        let mut table = UnifiedTable::new();
        table.insert_building(
            "Building_A",
            vec![
                reading("2024-01-01 00:00:00", 10.0),
                reading("2024-01-01 01:00:00", 20.0),
            ],
        );
        table.insert_building("Building_B", vec![reading("2024-01-01 00:00:00", 5.0)]);
        table
    }

    // ── render_summary_text ───────────────────────────────────────────────────

    #[test]
    fn test_render_summary_text_template() {
        let headline = CampusHeadline {
            total_kwh: 35.0,
            top_building: "Building_A".to_string(),
            peak_hour: 1,
            building_count: 2,
        };
        assert_eq!(
            render_summary_text(&headline),
            "--- Executive Summary ---\n\
             Total Campus Consumption: 35.00 kWh\n\
             Highest Consuming Building: Building_A\n\
             Peak Load Time (Hour): 1:00\n\
             Data processed for 2 buildings.\n"
        );
    }

    // ── write_cleaned_data ────────────────────────────────────────────────────

    #[test]
    fn test_write_cleaned_data_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CLEANED_DATA_FILE);

        write_cleaned_data(&scenario_table(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "timestamp,kwh,Building,hour");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("2024-01-01 01:00:00,20"));
        assert!(lines[2].ends_with(",Building_A,1"));
        assert!(lines[3].ends_with(",Building_B,0"));
    }

    // ── write_building_summary ────────────────────────────────────────────────

    #[test]
    fn test_write_building_summary_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(BUILDING_SUMMARY_FILE);
        let analysis = analyze_table(&scenario_table()).unwrap();

        write_building_summary(&analysis.summaries, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["Building", "mean", "min", "max", "sum"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Building_A");
        assert_eq!(rows[0][4].parse::<f64>().unwrap(), 30.0);
        assert_eq!(&rows[1][0], "Building_B");
        assert_eq!(rows[1][4].parse::<f64>().unwrap(), 5.0);
    }

    // ── generate_reports ──────────────────────────────────────────────────────

    #[test]
    fn test_generate_reports_writes_all_artifacts() {
        let dir = TempDir::new().unwrap();
        let table = scenario_table();
        let analysis = analyze_table(&table).unwrap();

        let outcome = generate_reports(&table, &analysis, dir.path());

        assert!(outcome.is_complete());
        assert_eq!(outcome.written.len(), 3);
        let summary = std::fs::read_to_string(dir.path().join(SUMMARY_TEXT_FILE)).unwrap();
        assert!(summary.contains("Total Campus Consumption: 35.00 kWh"));
        assert!(summary.contains("Peak Load Time (Hour): 1:00"));
    }

    #[test]
    fn test_generate_reports_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        // A directory squatting on the cleaned-data path makes that write fail.
        std::fs::create_dir(dir.path().join(CLEANED_DATA_FILE)).unwrap();
        let table = scenario_table();
        let analysis = analyze_table(&table).unwrap();

        let outcome = generate_reports(&table, &analysis, dir.path());

        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.written.len(), 2);
        assert!(dir.path().join(SUMMARY_TEXT_FILE).is_file());
    }
}
