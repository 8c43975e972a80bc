//! Demo meter data for trying the pipeline without real exports.
//!
//! Writes one hourly `timestamp,kwh` CSV per building. Only the binary's
//! explicit setup step calls into this module.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime, Timelike};
use energy_core::error::{EnergyError, Result};
use energy_core::time_utils::format_timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

/// Buildings generated when the caller does not name any.
pub const DEFAULT_DEMO_BUILDINGS: &[&str] = &["Building_A", "Building_B", "Science_Block"];

/// Inclusive lower / exclusive upper bound of generated hourly kWh.
const KWH_RANGE: std::ops::Range<u32> = 10..100;

#[derive(Serialize)]
struct DemoRow {
    timestamp: String,
    kwh: u32,
}

/// Parameters for [`generate_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub buildings: Vec<String>,
    /// Days of hourly readings per building.
    pub days: u32,
    /// Last reading instant; truncated to the hour.
    pub end: NaiveDateTime,
    /// Seed for reproducible output (`None` = entropy).
    pub seed: Option<u64>,
}

impl DemoConfig {
    pub fn new(end: NaiveDateTime) -> Self {
        Self {
            buildings: DEFAULT_DEMO_BUILDINGS.iter().map(|s| s.to_string()).collect(),
            days: 30,
            end,
            seed: None,
        }
    }
}

/// Write one demo CSV per building into `dir`, creating it if needed.
///
/// Returns the paths written, in building order.
pub fn generate_demo_data(dir: &Path, config: &DemoConfig) -> Result<Vec<PathBuf>> {
    if config.days == 0 {
        return Err(EnergyError::Config("demo days must be at least 1".to_string()));
    }
    std::fs::create_dir_all(dir)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let end = truncate_to_hour(config.end);
    let periods = i64::from(config.days) * 24;
    let start = end - Duration::hours(periods - 1);

    let mut written = Vec::with_capacity(config.buildings.len());
    for building in &config.buildings {
        let path = dir.join(format!("{building}.csv"));
        let mut writer = csv::Writer::from_path(&path).map_err(|source| EnergyError::Csv {
            path: path.clone(),
            source,
        })?;

        for i in 0..periods {
            let row = DemoRow {
                timestamp: format_timestamp(&(start + Duration::hours(i))),
                kwh: rng.gen_range(KWH_RANGE),
            };
            writer.serialize(&row).map_err(|source| EnergyError::Csv {
                path: path.clone(),
                source,
            })?;
        }
        writer.flush()?;

        info!("Created {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn truncate_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .unwrap_or(ts)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::load_building_data;
    use energy_core::time_utils::TimezoneHandler;
    use tempfile::TempDir;

    fn end() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-06-30 17:42:10", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn config(days: u32, seed: u64) -> DemoConfig {
        DemoConfig {
            days,
            seed: Some(seed),
            ..DemoConfig::new(end())
        }
    }

    #[test]
    fn test_generate_writes_one_file_per_building() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");

        let written = generate_demo_data(&data, &config(2, 7)).unwrap();

        assert_eq!(written.len(), 3);
        assert!(data.join("Building_A.csv").is_file());
        assert!(data.join("Science_Block.csv").is_file());
    }

    #[test]
    fn test_generated_data_loads_with_expected_shape() {
        let dir = TempDir::new().unwrap();
        generate_demo_data(dir.path(), &config(2, 7)).unwrap();

        let result = load_building_data(dir.path(), &TimezoneHandler::default());

        assert_eq!(result.table.building_count(), 3);
        assert_eq!(result.table.len(), 3 * 48);
        for r in result.table.records() {
            assert!(r.kwh >= 10.0 && r.kwh < 100.0);
        }
        let a = result.table.building("Building_A").unwrap();
        let last = a.readings().last().unwrap();
        assert_eq!(format_timestamp(&last.timestamp), "2024-06-30 17:00:00");
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        generate_demo_data(first.path(), &config(1, 99)).unwrap();
        generate_demo_data(second.path(), &config(1, 99)).unwrap();

        let a = std::fs::read_to_string(first.path().join("Building_B.csv")).unwrap();
        let b = std::fs::read_to_string(second.path().join("Building_B.csv")).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("timestamp,kwh\n"));
    }

    #[test]
    fn test_zero_days_rejected() {
        let dir = TempDir::new().unwrap();
        let err = generate_demo_data(dir.path(), &config(0, 1)).unwrap_err();
        assert!(matches!(err, EnergyError::Config(_)));
    }
}
