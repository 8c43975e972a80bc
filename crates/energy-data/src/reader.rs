//! CSV file discovery and loading.
//!
//! Scans a data directory for per-building meter files, validates that each
//! one carries `timestamp` and `kwh` columns, and merges the survivors into a
//! single [`UnifiedTable`]. Failures are isolated to the file that caused
//! them and recorded in an [`IngestReport`].

use std::fs::File;
use std::path::{Path, PathBuf};

use energy_core::error::{EnergyError, Result};
use energy_core::models::{MeterReading, UnifiedTable};
use energy_core::time_utils::TimezoneHandler;
use tracing::{debug, info, warn};

/// Column holding the reading instant.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Column holding the consumed energy.
pub const KWH_COLUMN: &str = "kwh";

// ── Ingestion report ──────────────────────────────────────────────────────────

/// What happened to one discovered file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Rows were added to the unified table under `building`.
    /// `replaced` is set when an earlier file's rows for the same building
    /// were discarded.
    Loaded {
        building: String,
        rows: usize,
        replaced: bool,
    },
    /// The file was well-formed but contributes nothing.
    Skipped { reason: String },
    /// Reading or parsing the file failed.
    Failed { error: EnergyError },
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of one ingestion run, in discovery order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub files: Vec<FileReport>,
}

impl IngestReport {
    pub fn loaded_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Loaded { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// The unified table plus the per-file report that produced it.
#[derive(Debug, Default)]
pub struct LoadResult {
    pub table: UnifiedTable,
    pub report: IngestReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files directly inside `data_path`, sorted by path.
///
/// The extension match is case-insensitive; subdirectories are not visited.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_csv_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Building identifier for a meter file: its base name without extension.
pub fn building_name_for(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Load every meter file under `data_path` into one unified table.
///
/// Never fails: unreadable, malformed or schema-incomplete files are logged,
/// recorded in the report and left out of the table.
pub fn load_building_data(data_path: &Path, tz: &TimezoneHandler) -> LoadResult {
    let mut result = LoadResult::default();

    let csv_files = find_csv_files(data_path);
    if csv_files.is_empty() {
        warn!("No CSV files found in {}", data_path.display());
        return result;
    }

    for path in csv_files {
        let outcome = ingest_file(&path, tz, &mut result.table);
        result.report.files.push(FileReport { path, outcome });
    }

    debug!(
        "Loaded {} rows for {} buildings from {} files ({} skipped, {} failed)",
        result.table.len(),
        result.table.building_count(),
        result.report.files.len(),
        result.report.skipped_count(),
        result.report.failed_count(),
    );

    result
}

/// Parse one meter file into readings, preserving row order.
///
/// Returns [`EnergyError::MissingColumn`] when either required column is
/// absent; any unparseable cell fails the whole file.
pub fn read_building_file(path: &Path, tz: &TimezoneHandler) -> Result<Vec<MeterReading>> {
    let file = File::open(path).map_err(|source| EnergyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_err = |source: csv::Error| EnergyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.is_empty() {
        return Err(EnergyError::EmptyFile(path.to_path_buf()));
    }

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EnergyError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let ts_idx = column(TIMESTAMP_COLUMN)?;
    let kwh_idx = column(KWH_COLUMN)?;

    let mut readings = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let row = i + 1;

        let ts_raw = record.get(ts_idx).unwrap_or_default();
        let timestamp =
            tz.parse_timestamp(ts_raw)
                .ok_or_else(|| EnergyError::TimestampParse {
                    path: path.to_path_buf(),
                    row,
                    value: ts_raw.to_string(),
                })?;

        let kwh_raw = record.get(kwh_idx).unwrap_or_default();
        let kwh = parse_kwh(kwh_raw).ok_or_else(|| EnergyError::KwhParse {
            path: path.to_path_buf(),
            row,
            value: kwh_raw.to_string(),
        })?;

        readings.push(MeterReading::new(timestamp, kwh));
    }

    Ok(readings)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Finite `f64` or nothing.
fn parse_kwh(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read one file and merge it into `table`, logging exactly one line.
fn ingest_file(path: &Path, tz: &TimezoneHandler, table: &mut UnifiedTable) -> FileOutcome {
    let Some(building) = building_name_for(path) else {
        let reason = "cannot derive building name".to_string();
        warn!("Skipping {}: {}", path.display(), reason);
        return FileOutcome::Skipped { reason };
    };

    match read_building_file(path, tz) {
        Ok(readings) if readings.is_empty() => {
            let reason = "no data rows".to_string();
            warn!("Skipping {}: {}", path.display(), reason);
            FileOutcome::Skipped { reason }
        }
        Ok(readings) => {
            let rows = readings.len();
            let replaced = table.insert_building(building.as_str(), readings);
            let message = loaded_message(&display_name(path), &building, rows, replaced);
            if replaced {
                warn!("{}", message);
            } else {
                info!("{}", message);
            }
            FileOutcome::Loaded {
                building,
                rows,
                replaced,
            }
        }
        Err(EnergyError::MissingColumn { column, .. }) => {
            let reason = format!("missing column '{}'", column);
            warn!("Skipping {}: {}", path.display(), reason);
            FileOutcome::Skipped { reason }
        }
        Err(error) => {
            warn!("Error loading {}: {}", path.display(), error);
            FileOutcome::Failed { error }
        }
    }
}

/// The single log line for a loaded file.
fn loaded_message(file: &str, building: &str, rows: usize, replaced: bool) -> String {
    if replaced {
        format!(
            "Successfully loaded: {} ({} rows), replacing earlier rows for {}",
            file, rows, building
        )
    } else {
        format!("Successfully loaded: {} ({} rows)", file, rows)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
