//! One batch run: load, analyze, render, report.

use energy_core::formatting::format_kwh;
use energy_core::settings::Settings;
use energy_data::analysis::analyze_table;
use energy_data::reader::{load_building_data, IngestReport};
use energy_report::dashboard::{generate_dashboard, DASHBOARD_FILE};
use energy_report::export::generate_reports;
use energy_report::table_view::render_summary_table;
use tracing::{error, info};

use crate::bootstrap;

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Artifacts were produced for `buildings` buildings. `failed_artifacts`
    /// counts files that could not be written.
    Completed {
        buildings: usize,
        failed_artifacts: usize,
    },
    /// No file validated, nothing was written.
    NoData,
}

/// Run the full pipeline described by `settings`.
///
/// Per-file and per-artifact failures are logged and never abort the run.
/// Only an unusable output directory is returned as an error.
pub fn run(settings: &Settings) -> anyhow::Result<RunStatus> {
    let tz = settings.timezone_handler();
    info!("Loading meter data from {}", settings.data_dir.display());
    let loaded = load_building_data(&settings.data_dir, &tz);
    log_ingest_report(&loaded.report);

    let Some(analysis) = analyze_table(&loaded.table) else {
        println!("No data found in {} directory.", settings.data_dir.display());
        return Ok(RunStatus::NoData);
    };

    bootstrap::ensure_output_dir(&settings.output_dir)?;

    let mut failed_artifacts = 0;
    if settings.no_dashboard {
        info!("Dashboard rendering disabled");
    } else {
        let path = settings.output_dir.join(DASHBOARD_FILE);
        if let Err(e) = generate_dashboard(&loaded.table, &analysis, &path) {
            error!("Failed to render {}: {}", path.display(), e);
            failed_artifacts += 1;
        }
    }

    let outcome = generate_reports(&loaded.table, &analysis, &settings.output_dir);
    failed_artifacts += outcome.failed.len();

    info!(
        "Building summary:\n{}",
        render_summary_table(&analysis.summaries)
    );
    info!(
        "Campus total {} across {} buildings",
        format_kwh(analysis.headline.total_kwh),
        analysis.headline.building_count
    );

    Ok(RunStatus::Completed {
        buildings: analysis.headline.building_count,
        failed_artifacts,
    })
}

fn log_ingest_report(report: &IngestReport) {
    info!(
        "Ingested {} files: {} loaded, {} skipped, {} failed",
        report.files.len(),
        report.loaded_count(),
        report.skipped_count(),
        report.failed_count()
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
