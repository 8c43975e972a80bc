use std::path::{Path, PathBuf};

use anyhow::Context;
use energy_core::settings::Settings;
use energy_data::demo::{generate_demo_data, DemoConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto a tracing filter directive.
///
/// Unrecognised names are passed through lowercased.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `"info"` if the level string is not a valid directive.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(())
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Create the report output directory (and missing parents) if absent.
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("cannot create output directory {}", path.display()))
}

// ── Demo setup ─────────────────────────────────────────────────────────────────

/// Demo generator parameters for this run, ending at the current local time.
pub fn demo_config(settings: &Settings) -> DemoConfig {
    DemoConfig {
        days: settings.demo_days,
        seed: settings.seed,
        ..DemoConfig::new(chrono::Local::now().naive_local())
    }
}

/// Write demo meter files into the data directory.
///
/// Only runs when explicitly requested; never triggered by loading.
pub fn run_demo_setup(settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    let config = demo_config(settings);
    tracing::info!(
        "Generating {} days of demo data for {} buildings in {}",
        config.days,
        config.buildings.len(),
        settings.data_dir.display()
    );
    generate_demo_data(&settings.data_dir, &config)
        .with_context(|| format!("demo setup failed in {}", settings.data_dir.display()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
