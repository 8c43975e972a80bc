use clap::Parser;
use std::path::PathBuf;

use crate::error::{EnergyError, Result};
use crate::time_utils::{resolve_timezone_name, TimezoneHandler};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Campus energy-use dashboard and report generator
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campus-energy",
    about = "Aggregate per-building meter CSVs into a dashboard and summary reports",
    version
)]
pub struct Settings {
    /// Directory scanned (non-recursively) for per-building CSV files
    #[arg(long, env = "CAMPUS_ENERGY_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory the reports and dashboard are written to
    #[arg(long, env = "CAMPUS_ENERGY_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Convert offset-bearing timestamps into this IANA zone ("auto" = system zone).
    /// Without it they keep the wall clock of their own offset
    #[arg(long)]
    pub timezone: Option<String>,

    /// Write demo meter data into the data directory before running
    #[arg(long)]
    pub generate_demo: bool,

    /// Days of hourly demo readings per building (1-366)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=366))]
    pub demo_days: u32,

    /// Seed for the demo data generator (random if not specified)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip rendering dashboard.png
    #[arg(long)]
    pub no_dashboard: bool,

    /// Exit with status 2 when no input file could be loaded
    #[arg(long)]
    pub fail_on_empty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings = Settings::parse_from(args);
        settings.resolve_auto_values()
    }

    /// Resolve the `"auto"` timezone and apply the `--debug` flag.
    fn resolve_auto_values(mut self) -> Result<Self> {
        if let Some(name) = self.timezone.take() {
            let resolved = resolve_timezone_name(&name);
            if !TimezoneHandler::validate_timezone(&resolved) {
                return Err(EnergyError::Config(format!(
                    "unknown timezone \"{}\"",
                    resolved
                )));
            }
            self.timezone = Some(resolved);
        }

        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        Ok(self)
    }

    /// Timestamp parser configured for this run.
    pub fn timezone_handler(&self) -> TimezoneHandler {
        match &self.timezone {
            Some(name) => TimezoneHandler::new(name),
            None => TimezoneHandler::default(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
