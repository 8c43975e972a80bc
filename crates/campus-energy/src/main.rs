mod bootstrap;
mod pipeline;

use anyhow::Result;
use energy_core::settings::Settings;
use pipeline::RunStatus;

/// Exit status for a run that found no usable data under `--fail-on-empty`.
const EXIT_NO_DATA: i32 = 2;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Campus Energy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Output: {}, Timezone: {}",
        settings.data_dir.display(),
        settings.output_dir.display(),
        settings.timezone.as_deref().unwrap_or("as stated")
    );

    if settings.generate_demo {
        bootstrap::run_demo_setup(&settings)?;
    }

    let status = pipeline::run(&settings)?;
    match &status {
        RunStatus::NoData => tracing::info!("Nothing to report"),
        RunStatus::Completed {
            buildings,
            failed_artifacts,
        } => {
            if *failed_artifacts > 0 {
                tracing::warn!("{} artifacts could not be written", failed_artifacts);
            }
            tracing::info!("Done: reported on {} buildings", buildings);
        }
    }

    let code = exit_code(&status, settings.fail_on_empty);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Process exit status for a finished run.
fn exit_code(status: &RunStatus, fail_on_empty: bool) -> i32 {
    match status {
        RunStatus::NoData if fail_on_empty => EXIT_NO_DATA,
        _ => 0,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_no_data() {
        assert_eq!(exit_code(&RunStatus::NoData, false), 0);
        assert_eq!(exit_code(&RunStatus::NoData, true), EXIT_NO_DATA);
    }

    #[test]
    fn test_exit_code_completed_ignores_fail_on_empty() {
        let status = RunStatus::Completed {
            buildings: 2,
            failed_artifacts: 1,
        };
        assert_eq!(exit_code(&status, true), 0);
        assert_eq!(exit_code(&status, false), 0);
    }
}
