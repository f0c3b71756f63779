mod metadata;
mod settings;

use metadata::log_version_info;
use road_hex_lib::Pipeline;
use settings::Settings;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Setup logging, defaulting to `info` unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_cli();
    log_version_info();

    let result = Pipeline::new(settings.to_config()).and_then(|pipeline| pipeline.run());
    match result {
        Ok(report) => {
            tracing::info!(
                "Done: {} features, {} -> {} coordinates, {} cells at resolution {}",
                report.feature_count,
                report.raw_coordinate_count,
                report.segmentized_coordinate_count,
                report.cell_count,
                report.resolution
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Conversion failed: {err}");
            ExitCode::FAILURE
        }
    }
}
