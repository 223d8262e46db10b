use anyhow::{Context, Result};
use kmzclean::services::pipeline::{Pipeline, PipelineConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let working_dir = std::env::current_dir().context("cannot determine working directory")?;
    log::info!("Looking for ZIP and KMZ files in {}", working_dir.display());

    let pipeline = Pipeline::new(PipelineConfig::for_dir(&working_dir));
    pipeline.reset_dirs()?;
    let summary = pipeline.run()?;

    log::info!(
        "Done: {} processed, {} skipped, {} failed",
        summary.completed(),
        summary.skipped(),
        summary.failed()
    );
    Ok(())
}
