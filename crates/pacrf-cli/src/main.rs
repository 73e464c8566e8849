//! PAC-RF Front End - Main Entry Point

use clap::Parser;
use pacrf_cli::{init_logging, run, Cli, Settings};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load()?;

    init_logging(cli.log_level.as_deref().unwrap_or(&settings.log_level));
    info!("=== PAC-RF Front End v{} ===", env!("CARGO_PKG_VERSION"));

    if run(cli, settings).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
