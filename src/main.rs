use std::process::ExitCode;

use clap::Parser;
use personalcli::cli::{self, Cli};
use personalcli::config::{AppConfig, Settings};
use personalcli::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let settings = match AppConfig::from_env().and_then(|config| Settings::resolve(&config)) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
