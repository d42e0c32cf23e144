mod browse;
mod cli;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use pokedex_runtime::view::error_line;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error_line(&e));
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(&config.logging);

    match cli::run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}
