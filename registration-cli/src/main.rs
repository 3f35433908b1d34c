//! Member registration CLI.

mod cli;
mod commands;
mod error;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::cli::{Cli, Command};
use crate::commands::{load_config, run_prefectures, run_submit, run_validate};
use crate::error::CliError;

/// Exit status when a command could not run at all.
const SETUP_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("error: {e}");
        return ExitCode::from(SETUP_FAILURE);
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let level = LevelFilter::from(cli.log_level);
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::LogFile {
                path: path.clone(),
                source,
            })?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => WriteLogger::init(level, Config::default(), std::io::stderr())?,
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    let config = load_config(cli.config.as_deref())?;
    log::debug!("Loaded config: {config:?}");

    match cli.command {
        Command::Validate(args) => run_validate(&args, &config).await,
        Command::Submit(args) => run_submit(&args, &config).await,
        Command::Prefectures => {
            run_prefectures();
            Ok(true)
        }
    }
}
