//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "registration",
    version,
    about = "Validate and submit member registrations",
    long_about = "Validate and submit member registrations.\n\n\
                  Reads a JSON object keyed by field id (name, furigana, email, password,\n\
                  phone, postcode, prefecture, city, address, remarks) and runs it through\n\
                  the same validation and submission flow as the web form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON config file (endpoints, timeouts, durations).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log level.
    #[arg(long = "log-level", value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevelArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a registration without submitting it.
    Validate(SnapshotArgs),

    /// Validate, confirm and submit a registration.
    Submit(SubmitArgs),

    /// List the prefectures accepted by the prefecture field.
    Prefectures,
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// JSON file with the form values.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Skip the postcode existence lookup.
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,

    /// Submit without printing the confirmation table.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for simplelog::LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}
