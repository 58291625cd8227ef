//! Command-line interface for supervisorgen.
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;

/// Log verbosity accepted by `--log-level`, either by name or as a 0-5 index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevelArg(LevelFilter);

/// Level names in index order, so `"2"` and `"warn"` mean the same thing.
const LEVELS: [(&str, LevelFilter); 6] = [
    ("off", LevelFilter::OFF),
    ("error", LevelFilter::ERROR),
    ("warn", LevelFilter::WARN),
    ("info", LevelFilter::INFO),
    ("debug", LevelFilter::DEBUG),
    ("trace", LevelFilter::TRACE),
];

impl LogLevelArg {
    /// Directive understood by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        LEVELS
            .iter()
            .find(|(_, level)| *level == self.0)
            .map_or("off", |(name, _)| *name)
    }
}

impl FromStr for LogLevelArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        LEVELS
            .iter()
            .enumerate()
            .find(|(index, (name, _))| *name == wanted || index.to_string() == wanted)
            .map(|(_, (_, level))| LogLevelArg(*level))
            .ok_or_else(|| {
                format!("invalid log level '{}' (expected off..trace or 0-5)", value.trim())
            })
    }
}

/// Command-line interface for supervisorgen.
#[derive(Parser)]
#[command(name = "sgen", version, author)]
#[command(about = "Generate supervisord configuration from a YAML manifest", long_about = None)]
pub struct Cli {
    /// Override the logging verbosity for this invocation only.
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Which part of the manifest `render` should emit.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct Selection {
    /// Render only this program, without any group header.
    #[arg(short, long)]
    pub program: Option<String>,

    /// Render only this group and its member programs.
    #[arg(short, long)]
    pub group: Option<String>,
}

/// Available commands for sgen.
#[derive(Subcommand)]
pub enum Commands {
    /// Render supervisord configuration for the manifest.
    Render {
        /// Path to the manifest (defaults to `supervisorgen.yaml`, then `sgen.yaml`).
        #[arg(short, long)]
        config: Option<String>,

        #[command(flatten)]
        selection: Selection,

        /// Write to this file instead of stdout. Parent directories are created.
        #[arg(short, long, value_name = "PATH")]
        output: Option<String>,
    },

    /// List the programs and groups declared in the manifest.
    List {
        /// Path to the manifest (defaults to `supervisorgen.yaml`, then `sgen.yaml`).
        #[arg(short, long)]
        config: Option<String>,

        /// Emit machine-readable JSON output instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Parses command-line arguments and returns a `Cli` struct.
pub fn parse_args() -> Cli {
    Cli::parse()
}
