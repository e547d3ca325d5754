// 🖥️ CLI - command-line arguments and subcommands

use clap::{Parser, Subcommand};
use fingrowth::config::{AppConfig, DEFAULT_DERIVED_CSV, DEFAULT_INPUT_CSV};
use fingrowth::DEFAULT_FUZZY_CUTOFF;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Financial Growth Chatbot
///
/// Derives growth statistics from yearly company financials and answers
/// questions about them.
///
/// Examples:
///   fingrowth
///   fingrowth derive --input Financials.csv --output Enhanced.csv
///   fingrowth chat --data Enhanced.csv --report-dir reports
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory for exported company reports
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub report_dir: PathBuf,

    /// JSON file replacing the built-in action keyword rules
    #[arg(long, global = true, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Similarity cutoff for the fuzzy metric fallback (0.0 - 1.0)
    #[arg(long, global = true, default_value_t = DEFAULT_FUZZY_CUTOFF)]
    pub fuzzy_cutoff: f64,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Derive the enhanced table, then start the chat (default)
    Run {
        /// Raw yearly financials
        #[arg(short, long, default_value = DEFAULT_INPUT_CSV, value_name = "FILE")]
        input: PathBuf,

        /// Enhanced table to write
        #[arg(short, long, default_value = DEFAULT_DERIVED_CSV, value_name = "FILE")]
        output: PathBuf,
    },

    /// Derive the enhanced table only
    Derive {
        #[arg(short, long, default_value = DEFAULT_INPUT_CSV, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, default_value = DEFAULT_DERIVED_CSV, value_name = "FILE")]
        output: PathBuf,
    },

    /// Chat over an enhanced table written by an earlier run
    Chat {
        #[arg(short, long, default_value = DEFAULT_DERIVED_CSV, value_name = "FILE")]
        data: PathBuf,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        Ok(())
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }

    /// Filter used when RUST_LOG is not set
    pub fn default_filter(&self) -> EnvFilter {
        EnvFilter::default().add_directive(LevelFilter::from_level(self.log_level()).into())
    }

    /// Subcommand, defaulting to `run` with default paths
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            input: PathBuf::from(DEFAULT_INPUT_CSV),
            output: PathBuf::from(DEFAULT_DERIVED_CSV),
        })
    }

    pub fn to_config(&self) -> AppConfig {
        let mut config = AppConfig {
            report_dir: self.report_dir.clone(),
            rules_file: self.rules.clone(),
            fuzzy_cutoff: self.fuzzy_cutoff,
            ..AppConfig::default()
        };

        match self.command() {
            Command::Run { input, output } | Command::Derive { input, output } => {
                config.input_csv = input;
                config.derived_csv = output;
            }
            Command::Chat { data } => config.derived_csv = data,
        }
        config
    }
}
