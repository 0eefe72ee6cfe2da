//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

use super::commands::{Commands, ExtractArgs};

#[derive(Parser)]
#[command(name = "sankhya-extract")]
#[command(about = "Extract Sankhya ERP query results into dated CSV files", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Config file (default: ~/.config/sankhya-extract/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Enable debug logging (SQL text, per-file progress)
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl Cli {
    /// The subcommand to run; a bare invocation extracts with defaults
    pub(crate) fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Extract(ExtractArgs::default()))
    }
}

impl ExtractArgs {
    /// Merge config file values (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.job.is_none() {
            self.job = config.job.clone();
        }
        if self.since.is_none() {
            self.since = config.since.clone();
        }
        if self.until.is_none() {
            self.until = config.until.clone();
        }
        if self.granularity.is_none() {
            self.granularity = config.granularity;
        }
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.clone();
        }
        if self.max_result_size.is_none() {
            self.max_result_size = config.max_result_size;
        }
        if self.aggregate.is_none() {
            self.aggregate = config.aggregate_output.clone();
        }
        self
    }
}
