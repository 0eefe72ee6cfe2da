//! CLI subcommand definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::consts::{DEFAULT_AGGREGATE_OUTPUT, DEFAULT_OUTPUT_DIR, DEFAULT_PATTERN};
use crate::core::Granularity;

#[derive(Subcommand, Clone)]
pub(crate) enum Commands {
    /// Log in, export one CSV per window, log out (default)
    Extract(ExtractArgs),
    /// Concatenate CSV files from a directory into one file
    Aggregate(AggregateArgs),
    /// List the available extraction jobs
    Jobs,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ExtractArgs {
    /// Extraction job (see `jobs`; default: items)
    #[arg(short, long)]
    pub(crate) job: Option<String>,

    /// First day to extract (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) since: Option<String>,

    /// Day after the last one to extract (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long)]
    pub(crate) until: Option<String>,

    /// Window size (default: the job's own)
    #[arg(short, long, value_enum)]
    pub(crate) granularity: Option<Granularity>,

    /// Directory the per-window CSV files are written to (default: raw)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// MAXRESULTSIZE sent with each query
    #[arg(long, value_name = "N")]
    pub(crate) max_result_size: Option<usize>,

    /// Log windows and SQL without contacting the server
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// After logout, merge the output directory into this file
    #[arg(long, value_name = "FILE")]
    pub(crate) aggregate: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct AggregateArgs {
    /// Directory holding the CSV files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub(crate) dir: PathBuf,

    /// File pattern inside the directory
    #[arg(short, long, default_value = DEFAULT_PATTERN)]
    pub(crate) pattern: String,

    /// Merged output file
    #[arg(short, long, default_value = DEFAULT_AGGREGATE_OUTPUT)]
    pub(crate) output: PathBuf,
}
