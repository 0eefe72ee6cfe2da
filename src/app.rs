use std::path::{Path, PathBuf};

use chrono::Local;

use crate::cli::{AggregateArgs, ExtractArgs};
use crate::client::{SankhyaClient, UreqTransport};
use crate::config::{Config, credentials_from_env};
use crate::consts::{DEFAULT_JOB, DEFAULT_OUTPUT_DIR, DEFAULT_PATTERN, DEFAULT_SINCE, DEFAULT_UNTIL};
use crate::error::AppError;
use crate::job::runner::{ExtractPlan, extract};
use crate::job::{all_jobs, get_job};
use crate::output::aggregate;
use crate::utils::parse_date;

/// Resolve job, range, granularity and output dir; CLI/config merge happens first
fn build_plan(args: &ExtractArgs) -> Result<ExtractPlan, AppError> {
    let job_name = args.job.as_deref().unwrap_or(DEFAULT_JOB);
    let job = get_job(job_name).ok_or_else(|| AppError::UnknownJob {
        name: job_name.to_string(),
    })?;
    let since = parse_date(args.since.as_deref().unwrap_or(DEFAULT_SINCE))?;
    let until = parse_date(args.until.as_deref().unwrap_or(DEFAULT_UNTIL))?;
    if since >= until {
        tracing::warn!("Empty date range {since}..{until}; nothing to extract");
    }

    Ok(ExtractPlan {
        job,
        since,
        until,
        granularity: args.granularity.unwrap_or_else(|| job.granularity()),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
    })
}

fn print_dry_run(plan: &ExtractPlan) {
    for window in plan.windows() {
        println!("-- {window}");
        println!("{};", plan.job.build_sql(&window));
    }
}

fn merge(dir: &Path, pattern: &str, output: &Path) -> Result<(), AppError> {
    let summary = aggregate(dir, pattern, output)?;
    tracing::info!(
        "Merged {} rows from {} files into {}",
        summary.rows,
        summary.files.len(),
        output.display()
    );
    Ok(())
}

/// Extraction failures end up in the log only; the returned error covers
/// configuration problems and the optional merge step.
pub(crate) fn handle_extract(args: ExtractArgs, config: &Config) -> Result<(), AppError> {
    let args = args.with_config(config);
    let plan = build_plan(&args)?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    let client = SankhyaClient::new(
        UreqTransport,
        config.endpoint(),
        config.client_options(args.max_result_size),
    );
    let credentials = credentials_from_env();
    extract(&client, &credentials, &plan, &|| Local::now().naive_local());

    if let Some(output) = &args.aggregate {
        merge(&plan.output_dir, DEFAULT_PATTERN, output)?;
    }
    Ok(())
}

pub(crate) fn handle_aggregate(args: &AggregateArgs) -> Result<(), AppError> {
    merge(&args.dir, &args.pattern, &args.output)
}

pub(crate) fn print_jobs() {
    for job in all_jobs() {
        println!(
            "{:<8} {:<6} [{}]  {}",
            job.name(),
            job.granularity().label(),
            job.aliases().join(", "),
            job.description()
        );
    }
}
