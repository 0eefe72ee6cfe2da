//! Sequential extraction: login, one query per window, logout
//!
//! Each window is requested, decoded and written before the next one starts.
//! The first failed window stops the loop; files already written stay.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::client::{Credentials, SankhyaClient, Session, Transport};
use crate::core::{Granularity, Window, Windows, windows};
use crate::output::{ExportOptions, write_result};

use super::Job;

pub(crate) struct ExtractPlan {
    pub(crate) job: &'static dyn Job,
    pub(crate) since: NaiveDate,
    /// Exclusive
    pub(crate) until: NaiveDate,
    pub(crate) granularity: Granularity,
    pub(crate) output_dir: PathBuf,
}

impl ExtractPlan {
    pub(crate) fn windows(&self) -> Windows {
        windows(self.since, self.until, self.granularity)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RunOutcome {
    pub(crate) written: Vec<PathBuf>,
    /// Window whose query or write failed; later windows were skipped
    pub(crate) failed_at: Option<Window>,
}

pub(crate) fn run_windows<T: Transport>(
    client: &SankhyaClient<T>,
    session: &Session,
    plan: &ExtractPlan,
    clock: &dyn Fn() -> NaiveDateTime,
) -> RunOutcome {
    let mut outcome = RunOutcome::default();

    for window in plan.windows() {
        let sql = plan.job.build_sql(&window);
        tracing::debug!(%window, days = window.days(), "Executing SQL query:\n{sql}");

        let result = match client.execute_query(session, &sql) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(%window, "Query failed, skipping remaining windows: {e}");
                outcome.failed_at = Some(window);
                break;
            }
        };

        if result.len() >= client.max_result_size() {
            tracing::warn!(
                %window,
                rows = result.len(),
                "Result reached MAXRESULTSIZE and is probably truncated; use a narrower granularity"
            );
        }

        let options = ExportOptions {
            dir: &plan.output_dir,
            prefix: plan.job.file_prefix(),
            date_column: plan.job.date_column(),
            generated_at: clock(),
        };
        match write_result(&window, &result, options) {
            Ok(path) => {
                tracing::info!(%window, rows = result.len(), "Wrote {}", path.display());
                outcome.written.push(path);
            }
            Err(e) => {
                tracing::error!(%window, "Export failed, skipping remaining windows: {e}");
                outcome.failed_at = Some(window);
                break;
            }
        }
    }

    outcome
}

/// Full session lifecycle. Logout is attempted whatever happened before it.
pub(crate) fn extract<T: Transport>(
    client: &SankhyaClient<T>,
    credentials: &Credentials,
    plan: &ExtractPlan,
    clock: &dyn Fn() -> NaiveDateTime,
) -> RunOutcome {
    tracing::info!(
        job = plan.job.name(),
        granularity = plan.granularity.label(),
        "Extracting {}..{}",
        plan.since,
        plan.until
    );
    let session = client.login(credentials);
    let outcome = run_windows(client, &session, plan, clock);
    client.logout(&session);

    let planned = plan.windows().count();
    match outcome.failed_at {
        Some(window) => tracing::warn!(
            "Exported {} of {planned} windows; stopped at {window}",
            outcome.written.len()
        ),
        None => tracing::info!("Exported {} of {planned} windows", outcome.written.len()),
    }
    outcome
}
