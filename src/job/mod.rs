//! Extraction job abstraction layer
//!
//! Each job knows which table it reads, how to restrict its SQL to one
//! window, and which column carries the service's DDMMYYYY timestamps.

pub(crate) mod items;
pub(crate) mod registry;
pub(crate) mod runner;
pub(crate) mod sales;

use crate::core::{Granularity, Window};

/// Extraction job trait - implemented by each query template
pub(crate) trait Job: Send + Sync {
    /// Unique name for this job (used by `--job`)
    fn name(&self) -> &'static str;

    /// One-line description for `jobs`
    fn description(&self) -> &'static str;

    /// Short aliases for the CLI
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Window size that keeps one result under the service row cap
    fn granularity(&self) -> Granularity;

    /// Column reparsed from the service's date format before writing
    fn date_column(&self) -> Option<&'static str>;

    /// Leading part of every output file name
    fn file_prefix(&self) -> &'static str;

    /// SQL restricted to `window`
    fn build_sql(&self, window: &Window) -> String;
}

/// Box type for dynamic dispatch
pub(crate) type BoxedJob = Box<dyn Job>;

/// Half-open date predicate: `column >= start AND column < end`
pub(crate) fn window_predicate(column: &str, window: &Window) -> String {
    format!(
        "{column} >= TO_DATE('{}', 'YYYY-MM-DD')\n  AND {column} < TO_DATE('{}', 'YYYY-MM-DD')",
        window.start_str(),
        window.end_str()
    )
}

pub(crate) use registry::{all_jobs, get_job};
