//! Job registry
//!
//! Holds every extraction job and provides lookup by name/alias.

use std::sync::LazyLock;

use super::items::ItemsJob;
use super::sales::SalesJob;
use super::{BoxedJob, Job};

static JOBS: LazyLock<Vec<BoxedJob>> =
    LazyLock::new(|| vec![Box::new(ItemsJob::new()), Box::new(SalesJob::new())]);

/// Get a job by name or alias
pub(crate) fn get_job(name: &str) -> Option<&'static dyn Job> {
    let name_lower = name.to_lowercase();
    JOBS.iter().find_map(|j: &BoxedJob| {
        if j.name() == name_lower || j.aliases().contains(&name_lower.as_str()) {
            Some(j.as_ref())
        } else {
            None
        }
    })
}

pub(crate) fn all_jobs() -> impl Iterator<Item = &'static dyn Job> {
    JOBS.iter().map(|j| j.as_ref())
}
