//! Core module - shared types and windowing logic

mod types;
mod window;

pub(crate) use types::QueryResult;
pub(crate) use window::{Granularity, Window, Windows, windows};
