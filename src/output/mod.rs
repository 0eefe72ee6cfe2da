mod aggregate;
mod csv;

pub(crate) use self::csv::{ExportOptions, write_result};
pub(crate) use aggregate::aggregate;
