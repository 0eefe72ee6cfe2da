use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::consts::FILE_TIMESTAMP_FORMAT;
use crate::core::{QueryResult, Window};
use crate::error::WriteError;

/// Timestamp layout the query service uses for date columns
const SOURCE_DATETIME_FORMAT: &str = "%d%m%Y %H:%M:%S";
/// Layout written to the CSV files
const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where and how one window's result is written
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExportOptions<'a> {
    pub(crate) dir: &'a Path,
    pub(crate) prefix: &'a str,
    pub(crate) date_column: Option<&'a str>,
    pub(crate) generated_at: NaiveDateTime,
}

/// `{prefix}-{start}-{end}-{generated}.csv`
pub(crate) fn output_file_name(prefix: &str, window: &Window, generated_at: NaiveDateTime) -> String {
    format!(
        "{prefix}-{}-{}-{}.csv",
        window.start_str(),
        window.end_str(),
        generated_at.format(FILE_TIMESTAMP_FORMAT)
    )
}

fn reformat_datetime(column: &str, value: &str) -> Result<String, WriteError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    NaiveDateTime::parse_from_str(value.trim(), SOURCE_DATETIME_FORMAT)
        .map(|dt| dt.format(OUTPUT_DATETIME_FORMAT).to_string())
        .map_err(|_| WriteError::DateValue {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Rows with the date column rewritten; nothing is written if any value fails
fn prepared_rows<'r>(
    result: &'r QueryResult,
    date_column: Option<&str>,
) -> Result<Vec<Vec<Cow<'r, str>>>, WriteError> {
    let date_index = match date_column {
        Some(name) => {
            let index = result.column_index(name);
            if index.is_none() {
                tracing::warn!(column = name, "Date column not in result; writing values as-is");
            }
            index.map(|i| (i, name))
        }
        None => None,
    };

    result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| match date_index {
                    Some((di, name)) if di == i => reformat_datetime(name, cell).map(Cow::Owned),
                    _ => Ok(Cow::Borrowed(cell.as_str())),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

/// Write one query result to its own CSV file and return the path.
pub(crate) fn write_result(
    window: &Window,
    result: &QueryResult,
    options: ExportOptions<'_>,
) -> Result<PathBuf, WriteError> {
    let rows = prepared_rows(result, options.date_column)?;

    std::fs::create_dir_all(options.dir).map_err(|source| WriteError::Io {
        path: options.dir.to_path_buf(),
        source,
    })?;
    let path = options
        .dir
        .join(output_file_name(options.prefix, window, options.generated_at));

    let csv_err = |source| WriteError::Csv {
        path: path.clone(),
        source,
    };
    let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
    writer.write_record(&result.columns).map_err(csv_err)?;
    for row in &rows {
        writer
            .write_record(row.iter().map(|c| c.as_bytes()))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
