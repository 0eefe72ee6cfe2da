//! Merge a directory of CSV exports into one file
//!
//! Files are concatenated in the order `glob` lists them. All inputs must
//! share the first file's header; nothing is reconciled.

use std::path::{Path, PathBuf};

use crate::error::AggregateError;

#[derive(Debug, Default)]
pub(crate) struct AggregateSummary {
    pub(crate) files: Vec<PathBuf>,
    pub(crate) rows: usize,
}

fn find_inputs(pattern: &str, output: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    let entries = glob::glob(pattern).map_err(|source| AggregateError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    // Re-running into the same directory must not read its own output back in
    let output_canon = output.canonicalize().ok();
    Ok(entries
        .flatten()
        .filter(|p| p.is_file())
        .filter(|p| output_canon.is_none() || p.canonicalize().ok() != output_canon)
        .collect())
}

fn read_headers(path: &Path) -> Result<csv::StringRecord, AggregateError> {
    let csv_err = |source| AggregateError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader.headers().cloned().map_err(csv_err)
}

/// Concatenate every file matching `dir/pattern` into `output`.
pub(crate) fn aggregate(
    dir: &Path,
    pattern: &str,
    output: &Path,
) -> Result<AggregateSummary, AggregateError> {
    // The directory is taken literally; only `pattern` carries wildcards
    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let files = find_inputs(&full_pattern, output)?;
    let Some(first) = files.first() else {
        return Err(AggregateError::NoInputs {
            pattern: full_pattern,
        });
    };

    // Check every header before creating the output
    let header = read_headers(first)?;
    for path in &files[1..] {
        let other = read_headers(path)?;
        if !other.iter().eq(header.iter()) {
            return Err(AggregateError::HeaderMismatch {
                path: path.clone(),
                first: first.clone(),
            });
        }
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| AggregateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let out_err = |source| AggregateError::Csv {
        path: output.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(output).map_err(out_err)?;
    writer.write_record(&header).map_err(out_err)?;

    let mut rows = 0;
    for path in &files {
        let in_err = |source| AggregateError::Csv {
            path: path.clone(),
            source,
        };
        let mut reader = csv::Reader::from_path(path).map_err(in_err)?;
        for record in reader.records() {
            writer.write_record(&record.map_err(in_err)?).map_err(out_err)?;
            rows += 1;
        }
        tracing::debug!(path = %path.display(), "Merged file");
    }
    writer.flush().map_err(|source| AggregateError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(AggregateSummary { files, rows })
}
