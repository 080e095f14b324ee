//! Writer for the tidy summary table.
//!
//! The output is a header-bearing delimited text file without a row-index
//! column: `subject`, `activity`, then one column per feature mean.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use csv::WriterBuilder;
use thiserror::Error;

use super::tables::TidyTable;
use crate::config::OutputConfig;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A row does not have one mean per feature column.
    #[error("row {row} has {found} values, expected {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{:.*}", digits, value),
        None => value.to_string(),
    }
}

/// Write a tidy table to a delimited text file.
///
/// The delimiter and float precision come from `config`; `config.path` is
/// ignored in favour of `path` so callers can redirect output.
///
/// # Errors
///
/// Returns an error if:
/// - A row's mean count differs from the number of feature columns
/// - Parent directories cannot be created
/// - File cannot be created or written to
///
/// # Example
///
/// ```no_run
/// use har_tidy::config::OutputConfig;
/// use har_tidy::core::tables::TidyTable;
/// use har_tidy::core::writers::write_tidy_table;
/// use std::path::Path;
///
/// let table = TidyTable::default();
/// write_tidy_table(Path::new("tidy.csv"), &table, &OutputConfig::default()).unwrap();
/// ```
pub fn write_tidy_table(path: &Path, table: &TidyTable, config: &OutputConfig) -> Result<()> {
    let expected = table.feature_names.len();
    if let Some((row, found)) = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r.means.len()))
        .find(|&(_, len)| len != expected)
    {
        return Err(WriteError::LengthMismatch {
            row,
            expected,
            found,
        });
    }

    ensure_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut csv_writer = WriterBuilder::new()
        .delimiter(config.delimiter.as_byte())
        .from_writer(BufWriter::new(file));

    let path_str = path.display().to_string();
    let csv_err = |e: csv::Error| WriteError::CsvError {
        path: path_str.clone(),
        source: e,
    };

    csv_writer.write_record(table.header()).map_err(csv_err)?;

    let mut record: Vec<String> = Vec::with_capacity(expected + 2);
    for row in &table.rows {
        record.clear();
        record.push(row.subject.to_string());
        record.push(row.activity.to_string());
        record.extend(row.means.iter().map(|&m| format_value(m, config.precision)));

        csv_writer.write_record(&record).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    })?;

    Ok(())
}
