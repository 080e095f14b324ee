//! Loaders for the raw HAR text tables and the tidy output.
//!
//! This module provides parsers for:
//! - Whitespace-aligned numeric tables (`X_*.txt`, `y_*.txt`, `subject_*.txt`)
//! - The feature dictionary (`features.txt`)
//! - Tidy summary files written by [`crate::core::writers::write_tidy_table`]
//!
//! It also merges the train and test splits into one row-aligned dataset.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::{debug, info};
use thiserror::Error;

use super::activity::ActivityLabel;
use super::tables::{TidyRow, TidyTable, ACTIVITY_COLUMN, SUBJECT_COLUMN};
use crate::config::Delimiter;

/// File name of the feature dictionary at the dataset root.
pub const FEATURES_FILE: &str = "features.txt";

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("{path}:{line}: cannot parse '{token}' as a number")]
    ParseError {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{path}:{line}: expected {expected} fields, found {found}")]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "misaligned {split} split: {features} feature rows, {activities} activity rows, {subjects} subject rows"
    )]
    MisalignedSplit {
        split: Split,
        features: usize,
        activities: usize,
        subjects: usize,
    },

    #[error("column mismatch: train has {train} feature columns, test has {test}")]
    ColumnMismatch { train: usize, test: usize },

    #[error("{path}:{line}: expected feature index {expected}, found {found}")]
    DictionaryOrder {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: String,
    },

    #[error("Missing required columns: {0}")]
    MissingColumns(String),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// One of the two dataset partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Merge order: train rows come first.
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    /// `<root>/<split>/X_<split>.txt`
    pub fn features_path(self, root: &Path) -> PathBuf {
        self.file_path(root, "X")
    }

    /// `<root>/<split>/y_<split>.txt`
    pub fn activities_path(self, root: &Path) -> PathBuf {
        self.file_path(root, "y")
    }

    /// `<root>/<split>/subject_<split>.txt`
    pub fn subjects_path(self, root: &Path) -> PathBuf {
        self.file_path(root, "subject")
    }

    fn file_path(self, root: &Path, stem: &str) -> PathBuf {
        root.join(self.name())
            .join(format!("{}_{}.txt", stem, self.name()))
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every file the pipeline reads under `root`, dictionary first.
pub fn required_files(root: &Path) -> Vec<PathBuf> {
    let mut files = vec![root.join(FEATURES_FILE)];
    for split in Split::ALL {
        files.push(split.features_path(root));
        files.push(split.activities_path(root));
        files.push(split.subjects_path(root));
    }
    files
}

/// Rows of one split, aligned by position across the three files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitData {
    /// Shape: [num_rows][num_columns].
    pub features: Vec<Vec<f64>>,
    pub activity_codes: Vec<i64>,
    pub subjects: Vec<u32>,
}

impl SplitData {
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.features.first().map_or(0, |row| row.len())
    }
}

/// Position of a merged row in its source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOrigin {
    pub split: Split,
    /// 1-based line number within the split's files.
    pub line: usize,
}

impl fmt::Display for RowOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}", self.split, self.line)
    }
}

/// Train rows followed by test rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedData {
    /// Shape: [train_rows + test_rows][num_columns].
    pub features: Vec<Vec<f64>>,
    pub activity_codes: Vec<i64>,
    pub subjects: Vec<u32>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl MergedData {
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.features.first().map_or(0, |row| row.len())
    }

    /// Source split and line of merged row `row`, if it exists.
    pub fn origin(&self, row: usize) -> Option<RowOrigin> {
        if row < self.train_rows {
            Some(RowOrigin {
                split: Split::Train,
                line: row + 1,
            })
        } else if row < self.train_rows + self.test_rows {
            Some(RowOrigin {
                split: Split::Test,
                line: row - self.train_rows + 1,
            })
        } else {
            None
        }
    }
}

/// Entry of `features.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureName {
    /// 1-based column index.
    pub index: usize,
    pub name: String,
}

/// Ordered feature names; entry `i` names feature column `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureDictionary {
    pub entries: Vec<FeatureName>,
}

impl FeatureDictionary {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| LoaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Iterate non-blank lines as (1-based line number, line).
fn data_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let reader = open(path)?;
    let mut lines = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LoaderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !line.trim().is_empty() {
            lines.push((idx + 1, line));
        }
    }

    Ok(lines)
}

/// Load a whitespace-aligned numeric table.
///
/// Fields are separated by any run of spaces or tabs; leading padding and
/// blank lines are ignored. Every row must have the same number of fields.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is empty, contains a
/// non-numeric token, or has rows of differing width.
pub fn load_numeric_table<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let lines = data_lines(path)?;

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(lines.len());
    let mut width: Option<usize> = None;

    for (line_no, line) in &lines {
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| LoaderError::ParseError {
                    path: path.to_path_buf(),
                    line: *line_no,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(LoaderError::RaggedRow {
                    path: path.to_path_buf(),
                    line: *line_no,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        width.unwrap_or(0),
        path.display()
    );

    Ok(rows)
}

/// Load a single-column integer table such as `y_train.txt`.
fn load_code_column<T: std::str::FromStr>(path: &Path) -> Result<Vec<T>> {
    let lines = data_lines(path)?;
    let mut values = Vec::with_capacity(lines.len());

    for (line_no, line) in &lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 1 {
            return Err(LoaderError::RaggedRow {
                path: path.to_path_buf(),
                line: *line_no,
                expected: 1,
                found: fields.len(),
            });
        }

        let value = fields[0].parse::<T>().map_err(|_| LoaderError::ParseError {
            path: path.to_path_buf(),
            line: *line_no,
            token: fields[0].to_string(),
        })?;
        values.push(value);
    }

    Ok(values)
}

/// Load the activity-code vector of a split.
pub fn load_activity_codes<P: AsRef<Path>>(path: P) -> Result<Vec<i64>> {
    load_code_column(path.as_ref())
}

/// Load the subject-id vector of a split.
pub fn load_subject_ids<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    load_code_column(path.as_ref())
}

/// Load the features, activity codes and subject ids of one split.
///
/// # Errors
///
/// Returns [`LoaderError::MisalignedSplit`] if the three files disagree on
/// row count.
pub fn load_split<P: AsRef<Path>>(root: P, split: Split) -> Result<SplitData> {
    let root = root.as_ref();

    let features = load_numeric_table(split.features_path(root))?;
    let activity_codes = load_activity_codes(split.activities_path(root))?;
    let subjects = load_subject_ids(split.subjects_path(root))?;

    if features.len() != activity_codes.len() || features.len() != subjects.len() {
        return Err(LoaderError::MisalignedSplit {
            split,
            features: features.len(),
            activities: activity_codes.len(),
            subjects: subjects.len(),
        });
    }

    Ok(SplitData {
        features,
        activity_codes,
        subjects,
    })
}

/// Concatenate train rows followed by test rows.
///
/// The same order is applied to features, activity codes and subjects.
///
/// # Errors
///
/// Returns [`LoaderError::ColumnMismatch`] if the splits have different
/// feature widths.
pub fn merge_splits(train: SplitData, test: SplitData) -> Result<MergedData> {
    if train.num_columns() != test.num_columns() {
        return Err(LoaderError::ColumnMismatch {
            train: train.num_columns(),
            test: test.num_columns(),
        });
    }

    let train_rows = train.num_rows();
    let test_rows = test.num_rows();

    let mut features = train.features;
    features.extend(test.features);

    let mut activity_codes = train.activity_codes;
    activity_codes.extend(test.activity_codes);

    let mut subjects = train.subjects;
    subjects.extend(test.subjects);

    Ok(MergedData {
        features,
        activity_codes,
        subjects,
        train_rows,
        test_rows,
    })
}

/// Read both splits under `root` and merge them.
pub fn load_and_merge<P: AsRef<Path>>(root: P) -> Result<MergedData> {
    let root = root.as_ref();

    let train = load_split(root, Split::Train)?;
    info!(
        "Loaded train split: {} rows x {} columns",
        train.num_rows(),
        train.num_columns()
    );

    let test = load_split(root, Split::Test)?;
    info!(
        "Loaded test split: {} rows x {} columns",
        test.num_rows(),
        test.num_columns()
    );

    merge_splits(train, test)
}

/// Load `features.txt`: one `<index> <name>` pair per line.
///
/// Indices must run 1, 2, 3, ... in file order.
pub fn load_feature_dictionary<P: AsRef<Path>>(path: P) -> Result<FeatureDictionary> {
    let path = path.as_ref();
    let lines = data_lines(path)?;
    let mut entries = Vec::with_capacity(lines.len());

    for (line_no, line) in &lines {
        let mut parts = line.split_whitespace();
        let index_str = parts.next().unwrap_or_default();
        let name = parts.collect::<Vec<&str>>().join(" ");
        let expected = entries.len() + 1;

        match index_str.parse::<usize>() {
            Ok(index) if index == expected && !name.is_empty() => {
                entries.push(FeatureName { index, name });
            }
            _ => {
                return Err(LoaderError::DictionaryOrder {
                    path: path.to_path_buf(),
                    line: *line_no,
                    expected,
                    found: line.trim().to_string(),
                });
            }
        }
    }

    if entries.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(FeatureDictionary { entries })
}

/// Load a tidy summary file written by the aggregator.
///
/// The first two columns must be `subject` and `activity`; the remaining
/// columns are feature means.
pub fn load_tidy_table<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<TidyTable> {
    let path = path.as_ref();
    let csv_err = |e: csv::Error| LoaderError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter.as_byte())
        .from_reader(open(path)?);

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.get(0) != Some(SUBJECT_COLUMN) || headers.get(1) != Some(ACTIVITY_COLUMN) {
        return Err(LoaderError::MissingColumns(format!(
            "{} must start with '{}' and '{}'",
            path.display(),
            SUBJECT_COLUMN,
            ACTIVITY_COLUMN
        )));
    }

    let feature_names: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();
    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        // Header is line 1.
        let line = idx + 2;
        let parse_err = |token: &str| LoaderError::ParseError {
            path: path.to_path_buf(),
            line,
            token: token.to_string(),
        };

        let subject_str = record.get(0).unwrap_or_default();
        let subject: u32 = subject_str.parse().map_err(|_| parse_err(subject_str))?;

        let activity_str = record.get(1).unwrap_or_default();
        let activity: ActivityLabel = activity_str.parse().map_err(|_| parse_err(activity_str))?;

        let means = record
            .iter()
            .skip(2)
            .map(|token| token.parse::<f64>().map_err(|_| parse_err(token)))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(TidyRow {
            subject,
            activity,
            means,
        });
    }

    Ok(TidyTable {
        feature_names,
        rows,
    })
}
