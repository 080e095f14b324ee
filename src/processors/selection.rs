//! Feature column selection by name.

use log::{info, warn};
use thiserror::Error;

use crate::config::MEAN_STD_PATTERNS;
use crate::core::loaders::FeatureDictionary;
use crate::core::tables::SelectedFeatures;

/// Errors that can occur during feature selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("feature dictionary has {dictionary} entries but the feature matrix has {columns} columns")]
    DictionaryMismatch { dictionary: usize, columns: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Build the column mask: `true` where the name contains any pattern.
///
/// Matching is a literal, case-sensitive substring test, so `mean()` does
/// not match `meanFreq()` or `angle(tBodyAccMean,gravity)`.
pub fn feature_mask<S: AsRef<str>>(dictionary: &FeatureDictionary, patterns: &[S]) -> Vec<bool> {
    dictionary
        .names()
        .map(|name| patterns.iter().any(|p| name.contains(p.as_ref())))
        .collect()
}

/// Keep the mean and standard deviation columns of `features`.
pub fn select_mean_std(
    features: &[Vec<f64>],
    dictionary: &FeatureDictionary,
) -> Result<SelectedFeatures> {
    select_by_patterns(features, dictionary, &MEAN_STD_PATTERNS)
}

/// Keep the columns whose dictionary name contains any of `patterns`.
///
/// Surviving columns keep their relative order and are named after their
/// dictionary entries.
///
/// # Errors
///
/// Returns an error if the dictionary length differs from the matrix width.
pub fn select_by_patterns<S: AsRef<str>>(
    features: &[Vec<f64>],
    dictionary: &FeatureDictionary,
    patterns: &[S],
) -> Result<SelectedFeatures> {
    let columns = dictionary.len();
    if let Some(first) = features.first() {
        if first.len() != columns {
            return Err(SelectionError::DictionaryMismatch {
                dictionary: columns,
                columns: first.len(),
            });
        }
    }

    let mask = feature_mask(dictionary, patterns);
    let indices: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();

    if indices.is_empty() {
        warn!("No feature names matched the selection patterns");
    }

    let names: Vec<String> = indices
        .iter()
        .map(|&i| dictionary.entries[i].name.clone())
        .collect();

    let mut rows = Vec::with_capacity(features.len());
    for (row_idx, row) in features.iter().enumerate() {
        if row.len() != columns {
            return Err(SelectionError::RaggedRow {
                row: row_idx,
                expected: columns,
                found: row.len(),
            });
        }
        rows.push(indices.iter().map(|&i| row[i]).collect::<Vec<f64>>());
    }

    info!("Selected {} of {} feature columns", names.len(), columns);

    Ok(SelectedFeatures { names, rows })
}
