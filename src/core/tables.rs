//! In-memory tables passed between pipeline stages.

use super::activity::ActivityLabel;

/// Name of the activity column in combined and tidy tables.
pub const ACTIVITY_COLUMN: &str = "activity";

/// Name of the subject column in combined and tidy tables.
pub const SUBJECT_COLUMN: &str = "subject";

/// Feature matrix restricted to the selected columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedFeatures {
    /// Column names, in dictionary order.
    pub names: Vec<String>,
    /// Row-major values. Shape: [num_rows][names.len()].
    pub rows: Vec<Vec<f64>>,
}

impl SelectedFeatures {
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.names.len()
    }
}

/// One row per observation: selected features, activity label and subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    pub feature_names: Vec<String>,
    /// Shape: [num_rows][feature_names.len()].
    pub features: Vec<Vec<f64>>,
    pub activity: Vec<ActivityLabel>,
    pub subject: Vec<u32>,
}

impl CombinedTable {
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.subject.len()
    }

    /// Column names in table order: features, then `activity`, then `subject`.
    pub fn column_names(&self) -> Vec<&str> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .chain([ACTIVITY_COLUMN, SUBJECT_COLUMN])
            .collect()
    }
}

/// Feature means for one (subject, activity) group.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub subject: u32,
    pub activity: ActivityLabel,
    /// One mean per feature column.
    pub means: Vec<f64>,
}

/// Aggregated output: one row per distinct (subject, activity) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    pub feature_names: Vec<String>,
    pub rows: Vec<TidyRow>,
}

impl TidyTable {
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row as written to disk: `subject`, `activity`, then features.
    pub fn header(&self) -> Vec<&str> {
        [SUBJECT_COLUMN, ACTIVITY_COLUMN]
            .into_iter()
            .chain(self.feature_names.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::activity::Activity;

    #[test]
    fn test_combined_column_names() {
        let table = CombinedTable {
            feature_names: vec!["tBodyAcc-mean()-X".to_string(), "tBodyAcc-std()-X".to_string()],
            features: vec![vec![0.1, 0.2]],
            activity: vec![ActivityLabel::Known(Activity::Standing)],
            subject: vec![3],
        };

        assert_eq!(table.num_rows(), 1);
        assert_eq!(
            table.column_names(),
            vec!["tBodyAcc-mean()-X", "tBodyAcc-std()-X", "activity", "subject"]
        );
    }

    #[test]
    fn test_tidy_header() {
        let table = TidyTable {
            feature_names: vec!["fBodyGyro-std()-Z".to_string()],
            rows: Vec::new(),
        };

        assert!(table.is_empty());
        assert_eq!(table.header(), vec!["subject", "activity", "fBodyGyro-std()-Z"]);
    }
}
