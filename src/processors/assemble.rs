//! Horizontal assembly of the combined observation table.

use thiserror::Error;

use crate::core::activity::ActivityLabel;
use crate::core::tables::{CombinedTable, SelectedFeatures};

/// Errors that can occur during assembly.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(
        "alignment mismatch: {features} feature rows, {activities} activity labels, {subjects} subject ids"
    )]
    AlignmentMismatch {
        features: usize,
        activities: usize,
        subjects: usize,
    },
}

/// Join features, activity labels and subject ids column-wise.
///
/// The resulting columns are the selected feature names, then `activity`,
/// then `subject`.
///
/// # Errors
///
/// Returns [`AssembleError::AlignmentMismatch`] unless all three inputs have
/// the same number of rows.
pub fn assemble(
    selected: SelectedFeatures,
    activity: Vec<ActivityLabel>,
    subject: Vec<u32>,
) -> Result<CombinedTable, AssembleError> {
    let features = selected.num_rows();
    if features != activity.len() || features != subject.len() {
        return Err(AssembleError::AlignmentMismatch {
            features,
            activities: activity.len(),
            subjects: subject.len(),
        });
    }

    Ok(CombinedTable {
        feature_names: selected.names,
        features: selected.rows,
        activity,
        subject,
    })
}
