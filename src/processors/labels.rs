//! Activity code to label mapping.

use log::warn;
use thiserror::Error;

use crate::config::UnknownCodePolicy;
use crate::core::activity::{Activity, ActivityLabel};

/// Errors that can occur while mapping activity codes.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("unknown activity code {code} at merged row {row}")]
    UnknownCode { row: usize, code: i64 },
}

/// Map each code to its activity label.
///
/// Codes 1..=6 map to the six defined activities. Anything else is either
/// rejected or kept as [`ActivityLabel::Unmapped`], depending on `policy`.
///
/// # Errors
///
/// With [`UnknownCodePolicy::Reject`], returns the first unknown code and
/// its row index.
pub fn map_activity_codes(
    codes: &[i64],
    policy: UnknownCodePolicy,
) -> Result<Vec<ActivityLabel>, LabelError> {
    let mut unmapped = 0usize;

    let labels = codes
        .iter()
        .enumerate()
        .map(|(row, &code)| match Activity::from_code(code) {
            Some(activity) => Ok(ActivityLabel::Known(activity)),
            None => match policy {
                UnknownCodePolicy::Reject => Err(LabelError::UnknownCode { row, code }),
                UnknownCodePolicy::PassThrough => {
                    unmapped += 1;
                    Ok(ActivityLabel::Unmapped(code))
                }
            },
        })
        .collect::<Result<Vec<_>, _>>()?;

    if unmapped > 0 {
        warn!("{} rows have unmapped activity codes", unmapped);
    }

    Ok(labels)
}
