//! Pipeline stages that turn the raw dataset into the tidy table.

pub mod acquire;
pub mod aggregate;
pub mod assemble;
pub mod labels;
pub mod selection;

// Re-export key types for convenience
pub use acquire::{download_archive, ensure_dataset, extract_archive, verify_dataset, AcquireError};
pub use aggregate::{aggregate, aggregate_and_export, aggregate_to};
pub use assemble::{assemble, AssembleError};
pub use labels::{map_activity_codes, LabelError};
pub use selection::{feature_mask, select_by_patterns, select_mean_std, SelectionError};
