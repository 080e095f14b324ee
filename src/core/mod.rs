//! Core data types and I/O operations.

pub mod activity;
pub mod loaders;
pub mod tables;
pub mod writers;

pub use activity::{Activity, ActivityLabel};
pub use loaders::{load_and_merge, FeatureDictionary, LoaderError, MergedData, Split};
pub use tables::{CombinedTable, SelectedFeatures, TidyRow, TidyTable};
pub use writers::{write_tidy_table, WriteError};
