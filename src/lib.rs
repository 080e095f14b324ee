//! Tidy summary of the UCI Human Activity Recognition dataset.
//!
//! This crate provides tools for:
//! - Downloading and unpacking the HAR archive when it is not on disk
//! - Loading the whitespace-aligned train/test tables and merging them
//! - Keeping only the mean and standard deviation features
//! - Mapping activity codes to descriptive labels
//! - Averaging every feature per (subject, activity) and writing the result
//!
//! # Example
//!
//! ```no_run
//! use har_tidy::{pipeline::run_pipeline, PipelineConfig};
//!
//! let summary = run_pipeline(&PipelineConfig::default()).unwrap();
//! println!("{} groups written to {}", summary.groups, summary.output_path.display());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod processors;

pub use config::{
    Delimiter, LabelConfig, OutputConfig, PipelineConfig, SelectionConfig, SourceConfig,
    UnknownCodePolicy,
};
pub use crate::core::{Activity, ActivityLabel, CombinedTable, MergedData, TidyTable};
pub use pipeline::{run_pipeline, PipelineSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
