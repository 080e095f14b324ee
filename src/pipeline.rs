//! End-to-end run: acquire, load, select, label, assemble, aggregate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::config::PipelineConfig;
use crate::core::loaders::{load_and_merge, load_feature_dictionary, FEATURES_FILE};
use crate::processors::labels::LabelError;
use crate::processors::{
    aggregate_and_export, assemble, ensure_dataset, map_activity_codes, select_by_patterns,
};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub dataset_root: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_columns: usize,
    pub selected_columns: usize,
    pub groups: usize,
    pub output_path: PathBuf,
}

/// Run every stage in order and write the tidy table.
///
/// Each stage aborts the run on failure; the error carries the stage name
/// as context and the underlying typed error as its source. The output
/// file is only created once all earlier stages have succeeded.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary> {
    let root = ensure_dataset(&config.source).context("dataset unavailable")?;
    info!("Using dataset at {}", root.display());

    let merged = load_and_merge(&root).context("loading train/test splits")?;
    let dictionary = load_feature_dictionary(root.join(FEATURES_FILE))
        .context("loading feature dictionary")?;

    let selected = select_by_patterns(
        &merged.features,
        &dictionary,
        config.selection.patterns.as_slice(),
    )
    .context("selecting mean/std features")?;

    let activity = map_activity_codes(&merged.activity_codes, config.labels.unknown_codes)
        .map_err(|e| {
            let origin = match &e {
                LabelError::UnknownCode { row, .. } => merged.origin(*row),
            };
            let message = match origin {
                Some(origin) => format!("mapping activity codes ({})", origin),
                None => "mapping activity codes".to_string(),
            };
            anyhow::Error::new(e).context(message)
        })?;

    let feature_columns = merged.num_columns();
    let (train_rows, test_rows) = (merged.train_rows, merged.test_rows);

    let combined = assemble(selected, activity, merged.subjects)
        .context("assembling combined table")?;
    info!(
        "Combined table: {} rows x {} columns",
        combined.num_rows(),
        combined.column_names().len()
    );

    let tidy = aggregate_and_export(&combined, &config.output)
        .with_context(|| format!("writing tidy table to {}", config.output.path.display()))?;

    Ok(PipelineSummary {
        dataset_root: root,
        train_rows,
        test_rows,
        feature_columns,
        selected_columns: combined.feature_names.len(),
        groups: tidy.len(),
        output_path: config.output.path.clone(),
    })
}
