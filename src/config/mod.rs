//! Configuration types for the tidy-data pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the raw HAR dataset lives and how to obtain it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote zip archive containing the dataset
    #[serde(default = "default_url")]
    pub url: String,

    /// Directory the archive is extracted into
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Folder inside `data_dir` created by the archive
    #[serde(default = "default_dataset_folder")]
    pub dataset_folder: String,

    /// Local archive to extract instead of downloading `url`
    #[serde(default)]
    pub archive_path: Option<PathBuf>,
}

fn default_url() -> String {
    "https://d396qusza40orc.cloudfront.net/getdata%2Fprojectfiles%2FUCI%20HAR%20Dataset.zip"
        .to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_dataset_folder() -> String {
    "UCI HAR Dataset".to_string()
}

impl SourceConfig {
    /// Root directory of the extracted dataset.
    pub fn dataset_root(&self) -> PathBuf {
        self.data_dir.join(&self.dataset_folder)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            data_dir: default_data_dir(),
            dataset_folder: default_dataset_folder(),
            archive_path: None,
        }
    }
}

/// Feature column selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Literal substrings; a feature is kept if its name contains any of them
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

/// Substrings marking mean and standard deviation features.
pub const MEAN_STD_PATTERNS: [&str; 2] = ["mean()", "std()"];

fn default_patterns() -> Vec<String> {
    MEAN_STD_PATTERNS.iter().map(|p| p.to_string()).collect()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

/// What to do with activity codes outside 1..=6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCodePolicy {
    /// Abort the run, naming the offending row.
    #[default]
    Reject,
    /// Keep the row under an `UNMAPPED_<code>` label.
    PassThrough,
}

/// Activity label mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub unknown_codes: UnknownCodePolicy,
}

/// Field separator for the tidy output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Space,
    Tab,
}

impl Delimiter {
    /// Byte used by the CSV reader and writer.
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Space => b' ',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Tidy output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file path
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Field separator
    #[serde(default)]
    pub delimiter: Delimiter,

    /// Fixed number of decimals; shortest round-trip formatting when unset
    #[serde(default)]
    pub precision: Option<usize>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("UCI_HAR_tidydata.csv")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            delimiter: Delimiter::default(),
            precision: None,
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
