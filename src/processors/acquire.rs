//! Dataset acquisition: download and unpack the HAR archive when absent.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;
use thiserror::Error;
use zip::ZipArchive;

use crate::config::SourceConfig;
use crate::core::loaders::required_files;

/// Errors that can occur while making the dataset available.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid archive '{path}': {source}")]
    InvalidArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("dataset at '{root}' is incomplete, missing: {}", format_missing(.missing))]
    IncompleteDataset { root: PathBuf, missing: Vec<PathBuf> },
}

fn format_missing(missing: &[PathBuf]) -> String {
    missing
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquireError>;

/// Make sure the dataset exists under `config.data_dir` and return its root.
///
/// If the dataset folder is already present it is only checked for
/// completeness. Otherwise the archive is obtained (from
/// `config.archive_path` if set, else by downloading `config.url`) and
/// extracted into `config.data_dir`.
///
/// # Errors
///
/// Returns an error if the download or extraction fails, or if any of the
/// expected input files is missing afterwards.
pub fn ensure_dataset(config: &SourceConfig) -> Result<PathBuf> {
    let root = config.dataset_root();

    if root.is_dir() {
        debug!("Dataset already present at {}", root.display());
        verify_dataset(&root)?;
        return Ok(root);
    }

    fs::create_dir_all(&config.data_dir).map_err(|e| AcquireError::CreateDirectory {
        path: config.data_dir.clone(),
        source: e,
    })?;

    match &config.archive_path {
        Some(archive) => {
            info!("Extracting local archive {}", archive.display());
            extract_archive(archive, &config.data_dir)?;
        }
        None => {
            let download = download_archive(&config.url, &config.data_dir)?;
            extract_archive(download.path(), &config.data_dir)?;
            // Temporary archive is removed when `download` drops.
        }
    }

    verify_dataset(&root)?;
    Ok(root)
}

/// Check that every file the pipeline reads exists under `root`.
pub fn verify_dataset(root: &Path) -> Result<()> {
    let missing: Vec<PathBuf> = required_files(root)
        .into_iter()
        .filter(|path| !path.is_file())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AcquireError::IncompleteDataset {
            root: root.to_path_buf(),
            missing,
        })
    }
}

/// Download `url` into a temporary file inside `dir`.
pub fn download_archive(url: &str, dir: &Path) -> Result<NamedTempFile> {
    info!("Downloading {}", url);

    let response = ureq::get(url)
        .call()
        .map_err(|e| AcquireError::Download {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    let io_err = |e: io::Error| AcquireError::Io {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    let mut reader = response.into_reader();
    let bytes = io::copy(&mut reader, file.as_file_mut()).map_err(io_err)?;

    info!("Downloaded {} bytes", bytes);
    Ok(file)
}

/// Extract a zip archive into `target_dir`.
///
/// Entries whose names would escape `target_dir` are skipped.
///
/// # Returns
///
/// The number of files written.
pub fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| AcquireError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| AcquireError::InvalidArchive {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| AcquireError::InvalidArchive {
                path: archive_path.to_path_buf(),
                source: e,
            })?;

        let out_path = match entry.enclosed_name() {
            Some(name) => target_dir.join(name),
            None => {
                debug!("Skipping unsafe archive entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| AcquireError::CreateDirectory {
                path: out_path.clone(),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| AcquireError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let io_err = |e: io::Error| AcquireError::Io {
            path: out_path.clone(),
            source: e,
        };
        let mut out_file = File::create(&out_path).map_err(io_err)?;
        io::copy(&mut entry, &mut out_file).map_err(io_err)?;
        extracted += 1;
    }

    info!(
        "Extracted {} files into {}",
        extracted,
        target_dir.display()
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::{Split, FEATURES_FILE};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const FOLDER: &str = "UCI HAR Dataset";

    fn dataset_entries() -> Vec<String> {
        let root = Path::new(FOLDER);
        required_files(root)
            .into_iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn create_archive(path: &Path, entries: &[String]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for name in entries {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(b"1\n").unwrap();
        }
        zip.finish().unwrap();
    }

    fn source_config(data_dir: &Path, archive: Option<PathBuf>) -> SourceConfig {
        SourceConfig {
            // Unroutable; tests must never reach the network.
            url: "http://127.0.0.1:9/unused.zip".to_string(),
            data_dir: data_dir.to_path_buf(),
            dataset_folder: FOLDER.to_string(),
            archive_path: archive,
        }
    }

    #[test]
    fn test_extract_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("har.zip");
        create_archive(&archive, &dataset_entries());

        let target = temp_dir.path().join("data");
        fs::create_dir_all(&target).unwrap();
        let count = extract_archive(&archive, &target).unwrap();

        assert_eq!(count, 7);
        assert!(target.join(FOLDER).join(FEATURES_FILE).is_file());
        assert!(Split::Test
            .subjects_path(&target.join(FOLDER))
            .is_file());
    }

    #[test]
    fn test_extract_archive_skips_escaping_entries() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("evil.zip");
        create_archive(&archive, &["../escape.txt".to_string(), "ok.txt".to_string()]);

        let target = temp_dir.path().join("data");
        fs::create_dir_all(&target).unwrap();
        let count = extract_archive(&archive, &target).unwrap();

        assert_eq!(count, 1);
        assert!(target.join("ok.txt").exists());
        assert!(!temp_dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_extract_invalid_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("broken.zip");
        fs::write(&archive, b"not a zip file").unwrap();

        let result = extract_archive(&archive, temp_dir.path());
        assert!(matches!(result, Err(AcquireError::InvalidArchive { .. })));
    }

    #[test]
    fn test_ensure_dataset_from_local_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("har.zip");
        create_archive(&archive, &dataset_entries());

        let data_dir = temp_dir.path().join("data");
        let config = source_config(&data_dir, Some(archive));

        let root = ensure_dataset(&config).unwrap();
        assert_eq!(root, data_dir.join(FOLDER));
        assert!(verify_dataset(&root).is_ok());
    }

    #[test]
    fn test_ensure_dataset_truncated_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("partial.zip");
        let mut entries = dataset_entries();
        entries.truncate(4);
        create_archive(&archive, &entries);

        let config = source_config(&temp_dir.path().join("data"), Some(archive));

        match ensure_dataset(&config) {
            Err(AcquireError::IncompleteDataset { missing, .. }) => {
                assert_eq!(missing.len(), 3);
            }
            other => panic!("Expected IncompleteDataset error, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_dataset_existing_folder_is_not_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        for path in required_files(&data_dir.join(FOLDER)) {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"1\n").unwrap();
        }

        // No archive and an unreachable URL: success proves nothing was fetched.
        let config = source_config(&data_dir, None);
        let root = ensure_dataset(&config).unwrap();
        assert_eq!(root, data_dir.join(FOLDER));
    }

    #[test]
    fn test_ensure_dataset_existing_folder_incomplete() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(data_dir.join(FOLDER)).unwrap();

        let config = source_config(&data_dir, None);
        let err = ensure_dataset(&config).unwrap_err();

        assert!(matches!(err, AcquireError::IncompleteDataset { ref missing, .. } if missing.len() == 7));
        assert!(err.to_string().contains("features.txt"));
    }
}
