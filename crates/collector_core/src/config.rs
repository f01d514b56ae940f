//! Store location settings.
//!
//! # Responsibility
//! - Name the backing file and photo directory used by [`crate::RecordStore`].
//!
//! # Invariants
//! - The data file extension selects the table format (`.csv` or `.xlsx`).
//! - The id counter sidecar always lives next to the data file.

use crate::storage::sequence_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "test-heroes.xlsx";
pub const DEFAULT_PHOTO_DIR: &str = "collector_images";

/// Paths of the backing file and the photo directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub photo_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_file: impl Into<PathBuf>, photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            photo_dir: photo_dir.into(),
        }
    }

    /// Config with both paths placed under `root`, using the default names.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join(DEFAULT_DATA_FILE), root.join(DEFAULT_PHOTO_DIR))
    }

    /// Path of the id counter sidecar.
    pub fn sequence_file(&self) -> PathBuf {
        sequence_path(&self.data_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE, DEFAULT_PHOTO_DIR)
    }
}
