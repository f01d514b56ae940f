//! Id counter sidecar stored next to the data file.

use super::{write_atomically, StorageError, StorageResult};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SEQUENCE_SUFFIX: &str = ".seq";

/// Sidecar path for `data_file`, e.g. `heroes.xlsx.seq`.
pub fn sequence_path(data_file: &Path) -> PathBuf {
    let mut name = OsString::from(data_file.as_os_str());
    name.push(SEQUENCE_SUFFIX);
    PathBuf::from(name)
}

/// Returns the last allocated id stored at `path`, or `None` when absent.
pub fn read_sequence(path: &Path) -> StorageResult<Option<u64>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    text.trim().parse::<u64>().map(Some).map_err(|_| {
        StorageError::InvalidData(format!(
            "counter file `{}` does not hold a number",
            path.display()
        ))
    })
}

pub fn write_sequence(path: &Path, last_allocated: u64) -> StorageResult<()> {
    write_atomically(path, format!("{last_allocated}\n").as_bytes())
}
