//! Flat photo directory keyed by owning record id.
//!
//! # Responsibility
//! - Write uploaded photos under generated `<id>_<suffix>.<ext>` names.
//! - Scan, filter and remove photos by owner.
//!
//! # Invariants
//! - Every scan re-reads the directory; nothing is cached.
//! - Only regular files whose names parse as [`PhotoName`] are reported.
//! - A missing directory scans as empty.

use crate::model::photo::{PhotoName, PhotoUpload};
use crate::model::record::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, ReadDir};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-system step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOp {
    Write,
    Delete,
    Scan,
}

impl PhotoOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Scan => "scan",
        }
    }
}

/// Failure reading, writing or deleting a photo file.
#[derive(Debug)]
pub struct PhotoError {
    pub op: PhotoOp,
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl PhotoError {
    fn new(op: PhotoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

impl Display for PhotoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "photo {} failed for `{}`: {}",
            self.op.as_str(),
            self.path.display(),
            self.source
        )
    }
}

impl Error for PhotoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// One photo found by a directory scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub name: PhotoName,
    pub path: PathBuf,
}

/// Handle on the photo directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDir {
    root: PathBuf,
}

impl PhotoDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory when absent.
    pub fn ensure(&self) -> Result<(), PhotoError> {
        fs::create_dir_all(&self.root)
            .map_err(|err| PhotoError::new(PhotoOp::Write, &self.root, err))
    }

    /// Writes `upload` as a new photo owned by `owner`.
    ///
    /// `extension` must come from [`PhotoUpload::extension`]. Existing files are
    /// never overwritten.
    pub fn store(
        &self,
        owner: &str,
        extension: &'static str,
        upload: &PhotoUpload,
    ) -> Result<PathBuf, PhotoError> {
        self.store_as(&PhotoName::generate(owner, extension), upload)
    }

    /// Bytes go to a temporary sibling that is linked into place only once
    /// fully written, so a failed write leaves no partial photo behind.
    fn store_as(&self, name: &PhotoName, upload: &PhotoUpload) -> Result<PathBuf, PhotoError> {
        let path = self.root.join(name.file_name());
        let mut file = NamedTempFile::new_in(&self.root)
            .map_err(|err| PhotoError::new(PhotoOp::Write, &path, err))?;
        file.write_all(&upload.bytes)
            .map_err(|err| PhotoError::new(PhotoOp::Write, &path, err))?;
        file.persist_noclobber(&path)
            .map_err(|err| PhotoError::new(PhotoOp::Write, &path, err.error))?;
        Ok(path)
    }

    /// Lazily lists every photo in the directory.
    pub fn entries(&self) -> Result<PhotoEntries, PhotoError> {
        match fs::read_dir(&self.root) {
            Ok(read_dir) => Ok(PhotoEntries {
                root: self.root.clone(),
                read_dir: Some(read_dir),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(PhotoEntries {
                root: self.root.clone(),
                read_dir: None,
            }),
            Err(err) => Err(PhotoError::new(PhotoOp::Scan, &self.root, err)),
        }
    }

    /// Lazily lists the photos owned by `owner`.
    pub fn photos_of(&self, owner: &str) -> Result<OwnedPhotos, PhotoError> {
        Ok(OwnedPhotos {
            owner: owner.to_string(),
            entries: self.entries()?,
        })
    }

    /// Removes every photo owned by `owner`.
    ///
    /// Keeps going after individual failures and returns both the removed
    /// paths and the errors.
    pub fn remove_all_of(&self, owner: &str) -> (Vec<PathBuf>, Vec<PhotoError>) {
        let mut removed = Vec::new();
        let mut errors = Vec::new();

        let photos = match self.photos_of(owner) {
            Ok(photos) => photos,
            Err(err) => return (removed, vec![err]),
        };

        // Removal starts only after the scan has finished.
        let (paths, scan_errors): (Vec<_>, Vec<_>) = photos.partition(Result::is_ok);
        errors.extend(scan_errors.into_iter().filter_map(Result::err));

        for path in paths.into_iter().filter_map(Result::ok) {
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(err) => errors.push(PhotoError::new(PhotoOp::Delete, path, err)),
            }
        }

        (removed, errors)
    }
}

/// Iterator over all photos of a directory scan.
#[derive(Debug)]
pub struct PhotoEntries {
    root: PathBuf,
    read_dir: Option<ReadDir>,
}

impl Iterator for PhotoEntries {
    type Item = Result<PhotoEntry, PhotoError>;

    fn next(&mut self) -> Option<Self::Item> {
        let read_dir = self.read_dir.as_mut()?;
        loop {
            let entry = match read_dir.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(PhotoError::new(PhotoOp::Scan, &self.root, err))),
            };

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(PhotoName::parse) else {
                continue;
            };

            match entry.file_type() {
                Ok(kind) if kind.is_file() => {}
                Ok(_) => continue,
                Err(err) => return Some(Err(PhotoError::new(PhotoOp::Scan, entry.path(), err))),
            }

            return Some(Ok(PhotoEntry {
                name,
                path: entry.path(),
            }));
        }
    }
}

/// Iterator over the photo paths owned by one record id.
#[derive(Debug)]
pub struct OwnedPhotos {
    owner: RecordId,
    entries: PhotoEntries,
}

impl Iterator for OwnedPhotos {
    type Item = Result<PathBuf, PhotoError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.entries.next()? {
                Ok(entry) if entry.name.is_owned_by(&self.owner) => return Some(Ok(entry.path)),
                Ok(_) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
