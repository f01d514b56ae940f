//! Photo naming rules.
//!
//! # Responsibility
//! - Generate and parse `<id>_<suffix>.<ext>` photo file names.
//! - Decide which upload extensions are accepted.
//!
//! # Invariants
//! - Ownership compares the parsed id for equality, so photos of `10` never
//!   belong to `1`.
//! - Names that do not parse are not photos and are ignored by scans.
//! - The suffix never contains the separator, so the owner is everything
//!   before the last `_` and may itself contain `_`.

use crate::model::record::{RecordId, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Separator between the owning id and the random suffix.
pub const PHOTO_SEPARATOR: char = '_';

/// Accepted raster image extensions, lowercase.
pub const PHOTO_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

const SUFFIX_LEN: usize = 6;

static PHOTO_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<owner>[^/\\]+)_(?P<suffix>[0-9A-Za-z]+)\.(?P<ext>[0-9A-Za-z]+)$")
        .expect("valid photo name regex")
});

/// Raw upload handed over by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Name declared by the client, only its extension is used.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the normalized extension of the declared name.
    ///
    /// # Errors
    /// - `MissingPhotoExtension` when the name has no `.ext` part.
    /// - `UnsupportedPhotoExtension` when the extension is not in
    ///   [`PHOTO_EXTENSIONS`].
    pub fn extension(&self) -> Result<&'static str, ValidationError> {
        let ext = match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.trim().is_empty() => ext.trim(),
            _ => return Err(ValidationError::MissingPhotoExtension(self.name.clone())),
        };
        normalize_extension(ext)
            .ok_or_else(|| ValidationError::UnsupportedPhotoExtension(ext.to_ascii_lowercase()))
    }
}

/// Parsed photo file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoName {
    owner: RecordId,
    suffix: String,
    extension: String,
}

impl PhotoName {
    /// Creates a fresh name for `owner` with a random hex suffix.
    pub fn generate(owner: &str, extension: &'static str) -> Self {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(SUFFIX_LEN);
        Self {
            owner: owner.to_string(),
            suffix,
            extension: extension.to_string(),
        }
    }

    /// Parses a directory entry name.
    ///
    /// Returns `None` for names outside the photo naming scheme or with an
    /// extension that is not an accepted image type.
    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = PHOTO_NAME_RE.captures(file_name)?;
        normalize_extension(&captures["ext"])?;
        Some(Self {
            owner: captures["owner"].to_string(),
            suffix: captures["suffix"].to_string(),
            extension: captures["ext"].to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn is_owned_by(&self, id: &str) -> bool {
        self.owner == id
    }

    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl Display for PhotoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}.{}",
            self.owner, PHOTO_SEPARATOR, self.suffix, self.extension
        )
    }
}

fn normalize_extension(ext: &str) -> Option<&'static str> {
    PHOTO_EXTENSIONS
        .into_iter()
        .find(|allowed| allowed.eq_ignore_ascii_case(ext))
}
