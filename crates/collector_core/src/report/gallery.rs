//! Photo gallery listing.

use crate::model::collection::Collection;
use crate::model::record::RecordId;
use crate::repo::photo_dir::{PhotoDir, PhotoError};
use std::path::PathBuf;

/// One photo with its owning record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub path: PathBuf,
    pub owner: RecordId,
    /// Figure name of the owner, `None` when the owner no longer exists.
    pub name: Option<String>,
}

/// Lists every photo in `photos`, in directory order.
pub fn gallery(
    photos: &PhotoDir,
    collection: &Collection,
) -> Result<Vec<GalleryItem>, PhotoError> {
    photos
        .entries()?
        .map(|entry| {
            let entry = entry?;
            let owner = entry.name.owner().to_string();
            let name = collection.get(&owner).map(|record| record.name.clone());
            Ok(GalleryItem {
                path: entry.path,
                owner,
                name,
            })
        })
        .collect()
}
