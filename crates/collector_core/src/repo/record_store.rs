//! Record store: CRUD over the collection with photo cleanup.
//!
//! # Responsibility
//! - Load and save the collection through the backing file.
//! - Allocate ids, validate input and keep photos in step with records.
//!
//! # Invariants
//! - Callers own the `Collection`; every mutating call takes it explicitly.
//! - A mutation is applied to the caller's collection only after the backing
//!   file has been rewritten, so failures leave it untouched.
//! - Photo failures after a successful table write are reported in the
//!   outcome and never undo the table change.

use crate::config::StoreConfig;
use crate::model::collection::{Collection, IntegrityError};
use crate::model::photo::PhotoUpload;
use crate::model::record::{Field, FieldValues, Record, RecordId, ValidationError};
use crate::repo::photo_dir::{OwnedPhotos, PhotoDir, PhotoError};
use crate::storage::{self, StorageError, TableFormat};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy surfaced to the UI layer.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file is absent. Returned as a warning by [`RecordStore::load`].
    DataSourceMissing(PathBuf),
    Validation(ValidationError),
    NotFound(RecordId),
    Integrity(IntegrityError),
    Photo(PhotoError),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataSourceMissing(path) => {
                write!(f, "no data file found at `{}`", path.display())
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Integrity(err) => write!(f, "collection integrity violated: {err}"),
            Self::Photo(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataSourceMissing(_) | Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Integrity(err) => Some(err),
            Self::Photo(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<IntegrityError> for StoreError {
    fn from(value: IntegrityError) -> Self {
        Self::Integrity(value)
    }
}

impl From<PhotoError> for StoreError {
    fn from(value: PhotoError) -> Self {
        Self::Photo(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Result of [`RecordStore::load`].
#[derive(Debug)]
pub struct Loaded {
    pub collection: Collection,
    /// `Some(StoreError::DataSourceMissing)` when the backing file is absent.
    pub warning: Option<StoreError>,
}

impl Loaded {
    pub fn is_data_source_missing(&self) -> bool {
        matches!(self.warning, Some(StoreError::DataSourceMissing(_)))
    }
}

/// Result of [`RecordStore::add`].
#[derive(Debug)]
pub struct Added {
    pub record: Record,
    /// Paths of the photos written for the new record.
    pub photos: Vec<PathBuf>,
    pub photo_errors: Vec<PhotoError>,
}

/// Result of [`RecordStore::delete`].
#[derive(Debug)]
pub struct Deleted {
    pub record: Record,
    pub removed_photos: Vec<PathBuf>,
    pub photo_errors: Vec<PhotoError>,
}

/// File-backed record store.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
    photos: PhotoDir,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        let photos = PhotoDir::new(config.photo_dir.clone());
        Self { config, photos }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn photo_dir(&self) -> &PhotoDir {
        &self.photos
    }

    /// Loads the full collection.
    ///
    /// An absent backing file yields an empty collection plus a
    /// `DataSourceMissing` warning.
    ///
    /// # Errors
    /// - `Storage` when the file cannot be read or has no usable header.
    /// - `Integrity` when two rows share an id.
    pub fn load(&self) -> StoreResult<Loaded> {
        let started_at = Instant::now();
        let data_file = &self.config.data_file;
        let counter_floor = storage::read_sequence(&self.config.sequence_file())?.unwrap_or(0);

        let Some(table) = storage::read_table(data_file)? else {
            warn!(
                "event=collection_load module=store status=warn reason=data_source_missing path={}",
                data_file.display()
            );
            return Ok(Loaded {
                collection: Collection::new().with_counter_floor(counter_floor),
                warning: Some(StoreError::DataSourceMissing(data_file.clone())),
            });
        };

        let records = storage::records_from_table(&table)?;
        let collection = Collection::from_records(records)?.with_counter_floor(counter_floor);
        info!(
            "event=collection_load module=store status=ok records={} last_id={} duration_ms={}",
            collection.len(),
            collection.last_allocated(),
            started_at.elapsed().as_millis()
        );

        Ok(Loaded {
            collection,
            warning: None,
        })
    }

    /// Rewrites the backing file and counter sidecar from `collection`.
    ///
    /// The persisted counter only moves forward: a collection with a lower
    /// counter than the sidecar keeps the sidecar value.
    pub fn save(&self, collection: &Collection) -> StoreResult<()> {
        TableFormat::from_path(&self.config.data_file)?;
        let sequence_file = self.config.sequence_file();
        let persisted = storage::read_sequence(&sequence_file)?.unwrap_or(0);
        storage::write_sequence(&sequence_file, persisted.max(collection.last_allocated()))?;
        let table = storage::table_from_records(collection);
        storage::write_table(&self.config.data_file, &table)?;
        Ok(())
    }

    /// Creates a record and stores its photos.
    ///
    /// # Contract
    /// - `year`, `series` and `name` must be non-blank.
    /// - The id comes from the collection counter; `serial` is empty unless
    ///   supplied.
    /// - Photos are written after the table is persisted.
    ///
    /// # Errors
    /// - `Validation` for missing fields or unsupported photo types.
    /// - `Integrity` when an existing id is not numeric.
    /// - `Storage` when the backing file cannot be written.
    pub fn add(
        &self,
        collection: &mut Collection,
        fields: &FieldValues,
        photos: &[PhotoUpload],
    ) -> StoreResult<Added> {
        fields.ensure_writable()?;
        fields.require_non_empty(&Field::REQUIRED_ON_ADD)?;
        let extensions = photos
            .iter()
            .map(PhotoUpload::extension)
            .collect::<Result<Vec<_>, _>>()?;

        let id = collection.next_id().map_err(|err| {
            error!(
                "event=record_add module=store status=error error_code=integrity error={}",
                err
            );
            err
        })?;

        let mut record = Record::new(id.clone());
        for field in Field::ALL.into_iter().filter(|field| *field != Field::Id) {
            record.set(field, fields.get(field).unwrap_or_default());
        }

        let mut staged = collection.clone();
        staged.push_allocated(record.clone());
        self.save(&staged)?;
        *collection = staged;

        let mut stored = Vec::new();
        let mut photo_errors = Vec::new();
        if !photos.is_empty() {
            match self.photos.ensure() {
                Ok(()) => {
                    for (upload, extension) in photos.iter().zip(extensions) {
                        match self.photos.store(&id, extension, upload) {
                            Ok(path) => stored.push(path),
                            Err(err) => photo_errors.push(err),
                        }
                    }
                }
                Err(err) => photo_errors.push(err),
            }
        }

        if photo_errors.is_empty() {
            info!(
                "event=record_add module=store status=ok id={} photos={}",
                id,
                stored.len()
            );
        } else {
            warn!(
                "event=record_add module=store status=warn id={} photos={} photo_errors={}",
                id,
                stored.len(),
                photo_errors.len()
            );
        }

        Ok(Added {
            record,
            photos: stored,
            photo_errors,
        })
    }

    /// Replaces the mutable fields of record `id`.
    ///
    /// # Contract
    /// - Fields absent from `fields` become empty, except `serial`, which is
    ///   kept unless supplied.
    /// - `id` never changes.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`.
    /// - `Validation` when `fields` sets the id.
    /// - `Storage` when the backing file cannot be written.
    pub fn update(
        &self,
        collection: &mut Collection,
        id: &str,
        fields: &FieldValues,
    ) -> StoreResult<Record> {
        fields.ensure_writable()?;
        let Some(index) = collection.position(id) else {
            warn!("event=record_update module=store status=error error_code=not_found id={id}");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let existing = &collection.records()[index];
        let mut updated = Record::new(existing.id.clone());
        for field in Field::ALL {
            match field {
                Field::Id => {}
                Field::Serial => updated.set(
                    field,
                    fields.get(field).unwrap_or(existing.serial.as_str()),
                ),
                _ => updated.set(field, fields.get(field).unwrap_or_default()),
            }
        }

        let mut staged = collection.clone();
        staged.replace(index, updated.clone());
        self.save(&staged)?;
        *collection = staged;

        info!("event=record_update module=store status=ok id={id}");
        Ok(updated)
    }

    /// Deletes record `id` and then its photos.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`.
    /// - `Storage` when the backing file cannot be written; photos are left
    ///   alone in that case.
    pub fn delete(&self, collection: &mut Collection, id: &str) -> StoreResult<Deleted> {
        let Some(index) = collection.position(id) else {
            warn!("event=record_delete module=store status=error error_code=not_found id={id}");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut staged = collection.clone();
        let record = staged.remove(index);
        self.save(&staged)?;
        *collection = staged;

        let (removed_photos, photo_errors) = self.photos.remove_all_of(id);
        for err in &photo_errors {
            error!(
                "event=photo_delete module=store status=error id={} error={}",
                id, err
            );
        }
        info!(
            "event=record_delete module=store status=ok id={} photos_removed={} photo_errors={}",
            id,
            removed_photos.len(),
            photo_errors.len()
        );

        Ok(Deleted {
            record,
            removed_photos,
            photo_errors,
        })
    }

    /// Lazily lists the photos owned by `id`, re-scanning on every call.
    pub fn list_photos(&self, id: &str) -> StoreResult<OwnedPhotos> {
        Ok(self.photos.photos_of(id)?)
    }
}
