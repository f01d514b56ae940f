//! Core logic for the figure collection tracker.
//! This crate is the single source of truth for collection invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod search;
pub mod storage;

pub use config::StoreConfig;
pub use logging::{
    default_log_level, init_logging, logging_status, resolve_log_dir, LoggingError,
};
pub use model::collection::{Collection, IntegrityError};
pub use model::photo::{PhotoName, PhotoUpload, PHOTO_EXTENSIONS, PHOTO_SEPARATOR};
pub use model::record::{Field, FieldValues, Record, RecordId, ValidationError};
pub use report::gallery::{gallery, GalleryItem};
pub use report::{
    average_msrp_by_year, catalog_csv, missing_upc, missing_upc_csv, MissingUpc, YearAverage,
};
pub use repo::photo_dir::{OwnedPhotos, PhotoDir, PhotoError, PhotoOp};
pub use repo::record_store::{Added, Deleted, Loaded, RecordStore, StoreError, StoreResult};
pub use search::filter::{facet_values, filter, RecordFilter};
pub use storage::{StorageError, StorageResult, TableFormat};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
