//! Record store and photo directory.
//!
//! # Responsibility
//! - Expose the CRUD entry points used by the UI layer.
//! - Keep file-system details of photos out of the model.
//!
//! # Invariants
//! - Every mutating operation persists before returning.
//! - Store APIs return semantic errors (`NotFound`, `Validation`,
//!   `Integrity`) in addition to I/O failures.

pub mod photo_dir;
pub mod record_store;
