//! Collection domain model.
//!
//! # Responsibility
//! - Define the record, collection and photo shapes shared by store, search
//!   and report code.
//! - Own the validation rules that do not need file-system access.
//!
//! # Invariants
//! - Every record field is a string; absent cells are empty strings.
//! - Record ids are unique inside a `Collection`.
//! - Photo ownership is decided by parsing `<id>_<suffix>.<ext>`, never by a
//!   raw prefix check.

pub mod collection;
pub mod photo;
pub mod record;
