//! Collection search entry points.
//!
//! # Responsibility
//! - Expose filtering and facet helpers over an in-memory collection.
//! - Keep search free of file-system access.

pub mod filter;
