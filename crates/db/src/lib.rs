//! Foomatic database access and run orchestration.
//!
//! [`Database`] describes where the XML documents live. [`resolve_combo`]
//! produces the merged document of one printer/driver combination and
//! [`resolve_overview`] the catalog of every combination, both driving the
//! engine of [`foomatic_combo_core`] over the files they find.

#![warn(missing_docs)]

/// Database layout.
pub mod config;
/// Database errors.
pub mod error;
/// Document and directory loading.
pub mod load;
/// Single-combination and overview runs.
pub mod resolve;

pub use config::Database;
pub use error::DbError;
pub use load::{list_documents, load_document};
pub use resolve::{Resolution, resolve_combo, resolve_overview};
