//! foomatic-combo core library.
//!
//! Resolves which printer/driver/option combinations of a Foomatic database
//! are valid. A single streaming engine scans each document once, rewriting
//! the buffer it scans: disqualified elements are cut, computed defaults are
//! inserted. The main entry point is [`parse_document`], run in one of the
//! five [`Mode`]s against a run-wide [`Session`].

#![warn(missing_docs)]

/// Owned document buffer and splice records.
pub mod buffer;
/// Device-to-driver adjacency for catalog runs.
pub mod catalog;
/// Output assembly and stand-in documents.
pub mod combo;
/// Constraint scoring.
pub mod constraint;
/// Run-scoped state.
pub mod context;
/// User option default validation.
pub mod defaults;
/// The parse-and-rewrite engine.
pub mod engine;
/// Typed parse errors.
pub mod error;
/// Old-to-new device id translation.
pub mod ids;
/// Entered-at sentinels and live marks.
pub mod nesting;
/// Tag scanner.
pub mod scanner;

mod modes;

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use catalog::{Catalog, DriverRef, PpdRef, PrinterEntry, PrinterSummary};
pub use combo::{OverviewWriter, assemble, synthesize_driver, synthesize_printer};
pub use context::{DeviceIdentity, Listing, Request, Session};
pub use engine::{Mode, ParseOutcome, parse_document};
pub use error::{MarkupFault, ParseError};
pub use ids::IdTable;

// Diagnostics (re-exported from the diagnostics crate)
pub use foomatic_combo_diagnostics::{Diagnostic, Severity, Span, codes};
