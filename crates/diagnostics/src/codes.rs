//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every constant has an entry in [`crate::explain`].

// ── Markup (fatal) ──────────────────────────────────────────────────────

/// A `<` appeared inside a tag that is not a comment.
pub const NESTED_ANGLE_BRACKET: &str = "FCX1001";
/// A tag in the document body has no name.
pub const TAG_WITHOUT_NAME: &str = "FCX1002";
/// The buffer ended inside a tag or comment.
pub const UNTERMINATED_TAG: &str = "FCX1003";
/// A closing tag has no matching opening tag.
pub const UNBALANCED_CLOSE: &str = "FCX1004";
/// The document body ended with elements still open.
pub const UNCLOSED_ELEMENT: &str = "FCX1005";
/// A device document names no manufacturer or no model.
pub const MISSING_MAKE_MODEL: &str = "FCX1101";

// ── Constraints (warnings) ──────────────────────────────────────────────

/// A constraint names neither a device, a make/model, nor a driver.
pub const NULL_CONSTRAINT: &str = "FCX2001";
/// A constraint names both a device id and a make/model pair.
pub const AMBIGUOUS_CONSTRAINT: &str = "FCX2002";

// ── Database / request ──────────────────────────────────────────────────

/// The requested device id was obsolete and has been translated.
pub const OBSOLETE_PRINTER_ID: &str = "FCX2101";
/// A required database document is missing, empty, or unreadable.
pub const DOCUMENT_UNREADABLE: &str = "FCX3001";
/// Neither the device nor the driver document confirms the combination.
pub const COMBO_UNSUPPORTED: &str = "FCX3002";
/// A single-combination run was started without a device id or driver.
pub const MISSING_REQUEST: &str = "FCX3003";
/// The database root directory does not exist.
pub const MISSING_DATABASE: &str = "FCX3004";
