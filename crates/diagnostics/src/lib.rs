//! Diagnostics for the foomatic-combo resolver.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] types used to report
//! fatal markup errors, constraint warnings, and database problems from the
//! engine and the database layer. Diagnostic codes are defined in the
//! [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hard error, the run stops.
    Error,
    /// Warning, processing continues.
    Warn,
}

/// Byte span in the original input document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }
}

/// A diagnostic message produced while resolving a combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"FCX2001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context such as `file`, `line`, or `printer`.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Add one context entry, replacing an earlier value for `key`.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Point the diagnostic at a database document, and at a 1-based line
    /// within it when known.
    pub fn in_document(self, file: impl Into<String>, line: Option<usize>) -> Self {
        let located = self.with("file", file);
        match line {
            Some(line) => located.with("line", line.to_string()),
            None => located,
        }
    }

    /// Look up a single context value.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.get(key))
            .map(String::as_str)
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::NESTED_ANGLE_BRACKET => {
            "Angle brackets may only appear inside a tag when the tag is a `<!-- -->` comment. \
             The document cannot be scanned any further."
        }
        codes::TAG_WITHOUT_NAME => {
            "Every tag after the document header must start with an element name, e.g. `<make>`."
        }
        codes::UNTERMINATED_TAG => {
            "The document ended before a tag or comment was closed with `>` or `-->`."
        }
        codes::UNBALANCED_CLOSE => {
            "A closing tag appeared without a matching opening tag, so the nesting depth \
             would drop below the document root."
        }
        codes::UNCLOSED_ELEMENT => {
            "The document ended while elements were still open; every opening tag needs a \
             matching closing tag."
        }
        codes::MISSING_MAKE_MODEL => {
            "A device document must carry both `<make>` and `<model>` outside its \
             `<autodetect>` block; option constraints are matched against them."
        }
        codes::NULL_CONSTRAINT => {
            "A `<constraint>` needs at least one selector (`<printer>`, `<make>`, `<model>`, or \
             `<driver>`). The constraint is ignored."
        }
        codes::AMBIGUOUS_CONSTRAINT => {
            "A `<constraint>` may select a device either by id or by make/model, not both. \
             The constraint is ignored."
        }
        codes::OBSOLETE_PRINTER_ID => {
            "The requested device id is listed as obsolete in the id translation table; \
             its current id was used instead."
        }
        codes::DOCUMENT_UNREADABLE => {
            "A database document is missing, empty, or could not be read."
        }
        codes::COMBO_UNSUPPORTED => {
            "Neither the device document's driver list nor the driver document's printer \
             list names this device/driver combination."
        }
        codes::MISSING_REQUEST => {
            "Resolving a single combination needs both a device id (`-p`) and a driver (`-d`)."
        }
        codes::MISSING_DATABASE => {
            "The database root (`-l`, default `/usr/share/foomatic`) is not a directory, so \
             every document lookup below it will fail."
        }
        _ => return None,
    };
    Some(text)
}
