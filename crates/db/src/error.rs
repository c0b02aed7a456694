//! Typed errors for database runs.

use std::io;
use std::path::PathBuf;

use foomatic_combo_core::ParseError;
use foomatic_combo_diagnostics::{Diagnostic, codes};

/// Fatal error of a database run.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A file or directory could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A required document is missing or empty.
    #[error("{kind} file {} unreadable", path.display())]
    Unreadable {
        /// Kind of document, e.g. `"Driver"`.
        kind: &'static str,
        /// Offending path.
        path: PathBuf,
    },

    /// A document failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A single-combination run lacks a device id or a driver.
    #[error("a printer id and a driver name are required")]
    MissingRequest,

    /// Neither document confirms the requested combination.
    #[error("the printer {printer} is not supported by the driver {driver}")]
    Unsupported {
        /// Requested device id.
        printer: String,
        /// Requested driver.
        driver: String,
    },
}

impl DbError {
    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DbError::Io { path, .. } | DbError::Unreadable { path, .. } => {
                Diagnostic::error(codes::DOCUMENT_UNREADABLE, self.to_string(), None)
                    .in_document(path.display().to_string(), None)
            }
            DbError::Parse(err) => err.to_diagnostic(),
            DbError::MissingRequest => {
                Diagnostic::error(codes::MISSING_REQUEST, self.to_string(), None)
            }
            DbError::Unsupported { printer, driver } => {
                Diagnostic::error(codes::COMBO_UNSUPPORTED, self.to_string(), None)
                    .with("driver", driver.as_str())
                    .with("printer", printer.as_str())
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DbError::Io {
            path: path.into(),
            source,
        }
    }
}
