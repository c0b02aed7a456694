//! Reading documents and enumerating document directories.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use crate::error::DbError;

/// Read a whole document.
///
/// A missing or empty file yields `None`; the callers decide whether that
/// is fatal.
pub fn load_document(path: &Path) -> Result<Option<String>, DbError> {
    match fs::read_to_string(path) {
        Ok(text) if text.is_empty() => {
            trace!(path = %path.display(), "empty document");
            Ok(None)
        }
        Ok(text) => {
            trace!(path = %path.display(), bytes = text.len(), "loaded document");
            Ok(Some(text))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            trace!(path = %path.display(), "no such document");
            Ok(None)
        }
        Err(err) => Err(DbError::io(path, err)),
    }
}

/// The `.xml` files directly inside `dir`, sorted by file name.
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, DbError> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| DbError::io(dir, io::Error::from(err)))?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new("xml")) {
            documents.push(entry.into_path());
        }
    }
    trace!(dir = %dir.display(), count = documents.len(), "listed documents");
    Ok(documents)
}
