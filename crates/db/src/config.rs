//! Where the database documents live.

use std::path::{Path, PathBuf};

use foomatic_combo_core::IdTable;
use tracing::debug;

use crate::error::DbError;

/// Installation prefix used when no library directory is given.
pub const DEFAULT_ROOT: &str = "/usr/share/foomatic";

/// Layout of a Foomatic database below its library directory.
///
/// ```
/// let db = foomatic_combo_db::Database::default().with_root("/tmp/foomatic");
/// assert!(db.printer_path("HP-LaserJet_4").ends_with("db/source/printer/HP-LaserJet_4.xml"));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Library directory, the parent of `db/`.
    pub root: PathBuf,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl Database {
    /// Use `root` as the library directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// `db/source`, the parent of the document directories.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join("db").join("source")
    }

    /// Directory of device documents.
    pub fn printer_dir(&self) -> PathBuf {
        self.source_dir().join("printer")
    }

    /// Directory of driver documents.
    pub fn driver_dir(&self) -> PathBuf {
        self.source_dir().join("driver")
    }

    /// Directory of option documents.
    pub fn option_dir(&self) -> PathBuf {
        self.source_dir().join("opt")
    }

    /// Obsolete-id translation table.
    pub fn id_table_path(&self) -> PathBuf {
        self.root.join("db").join("oldprinterids")
    }

    /// Device document of `id`.
    pub fn printer_path(&self, id: &str) -> PathBuf {
        self.printer_dir().join(format!("{id}.xml"))
    }

    /// Driver document of `name`.
    pub fn driver_path(&self, name: &str) -> PathBuf {
        self.driver_dir().join(format!("{name}.xml"))
    }

    /// Load the id translation table. A missing table is an empty one.
    pub fn load_id_table(&self) -> Result<IdTable, DbError> {
        let path = self.id_table_path();
        match crate::load::load_document(&path)? {
            Some(text) => {
                let table = IdTable::parse(&text);
                debug!(path = %path.display(), entries = table.len(), "loaded id translation table");
                Ok(table)
            }
            None => {
                debug!(path = %path.display(), "no id translation table");
                Ok(IdTable::default())
            }
        }
    }

    /// Whether the library directory exists.
    pub fn exists(&self) -> bool {
        Path::new(&self.root).is_dir()
    }
}
