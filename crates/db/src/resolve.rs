//! The two kinds of runs over a database.
//!
//! A combination run reads one device document, one driver document and
//! every option document; an overview run reads every driver document and
//! then every device document. Both thread one [`Session`] through all
//! parses.

use std::path::Path;

use foomatic_combo_core::{
    Mode, OverviewWriter, ParseOutcome, Session, assemble, parse_document, synthesize_driver,
    synthesize_printer,
};
use foomatic_combo_diagnostics::{Diagnostic, codes};
use tracing::{debug, info, warn};

use crate::config::Database;
use crate::error::DbError;
use crate::load::{list_documents, load_document};

/// Output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The generated XML document.
    pub output: String,
    /// Warnings raised along the way, in the order they occurred.
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    fn absorb(&mut self, outcome: &mut ParseOutcome) {
        self.diagnostics.append(&mut outcome.diagnostics);
    }
}

fn parse_file(
    mode: Mode,
    text: String,
    path: &Path,
    session: &mut Session,
) -> Result<ParseOutcome, DbError> {
    Ok(parse_document(mode, text, &path.display().to_string(), session)?)
}

fn require(kind: &'static str, path: &Path) -> Result<String, DbError> {
    load_document(path)?.ok_or_else(|| DbError::Unreadable {
        kind,
        path: path.to_path_buf(),
    })
}

/// Build the merged document of the combination requested in `session`.
///
/// A device without a document gets a stand-in one. A driver without a
/// document gets a stand-in one only when the device document lists it.
pub fn resolve_combo(db: &Database, session: &mut Session) -> Result<Resolution, DbError> {
    if session.request.printer.is_empty() || session.request.driver.is_empty() {
        return Err(DbError::MissingRequest);
    }
    let mut resolution = Resolution::default();
    info!(
        printer = %session.request.printer,
        driver = %session.request.driver,
        "resolving combination"
    );

    // Device
    let mut path = db.printer_path(&session.request.printer);
    let mut text = load_document(&path)?;
    if text.is_none() && session.ids.is_obsolete(&session.request.printer) {
        let current = session.translated_printer().to_string();
        let retry = db.printer_path(&current);
        text = load_document(&retry)?;
        if text.is_some() {
            warn!(
                requested = %session.request.printer,
                using = %current,
                "obsolete printer id"
            );
            resolution.diagnostics.push(
                Diagnostic::warn(
                    codes::OBSOLETE_PRINTER_ID,
                    format!(
                        "{} is an obsolete printer id, using {current}",
                        session.request.printer
                    ),
                    None,
                )
                .with("printer", session.request.printer.as_str())
                .with("using", current.as_str()),
            );
            path = retry;
        }
        session.request.printer = current;
    }
    let text = text.unwrap_or_else(|| {
        debug!(printer = %session.request.printer, "no device document, using a stand-in");
        synthesize_printer(&session.request.printer)
    });
    let mut device = parse_file(Mode::Device, text, &path, session)?;
    resolution.absorb(&mut device);
    let device_doc = device.document.unwrap_or_default();

    // Driver
    let path = db.driver_path(&session.request.driver);
    // Options are only scanned against a real driver document.
    let (driver_doc, scan_options) = match load_document(&path)? {
        Some(text) => {
            let mut driver = parse_file(Mode::Driver, text, &path, session)?;
            resolution.absorb(&mut driver);
            if !device.confirmed && !driver.confirmed {
                return Err(DbError::Unsupported {
                    printer: session.request.printer.clone(),
                    driver: session.request.driver.clone(),
                });
            }
            (driver.document.unwrap_or_default(), true)
        }
        None if device.confirmed => {
            debug!(driver = %session.request.driver, "no driver document, using a stand-in");
            let doc = synthesize_driver(&session.request.driver, &session.request.printer);
            (doc, false)
        }
        None => {
            return Err(DbError::Unreadable {
                kind: "Driver",
                path,
            });
        }
    };

    // Options
    let mut options = Vec::new();
    let option_paths = if scan_options {
        list_documents(&db.option_dir())?
    } else {
        Vec::new()
    };
    for path in option_paths {
        let text = require("Option", &path)?;
        let mut outcome = parse_file(Mode::Option, text, &path, session)?;
        resolution.absorb(&mut outcome);
        if let Some(doc) = outcome.document {
            options.push(doc);
        }
    }
    info!(options = options.len(), "combination resolved");

    resolution.output = assemble(&device_doc, &driver_doc, &options);
    Ok(resolution)
}

/// Build the catalog of every combination the listing of `session` shows.
pub fn resolve_overview(db: &Database, session: &mut Session) -> Result<Resolution, DbError> {
    let mut resolution = Resolution::default();
    let mut writer = OverviewWriter::new();
    info!(listing = ?session.listing, "building overview");

    for path in list_documents(&db.driver_dir())? {
        let text = require("Driver", &path)?;
        let mut outcome = parse_file(Mode::CatalogDriver, text, &path, session)?;
        resolution.absorb(&mut outcome);
        if let Some(doc) = outcome.document {
            writer.push_driver(&doc);
        }
    }

    for path in list_documents(&db.printer_dir())? {
        let text = require("Printer", &path)?;
        let mut outcome = parse_file(Mode::CatalogPrinter, text, &path, session)?;
        resolution.absorb(&mut outcome);
        writer.push_printer(outcome.document.as_deref().unwrap_or_default());
    }

    debug!(
        leftovers = session.catalog.printers().len(),
        "devices known only from driver documents"
    );
    resolution.output = writer.finish(&session.catalog);
    Ok(resolution)
}
