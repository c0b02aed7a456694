//! Device-to-driver adjacency built across the catalog passes, and the
//! rendering of catalog entries.

use std::fmt::Write as _;

use tracing::trace;

/// A driver listed for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRef {
    /// Driver name.
    pub name: String,
    /// Captured `<functionality>` element overriding the device's own.
    pub functionality: Option<String>,
}

/// A device and the drivers recorded for it, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterEntry {
    /// Device id, translated.
    pub id: String,
    /// Drivers, unique by case-insensitive name.
    pub drivers: Vec<DriverRef>,
}

/// A ready-made PPD file offered for a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpdRef {
    /// Driver the PPD belongs to.
    pub driver: String,
    /// PPD location.
    pub ppd: String,
}

/// Run-wide adjacency structure.
///
/// Drivers that carry a command-line prototype are kept in a separate list;
/// they are never rendered as a device.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    printers: Vec<PrinterEntry>,
    prototypes: Vec<String>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries not consumed yet, in insertion order.
    pub fn printers(&self) -> &[PrinterEntry] {
        &self.printers
    }

    /// Record `driver` for `printer`, creating the entry if needed.
    ///
    /// A driver already listed (ignoring case) keeps its position; a missing
    /// functionality exception is filled in.
    pub fn add_driver(&mut self, printer: &str, driver: &str, functionality: Option<String>) {
        let index = match self.printers.iter().position(|p| p.id == printer) {
            Some(index) => index,
            None => {
                self.printers.push(PrinterEntry {
                    id: printer.to_string(),
                    drivers: Vec::new(),
                });
                self.printers.len() - 1
            }
        };
        let entry = &mut self.printers[index];
        match entry
            .drivers
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(driver))
        {
            Some(existing) => {
                if existing.functionality.is_none() {
                    existing.functionality = functionality;
                }
            }
            None => {
                trace!(printer, driver, "adding driver to catalog entry");
                entry.drivers.push(DriverRef {
                    name: driver.to_string(),
                    functionality,
                });
            }
        }
    }

    /// Drop `driver` from `printer`'s entry, if present.
    pub fn remove_driver(&mut self, printer: &str, driver: &str) {
        if let Some(entry) = self.printers.iter_mut().find(|p| p.id == printer) {
            entry.drivers.retain(|d| !d.name.eq_ignore_ascii_case(driver));
        }
    }

    /// Drop `driver` from every entry.
    pub fn retract_driver(&mut self, driver: &str) {
        for entry in &mut self.printers {
            entry.drivers.retain(|d| !d.name.eq_ignore_ascii_case(driver));
        }
    }

    /// Note that `driver` has a usable command-line prototype.
    pub fn register_prototype(&mut self, driver: &str) {
        if !self.has_prototype(driver) {
            self.prototypes.push(driver.to_string());
        }
    }

    /// Whether `driver` was registered with a prototype.
    pub fn has_prototype(&self, driver: &str) -> bool {
        self.prototypes
            .iter()
            .any(|d| d.eq_ignore_ascii_case(driver))
    }

    /// Remove and return the entry for `printer`.
    pub fn take_printer(&mut self, printer: &str) -> Option<PrinterEntry> {
        let index = self.printers.iter().position(|p| p.id == printer)?;
        Some(self.printers.remove(index))
    }

    /// Render every remaining entry as a synthesized device.
    pub fn render_leftovers(&self) -> String {
        let mut out = String::new();
        for entry in &self.printers {
            let (make, model) = guess_make_model(&entry.id);
            let _ = write!(
                out,
                "  <printer>\n    <id>{}</id>\n    <make>{make}</make>\n    <model>{model}</model>\n    <noxmlentry />\n",
                entry.id
            );
            if !entry.drivers.is_empty() {
                write_driver_list(&mut out, &entry.drivers);
            }
            write_exceptions(&mut out, &entry.drivers);
            out.push_str("  </printer>\n");
        }
        out
    }
}

/// Split a device id into make and model guesses.
///
/// The make is everything before the first `-`; without a `-` the model is
/// `"Unknown model"`. Underscores become spaces.
pub fn guess_make_model(id: &str) -> (String, String) {
    let (make, model) = id.split_once('-').unwrap_or((id, "Unknown model"));
    (make.replace('_', " "), model.replace('_', " "))
}

/// Fields gathered from one device document in the printer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterSummary {
    /// Translated device id.
    pub id: String,
    /// Manufacturer.
    pub make: String,
    /// Model.
    pub model: String,
    /// Functionality grade.
    pub functionality: String,
    /// Whether the document carries `<unverified>`.
    pub unverified: bool,
    /// Recommended driver.
    pub driver: String,
    /// Captured `<autodetect>` element.
    pub autodetect: String,
}

impl PrinterSummary {
    /// Id, make, model, and functionality are all known.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty()
            && !self.make.is_empty()
            && !self.model.is_empty()
            && !self.functionality.is_empty()
    }

    /// Render the condensed catalog element.
    pub fn render(&self, entry: Option<&PrinterEntry>, ppds: &[PpdRef]) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "  <printer>\n    <id>{}</id>\n    <make>{}</make>\n    <model>{}</model>\n    <functionality>{}</functionality>\n",
            self.id, self.make, self.model, self.functionality
        );
        if self.unverified {
            // The unverified marker repeats the functionality grade.
            let _ = writeln!(out, "    <unverified>{}</unverified>", self.functionality);
        }
        if !self.driver.is_empty() {
            let _ = writeln!(out, "    <driver>{}</driver>", self.driver);
        }
        if !self.autodetect.is_empty() {
            out.push_str("    ");
            out.push_str(&self.autodetect);
        }
        if let Some(entry) = entry {
            out.push('\n');
            write_driver_list(&mut out, &entry.drivers);
            write_exceptions(&mut out, &entry.drivers);
        }
        if !ppds.is_empty() {
            out.push_str("    <ppds>\n");
            for ppd in ppds {
                let _ = write!(
                    out,
                    "      <ppd>\n        <driver>{}</driver>\n        <ppdfile>{}</ppdfile>\n      </ppd>\n",
                    ppd.driver, ppd.ppd
                );
            }
            out.push_str("    </ppds>\n");
        }
        out.push_str("  </printer>\n");
        out
    }
}

fn write_driver_list(out: &mut String, drivers: &[DriverRef]) {
    out.push_str("    <drivers>\n");
    for driver in drivers {
        let _ = writeln!(out, "      <driver>{}</driver>", driver.name);
    }
    out.push_str("    </drivers>\n");
}

fn write_exceptions(out: &mut String, drivers: &[DriverRef]) {
    if drivers.iter().all(|d| d.functionality.is_none()) {
        return;
    }
    out.push_str("    <driverfunctionalityexceptions>\n");
    for driver in drivers {
        if let Some(functionality) = &driver.functionality {
            let _ = write!(
                out,
                "      <driverfunctionalityexception>\n        <driver>{}</driver>\n{functionality}\n      </driverfunctionalityexception>\n",
                driver.name
            );
        }
    }
    out.push_str("    </driverfunctionalityexceptions>\n");
}
