//! Run-scoped state threaded through every parse of one invocation.

use crate::catalog::Catalog;
use crate::ids::IdTable;

/// Which combinations a catalog run lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Listing {
    /// Every combination found in the database.
    #[default]
    All,
    /// Only combinations that lead to a PPD file.
    Cups {
        /// Also list combinations backed by a ready-made PPD.
        ready_made: bool,
    },
}

impl Listing {
    /// Whether a device's driver entry is listed.
    ///
    /// `has_prototype`: the driver can generate PPDs.
    /// `has_ppd`: the device names a ready-made PPD for it.
    pub fn shows(self, has_prototype: bool, has_ppd: bool) -> bool {
        match self {
            Listing::All => true,
            Listing::Cups { ready_made } => {
                (has_prototype && (!has_ppd || ready_made)) || (has_ppd && ready_made)
            }
        }
    }

    /// Whether ready-made PPD references are collected.
    pub fn collects_ppds(self) -> bool {
        match self {
            Listing::All => true,
            Listing::Cups { ready_made } => ready_made,
        }
    }

    /// Whether drivers without a prototype are dropped.
    pub fn is_cups(self) -> bool {
        matches!(self, Listing::Cups { .. })
    }
}

/// The printer/driver pair a single-combo run resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Requested device id, as given.
    pub printer: String,
    /// Requested driver name.
    pub driver: String,
}

/// Make and model read from the device document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
}

/// Everything one invocation shares across its parses.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Printer/driver pair, empty in catalog runs.
    pub request: Request,
    /// Catalog filter.
    pub listing: Listing,
    /// User option defaults in command-line order.
    pub defaults: Vec<String>,
    /// Old-to-new device id table.
    pub ids: IdTable,
    /// Identity of the requested device, filled by the device parse.
    pub device: DeviceIdentity,
    /// The driver forbids PJL options.
    pub no_pjl: bool,
    /// Adjacency built by the catalog passes.
    pub catalog: Catalog,
}

impl Session {
    /// Session resolving one printer/driver combination.
    pub fn combo(printer: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            request: Request {
                printer: printer.into(),
                driver: driver.into(),
            },
            ..Self::default()
        }
    }

    /// Session building a catalog.
    pub fn overview(listing: Listing) -> Self {
        Self {
            listing,
            ..Self::default()
        }
    }

    /// Set the user option defaults.
    pub fn with_defaults(mut self, defaults: Vec<String>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the id translation table.
    pub fn with_ids(mut self, ids: IdTable) -> Self {
        self.ids = ids;
        self
    }

    /// Requested device id after translation.
    pub fn translated_printer(&self) -> &str {
        self.ids.translate(&self.request.printer)
    }
}
