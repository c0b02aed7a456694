//! Output assembly and stand-in documents for missing database entries.

use crate::catalog::{Catalog, guess_make_model};

/// Minimal device document for an id without a database file.
pub fn synthesize_printer(id: &str) -> String {
    let (make, model) = guess_make_model(id);
    format!(
        "<printer id=\"printer/{id}\">\n <make>{make}</make>\n <model>{model}</model>\n <mechanism>\n  <color />\n </mechanism>\n <noxmlentry />\n</printer>\n"
    )
}

/// Minimal driver document listing only `printer`, used when the device
/// document vouches for a driver that has no file.
pub fn synthesize_driver(driver: &str, printer: &str) -> String {
    format!(
        "<driver id=\"driver/{driver}\">\n <name>{driver}</name>\n <url></url>\n <execution>\n  <filter />\n  <prototype></prototype>\n </execution>\n <printers>\n  <printer>\n   <id>printer/{printer}</id>\n  </printer>\n </printers>\n</driver>"
    )
}

/// Merge the rewritten documents of a single combination.
pub fn assemble<S: AsRef<str>>(device: &str, driver: &str, options: &[S]) -> String {
    let mut out = format!("<foomatic>\n{device}{driver}\n<options>\n");
    for option in options {
        out.push_str(option.as_ref());
    }
    out.push_str("</options>\n</foomatic>\n");
    out
}

/// Incremental writer for the catalog document.
#[derive(Debug, Clone)]
pub struct OverviewWriter {
    out: String,
}

impl Default for OverviewWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OverviewWriter {
    /// Start the document.
    pub fn new() -> Self {
        Self {
            out: String::from("<overview>\n"),
        }
    }

    /// Append a surviving driver document.
    pub fn push_driver(&mut self, document: &str) {
        self.out.push_str(document);
        self.out.push('\n');
    }

    /// Append a device summary, possibly empty.
    pub fn push_printer(&mut self, summary: &str) {
        self.out.push_str(summary);
    }

    /// Append the leftover entries and close the document.
    pub fn finish(mut self, catalog: &Catalog) -> String {
        self.out.push_str(&catalog.render_leftovers());
        self.out.push_str("</overview>\n");
        self.out
    }
}
