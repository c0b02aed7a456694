//! Device document in the second catalog pass: condensed into a summary
//! cross-referenced with the drivers recorded in the first pass.

use tracing::{debug, trace};

use crate::catalog::{PpdRef, PrinterSummary};
use crate::context::Session;
use crate::engine::{Closed, Editor, Flow, trim_leading};
use crate::modes::prefixed_id;
use crate::nesting::{Marks, Nesting};
use crate::scanner::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Printer,
    Make,
    Model,
    Functionality,
    Unverified,
    Autodetect,
    Drivers,
    Driver,
    Lang,
    Postscript,
    Id,
    Ppd,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        Some(match name {
            "printer" => Role::Printer,
            "make" => Role::Make,
            "model" => Role::Model,
            "functionality" => Role::Functionality,
            "unverified" => Role::Unverified,
            "autodetect" => Role::Autodetect,
            "drivers" => Role::Drivers,
            "driver" => Role::Driver,
            "lang" => Role::Lang,
            "postscript" => Role::Postscript,
            "id" => Role::Id,
            "ppd" => Role::Ppd,
            _ => return None,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct CatalogPrinter {
    nesting: Nesting<Role>,
    marks: Marks<Role>,
    summary: PrinterSummary,
    /// Driver of the entry being read.
    id: String,
    /// Ready-made PPD of the entry being read.
    ppd: String,
    ppds: Vec<PpdRef>,
}

impl CatalogPrinter {
    pub(crate) fn tag_start(&mut self, ed: &mut Editor<'_>, name: &str, kind: TagKind) -> Flow {
        let Some(role) = Role::of(name) else {
            return Flow::Continue;
        };
        let open = kind == TagKind::Open;
        match role {
            Role::Printer if open && ed.in_header() => {
                let splice = ed.remove_header();
                self.marks.rebase(&splice);
                self.summary = PrinterSummary::default();
                self.ppds.clear();
            }
            Role::Unverified => self.summary.unverified = true,
            Role::Driver if open && self.nesting.inside(Role::Drivers) => {
                self.id.clear();
                self.ppd.clear();
            }
            Role::Postscript if open && self.nesting.inside(Role::Lang) => {
                self.id.clear();
                self.ppd.clear();
            }
            Role::Autodetect if open => self.marks.set(role, ed.last_tag()),
            _ => {}
        }
        self.nesting.enter(role, ed.depth());
        Flow::Continue
    }

    pub(crate) fn word(&mut self, session: &Session, tag: &str, word: &str) {
        if tag == "printer"
            && let Some(id) = prefixed_id(word, "printer/")
        {
            self.summary.id = session.ids.translate(id).to_string();
            trace!(printer = %self.summary.id, "catalog printer");
        }
    }

    pub(crate) fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        let depth = ed.depth();
        let n = &mut self.nesting;
        n.leave(Role::Printer, depth);
        let in_autodetect = n.inside(Role::Autodetect);
        if n.leave(Role::Make, depth) && !in_autodetect {
            self.summary.make = tag.body.to_string();
        }
        if n.leave(Role::Model, depth) && !in_autodetect {
            self.summary.model = tag.body.to_string();
        }
        if n.leave(Role::Functionality, depth) {
            self.summary.functionality = tag.body.to_string();
        }
        n.leave(Role::Unverified, depth);
        n.leave(Role::Drivers, depth);
        n.leave(Role::Lang, depth);
        let driver_closed = n.leave(Role::Driver, depth);
        let postscript_closed = n.leave(Role::Postscript, depth);
        if driver_closed || postscript_closed {
            if n.inside(Role::Drivers) || n.inside(Role::Lang) {
                self.record_entry(session);
            } else {
                self.summary.driver = tag.body.to_string();
            }
        }
        if self.nesting.leave(Role::Id, depth) {
            self.id = tag.body.to_string();
        }
        if self.nesting.leave(Role::Ppd, depth) {
            self.ppd = trim_leading(tag.body).to_string();
        }
        if self.nesting.leave(Role::Autodetect, depth)
            && let Some(start) = self.marks.take(Role::Autodetect)
        {
            self.summary.autodetect = ed.text(start, ed.cursor()).to_string();
        }
        Flow::Continue
    }

    /// Apply the listing rule to the driver entry just read.
    fn record_entry(&mut self, session: &mut Session) {
        if self.id.is_empty() {
            return;
        }
        let printer = &self.summary.id;
        let has_prototype = session.listing.is_cups() && session.catalog.has_prototype(&self.id);
        let has_ppd = !self.ppd.is_empty();
        if session.listing.shows(has_prototype, has_ppd) {
            trace!(%printer, driver = %self.id, "listing combination");
            session.catalog.add_driver(printer, &self.id, None);
        } else {
            trace!(%printer, driver = %self.id, "suppressing combination");
            session.catalog.remove_driver(printer, &self.id);
        }
        if has_ppd && session.listing.collects_ppds() {
            self.ppds.push(PpdRef {
                driver: self.id.clone(),
                ppd: self.ppd.clone(),
            });
        }
    }

    pub(crate) fn finish(self, ed: &mut Editor<'_>, session: &mut Session) {
        if !self.summary.is_complete() {
            debug!(printer = %self.summary.id, "incomplete device document, no summary");
            ed.replace_all(String::new());
            return;
        }
        let entry = session.catalog.take_printer(&self.summary.id);
        ed.replace_all(self.summary.render(entry.as_ref(), &self.ppds));
    }
}
