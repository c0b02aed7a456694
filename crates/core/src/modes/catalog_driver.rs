//! Driver document in the first catalog pass.
//!
//! Records the driver under every printer it lists, captures per-printer
//! functionality exceptions, and strips the blocks the catalog does not
//! show. CUPS listings drop drivers that cannot generate PPDs.

use tracing::{debug, trace};

use crate::context::Session;
use crate::engine::{Closed, Editor, Flow, trim_leading};
use crate::modes::prefixed_id;
use crate::nesting::{Marks, Nesting};
use crate::scanner::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Driver,
    Printers,
    Printer,
    Id,
    Functionality,
    Execution,
    Prototype,
    Comments,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        Some(match name {
            "driver" => Role::Driver,
            "printers" => Role::Printers,
            "printer" => Role::Printer,
            "id" => Role::Id,
            "functionality" => Role::Functionality,
            "execution" => Role::Execution,
            "prototype" => Role::Prototype,
            "comments" => Role::Comments,
            _ => return None,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct CatalogDriver {
    nesting: Nesting<Role>,
    marks: Marks<Role>,
    driver: String,
    /// Translated id of the printer entry being read.
    printer: String,
    /// Captured `<functionality>` element of that entry.
    functionality: String,
    has_prototype: bool,
}

impl CatalogDriver {
    pub(crate) fn tag_start(&mut self, ed: &mut Editor<'_>, name: &str, kind: TagKind) -> Flow {
        let Some(role) = Role::of(name) else {
            return Flow::Continue;
        };
        if kind == TagKind::Open {
            match role {
                Role::Driver if ed.in_header() => {
                    let splice = ed.remove_header();
                    self.marks.rebase(&splice);
                }
                Role::Printer => {
                    self.printer.clear();
                    self.functionality.clear();
                }
                Role::Functionality => self.marks.set(role, ed.last_tag()),
                Role::Prototype | Role::Printers | Role::Comments => {
                    self.marks.set(role, ed.after_last_tag());
                }
                _ => {}
            }
        }
        self.nesting.enter(role, ed.depth());
        Flow::Continue
    }

    pub(crate) fn word(&mut self, tag: &str, word: &str) {
        if tag == "driver"
            && let Some(name) = prefixed_id(word, "driver/")
        {
            self.driver = name.to_string();
            trace!(driver = %self.driver, "catalog driver");
        }
    }

    pub(crate) fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        let depth = ed.depth();
        self.nesting.leave(Role::Driver, depth);
        if self.nesting.leave(Role::Printers, depth) {
            self.cut(ed, Role::Printers);
        }
        if self.nesting.leave(Role::Comments, depth) {
            if self.nesting.inside(Role::Printer) {
                self.marks.take(Role::Comments);
            } else {
                self.cut(ed, Role::Comments);
            }
        }
        self.nesting.leave(Role::Execution, depth);
        if self.nesting.leave(Role::Id, depth) {
            let id = tag.body.strip_prefix("printer/").unwrap_or(tag.body);
            self.printer = session.ids.translate(id).to_string();
        }
        if self.nesting.leave(Role::Functionality, depth)
            && let Some(start) = self.marks.take(Role::Functionality)
        {
            self.functionality = ed.text(start, ed.cursor()).to_string();
        }
        if self.nesting.leave(Role::Printer, depth) {
            let functionality =
                (!self.functionality.is_empty()).then(|| self.functionality.clone());
            trace!(printer = %self.printer, driver = %self.driver, "adding driver to printer");
            session
                .catalog
                .add_driver(&self.printer, &self.driver, functionality);
        }
        if self.nesting.leave(Role::Prototype, depth) {
            if session.listing.is_cups() {
                if trim_leading(tag.body).is_empty() {
                    debug!(driver = %self.driver, "driver does not produce PPDs");
                    session.catalog.retract_driver(&self.driver);
                    return Flow::Discard;
                }
                self.has_prototype = true;
                session.catalog.register_prototype(&self.driver);
            }
            self.cut(ed, Role::Prototype);
        }
        Flow::Continue
    }

    pub(crate) fn finish(self, ed: &mut Editor<'_>, session: &mut Session) {
        if session.listing.is_cups() && !self.has_prototype {
            debug!(driver = %self.driver, "driver has no prototype, dropping it");
            session.catalog.retract_driver(&self.driver);
            ed.discard();
        }
    }

    fn cut(&mut self, ed: &mut Editor<'_>, role: Role) {
        if let Some(start) = self.marks.take(role) {
            trace!(?role, "removing block");
            let splice = ed.delete_to_cursor(start);
            self.marks.rebase(&splice);
        }
    }
}
