//! Driver document of a single combination: keeps only the requested
//! printer's entry in `<printers>` and records the PJL restriction.

use tracing::debug;

use crate::context::Session;
use crate::engine::{Closed, Editor, Flow};
use crate::nesting::{Marks, Nesting};
use crate::scanner::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Driver,
    Execution,
    NoPjl,
    Printers,
    Printer,
    Id,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        Some(match name {
            "driver" => Role::Driver,
            "execution" => Role::Execution,
            "nopjl" => Role::NoPjl,
            "printers" => Role::Printers,
            "printer" => Role::Printer,
            "id" => Role::Id,
            _ => return None,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct Driver {
    nesting: Nesting<Role>,
    marks: Marks<Role>,
    /// Saved entries of the requested printer, re-inserted in place of
    /// `<printers>`.
    kept: String,
    save_printer: bool,
    found: bool,
}

impl Driver {
    pub(crate) fn tag_start(
        &mut self,
        ed: &mut Editor<'_>,
        session: &mut Session,
        name: &str,
        kind: TagKind,
    ) -> Flow {
        let Some(role) = Role::of(name) else {
            return Flow::Continue;
        };
        let open = kind == TagKind::Open;
        match role {
            Role::Driver if open && ed.in_header() => {
                let splice = ed.remove_header();
                self.marks.rebase(&splice);
            }
            Role::Printer if open => self.marks.set(Role::Printer, ed.last_tag()),
            Role::Printers if open => {
                self.marks.set(Role::Printers, ed.after_last_tag());
                self.kept.clear();
            }
            Role::NoPjl if self.nesting.inside(Role::Execution) => {
                debug!("driver does not allow PJL options");
                session.no_pjl = true;
            }
            _ => {}
        }
        self.nesting.enter(role, ed.depth());
        Flow::Continue
    }

    pub(crate) fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        let depth = ed.depth();
        self.nesting.leave(Role::Execution, depth);
        self.nesting.leave(Role::NoPjl, depth);
        self.nesting.leave(Role::Driver, depth);
        if self.nesting.leave(Role::Printers, depth)
            && let Some(start) = self.marks.take(Role::Printers)
        {
            let splice = ed.delete_to_cursor(start);
            self.marks.rebase(&splice);
            if !self.kept.is_empty() {
                let splice = ed.insert(start, &self.kept);
                self.marks.rebase(&splice);
            }
        }
        if self.nesting.leave(Role::Printer, depth) && self.save_printer {
            self.save_printer = false;
            if let Some(start) = self.marks.get(Role::Printer) {
                self.kept.push_str("\n <printers>\n  ");
                self.kept.push_str(ed.text(start, ed.cursor()));
                self.kept.push_str("\n </printers>");
            }
        }
        if self.nesting.leave(Role::Id, depth) {
            let listed = tag.body.strip_prefix("printer/").unwrap_or(tag.body);
            if session.ids.translate(listed) == session.translated_printer() {
                debug!(printer = listed, "requested printer listed by driver");
                self.found = true;
                self.save_printer = true;
            }
        }
        Flow::Continue
    }

    pub(crate) fn finish(self) -> bool {
        self.found
    }
}
