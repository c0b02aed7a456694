//! Device document of a single combination: reads make and model and checks
//! whether the device lists the requested driver itself.

use tracing::debug;

use crate::context::Session;
use crate::engine::{Closed, Editor, Flow, trim_leading};
use crate::error::ParseError;
use crate::nesting::Nesting;
use crate::scanner::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Printer,
    Make,
    Model,
    Autodetect,
    Drivers,
    Driver,
    Id,
    Lang,
    Postscript,
    Ppd,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        Some(match name {
            "printer" => Role::Printer,
            "make" => Role::Make,
            "model" => Role::Model,
            "autodetect" => Role::Autodetect,
            "drivers" => Role::Drivers,
            "driver" => Role::Driver,
            "id" => Role::Id,
            "lang" => Role::Lang,
            "postscript" => Role::Postscript,
            "ppd" => Role::Ppd,
            _ => return None,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct Device {
    nesting: Nesting<Role>,
    /// Driver of the entry being read.
    id: String,
    /// Ready-made PPD of the entry being read.
    ppd: String,
    confirmed: bool,
}

impl Device {
    pub(crate) fn tag_start(&mut self, ed: &mut Editor<'_>, name: &str, kind: TagKind) -> Flow {
        let Some(role) = Role::of(name) else {
            return Flow::Continue;
        };
        match role {
            Role::Printer if kind == TagKind::Open && ed.in_header() => {
                ed.remove_header();
            }
            Role::Driver if kind == TagKind::Open && self.nesting.inside(Role::Drivers) => {
                self.id.clear();
            }
            Role::Postscript if kind == TagKind::Open && self.nesting.inside(Role::Lang) => {
                self.id.clear();
                self.ppd.clear();
            }
            _ => {}
        }
        self.nesting.enter(role, ed.depth());
        Flow::Continue
    }

    pub(crate) fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        let depth = ed.depth();
        let n = &mut self.nesting;
        n.leave(Role::Printer, depth);
        let in_autodetect = n.inside(Role::Autodetect);
        if n.leave(Role::Make, depth) && !in_autodetect {
            session.device.make.push_str(tag.body);
        }
        if n.leave(Role::Model, depth) && !in_autodetect {
            session.device.model.push_str(tag.body);
        }
        n.leave(Role::Autodetect, depth);
        n.leave(Role::Drivers, depth);
        if n.leave(Role::Driver, depth)
            && n.inside(Role::Drivers)
            && !self.id.is_empty()
            && self.id == session.request.driver
        {
            debug!(driver = %self.id, "combination confirmed by the device's driver list");
            self.confirmed = true;
        }
        if !self.ppd.is_empty() {
            self.id = "Postscript".to_string();
        }
        if n.leave(Role::Id, depth) {
            self.id = tag.body.to_string();
        }
        n.leave(Role::Lang, depth);
        if n.leave(Role::Postscript, depth) && self.id == session.request.driver {
            debug!(driver = %self.id, "combination confirmed by the device's PostScript entry");
            self.confirmed = true;
        }
        if n.leave(Role::Ppd, depth) {
            self.ppd = trim_leading(tag.body).to_string();
        }
        Flow::Continue
    }

    pub(crate) fn finish(self, ed: &mut Editor<'_>, session: &Session) -> Result<bool, ParseError> {
        if session.device.make.is_empty() || session.device.model.is_empty() {
            return Err(ParseError::MissingMakeModel {
                file: ed.file().to_string(),
            });
        }
        debug!(
            make = %session.device.make,
            model = %session.device.model,
            confirmed = self.confirmed,
            "device document read"
        );
        Ok(self.confirmed)
    }
}
