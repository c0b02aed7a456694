//! Option document of a single combination.
//!
//! Constraints decide whether the option and each of its enum values apply
//! to the requested printer/driver pair. Disqualified enum values are cut,
//! satisfied `<constraints>` blocks are removed, and the resulting default
//! is inserted right before `</option>`.

use foomatic_combo_diagnostics::codes;
use tracing::{debug, trace};

use crate::constraint::{Constraint, MatchScore, Rejection, Target};
use crate::context::Session;
use crate::defaults::{self, OptionKind, lenient_float};
use crate::engine::{Closed, Editor, Flow};
use crate::nesting::{Marks, Nesting};
use crate::scanner::TagKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Option,
    ArgShortname,
    ArgExecution,
    ArgPjl,
    ArgMax,
    ArgMin,
    ArgDefval,
    EvShortname,
    En,
    EnumVal,
    Constraints,
    Constraint,
    Printer,
    Make,
    Model,
    Driver,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        Some(match name {
            "option" => Role::Option,
            "arg_shortname" => Role::ArgShortname,
            "arg_execution" => Role::ArgExecution,
            "arg_pjl" => Role::ArgPjl,
            "arg_max" => Role::ArgMax,
            "arg_min" => Role::ArgMin,
            "arg_defval" => Role::ArgDefval,
            "ev_shortname" => Role::EvShortname,
            "en" => Role::En,
            "enum_val" => Role::EnumVal,
            "constraints" => Role::Constraints,
            "constraint" => Role::Constraint,
            "printer" => Role::Printer,
            "make" => Role::Make,
            "model" => Role::Model,
            "driver" => Role::Driver,
            _ => return None,
        })
    }
}

#[derive(Debug)]
pub(crate) struct OptionDoc {
    nesting: Nesting<Role>,
    marks: Marks<Role>,
    kind: OptionKind,
    /// Enum values that survived; stays 1 for non-enum options.
    kept_values: usize,
    qualified: bool,
    /// Default carried by the winning option-level constraint.
    constraint_default: String,
    /// Validated user default for this option.
    user_default: Option<String>,
    /// Id of the enum value the user default names, once that value is kept.
    user_default_id: Option<String>,
    /// Id of the enum value being read.
    value_id: String,
    /// The current enum value names the user default.
    value_is_default: bool,
    value_qualified: bool,
    value_removed: bool,
    best: MatchScore,
    constraint: Constraint,
}

impl Default for OptionDoc {
    fn default() -> Self {
        Self {
            nesting: Nesting::default(),
            marks: Marks::default(),
            kind: OptionKind::Enum,
            kept_values: 1,
            qualified: false,
            constraint_default: String::new(),
            user_default: None,
            user_default_id: None,
            value_id: String::new(),
            value_is_default: false,
            value_qualified: true,
            value_removed: false,
            best: MatchScore::default(),
            constraint: Constraint::default(),
        }
    }
}

impl OptionDoc {
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
            Role::ArgPjl if self.nesting.inside(Role::ArgExecution) && session.no_pjl => {
                debug!("PJL option but the driver does not allow PJL");
                return Flow::Discard;
            }
            Role::EnumVal if open => {
                self.value_qualified = true;
                self.value_removed = false;
                self.value_is_default = false;
                self.marks.set(Role::EnumVal, ed.after_last_tag());
            }
            Role::Constraints if open => {
                self.best = MatchScore::default();
                self.marks.set(Role::Constraints, ed.after_last_tag());
            }
            Role::Constraint if open => self.constraint = Constraint::default(),
            Role::Option if kind == TagKind::Close => {
                self.marks.set(Role::Option, ed.after_last_tag());
            }
            Role::Option if open && ed.in_header() => {
                let splice = ed.remove_header();
                self.marks.rebase(&splice);
                self.constraint_default.clear();
            }
            _ => {}
        }
        self.nesting.enter(role, ed.depth());
        Flow::Continue
    }

    pub(crate) fn word(&mut self, tag: &str, word: &str) {
        match tag {
            "constraint" => {
                if let Some(at) = word.find("sense") {
                    let rest = &word[at + 5..];
                    if rest.contains("true") {
                        self.constraint.sense = true;
                    } else if rest.contains("false") {
                        self.constraint.sense = false;
                    }
                }
            }
            "option" => {
                if let Some(kind) = OptionKind::from_attribute(word) {
                    self.kind = kind;
                    if kind == OptionKind::Enum {
                        self.kept_values = 0;
                    }
                }
            }
            "enum_val" => {
                if let Some(at) = word.find("id") {
                    // id="VALUE": skip `id="`, drop the closing quote.
                    let mut chars = word.get(at + 4..).unwrap_or_default().chars();
                    chars.next_back();
                    self.value_id = chars.as_str().to_string();
                    trace!(id = %self.value_id, "enum value");
                }
            }
            _ => {}
        }
    }

    pub(crate) fn tag_end(&mut self, ed: &mut Editor<'_>, session: &mut Session, tag: Closed<'_>) -> Flow {
        let depth = ed.depth();

        if self.nesting.leave(Role::En, depth) {
            if self.nesting.inside(Role::ArgShortname) {
                self.user_default = defaults::resolve(&session.defaults, tag.body, self.kind);
                if let Some(value) = &self.user_default {
                    debug!(option = tag.body, value = %value, "user default");
                }
            } else if self.nesting.inside(Role::EvShortname)
                && self.user_default.as_deref() == Some(tag.body)
            {
                self.value_is_default = true;
            }
        }
        if self.nesting.leave(Role::ArgMax, depth) && self.kind.is_numeric() {
            let max = lenient_float(tag.body);
            if self
                .user_default
                .as_deref()
                .is_some_and(|v| lenient_float(v) > max)
            {
                debug!(max, "user default above maximum");
                self.user_default = None;
            }
        }
        if self.nesting.leave(Role::ArgMin, depth) && self.kind.is_numeric() {
            let min = lenient_float(tag.body);
            if self
                .user_default
                .as_deref()
                .is_some_and(|v| lenient_float(v) < min)
            {
                debug!(min, "user default below minimum");
                self.user_default = None;
            }
        }
        self.nesting.leave(Role::ArgShortname, depth);
        self.nesting.leave(Role::ArgExecution, depth);
        self.nesting.leave(Role::ArgPjl, depth);
        self.nesting.leave(Role::EvShortname, depth);

        let in_constraint = self.nesting.inside(Role::Constraint);
        if self.nesting.leave(Role::Printer, depth) && in_constraint {
            let id = tag.body.strip_prefix("printer/").unwrap_or(tag.body);
            self.constraint.printer.push_str(id);
        }
        if self.nesting.leave(Role::Make, depth) && in_constraint {
            self.constraint.make.push_str(tag.body);
        }
        if self.nesting.leave(Role::Model, depth) && in_constraint {
            self.constraint.model.push_str(tag.body);
        }
        if self.nesting.leave(Role::Driver, depth) && in_constraint {
            self.constraint.driver.push_str(tag.body);
        }
        if self.nesting.leave(Role::ArgDefval, depth) && in_constraint {
            self.constraint.default.push_str(tag.body);
        }

        if self.nesting.leave(Role::Constraint, depth) {
            self.evaluate(ed, session);
        }

        if self.nesting.leave(Role::Constraints, depth) {
            let in_value = self.nesting.inside(Role::EnumVal);
            if in_value {
                if !self.value_qualified {
                    self.value_removed = true;
                }
            } else if !self.qualified {
                debug!("option does not apply");
                return Flow::Discard;
            }
            match self.marks.take(Role::Constraints) {
                Some(start) if !in_value || !self.value_removed => {
                    let splice = ed.delete_to_cursor(start);
                    self.marks.rebase(&splice);
                }
                _ => {}
            }
        }

        if self.nesting.leave(Role::EnumVal, depth) {
            if self.value_removed {
                if let Some(start) = self.marks.take(Role::EnumVal) {
                    trace!(id = %self.value_id, "removing enum value");
                    let splice = ed.delete_to_cursor(start);
                    self.marks.rebase(&splice);
                }
            } else {
                self.kept_values += 1;
                if self.value_is_default {
                    self.user_default_id = Some(self.value_id.clone());
                }
            }
        }

        if self.nesting.leave(Role::Option, depth) {
            if self.kept_values == 0 || !self.qualified {
                debug!(
                    values = self.kept_values,
                    qualified = self.qualified,
                    "option does not apply"
                );
                return Flow::Discard;
            }
            if let Some(value) = self.default_value()
                && let Some(at) = self.marks.take(Role::Option)
            {
                trace!(%value, "inserting default");
                let line = format!("\n  <arg_defval>{value}</arg_defval>");
                let splice = ed.insert(at, &line);
                self.marks.rebase(&splice);
            }
        }
        Flow::Continue
    }

    fn evaluate(&mut self, ed: &mut Editor<'_>, session: &Session) {
        let target = Target {
            printer: session.translated_printer(),
            make: &session.device.make,
            model: &session.device.model,
            driver: &session.request.driver,
            ids: &session.ids,
        };
        let score = match self.constraint.score(&target) {
            Ok(score) => score,
            Err(Rejection::Null) => {
                let message = format!("illegal null constraint in {}", ed.file());
                ed.warn(codes::NULL_CONSTRAINT, message);
                return;
            }
            Err(Rejection::PrinterAndMakeModel) => {
                let message = format!(
                    "both printer id and make/model in constraint in {}",
                    ed.file()
                );
                ed.warn(codes::AMBIGUOUS_CONSTRAINT, message);
                return;
            }
        };
        trace!(
            printer = score.printer,
            driver = score.driver,
            best_printer = self.best.printer,
            best_driver = self.best.driver,
            "constraint score"
        );
        if !score.matches() || !score.beats(&self.best) {
            return;
        }
        self.best.raise(&score);
        if self.nesting.inside(Role::EnumVal) {
            self.value_qualified = self.constraint.sense;
        } else {
            self.qualified = self.constraint.sense;
            self.constraint_default = self.constraint.default.clone();
        }
    }

    /// Default to insert: a valid user default, resolved to an enum value id
    /// for enum options, else the constraint-derived one.
    fn default_value(&self) -> Option<String> {
        let value = match (&self.user_default, self.kind) {
            (Some(_), OptionKind::Enum) => self
                .user_default_id
                .clone()
                .unwrap_or_else(|| self.constraint_default.clone()),
            (Some(value), _) => value.clone(),
            (None, _) => self.constraint_default.clone(),
        };
        (!value.is_empty()).then_some(value)
    }
}
