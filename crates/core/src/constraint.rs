//! Constraint scoring and the tie-break between competing constraints.

use crate::ids::IdTable;

/// One `<constraint>` as read from an option document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    /// Device id selector, without the `printer/` prefix.
    pub printer: String,
    /// Manufacturer selector.
    pub make: String,
    /// Model selector, only meaningful together with `make`.
    pub model: String,
    /// Driver selector, with or without the `driver/` prefix.
    pub driver: String,
    /// `<arg_defval>` carried by the constraint.
    pub default: String,
    /// `sense="true"` qualifies, anything else disqualifies.
    pub sense: bool,
}

/// Why a constraint was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No selector at all.
    Null,
    /// Both a device id and a make/model selector.
    PrinterAndMakeModel,
}

/// The combination constraints are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Requested device id, already translated.
    pub printer: &'a str,
    /// Manufacturer from the device document.
    pub make: &'a str,
    /// Model from the device document.
    pub model: &'a str,
    /// Requested driver name.
    pub driver: &'a str,
    /// Translation table applied to device id selectors.
    pub ids: &'a IdTable,
}

/// How well a constraint fits the target.
///
/// `printer`: 2 exact device, 1 make only, 0 no device selector, -1 mismatch.
/// `driver`: 1 match, 0 no driver selector, -1 mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Device sub-score.
    pub printer: i8,
    /// Driver sub-score.
    pub driver: i8,
}

impl MatchScore {
    /// No negative sub-score and at least one positive one.
    pub fn matches(&self) -> bool {
        (self.printer > 0 || self.driver > 0) && self.printer > -1 && self.driver > -1
    }

    /// Whether a matching score takes over from the running best.
    ///
    /// An exact device match always wins.
    pub fn beats(&self, best: &MatchScore) -> bool {
        (self.printer >= best.printer && self.driver >= best.driver) || self.printer == 2
    }

    /// Raise the running best to at least `other` in each category.
    pub fn raise(&mut self, other: &MatchScore) {
        self.printer = self.printer.max(other.printer);
        self.driver = self.driver.max(other.driver);
    }
}

impl Constraint {
    /// Score this constraint against `target`.
    pub fn score(&self, target: &Target<'_>) -> Result<MatchScore, Rejection> {
        let has_make_model = !self.make.is_empty() || !self.model.is_empty();
        if !has_make_model && self.printer.is_empty() && self.driver.is_empty() {
            return Err(Rejection::Null);
        }
        if has_make_model && !self.printer.is_empty() {
            return Err(Rejection::PrinterAndMakeModel);
        }

        let printer = if !self.printer.is_empty() {
            if target.ids.translate(&self.printer) == target.printer {
                2
            } else {
                -1
            }
        } else if !self.make.is_empty() {
            if self.make != target.make {
                -1
            } else if self.model.is_empty() {
                1
            } else if self.model == target.model {
                2
            } else {
                -1
            }
        } else {
            0
        };

        let driver = if self.driver.is_empty() {
            0
        } else if self.driver == target.driver
            || self.driver.strip_prefix("driver/") == Some(target.driver)
        {
            1
        } else {
            -1
        };

        Ok(MatchScore { printer, driver })
    }
}
