//! Entered-at sentinels and live buffer marks, keyed by element role.
//!
//! A sentinel for a role is armed with `depth + 1` whenever a tag of that
//! role is named, opening or closing. It fires, and disarms, as soon as a
//! tag end leaves the depth below the armed value. This tracks "inside this
//! element" correctly even when unrelated elements of the same name appear
//! at other depths.

use std::collections::BTreeMap;

use crate::buffer::Splice;

/// Per-role entered-at depths.
#[derive(Debug, Clone)]
pub struct Nesting<R> {
    entered: BTreeMap<R, i32>,
}

impl<R: Ord + Copy> Default for Nesting<R> {
    fn default() -> Self {
        Self {
            entered: BTreeMap::new(),
        }
    }
}

impl<R: Ord + Copy> Nesting<R> {
    /// Arm `role` at the current depth.
    pub fn enter(&mut self, role: R, depth: i32) {
        self.entered.insert(role, depth + 1);
    }

    /// Whether `role` is armed.
    pub fn inside(&self, role: R) -> bool {
        self.entered.contains_key(&role)
    }

    /// Disarm `role` if `depth` dropped below its entry; returns whether it
    /// fired.
    pub fn leave(&mut self, role: R, depth: i32) -> bool {
        match self.entered.get(&role) {
            Some(&at) if depth < at => {
                self.entered.remove(&role);
                true
            }
            _ => false,
        }
    }
}

/// Buffer offsets a mode holds on to across events.
#[derive(Debug, Clone)]
pub struct Marks<R> {
    marks: BTreeMap<R, usize>,
}

impl<R: Ord + Copy> Default for Marks<R> {
    fn default() -> Self {
        Self {
            marks: BTreeMap::new(),
        }
    }
}

impl<R: Ord + Copy> Marks<R> {
    /// Remember `offset` for `role`.
    pub fn set(&mut self, role: R, offset: usize) {
        self.marks.insert(role, offset);
    }

    /// Offset remembered for `role`.
    pub fn get(&self, role: R) -> Option<usize> {
        self.marks.get(&role).copied()
    }

    /// Forget and return the offset for `role`.
    pub fn take(&mut self, role: R) -> Option<usize> {
        self.marks.remove(&role)
    }

    /// Apply a buffer edit to every remembered offset.
    pub fn rebase(&mut self, splice: &Splice) {
        for mark in self.marks.values_mut() {
            *mark = splice.rebase(*mark);
        }
    }
}
