//! Forward-reference jump targets (spec.md §9).
//!
//! A `PlaceholderInt` stands in for an instruction-pointer value that isn't
//! known yet — typically "the IP just past this `if`'s false branch". It
//! supports `+`/`-` so that arithmetic on a still-unresolved label (`label +
//! 4`) commutes with the label's eventual resolution: resolve the label
//! once, and every placeholder derived from it picks up the right value.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Diagnostic;

/// A shared, write-once slot a [`PlaceholderInt`] can be anchored to. Created
/// when a label is introduced (e.g. "the top of this `if`'s false branch")
/// and [`resolve`](Label::resolve)d once the codegen driver actually reaches
/// that instruction pointer.
#[derive(Debug, Clone)]
pub struct Label(Rc<Cell<Option<u32>>>);

impl Label {
    pub fn new() -> Self {
        Label(Rc::new(Cell::new(None)))
    }

    /// Fix this label's instruction pointer. Calling this twice on the same
    /// label is a bug in the codegen driver, not user input.
    pub fn resolve(&self, ip: u32) {
        debug_assert!(self.0.get().is_none(), "label resolved twice");
        self.0.set(Some(ip));
    }

    pub fn get(&self) -> Option<u32> {
        self.0.get()
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

/// An instruction-pointer value that may not be known yet.
#[derive(Debug, Clone)]
pub enum PlaceholderInt {
    Resolved(u32),
    Unresolved { base: Label, add: i64 },
}

impl PlaceholderInt {
    pub fn resolved(value: u32) -> Self {
        PlaceholderInt::Resolved(value)
    }

    pub fn label(label: Label) -> Self {
        PlaceholderInt::Unresolved { base: label, add: 0 }
    }

    /// The current value, if the underlying label has been resolved.
    pub fn value(&self) -> Option<u32> {
        match self {
            PlaceholderInt::Resolved(v) => Some(*v),
            PlaceholderInt::Unresolved { base, add } => {
                base.get().map(|b| (b as i64 + add) as u32)
            }
        }
    }

    /// Resolve to a concrete `u32`, or a fatal internal error if the
    /// underlying label never got resolved (spec.md §7: "Placeholder
    /// integers not resolved by serialization time are a fatal internal
    /// error").
    pub fn require(&self) -> Result<u32, Diagnostic> {
        self.value()
            .ok_or_else(|| Diagnostic::internal("unresolved jump-target placeholder at serialization"))
    }
}

impl std::ops::Add<i64> for PlaceholderInt {
    type Output = PlaceholderInt;
    fn add(self, rhs: i64) -> PlaceholderInt {
        match self {
            PlaceholderInt::Resolved(v) => PlaceholderInt::Resolved((v as i64 + rhs) as u32),
            PlaceholderInt::Unresolved { base, add } => PlaceholderInt::Unresolved {
                base,
                add: add + rhs,
            },
        }
    }
}

impl std::ops::Sub<i64> for PlaceholderInt {
    type Output = PlaceholderInt;
    fn sub(self, rhs: i64) -> PlaceholderInt {
        self + (-rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_placeholder_has_no_value_until_its_label_resolves() {
        let label = Label::new();
        let placeholder = PlaceholderInt::label(label.clone());
        assert_eq!(placeholder.value(), None);
        label.resolve(42);
        assert_eq!(placeholder.value(), Some(42));
    }

    #[test]
    fn arithmetic_commutes_with_later_resolution() {
        let label = Label::new();
        let target = PlaceholderInt::label(label.clone()) + 4;
        assert_eq!(target.value(), None);
        label.resolve(10);
        assert_eq!(target.value(), Some(14));
    }

    #[test]
    fn subtraction_is_supported_too() {
        let label = Label::new();
        let target = PlaceholderInt::label(label.clone()) - 3;
        label.resolve(10);
        assert_eq!(target.value(), Some(7));
    }

    #[test]
    fn require_fails_loudly_when_never_resolved() {
        let label = Label::new();
        let target = PlaceholderInt::label(label);
        assert!(target.require().is_err());
    }

    #[test]
    fn resolved_placeholders_need_no_label() {
        let target = PlaceholderInt::resolved(5) + 2;
        assert_eq!(target.require().unwrap(), 7);
    }
}
