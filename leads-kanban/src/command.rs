//! Command trait implemented by every board operation
//!
//! Each operation is a small struct carrying its parameters. `apply` does all
//! of the work against a [`BoardState`]; the board handle decides what to do
//! with the resulting [`Outcome`] (publish, persist, log).

use crate::types::{BoardState, Outcome};

/// A board mutation
pub trait Command: std::fmt::Debug {
    /// Verb, e.g. `"move"`
    fn verb(&self) -> &'static str;

    /// Noun, e.g. `"card"`
    fn noun(&self) -> &'static str;

    /// Human-readable op string used in logs, e.g. `"move card"`
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }

    /// Apply to the board. Must leave the board invariant intact whatever
    /// the outcome.
    fn apply(&self, board: &mut BoardState) -> Outcome;
}
