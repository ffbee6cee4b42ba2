//! Core types for the pipeline board

mod board;
mod card;
mod ids;
mod outcome;

// Re-export all types
pub use board::{BoardSnapshot, BoardState, Column, Slot};
pub use card::{Card, CardPatch, Owner, Priority};
pub use ids::{CardId, ColumnId};
pub use outcome::Outcome;
