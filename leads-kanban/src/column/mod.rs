//! Column commands

mod reorder;

pub use reorder::{array_move, ReorderCards};
