//! ReorderCards command

use crate::command::Command;
use crate::types::{BoardState, CardId, Column, ColumnId, Outcome};
use serde::{Deserialize, Serialize};

/// Replace a column's card order with a permutation of its current contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCards {
    pub column: ColumnId,
    /// The new order; must hold exactly the column's current card ids
    pub card_ids: Vec<CardId>,
}

impl ReorderCards {
    pub fn new(column: impl Into<ColumnId>, card_ids: Vec<CardId>) -> Self {
        Self {
            column: column.into(),
            card_ids,
        }
    }

    /// Build the reorder that moves `card` to `to_index` within `column`,
    /// shifting the cards in between. Returns `None` if the card is not in
    /// the column.
    pub fn array_move(column: &Column, card: &CardId, to_index: usize) -> Option<Self> {
        let from = column.position(card)?;
        Some(Self {
            column: column.id.clone(),
            card_ids: array_move(&column.card_ids, from, to_index),
        })
    }
}

/// Remove the element at `from` and re-insert it at `to` (clamped)
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if from >= out.len() {
        return out;
    }
    let item = out.remove(from);
    let to = to.min(out.len());
    out.insert(to, item);
    out
}

fn is_permutation(current: &[CardId], proposed: &[CardId]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut a: Vec<&CardId> = current.iter().collect();
    let mut b: Vec<&CardId> = proposed.iter().collect();
    a.sort();
    b.sort();
    a == b
}

impl Command for ReorderCards {
    fn verb(&self) -> &'static str {
        "reorder"
    }

    fn noun(&self) -> &'static str {
        "column"
    }

    fn apply(&self, board: &mut BoardState) -> Outcome {
        let Some(column) = board.column_mut(&self.column) else {
            return Outcome::NoOpUnknownColumn;
        };
        if !is_permutation(&column.card_ids, &self.card_ids) {
            return Outcome::NoOpInvalidSequence;
        }
        if column.card_ids == self.card_ids {
            return Outcome::Unchanged;
        }
        column.card_ids = self.card_ids.clone();
        Outcome::Applied
    }
}
