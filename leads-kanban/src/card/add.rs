//! AddCard command

use crate::command::Command;
use crate::types::{BoardState, Card, ColumnId, Outcome};
use serde::{Deserialize, Serialize};

/// Add a new card to the front of a column (newest first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCard {
    /// The card record
    pub card: Card,
    /// Column to place it in
    pub column: ColumnId,
}

impl AddCard {
    pub fn new(card: Card, column: impl Into<ColumnId>) -> Self {
        Self {
            card,
            column: column.into(),
        }
    }
}

impl Command for AddCard {
    fn verb(&self) -> &'static str {
        "add"
    }

    fn noun(&self) -> &'static str {
        "card"
    }

    fn apply(&self, board: &mut BoardState) -> Outcome {
        if board.column(&self.column).is_none() {
            return Outcome::NoOpUnknownColumn;
        }
        if board.cards.contains_key(&self.card.id) {
            return Outcome::NoOpDuplicateCard;
        }
        if self.card.validate().is_err() {
            return Outcome::NoOpInvalidValue;
        }

        let id = self.card.id.clone();
        board.cards.insert(id.clone(), self.card.clone());
        if let Some(column) = board.column_mut(&self.column) {
            column.card_ids.insert(0, id);
        }
        Outcome::Applied
    }
}
