//! DeleteCard command

use crate::command::Command;
use crate::types::{BoardState, CardId, Outcome};
use serde::{Deserialize, Serialize};

/// Remove a card record and its placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCard {
    pub id: CardId,
}

impl DeleteCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self { id: id.into() }
    }
}

impl Command for DeleteCard {
    fn verb(&self) -> &'static str {
        "delete"
    }

    fn noun(&self) -> &'static str {
        "card"
    }

    fn apply(&self, board: &mut BoardState) -> Outcome {
        if board.cards.remove(&self.id).is_none() {
            return Outcome::NoOpUnknownCard;
        }
        for column in &mut board.columns {
            column.card_ids.retain(|id| id != &self.id);
        }
        Outcome::Applied
    }
}
