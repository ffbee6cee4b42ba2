//! MoveCard command

use crate::command::Command;
use crate::types::{BoardState, CardId, ColumnId, Outcome};
use serde::{Deserialize, Serialize};

/// Move a card out of one column and into another at a target index.
///
/// The target index is clamped to the destination length. When source and
/// destination are the same column the card is repositioned within it.
/// This runs on every drag-over that crosses a column boundary, so each call
/// is a real mutation; callers only issue it when the hovered destination
/// actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCard {
    /// The card to move
    pub id: CardId,
    /// Column the caller believes holds the card
    pub from: ColumnId,
    /// Destination column
    pub to: ColumnId,
    /// Insert position in the destination
    pub index: usize,
}

impl MoveCard {
    pub fn new(
        id: impl Into<CardId>,
        from: impl Into<ColumnId>,
        to: impl Into<ColumnId>,
        index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            index,
        }
    }
}

impl Command for MoveCard {
    fn verb(&self) -> &'static str {
        "move"
    }

    fn noun(&self) -> &'static str {
        "card"
    }

    fn apply(&self, board: &mut BoardState) -> Outcome {
        if !board.cards.contains_key(&self.id) {
            return Outcome::NoOpUnknownCard;
        }
        let (Some(from), Some(to)) = (board.column_index(&self.from), board.column_index(&self.to))
        else {
            return Outcome::NoOpUnknownColumn;
        };
        // Stale drag-over: the card already left the column the caller saw
        let Some(current) = board.columns[from].position(&self.id) else {
            return Outcome::NoOpUnknownCard;
        };

        if from == to {
            let column = &mut board.columns[from];
            let target = self.index.min(column.len() - 1);
            if target == current {
                return Outcome::Unchanged;
            }
            let id = column.card_ids.remove(current);
            column.card_ids.insert(target, id);
            return Outcome::Applied;
        }

        let id = board.columns[from].card_ids.remove(current);
        let dest = &mut board.columns[to];
        let target = self.index.min(dest.len());
        dest.card_ids.insert(target, id);
        Outcome::Applied
    }
}
