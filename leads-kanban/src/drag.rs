//! Drag gesture state machine
//!
//! A gesture goes `Idle -> Dragging -> ... -> Idle`. Drag-over events that
//! cross into another column move the card immediately so the board shows
//! where it would land; the drop then either reorders within the final
//! column or finishes a move that no drag-over covered.
//!
//! Events are processed strictly in the order the host delivers them. Any
//! event naming a card or column that is gone is dropped.

use crate::card::MoveCard;
use crate::column::ReorderCards;
use crate::command::Command;
use crate::types::{BoardState, CardId, ColumnId, Outcome};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What happens to intermediate drag-over moves when a gesture is cancelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelPolicy {
    /// Leave the card wherever the last drag-over put it
    #[default]
    KeepLastHover,
    /// Put the card back where the gesture started
    Revert,
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Card(CardId),
    Column(ColumnId),
    /// Empty space outside every column
    Outside,
}

/// The card being dragged and where it started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag {
    pub card: CardId,
    pub origin_column: ColumnId,
    pub origin_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Tracks one pointer gesture at a time
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    state: GestureState,
    policy: CancelPolicy,
}

impl DragGesture {
    pub fn new(policy: CancelPolicy) -> Self {
        Self {
            state: GestureState::Idle,
            policy,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn policy(&self) -> CancelPolicy {
        self.policy
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Begin dragging a card. The board is not touched, so success reports
    /// `Unchanged`. Starting over an unfinished gesture replaces it.
    pub fn start(&mut self, board: &BoardState, card: &CardId) -> Outcome {
        let Some(slot) = board.locate(card) else {
            trace!(card = %card, "drag start on unknown card");
            return Outcome::NoOpUnknownCard;
        };
        let origin_column = board.columns()[slot.column].id.clone();
        trace!(card = %card, column = %origin_column, index = slot.index, "drag start");
        self.state = GestureState::Dragging(ActiveDrag {
            card: card.clone(),
            origin_column,
            origin_index: slot.index,
        });
        Outcome::Unchanged
    }

    /// Pointer moved over a target. Moves the card only when the hovered
    /// column differs from the one currently holding it.
    pub fn over(&mut self, board: &mut BoardState, target: &DropTarget) -> Outcome {
        let GestureState::Dragging(active) = &self.state else {
            return Outcome::NoOpIdle;
        };
        let card = active.card.clone();
        let Some(from) = board.column_of(&card).cloned() else {
            // Deleted mid-gesture
            self.state = GestureState::Idle;
            return Outcome::NoOpUnknownCard;
        };
        if target == &DropTarget::Card(card.clone()) {
            return Outcome::Unchanged;
        }
        let (to, index) = match resolve(board, target) {
            Ok(Some(hit)) => hit,
            Ok(None) => return Outcome::Unchanged,
            Err(outcome) => return outcome,
        };
        if to == from {
            return Outcome::Unchanged;
        }
        trace!(card = %card, from = %from, to = %to, index, "drag over");
        MoveCard::new(card, from, to, index).apply(board)
    }

    /// Pointer released over a target. Ends the gesture.
    pub fn end(&mut self, board: &mut BoardState, target: &DropTarget) -> Outcome {
        let GestureState::Dragging(active) = std::mem::take(&mut self.state) else {
            return Outcome::NoOpIdle;
        };
        let Some(from) = board.column_of(&active.card).cloned() else {
            return Outcome::NoOpUnknownCard;
        };
        if target == &DropTarget::Card(active.card.clone()) {
            return Outcome::Unchanged;
        }
        let (to, index) = match resolve(board, target) {
            Ok(Some(hit)) => hit,
            // Released over nothing known: treat as a cancel
            Ok(None) | Err(_) => return self.finish_cancel(board, active),
        };
        trace!(card = %active.card, from = %from, to = %to, index, "drag end");

        if to != from {
            return MoveCard::new(active.card, from, to, index).apply(board);
        }
        match target {
            DropTarget::Card(_) => {
                let Some(column) = board.column(&to) else {
                    return Outcome::NoOpUnknownColumn;
                };
                match ReorderCards::array_move(column, &active.card, index) {
                    Some(reorder) => reorder.apply(board),
                    None => Outcome::NoOpUnknownCard,
                }
            }
            _ => Outcome::Unchanged,
        }
    }

    /// The host aborted the gesture (e.g. lost pointer capture)
    pub fn cancel(&mut self, board: &mut BoardState) -> Outcome {
        let GestureState::Dragging(active) = std::mem::take(&mut self.state) else {
            return Outcome::NoOpIdle;
        };
        self.finish_cancel(board, active)
    }

    fn finish_cancel(&self, board: &mut BoardState, active: ActiveDrag) -> Outcome {
        trace!(card = %active.card, policy = ?self.policy, "drag cancelled");
        match self.policy {
            CancelPolicy::KeepLastHover => Outcome::Unchanged,
            CancelPolicy::Revert => {
                let Some(current) = board.column_of(&active.card).cloned() else {
                    return Outcome::NoOpUnknownCard;
                };
                MoveCard::new(
                    active.card,
                    current,
                    active.origin_column,
                    active.origin_index,
                )
                .apply(board)
            }
        }
    }
}

/// Resolve a target to (column, insert index). `Ok(None)` means empty space.
fn resolve(board: &BoardState, target: &DropTarget) -> Result<Option<(ColumnId, usize)>, Outcome> {
    match target {
        DropTarget::Card(id) => match board.locate(id) {
            Some(slot) => Ok(Some((board.columns()[slot.column].id.clone(), slot.index))),
            None => Err(Outcome::NoOpUnknownCard),
        },
        DropTarget::Column(id) => match board.column(id) {
            Some(column) => Ok(Some((column.id.clone(), column.len()))),
            None => Err(Outcome::NoOpUnknownColumn),
        },
        DropTarget::Outside => Ok(None),
    }
}

/// Keyboard direction for moving the focused card one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nudge {
    Up,
    Down,
    Left,
    Right,
}

/// Move a card one slot within its column, or to the neighbouring column at
/// the same index (clamped).
pub fn nudge(board: &mut BoardState, card: &CardId, direction: Nudge) -> Outcome {
    let Some(slot) = board.locate(card) else {
        return Outcome::NoOpUnknownCard;
    };
    let columns = board.columns();
    let from = columns[slot.column].id.clone();
    let (to, index) = match direction {
        Nudge::Up if slot.index == 0 => return Outcome::Unchanged,
        Nudge::Up => (from.clone(), slot.index - 1),
        Nudge::Down => (from.clone(), slot.index + 1),
        Nudge::Left if slot.column == 0 => return Outcome::Unchanged,
        Nudge::Left => (columns[slot.column - 1].id.clone(), slot.index),
        Nudge::Right => match columns.get(slot.column + 1) {
            Some(next) => (next.id.clone(), slot.index),
            None => return Outcome::Unchanged,
        },
    };
    MoveCard::new(card.clone(), from, to, index).apply(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Card, Column};

    fn board() -> BoardState {
        let mut new = Column::new("new", "New");
        new.card_ids = vec!["1".into(), "2".into(), "3".into()];
        let mut qualified = Column::new("qualified", "Qualified");
        qualified.card_ids = vec!["4".into()];
        BoardState::from_parts(
            vec![new, qualified, Column::new("won", "Won")],
            (1..=4).map(|i| Card::new(i.to_string(), format!("Lead {i}"))),
        )
        .unwrap()
    }

    fn ids(board: &BoardState, column: &str) -> Vec<String> {
        board
            .column(&column.into())
            .unwrap()
            .card_ids
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    fn card(id: &str) -> DropTarget {
        DropTarget::Card(id.into())
    }

    fn column(id: &str) -> DropTarget {
        DropTarget::Column(id.into())
    }

    #[test]
    fn test_events_while_idle() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        assert_eq!(gesture.over(&mut board, &column("won")), Outcome::NoOpIdle);
        assert_eq!(gesture.end(&mut board, &column("won")), Outcome::NoOpIdle);
        assert_eq!(gesture.cancel(&mut board), Outcome::NoOpIdle);
    }

    #[test]
    fn test_start_unknown_card() {
        let board = board();
        let mut gesture = DragGesture::default();
        assert_eq!(gesture.start(&board, &"9".into()), Outcome::NoOpUnknownCard);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_cross_column_drag() {
        let mut board = board();
        let mut gesture = DragGesture::default();

        assert_eq!(gesture.start(&board, &"2".into()), Outcome::Unchanged);
        assert!(gesture.is_dragging());

        // Hover over card 4 in qualified: live move to its slot
        assert_eq!(gesture.over(&mut board, &card("4")), Outcome::Applied);
        assert_eq!(ids(&board, "new"), vec!["1", "3"]);
        assert_eq!(ids(&board, "qualified"), vec!["2", "4"]);

        // Further hovering inside the same column is short-circuited
        assert_eq!(gesture.over(&mut board, &card("4")), Outcome::Unchanged);
        assert_eq!(gesture.over(&mut board, &column("qualified")), Outcome::Unchanged);

        // Drop on card 4: reorder within qualified
        assert_eq!(gesture.end(&mut board, &card("4")), Outcome::Applied);
        assert_eq!(ids(&board, "qualified"), vec!["4", "2"]);
        assert!(!gesture.is_dragging());
        assert!(board.check_invariants().is_ok());
    }

    #[test]
    fn test_hover_column_appends() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"1".into());

        assert_eq!(gesture.over(&mut board, &column("won")), Outcome::Applied);
        assert_eq!(ids(&board, "won"), vec!["1"]);
        assert_eq!(gesture.end(&mut board, &column("won")), Outcome::Unchanged);
        assert_eq!(ids(&board, "won"), vec!["1"]);
    }

    #[test]
    fn test_drop_without_hover_moves() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"3".into());

        assert_eq!(gesture.end(&mut board, &card("4")), Outcome::Applied);
        assert_eq!(ids(&board, "new"), vec!["1", "2"]);
        assert_eq!(ids(&board, "qualified"), vec!["3", "4"]);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"1".into());

        assert_eq!(gesture.over(&mut board, &card("3")), Outcome::Unchanged);
        assert_eq!(gesture.end(&mut board, &card("3")), Outcome::Applied);
        assert_eq!(ids(&board, "new"), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_drop_on_self_is_unchanged() {
        let mut board = board();
        let before = board.clone();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"2".into());
        assert_eq!(gesture.end(&mut board, &card("2")), Outcome::Unchanged);
        assert_eq!(board, before);
    }

    #[test]
    fn test_cancel_keeps_last_hover() {
        let mut board = board();
        let mut gesture = DragGesture::new(CancelPolicy::KeepLastHover);
        gesture.start(&board, &"2".into());
        gesture.over(&mut board, &column("won"));

        assert_eq!(gesture.end(&mut board, &DropTarget::Outside), Outcome::Unchanged);
        assert_eq!(ids(&board, "won"), vec!["2"]);
        assert_eq!(ids(&board, "new"), vec!["1", "3"]);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_cancel_reverts() {
        let mut board = board();
        let before = board.clone();
        let mut gesture = DragGesture::new(CancelPolicy::Revert);
        gesture.start(&board, &"2".into());
        gesture.over(&mut board, &column("won"));
        gesture.over(&mut board, &card("4"));
        assert_eq!(ids(&board, "qualified"), vec!["2", "4"]);

        assert_eq!(gesture.end(&mut board, &DropTarget::Outside), Outcome::Applied);
        assert_eq!(board, before);
    }

    #[test]
    fn test_unknown_drop_target_cancels() {
        let mut board = board();
        let before = board.clone();
        let mut gesture = DragGesture::new(CancelPolicy::Revert);
        gesture.start(&board, &"1".into());
        gesture.over(&mut board, &column("qualified"));

        assert_eq!(gesture.end(&mut board, &column("archived")), Outcome::Applied);
        assert_eq!(board, before);
    }

    #[test]
    fn test_host_cancel() {
        let mut board = board();
        let mut gesture = DragGesture::new(CancelPolicy::Revert);
        gesture.start(&board, &"4".into());
        gesture.over(&mut board, &card("1"));
        assert_eq!(ids(&board, "new"), vec!["4", "1", "2", "3"]);

        assert_eq!(gesture.cancel(&mut board), Outcome::Applied);
        assert_eq!(ids(&board, "qualified"), vec!["4"]);
        assert_eq!(gesture.cancel(&mut board), Outcome::NoOpIdle);
    }

    #[test]
    fn test_card_deleted_mid_drag() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"1".into());
        crate::card::DeleteCard::new("1").apply(&mut board);

        assert_eq!(gesture.over(&mut board, &column("won")), Outcome::NoOpUnknownCard);
        assert!(!gesture.is_dragging());
    }

    #[test]
    fn test_over_unknown_targets() {
        let mut board = board();
        let mut gesture = DragGesture::default();
        gesture.start(&board, &"1".into());
        assert_eq!(gesture.over(&mut board, &card("ghost")), Outcome::NoOpUnknownCard);
        assert_eq!(gesture.over(&mut board, &column("archived")), Outcome::NoOpUnknownColumn);
        assert_eq!(gesture.over(&mut board, &DropTarget::Outside), Outcome::Unchanged);
        assert!(gesture.is_dragging());
    }

    #[test]
    fn test_nudge() {
        let mut board = board();

        assert_eq!(nudge(&mut board, &"1".into(), Nudge::Up), Outcome::Unchanged);
        assert_eq!(nudge(&mut board, &"1".into(), Nudge::Down), Outcome::Applied);
        assert_eq!(ids(&board, "new"), vec!["2", "1", "3"]);

        assert_eq!(nudge(&mut board, &"1".into(), Nudge::Left), Outcome::Unchanged);
        assert_eq!(nudge(&mut board, &"1".into(), Nudge::Right), Outcome::Applied);
        assert_eq!(ids(&board, "qualified"), vec!["4", "1"]);

        assert_eq!(nudge(&mut board, &"3".into(), Nudge::Down), Outcome::Unchanged);
        assert_eq!(nudge(&mut board, &"3".into(), Nudge::Right), Outcome::Applied);
        assert_eq!(ids(&board, "qualified"), vec!["4", "3", "1"]);

        nudge(&mut board, &"4".into(), Nudge::Right);
        assert_eq!(nudge(&mut board, &"4".into(), Nudge::Right), Outcome::Unchanged);
        assert_eq!(nudge(&mut board, &"nope".into(), Nudge::Up), Outcome::NoOpUnknownCard);
    }
}
