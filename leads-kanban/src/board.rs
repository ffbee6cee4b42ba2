//! The board handle a UI host talks to
//!
//! `KanbanBoard` owns the board state, the drag gesture and the persistence
//! gateway for one board. Every operation goes through [`KanbanBoard::execute`]
//! or one of the drag entry points; whenever the outcome is `Applied` the new
//! state is published to subscribers and a debounced save is requested.

use crate::card::{AddCard, DeleteCard, MoveCard, UpdateCard};
use crate::column::ReorderCards;
use crate::command::Command;
use crate::config::BoardConfig;
use crate::drag::{nudge, CancelPolicy, DragGesture, DropTarget, Nudge};
use crate::filter::{filter_board, FilteredColumn};
use crate::persist::BoardPersistence;
use crate::stats::{board_stats, column_stats, BoardStats, ColumnStats};
use crate::types::{BoardState, Card, CardId, CardPatch, ColumnId, Outcome};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// One open pipeline board
pub struct KanbanBoard {
    state: BoardState,
    persistence: BoardPersistence,
    gesture: DragGesture,
    updates: watch::Sender<Arc<BoardState>>,
}

impl KanbanBoard {
    /// Load the stored board (or the seed) through `persistence`
    pub async fn open(persistence: BoardPersistence, policy: CancelPolicy) -> Self {
        let state = persistence.load().await;
        Self::with_state(state, persistence, policy)
    }

    /// Open a board using the store, key, window and cancel policy in `config`
    pub async fn from_config(config: &BoardConfig) -> Self {
        Self::open(BoardPersistence::from_config(config), config.cancel_policy).await
    }

    /// Start from an explicit state without reading the store
    pub fn with_state(state: BoardState, persistence: BoardPersistence, policy: CancelPolicy) -> Self {
        let (updates, _) = watch::channel(Arc::new(state.clone()));
        Self {
            state,
            persistence,
            gesture: DragGesture::new(policy),
            updates,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Shared copy of the current state
    pub fn snapshot(&self) -> Arc<BoardState> {
        self.updates.borrow().clone()
    }

    /// Receive a snapshot after every applied change
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardState>> {
        self.updates.subscribe()
    }

    pub fn persistence(&self) -> &BoardPersistence {
        &self.persistence
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    /// Run a command against the board
    pub fn execute(&mut self, command: &dyn Command) -> Outcome {
        let outcome = command.apply(&mut self.state);
        self.record(&command.op_string(), outcome)
    }

    fn record(&mut self, op: &str, outcome: Outcome) -> Outcome {
        if outcome.is_applied() {
            debug!(op, cards = self.state.card_count(), "Board changed");
            self.updates.send_replace(Arc::new(self.state.clone()));
            self.persistence.save(&self.state);
        } else {
            trace!(op, %outcome, "Board unchanged");
        }
        outcome
    }

    pub fn move_card(
        &mut self,
        id: impl Into<CardId>,
        from: impl Into<ColumnId>,
        to: impl Into<ColumnId>,
        index: usize,
    ) -> Outcome {
        self.execute(&MoveCard::new(id, from, to, index))
    }

    pub fn reorder_cards(&mut self, column: impl Into<ColumnId>, card_ids: Vec<CardId>) -> Outcome {
        self.execute(&ReorderCards::new(column, card_ids))
    }

    pub fn add_card(&mut self, card: Card, column: impl Into<ColumnId>) -> Outcome {
        self.execute(&AddCard::new(card, column))
    }

    pub fn update_card(&mut self, id: impl Into<CardId>, patch: CardPatch) -> Outcome {
        self.execute(&UpdateCard::new(id, patch))
    }

    pub fn delete_card(&mut self, id: impl Into<CardId>) -> Outcome {
        self.execute(&DeleteCard::new(id))
    }

    pub fn column_stats(&self, column: &ColumnId) -> ColumnStats {
        column_stats(&self.state, column)
    }

    pub fn board_stats(&self) -> BoardStats {
        board_stats(&self.state)
    }

    /// Card ids per column that match a search query
    pub fn filter(&self, query: &str) -> Vec<FilteredColumn> {
        filter_board(&self.state, query)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn drag_start(&mut self, card: &CardId) -> Outcome {
        self.gesture.start(&self.state, card)
    }

    pub fn drag_over(&mut self, target: &DropTarget) -> Outcome {
        let outcome = self.gesture.over(&mut self.state, target);
        self.record("drag over", outcome)
    }

    pub fn drag_end(&mut self, target: &DropTarget) -> Outcome {
        let outcome = self.gesture.end(&mut self.state, target);
        self.record("drag end", outcome)
    }

    pub fn drag_cancel(&mut self) -> Outcome {
        let outcome = self.gesture.cancel(&mut self.state);
        self.record("drag cancel", outcome)
    }

    /// Keyboard move of one card by one step
    pub fn nudge(&mut self, card: &CardId, direction: Nudge) -> Outcome {
        let outcome = nudge(&mut self.state, card, direction);
        self.record("nudge card", outcome)
    }

    /// Write any pending save now
    pub async fn flush(&mut self) {
        self.persistence.flush().await;
    }
}
