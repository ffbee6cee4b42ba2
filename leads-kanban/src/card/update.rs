//! UpdateCard command

use crate::command::Command;
use crate::types::{BoardState, CardId, CardPatch, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merge fields into an existing card and refresh its `updated_at` stamp.
/// The card keeps its position. A patch that changes nothing leaves the
/// stamp alone and reports `Unchanged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCard {
    /// The card to update
    pub id: CardId,
    /// Fields to merge
    pub patch: CardPatch,
    /// Stamp to record; `None` uses the current time
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

impl UpdateCard {
    pub fn new(id: impl Into<CardId>, patch: CardPatch) -> Self {
        Self {
            id: id.into(),
            patch,
            at: None,
        }
    }

    /// Record a fixed timestamp instead of now
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }
}

impl Command for UpdateCard {
    fn verb(&self) -> &'static str {
        "update"
    }

    fn noun(&self) -> &'static str {
        "card"
    }

    fn apply(&self, board: &mut BoardState) -> Outcome {
        let Some(card) = board.cards.get_mut(&self.id) else {
            return Outcome::NoOpUnknownCard;
        };
        if self.patch.validate().is_err() {
            return Outcome::NoOpInvalidValue;
        }
        let mut merged = card.clone();
        merged.apply_patch(&self.patch, card.updated_at);
        if merged == *card {
            return Outcome::Unchanged;
        }
        merged.updated_at = self.at.unwrap_or_else(Utc::now);
        *card = merged;
        Outcome::Applied
    }
}
