//! Board-level types: Column and BoardState

use super::card::Card;
use super::ids::{CardId, ColumnId};
use crate::error::{LeadsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A column is a pipeline stage holding an ordered run of card ids.
///
/// Order is meaningful: the front of the column is the newest or most
/// urgent lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub card_ids: Vec<CardId>,
}

impl Column {
    /// Create an empty column
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            card_ids: Vec::new(),
        }
    }

    /// Position of a card within this column
    pub fn position(&self, card: &CardId) -> Option<usize> {
        self.card_ids.iter().position(|id| id == card)
    }

    pub fn contains(&self, card: &CardId) -> bool {
        self.card_ids.contains(card)
    }

    pub fn len(&self) -> usize {
        self.card_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_ids.is_empty()
    }
}

/// Where a card currently sits: column index on the board, then index in
/// the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub column: usize,
    pub index: usize,
}

/// The full board: ordered columns plus the card records they reference.
///
/// Every card id placed in a column has exactly one record, and every record
/// is placed exactly once. The only way in from outside the crate is through
/// validated constructors or deserialization, both of which enforce that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct BoardState {
    pub(crate) columns: Vec<Column>,
    pub(crate) cards: BTreeMap<CardId, Card>,
}

/// Unvalidated wire shape of a board, as read from storage
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub cards: BTreeMap<CardId, Card>,
}

impl TryFrom<BoardSnapshot> for BoardState {
    type Error = LeadsError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        let state = Self {
            columns: snapshot.columns,
            cards: snapshot.cards,
        };
        state.check_invariants()?;
        Ok(state)
    }
}

impl BoardState {
    /// Create a board with the given columns and no cards
    pub fn with_columns<I, C, T>(columns: I) -> Self
    where
        I: IntoIterator<Item = (C, T)>,
        C: Into<ColumnId>,
        T: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(id, title)| Column::new(id, title))
                .collect(),
            cards: BTreeMap::new(),
        }
    }

    /// Build a board from columns and card records, enforcing the invariant
    pub fn from_parts(columns: Vec<Column>, cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        Self::try_from(BoardSnapshot {
            columns,
            cards: cards.into_iter().map(|c| (c.id.clone(), c)).collect(),
        })
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// All card records keyed by id
    pub fn cards(&self) -> &BTreeMap<CardId, Card> {
        &self.cards
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Find the column and index currently holding a card
    pub fn locate(&self, card: &CardId) -> Option<Slot> {
        self.columns.iter().enumerate().find_map(|(column, c)| {
            c.position(card).map(|index| Slot { column, index })
        })
    }

    /// Id of the column currently holding a card
    pub fn column_of(&self, card: &CardId) -> Option<&ColumnId> {
        self.locate(card).map(|slot| &self.columns[slot.column].id)
    }

    // =========================================================================
    // Crate-internal mutation primitives (commands do the work)
    // =========================================================================

    pub(crate) fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| &c.id == id)
    }

    // =========================================================================
    // Invariant
    // =========================================================================

    /// Check that columns and card records describe the same set of cards,
    /// each placed exactly once.
    pub fn check_invariants(&self) -> Result<()> {
        let mut column_ids = HashSet::new();
        let mut placed = HashSet::new();

        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(LeadsError::DuplicateColumn {
                    id: column.id.to_string(),
                });
            }
            for id in &column.card_ids {
                if !placed.insert(id) {
                    return Err(LeadsError::DuplicatePlacement { id: id.to_string() });
                }
                if !self.cards.contains_key(id) {
                    return Err(LeadsError::DanglingReference {
                        column: column.id.to_string(),
                        id: id.to_string(),
                    });
                }
            }
        }

        for (key, card) in &self.cards {
            if key != &card.id {
                return Err(LeadsError::MismatchedCardKey {
                    key: key.to_string(),
                    id: card.id.to_string(),
                });
            }
            if !placed.contains(key) {
                return Err(LeadsError::OrphanedCard { id: key.to_string() });
            }
            card.validate()?;
        }

        Ok(())
    }
}
