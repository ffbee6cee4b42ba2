//! Display filtering by a search string.
//!
//! Filtering only decides which cards are shown; stored order is untouched.

use crate::types::{BoardState, Card, CardId, ColumnId};

/// Cards visible in one column after filtering, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredColumn {
    pub id: ColumnId,
    pub card_ids: Vec<CardId>,
}

/// Case-insensitive match against title, company, owner name and tags
pub fn matches(card: &Card, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hit = |s: &str| s.to_lowercase().contains(&needle);

    hit(card.title.as_str())
        || card.company.as_deref().is_some_and(hit)
        || card.owner.as_ref().is_some_and(|o| hit(o.name.as_str()))
        || card.tags.iter().any(|t| hit(t.as_str()))
}

/// Visible card ids per column for a search string
pub fn filter_board(board: &BoardState, query: &str) -> Vec<FilteredColumn> {
    board
        .columns()
        .iter()
        .map(|column| FilteredColumn {
            id: column.id.clone(),
            card_ids: column
                .card_ids
                .iter()
                .filter(|id| board.card(id).is_some_and(|card| matches(card, query)))
                .cloned()
                .collect(),
        })
        .collect()
}
