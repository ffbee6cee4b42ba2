//! Derived statistics, computed from the board on every read

use crate::types::{BoardState, ColumnId};
use serde::Serialize;

/// Column id counted as converted leads
pub const WON_COLUMN: &str = "won";
/// Column id counted as dropped leads
pub const LOST_COLUMN: &str = "lost";

/// Per-column totals shown in the column header
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub count: usize,
    pub total_value: f64,
}

/// Pipeline-wide summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total_cards: usize,
    pub total_value: f64,
    /// `won / (won + lost)`; `None` until a lead has closed either way
    pub win_rate: Option<f64>,
}

/// Count and summed value of the cards in a column.
///
/// Ids that do not resolve to a card are skipped and a missing value counts
/// as zero. An unknown column reports zeros.
pub fn column_stats(board: &BoardState, column: &ColumnId) -> ColumnStats {
    let Some(column) = board.column(column) else {
        return ColumnStats::default();
    };
    column
        .card_ids
        .iter()
        .filter_map(|id| board.card(id))
        .fold(ColumnStats::default(), |acc, card| ColumnStats {
            count: acc.count + 1,
            total_value: acc.total_value + card.value_or_zero(),
        })
}

/// Totals across every column plus the win rate
pub fn board_stats(board: &BoardState) -> BoardStats {
    let (total_cards, total_value) = board
        .columns()
        .iter()
        .map(|c| column_stats(board, &c.id))
        .fold((0, 0.0), |(n, v), s| (n + s.count, v + s.total_value));

    let won = column_stats(board, &ColumnId::from(WON_COLUMN)).count;
    let lost = column_stats(board, &ColumnId::from(LOST_COLUMN)).count;
    let closed = won + lost;

    BoardStats {
        total_cards,
        total_value,
        win_rate: (closed > 0).then(|| won as f64 / closed as f64),
    }
}
