//! Built-in starter board used when nothing has been persisted yet.
//!
//! The seed lives in `builtin/seed.yaml` and is compiled into the crate.

use crate::error::Result;
use crate::types::BoardState;

const SEED_YAML: &str = include_str!("../builtin/seed.yaml");

/// Number of cards on the seed board
pub const SEED_CARD_COUNT: usize = 8;

/// Pipeline stages, in board order
pub const DEFAULT_COLUMNS: [(&str, &str); 5] = [
    ("new", "New Leads"),
    ("qualified", "Qualified"),
    ("negotiation", "Negotiation"),
    ("won", "Won"),
    ("lost", "Lost"),
];

/// Parse the builtin seed board
pub fn parse_seed() -> Result<BoardState> {
    Ok(serde_yaml_ng::from_str(SEED_YAML)?)
}

/// The deterministic seed board.
///
/// Falls back to the default columns with no cards if the embedded seed
/// cannot be parsed.
pub fn seed_board() -> BoardState {
    parse_seed().unwrap_or_else(|e| {
        tracing::error!("builtin seed board is invalid, starting empty: {}", e);
        empty_board()
    })
}

/// The default columns with no cards
pub fn empty_board() -> BoardState {
    BoardState::with_columns(DEFAULT_COLUMNS)
}
