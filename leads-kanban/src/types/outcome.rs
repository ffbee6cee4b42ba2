//! Result status of a board operation

use serde::Serialize;
use std::fmt;

/// What a board operation did.
///
/// Operations never fail: rapid pointer events can race with state updates,
/// so anything that refers to a card or column that is not (or no longer)
/// there is dropped. The status tells callers which case they hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The board changed
    Applied,
    /// The request was valid but the board already looked like that
    Unchanged,
    NoOpUnknownCard,
    NoOpUnknownColumn,
    /// A reorder sequence was not a permutation of the column
    NoOpInvalidSequence,
    /// An added card reused an existing id
    NoOpDuplicateCard,
    /// A card field value was rejected (negative or non-finite value)
    NoOpInvalidValue,
    /// A drag event arrived with no gesture in progress
    NoOpIdle,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    /// True for the statuses that indicate a stale or bad request
    pub fn is_rejected(self) -> bool {
        !matches!(self, Self::Applied | Self::Unchanged)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::NoOpUnknownCard => "unknown card",
            Self::NoOpUnknownColumn => "unknown column",
            Self::NoOpInvalidSequence => "invalid sequence",
            Self::NoOpDuplicateCard => "duplicate card",
            Self::NoOpInvalidValue => "invalid value",
            Self::NoOpIdle => "no gesture",
        };
        f.write_str(s)
    }
}
