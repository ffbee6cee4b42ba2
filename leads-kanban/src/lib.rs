//! Pipeline board engine for the leads kanban
//!
//! This crate holds the state behind a sales-pipeline board: an ordered set of
//! stage columns, each an ordered sequence of lead cards, plus the operations
//! that move, reorder, add, edit and delete cards. A UI host drives it with
//! pointer or keyboard events and renders the snapshots it publishes.
//!
//! ## Overview
//!
//! - **Total operations** - Every operation returns an [`Outcome`]. Stale or
//!   malformed requests are reported as a no-op status and never corrupt the board.
//! - **One home per card** - Each card sits in exactly one column, once. The
//!   invariant is checked whenever a board is deserialized.
//! - **Debounced saves** - Bursts of changes (drag feedback) reach the store as
//!   a single write once the board has been quiet for the configured window.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use leads_kanban::{BoardConfig, KanbanBoard, Outcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::load()?;
//! let mut board = KanbanBoard::from_config(&config).await;
//!
//! let outcome = board.move_card("lead-001", "new", "qualified", 0);
//! assert_eq!(outcome, Outcome::Applied);
//!
//! let stats = board.column_stats(&"qualified".into());
//! println!("{} leads worth {}", stats.count, stats.total_value);
//!
//! board.flush().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Stored document
//!
//! ```text
//! {
//!   "columns": [ { "id": "new", "title": "New Leads", "cardIds": ["lead-001", ...] }, ... ],
//!   "cards":   { "lead-001": { "id": "lead-001", "title": ..., "updatedAt": ... }, ... }
//! }
//! ```

mod board;
mod command;
mod config;
mod context;
mod error;
mod persist;

pub mod card;
pub mod column;
pub mod drag;
pub mod filter;
pub mod format;
pub mod seed;
pub mod stats;
pub mod types;

pub use async_trait::async_trait;

pub use board::KanbanBoard;
pub use command::Command;
pub use config::{
    BoardConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY, ENV_PREFIX,
};
pub use context::{FileStore, KeyValueStore, MemoryStore, StoreLock};
pub use drag::{CancelPolicy, DragGesture, DropTarget, Nudge};
pub use error::{LeadsError, Result};
pub use persist::BoardPersistence;
pub use stats::{BoardStats, ColumnStats};

// Re-export commonly used types
pub use types::{
    BoardSnapshot, BoardState, Card, CardId, CardPatch, Column, ColumnId, Outcome, Owner,
    Priority, Slot,
};
