//! Persistence gateway: load with seed fallback, debounced saves
//!
//! Drag-over feedback mutates the board many times a second. Each `save`
//! snapshots the board right away but only writes it once no further save
//! has arrived for the debounce window, so a burst becomes one write holding
//! the last state. The timer belongs to the gateway instance; two boards
//! never share one.
//!
//! Nothing here fails outward. Read, parse and write errors are logged and
//! the in-memory board stays authoritative for the session.

use crate::config::BoardConfig;
use crate::context::{FileStore, KeyValueStore, MemoryStore};
use crate::seed::seed_board;
use crate::types::BoardState;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// A snapshot waiting for its quiet period to elapse
struct PendingSave {
    payload: Arc<String>,
    /// `None` when no runtime was available to schedule the timer
    timer: Option<JoinHandle<()>>,
}

impl PendingSave {
    fn is_written(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| t.is_finished())
    }
}

/// Loads and saves one board document
pub struct BoardPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
    debounce: Duration,
    pending: Option<PendingSave>,
}

impl BoardPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, debounce: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            debounce,
            pending: None,
        }
    }

    /// Build from config: a file store under `storage_dir`, or an
    /// in-memory store when `in_memory` is set.
    pub fn from_config(config: &BoardConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = if config.in_memory {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::new(&config.storage_dir))
        };
        Self::with_store(store, config)
    }

    /// Use the given store with the key and window from config
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: &BoardConfig) -> Self {
        Self::new(store, config.storage_key.clone(), config.debounce())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read the stored board. Absent, unreadable or malformed data yields
    /// the seed board.
    pub async fn load(&self) -> BoardState {
        let text = match self.store.read(&self.key).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("No stored board under '{}', using seed", self.key);
                return seed_board();
            }
            Err(e) => {
                error!("Failed to read board '{}', using seed: {}", self.key, e);
                return seed_board();
            }
        };

        match serde_json::from_str::<BoardState>(&text) {
            Ok(state) => {
                debug!(
                    key = %self.key,
                    columns = state.columns().len(),
                    cards = state.card_count(),
                    "Loaded stored board"
                );
                state
            }
            Err(e) => {
                warn!("Stored board '{}' is malformed, using seed: {}", self.key, e);
                seed_board()
            }
        }
    }

    /// Schedule a write of `state` after the debounce window, replacing any
    /// write still waiting.
    pub fn save(&mut self, state: &BoardState) {
        let payload = match serde_json::to_string(state) {
            Ok(json) => Arc::new(json),
            Err(e) => {
                error!("Failed to serialize board '{}': {}", self.key, e);
                return;
            }
        };

        let previous = self.pending.take().and_then(|p| p.timer);
        if let Some(timer) = &previous {
            timer.abort();
        }

        let timer = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let store = Arc::clone(&self.store);
                let key = self.key.clone();
                let debounce = self.debounce;
                let payload = Arc::clone(&payload);
                Some(runtime.spawn(async move {
                    if let Some(previous) = previous {
                        let _ = previous.await;
                    }
                    tokio::time::sleep(debounce).await;
                    write_logged(store.as_ref(), &key, &payload).await;
                }))
            }
            Err(_) => {
                warn!("No async runtime; board '{}' will be written on flush", self.key);
                None
            }
        };

        self.pending = Some(PendingSave { payload, timer });
    }

    /// True while a saved snapshot has not reached the store yet
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_written())
    }

    /// Write the waiting snapshot now instead of after the window
    pub async fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if pending.is_written() {
            return;
        }
        if let Some(timer) = pending.timer {
            timer.abort();
            // A write already in progress still holds the store lock until
            // the cancelled task is dropped
            let _ = timer.await;
        }
        write_logged(self.store.as_ref(), &self.key, &pending.payload).await;
    }
}

async fn write_logged(store: &dyn KeyValueStore, key: &str, payload: &str) {
    match store.write(key, payload).await {
        Ok(()) => debug!(key, bytes = payload.len(), "Board saved"),
        Err(e) => error!("Failed to save board '{}': {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SEED_CARD_COUNT;
    use crate::types::{Card, Column};
    use chrono::{TimeZone, Utc};
    use tracing_test::traced_test;

    const KEY: &str = "board";

    fn gateway(store: &Arc<MemoryStore>) -> BoardPersistence {
        BoardPersistence::new(store.clone(), KEY, Duration::from_millis(250))
    }

    fn small_board(title: &str) -> BoardState {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut new = Column::new("new", "New");
        new.card_ids = vec!["1".into()];
        BoardState::from_parts(
            vec![new],
            vec![Card::new("1", title).with_updated_at(stamp)],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_absent_returns_seed() {
        let store = Arc::new(MemoryStore::new());
        let board = gateway(&store).load().await;
        assert_eq!(board.columns().len(), 5);
        assert_eq!(board.card_count(), SEED_CARD_COUNT);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_load_malformed_returns_seed() {
        let store = Arc::new(MemoryStore::new().with_entry(KEY, "{not json"));
        let board = gateway(&store).load().await;
        assert_eq!(board.card_count(), SEED_CARD_COUNT);
        assert!(logs_contain("malformed"));
    }

    #[tokio::test]
    async fn test_load_structurally_invalid_returns_seed() {
        let bad = r#"{"columns":[{"id":"new","title":"New","cardIds":["1","1"]}],"cards":{"1":{"id":"1","title":"T","updatedAt":"2024-01-01T00:00:00Z"}}}"#;
        let store = Arc::new(MemoryStore::new().with_entry(KEY, bad));
        assert_eq!(gateway(&store).load().await.card_count(), SEED_CARD_COUNT);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_load_read_error_returns_seed() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        assert_eq!(gateway(&store).load().await.card_count(), SEED_CARD_COUNT);
        assert!(logs_contain("Failed to read board"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_waits_for_quiet_period() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = gateway(&store);

        gateway.save(&small_board("A"));
        assert!(gateway.has_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.writes(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.writes(), 1);
        assert!(!gateway.has_pending());

        let loaded = gateway.load().await;
        assert_eq!(loaded, small_board("A"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_saves_coalesce_to_last() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = gateway(&store);

        for i in 0..20 {
            gateway.save(&small_board(&format!("v{i}")));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(store.writes(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.writes(), 1);
        assert_eq!(gateway.load().await, small_board("v19"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_saves_after_window_write_separately() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = gateway(&store);

        gateway.save(&small_board("A"));
        tokio::time::sleep(Duration::from_millis(300)).await;
        gateway.save(&small_board("B"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.writes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instances_do_not_share_timers() {
        let store_a = Arc::new(MemoryStore::new());
        let store_b = Arc::new(MemoryStore::new());
        let mut a = gateway(&store_a);
        let mut b = gateway(&store_b);

        a.save(&small_board("A"));
        b.save(&small_board("B"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store_a.writes(), 1);
        assert_eq!(store_b.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = gateway(&store);

        gateway.save(&small_board("A"));
        gateway.flush().await;
        assert_eq!(store.writes(), 1);
        assert!(!gateway.has_pending());

        // The aborted timer must not write a second time
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.writes(), 1);

        // Nothing pending: flush is a no-op
        gateway.flush().await;
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_write_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let mut gateway = gateway(&store);

        gateway.save(&small_board("A"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.writes(), 0);
        assert!(!gateway.has_pending());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_flush_failure_is_logged_not_raised() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let mut gateway = gateway(&store);

        gateway.save(&small_board("A"));
        gateway.flush().await;

        assert_eq!(store.writes(), 0);
        assert!(logs_contain("Failed to save board"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_flush_during_timer_write_keeps_last_state() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp.path()));
        let window = Duration::from_millis(5);
        let mut gateway = BoardPersistence::new(store.clone(), KEY, window);

        for round in 0..200u64 {
            let board = small_board(&format!("round {round}"));
            gateway.save(&board);
            // Land the flush on either side of the timer firing
            tokio::time::sleep(window + Duration::from_micros(round % 7 * 300)).await;
            gateway.flush().await;

            let stored = store.read(KEY).await.unwrap().unwrap();
            let stored: BoardState = serde_json::from_str(&stored).unwrap();
            assert_eq!(stored, board, "round {round} lost its final state");
        }
    }

    #[test]
    fn test_save_without_runtime_defers_to_flush() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = gateway(&store);
        gateway.save(&small_board("A"));
        assert!(gateway.has_pending());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(gateway.flush());
        assert_eq!(store.writes(), 1);
    }
}
