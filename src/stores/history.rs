use std::sync::Arc;

use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::search_history::SearchHistoryEntry;
use crate::models::space::Coordinate;
use crate::repositories::HistoryRepository;

/// Deduplicated, recency-ordered record of past location searches.
///
/// The in-memory list is authoritative for the session; the repository is
/// only a durability collaborator. All upserts go through one mutex, so
/// two concurrent searches for the same name can never produce two rows —
/// the later timestamp simply wins.
pub struct SearchHistoryStore {
    repository: Arc<dyn HistoryRepository>,
    // Kept in insertion order; list() sorts a copy.
    entries: Mutex<Vec<SearchHistoryEntry>>,
    changed: watch::Sender<u64>,
}

impl SearchHistoryStore {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            repository,
            entries: Mutex::new(Vec::new()),
            changed,
        }
    }

    /// Pulls persisted entries at startup. On failure the store simply
    /// starts empty for this session.
    pub async fn hydrate(&self) -> anyhow::Result<()> {
        let persisted = self.repository.load_history().await?;
        info!("Hydrated search history with {} entries", persisted.len());
        let mut entries = self.entries.lock();
        // Repository returns newest first; store oldest-first so later
        // inserts keep appending in arrival order.
        *entries = persisted.into_iter().rev().collect();
        drop(entries);
        self.bump();
        Ok(())
    }

    pub async fn record_search(
        &self,
        name: &str,
        coordinate: Coordinate,
    ) -> Result<(), StoreError> {
        self.record_search_at(name, coordinate, OffsetDateTime::now_utc())
            .await
    }

    /// Upsert with an explicit instant. The in-memory update happens
    /// first and sticks regardless of whether the persistence write
    /// succeeds.
    pub async fn record_search_at(
        &self,
        name: &str,
        coordinate: Coordinate,
        timestamp: OffsetDateTime,
    ) -> Result<(), StoreError> {
        let entry = {
            let mut entries = self.entries.lock();
            match entries.iter_mut().find(|e| e.name == name) {
                Some(existing) => {
                    existing.coordinate = coordinate;
                    existing.timestamp = timestamp;
                    existing.clone()
                }
                None => {
                    let entry = SearchHistoryEntry {
                        name: name.to_string(),
                        coordinate,
                        timestamp,
                    };
                    entries.push(entry.clone());
                    entry
                }
            }
        };
        self.bump();

        if let Err(e) = self.repository.upsert_search(&entry).await {
            warn!("Failed to persist search history entry '{}' due to: {}", entry.name, e);
            return Err(StoreError::PersistenceWriteFailed(e));
        }

        Ok(())
    }

    /// Entries ordered most recent first; equal timestamps keep their
    /// insertion order (stable sort).
    pub fn list(&self) -> Vec<SearchHistoryEntry> {
        let mut entries = self.entries.lock().clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn bump(&self) {
        self.changed.send_modify(|version| *version += 1);
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;

    /// Keeps upserted entries in memory, newest first on read.
    struct MemoryRepo {
        rows: Mutex<Vec<SearchHistoryEntry>>,
    }

    impl MemoryRepo {
        fn new(rows: Vec<SearchHistoryEntry>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }
    }

    #[async_trait]
    impl HistoryRepository for MemoryRepo {
        async fn upsert_search(&self, entry: &SearchHistoryEntry) -> anyhow::Result<()> {
            let mut rows = self.rows.lock();
            match rows.iter_mut().find(|r| r.name == entry.name) {
                Some(existing) => *existing = entry.clone(),
                None => rows.push(entry.clone()),
            }
            Ok(())
        }

        async fn load_history(&self) -> anyhow::Result<Vec<SearchHistoryEntry>> {
            let mut rows = self.rows.lock().clone();
            rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(rows)
        }
    }

    /// Repository whose writes always fail.
    struct BrokenRepo;

    #[async_trait]
    impl HistoryRepository for BrokenRepo {
        async fn upsert_search(&self, _entry: &SearchHistoryEntry) -> anyhow::Result<()> {
            Err(anyhow!("disk on fire"))
        }

        async fn load_history(&self) -> anyhow::Result<Vec<SearchHistoryEntry>> {
            Err(anyhow!("disk on fire"))
        }
    }

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    fn memory_store() -> SearchHistoryStore {
        SearchHistoryStore::new(Arc::new(MemoryRepo::new(Vec::new())))
    }

    #[tokio::test]
    async fn empty_history_lists_empty() {
        let store = memory_store();
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn re_recording_same_name_keeps_one_entry_with_latest_timestamp() {
        let store = memory_store();
        let c = coord(42.3389, -71.0887);
        let first = datetime!(2024-11-17 10:00 UTC);
        let second = datetime!(2024-11-17 10:05 UTC);

        store.record_search_at("Snell Library", c, first).await.unwrap();
        store.record_search_at("Snell Library", c, second).await.unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Snell Library");
        assert_eq!(entries[0].timestamp, second);
    }

    #[tokio::test]
    async fn re_recording_moves_entry_to_front() {
        let store = memory_store();

        store
            .record_search_at("A", coord(1.0, 1.0), datetime!(2024-11-17 10:00 UTC))
            .await
            .unwrap();
        store
            .record_search_at("B", coord(2.0, 2.0), datetime!(2024-11-17 10:01 UTC))
            .await
            .unwrap();
        store
            .record_search_at("A", coord(1.0, 1.0), datetime!(2024-11-17 10:02 UTC))
            .await
            .unwrap();

        let entries = store.list();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let store = memory_store();
        let ts = datetime!(2024-11-17 10:00 UTC);

        store.record_search_at("A", coord(1.0, 1.0), ts).await.unwrap();
        store.record_search_at("B", coord(2.0, 2.0), ts).await.unwrap();

        let entries = store.list();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn persistence_failure_keeps_in_memory_entry() {
        let store = SearchHistoryStore::new(Arc::new(BrokenRepo));

        let err = store
            .record_search_at("Snell Library", coord(42.3389, -71.0887), datetime!(2024-11-17 10:00 UTC))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PersistenceWriteFailed(_)));

        let entries = store.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Snell Library");
    }

    #[tokio::test]
    async fn hydrate_restores_persisted_entries() {
        let repo = Arc::new(MemoryRepo::new(vec![
            SearchHistoryEntry {
                name: "B".to_string(),
                coordinate: coord(2.0, 2.0),
                timestamp: datetime!(2024-11-17 10:01 UTC),
            },
            SearchHistoryEntry {
                name: "A".to_string(),
                coordinate: coord(1.0, 1.0),
                timestamp: datetime!(2024-11-17 10:00 UTC),
            },
        ]));
        let store = SearchHistoryStore::new(repo);

        store.hydrate().await.unwrap();

        let entries = store.list();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn recording_notifies_subscribers() {
        let store = memory_store();
        let mut rx = store.subscribe();
        let initial = *rx.borrow_and_update();

        store
            .record_search_at("A", coord(1.0, 1.0), datetime!(2024-11-17 10:00 UTC))
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), initial + 1);
    }
}
