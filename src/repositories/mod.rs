use async_trait::async_trait;

use crate::models::search_history::SearchHistoryEntry;

pub mod postgres_repo;

/// Durability collaborator for the search history. The store only needs
/// upsert-by-name and an ordered read; how the rows are kept is the
/// backend's business.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn upsert_search(&self, entry: &SearchHistoryEntry) -> anyhow::Result<()>;

    /// Persisted entries, most recent first.
    async fn load_history(&self) -> anyhow::Result<Vec<SearchHistoryEntry>>;
}
