use std::sync::Arc;

use anyhow::anyhow;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::filter::FilterState;
use crate::models::space::{SpaceCategory, StudySpace};
use crate::providers::space_provider::SpaceProvider;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    /// A refresh failed after a prior successful load; the previous
    /// catalog keeps being served.
    Stale,
}

/// Owns the current list of study spaces and the active filter selection.
///
/// The catalog is a single immutable snapshot behind a short lock; `load`
/// swaps the whole snapshot so readers see either the old list or the new
/// one, never a torn mix.
pub struct CatalogStore {
    provider: Arc<dyn SpaceProvider>,
    load_timeout: Duration,
    catalog: RwLock<Arc<Vec<StudySpace>>>,
    filter: RwLock<FilterState>,
    state: RwLock<LoadState>,
    changed: watch::Sender<u64>,
}

impl CatalogStore {
    pub fn new(provider: Arc<dyn SpaceProvider>, load_timeout: Duration) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            provider,
            load_timeout,
            catalog: RwLock::new(Arc::new(Vec::new())),
            filter: RwLock::new(FilterState::default()),
            state: RwLock::new(LoadState::Unloaded),
            changed,
        }
    }

    /// Refreshes the catalog from the provider. A failure (including
    /// timeout) leaves the previous catalog intact; the caller decides
    /// whether to retry.
    pub async fn load(&self) -> Result<(), StoreError> {
        if *self.state.read() == LoadState::Unloaded {
            *self.state.write() = LoadState::Loading;
        }

        let fetched = tokio::time::timeout(self.load_timeout, self.provider.fetch_spaces()).await;
        let result = match fetched {
            Ok(inner) => inner,
            Err(_) => Err(anyhow!("catalog load timed out after {:?}", self.load_timeout)),
        };

        match result {
            Ok(spaces) => {
                info!("Catalog refreshed with {} study spaces", spaces.len());
                *self.catalog.write() = Arc::new(spaces);
                *self.state.write() = LoadState::Ready;
                self.bump();
                Ok(())
            }
            Err(e) => {
                let retained = self.catalog.read().len();
                *self.state.write() = if retained > 0 {
                    LoadState::Stale
                } else {
                    LoadState::Unloaded
                };
                warn!("Catalog refresh failed, keeping {} stale spaces due to: {}", retained, e);
                Err(StoreError::LoadFailed(e))
            }
        }
    }

    /// Partial update of the held filter; `None` leaves a field untouched.
    pub fn set_filter(
        &self,
        category: Option<SpaceCategory>,
        quiet_only: Option<bool>,
        food_only: Option<bool>,
    ) {
        {
            let mut filter = self.filter.write();
            if let Some(category) = category {
                filter.category = category;
            }
            if let Some(quiet_only) = quiet_only {
                filter.quiet_only = quiet_only;
            }
            if let Some(food_only) = food_only {
                filter.food_only = food_only;
            }
        }
        self.bump();
    }

    pub fn filter(&self) -> FilterState {
        *self.filter.read()
    }

    /// Catalog entries matching the held filter, catalog order preserved.
    pub fn filtered(&self) -> Vec<StudySpace> {
        self.filtered_with(&self.filter())
    }

    /// Same predicate against an explicit filter, without touching store
    /// state. Used by the HTTP layer for per-request filters.
    pub fn filtered_with(&self, filter: &FilterState) -> Vec<StudySpace> {
        let snapshot = self.catalog.read().clone();
        snapshot
            .iter()
            .filter(|space| filter.matches(space))
            .cloned()
            .collect()
    }

    pub fn state(&self) -> LoadState {
        *self.state.read()
    }

    /// Receiver that ticks on every catalog replacement or filter change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn bump(&self) {
        self.changed.send_modify(|version| *version += 1);
    }
}
