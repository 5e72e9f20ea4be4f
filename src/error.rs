use thiserror::Error;

/// Failure taxonomy for the stores. Every variant is recoverable at the
/// caller's discretion; none is fatal to the process.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Catalog refresh failed. The previous catalog stays available.
    #[error("catalog load failed: {0}")]
    LoadFailed(anyhow::Error),

    /// History write to the backing store failed. The in-memory view
    /// remains authoritative for the session.
    #[error("history persistence write failed: {0}")]
    PersistenceWriteFailed(anyhow::Error),

    /// Geocoding/directions backend unreachable.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(anyhow::Error),
}
