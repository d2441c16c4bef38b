// ── Homes store seam ──
//
// The scheduler reads home configuration through this trait once per
// cycle; the admin surface replaces the whole set. Implementations:
// the file-backed store in `thinqly-config`, and the in-memory store
// below for tests and ephemeral runs.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::HomeConfig;

#[derive(Debug, Error)]
pub enum HomesStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed homes file: {0}")]
    Malformed(String),
}

/// Keyed-record store of configured homes, read and replaced whole.
#[async_trait]
pub trait HomesStore: Send + Sync {
    /// All configured homes, in stored order.
    async fn list_homes(&self) -> Result<Vec<HomeConfig>, HomesStoreError>;

    /// Replace the full set of homes.
    async fn replace_homes(&self, homes: Vec<HomeConfig>) -> Result<(), HomesStoreError>;
}

/// In-memory homes store.
#[derive(Default)]
pub struct MemoryHomesStore {
    homes: RwLock<Vec<HomeConfig>>,
}

impl MemoryHomesStore {
    pub fn new(homes: Vec<HomeConfig>) -> Self {
        Self {
            homes: RwLock::new(homes),
        }
    }
}

#[async_trait]
impl HomesStore for MemoryHomesStore {
    async fn list_homes(&self) -> Result<Vec<HomeConfig>, HomesStoreError> {
        Ok(self.homes.read().await.clone())
    }

    async fn replace_homes(&self, homes: Vec<HomeConfig>) -> Result<(), HomesStoreError> {
        *self.homes.write().await = homes;
        Ok(())
    }
}
