//! Persistence of already-notified posting identities.
//!
//! The seen-store only ever grows: identities are added after a digest has
//! been delivered and never removed.
//!
//! ```text
//! storage/
//! ├── config.toml           # Sources, filters and delivery settings
//! └── seen.json             # Sorted JSON array of identities
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SeenSet;

pub use local::LocalSeenStore;

/// Backend holding the seen-set between runs.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Load the persisted set. A missing or unreadable state yields an empty
    /// set; this never fails.
    async fn load(&self) -> SeenSet;

    /// Replace the persisted set.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}
