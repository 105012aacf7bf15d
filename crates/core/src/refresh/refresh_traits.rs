use async_trait::async_trait;

use super::refresh_model::Snapshot;
use crate::errors::Result;

/// Produces a complete snapshot. Implementations should only fail when the
/// cycle as a whole cannot produce one; per-asset failures belong inside the
/// snapshot as absent values.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load_snapshot(&self) -> Result<Snapshot>;
}
