use async_trait::async_trait;

use crate::model::{PageRequest, Player, PlayerChanges, PlayerFilter, PlayerOrder, PlayerRecord};

/// Persistence seam for player records.
///
/// Implemented by the PostgreSQL [`Database`](crate::Database) handle and by
/// [`MemoryStore`](crate::MemoryStore).
#[async_trait]
pub trait PlayerStore: Send + Sync + std::fmt::Debug {
    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, record: &PlayerRecord) -> anyhow::Result<Player>;

    async fn fetch(&self, id: i64) -> anyhow::Result<Option<Player>>;

    /// Apply `changes` atomically. Returns `None` when the id does not exist.
    async fn apply(&self, id: i64, changes: &PlayerChanges) -> anyhow::Result<Option<Player>>;

    /// Returns whether a record was removed.
    async fn remove(&self, id: i64) -> anyhow::Result<bool>;

    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Player>>;

    async fn count(&self, filter: &PlayerFilter) -> anyhow::Result<i64>;
}
