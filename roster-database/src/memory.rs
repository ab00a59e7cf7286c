use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{PageRequest, Player, PlayerChanges, PlayerFilter, PlayerOrder, PlayerRecord};
use crate::store::PlayerStore;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    players: BTreeMap<i64, Player>,
}

/// Process-local player store. Ids are assigned sequentially from 1.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn matching(&self, filter: &PlayerFilter) -> Vec<Player> {
        let state = self.state.read().await;
        state
            .players
            .values()
            .filter(|player| filter.matches(player))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn insert(&self, record: &PlayerRecord) -> anyhow::Result<Player> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let player = record.clone().into_player(state.last_id);
        state.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn fetch(&self, id: i64) -> anyhow::Result<Option<Player>> {
        let state = self.state.read().await;
        Ok(state.players.get(&id).cloned())
    }

    async fn apply(&self, id: i64, changes: &PlayerChanges) -> anyhow::Result<Option<Player>> {
        let mut state = self.state.write().await;
        let Some(player) = state.players.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(player);
        Ok(Some(player.clone()))
    }

    async fn remove(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.players.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Player>> {
        let mut rows = self.matching(filter).await;
        rows.sort_by(|left, right| order.compare(left, right));
        Ok(page.slice(&rows))
    }

    async fn count(&self, filter: &PlayerFilter) -> anyhow::Result<i64> {
        let rows = self.matching(filter).await;
        Ok(i64::try_from(rows.len())?)
    }
}
