use std::sync::Arc;

use tracing::{debug, info};

use roster_database::PlayerStore;
use roster_database::model::{
    NewPlayer, PageRequest, Player, PlayerFilter, PlayerOrder, PlayerPatch,
};

use crate::Error;
use crate::validation::{validate_new_player, validate_patch};

const PLAYER_NOT_FOUND: &str = "Player is not found";

/// Player operations on top of a [`PlayerStore`].
#[derive(Clone, Debug)]
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<Player, Error> {
        self.store
            .fetch(id)
            .await?
            .ok_or_else(|| Error::not_found(PLAYER_NOT_FOUND))
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        if !self.store.remove(id).await? {
            return Err(Error::not_found(PLAYER_NOT_FOUND));
        }

        info!(player_id = id, "player deleted");
        Ok(())
    }

    pub async fn create(&self, payload: NewPlayer) -> Result<Player, Error> {
        let record = validate_new_player(payload)?;
        let player = self.store.insert(&record).await?;

        info!(player_id = player.id, level = player.level, "player created");
        Ok(player)
    }

    /// Existence is checked before the payload is validated, so an unknown id
    /// wins over a bad body.
    pub async fn update(&self, id: i64, patch: PlayerPatch) -> Result<Player, Error> {
        let current = self.get(id).await?;

        let fields = patch.present_fields();
        let changes = validate_patch(patch)?;
        if changes.is_empty() {
            debug!(player_id = id, "update without changes");
            return Ok(current);
        }

        let player = self
            .store
            .apply(id, &changes)
            .await?
            .ok_or_else(|| Error::not_found(PLAYER_NOT_FOUND))?;

        info!(player_id = id, ?fields, "player updated");
        Ok(player)
    }

    pub async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> Result<Vec<Player>, Error> {
        let players = self.store.list(filter, order, page).await?;

        debug!(
            predicates = filter.predicates().len(),
            ?order,
            page = page.number,
            size = page.size,
            returned = players.len(),
            "players listed"
        );
        Ok(players)
    }

    pub async fn count(&self, filter: &PlayerFilter) -> Result<i64, Error> {
        Ok(self.store.count(filter).await?)
    }
}
