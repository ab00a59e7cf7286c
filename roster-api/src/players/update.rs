use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use roster_core::Data;
use roster_database::model::{Player, PlayerPatch};
use roster_utils::parse::parse_player_id;

use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "POST",
    path: "/players/{id}",
    desc: "Partially update a player; omitted or null fields are left unchanged.",
};

pub async fn update_player(
    State(data): State<Data>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PlayerPatch>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_player_id(&raw_id)?;
    let Json(patch) = payload?;
    Ok(Json(data.players.update(id, patch).await?))
}
