use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use roster_core::Data;
use roster_database::model::{NewPlayer, Player};

use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "POST",
    path: "/players",
    desc: "Create a player; level fields are derived from experience.",
};

pub async fn create_player(
    State(data): State<Data>,
    payload: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(data.players.create(payload).await?))
}
