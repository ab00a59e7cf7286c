use axum::Json;
use axum::extract::{Path, State};

use roster_core::Data;
use roster_database::model::Player;
use roster_utils::parse::parse_player_id;

use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/players/{id}",
    desc: "Fetch a single player.",
};

pub async fn show_player(
    State(data): State<Data>,
    Path(raw_id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_player_id(&raw_id)?;
    Ok(Json(data.players.get(id).await?))
}
