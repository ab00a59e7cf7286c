use axum::extract::{Path, State};
use axum::http::StatusCode;

use roster_core::Data;
use roster_utils::parse::parse_player_id;

use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "DELETE",
    path: "/players/{id}",
    desc: "Delete a player.",
};

pub async fn delete_player(
    State(data): State<Data>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_player_id(&raw_id)?;
    data.players.delete(id).await?;
    Ok(StatusCode::OK)
}
