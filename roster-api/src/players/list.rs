use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use roster_core::Data;
use roster_database::model::{Player, PlayerFilter};

use crate::players::params::PlayerQuery;
use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/players",
    desc: "List players matching the filter, sorted and paged.",
};

pub async fn list_players(
    State(data): State<Data>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let Query(query) = query?;

    let filter = PlayerFilter::from_criteria(query.criteria()?);
    let order = query.order()?;
    let page = query.page()?;

    Ok(Json(data.players.list(&filter, order, page).await?))
}
