use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use roster_core::Data;
use roster_database::model::PlayerFilter;
use roster_utils::parse::InvalidId;

use crate::players::params::PlayerQuery;
use crate::{ApiError, RouteMeta};

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/players/count",
    desc: "Count every player matching the filter, ignoring paging.",
};

pub async fn count_players(
    State(data): State<Data>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Json<i64>, ApiError> {
    let Query(query) = query?;

    let filter = PlayerFilter::from_criteria(query.criteria()?);
    Ok(Json(data.players.count(&filter).await?))
}

/// `count` in an id position is rejected the way any non-numeric id is.
pub async fn count_as_id() -> ApiError {
    InvalidId::NotANumber.into()
}
