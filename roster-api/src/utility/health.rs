use axum::http::StatusCode;

use crate::RouteMeta;

pub const META: RouteMeta = RouteMeta {
    method: "GET",
    path: "/health",
    desc: "Liveness probe.",
};

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
