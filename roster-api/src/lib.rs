pub mod error;
pub mod players;
pub mod utility;

use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use tracing::debug;

use roster_core::Data;

pub use error::ApiError;

pub struct RouteMeta {
    pub method: &'static str,
    pub path: &'static str,
    pub desc: &'static str,
}

pub const ROUTES: &[RouteMeta] = &[
    utility::health::META,
    players::list::META,
    players::count::META,
    players::create::META,
    players::show::META,
    players::update::META,
    players::delete::META,
];

/// All routes, relative to the mount point.
pub fn router(data: Data) -> Router {
    Router::new()
        .route("/health", get(utility::health::health))
        .route(
            "/players",
            get(players::list::list_players).post(players::create::create_player),
        )
        .route(
            "/players/count",
            get(players::count::count_players)
                .post(players::count::count_as_id)
                .delete(players::count::count_as_id),
        )
        .route(
            "/players/:id",
            get(players::show::show_player)
                .post(players::update::update_player)
                .delete(players::delete::delete_player),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(data)
}

/// Mount [`router`] under `base_path` (`""` or `"/"` mounts at the root).
pub fn app(data: Data, base_path: &str) -> Router {
    let base_path = base_path.trim().trim_end_matches('/');
    if base_path.is_empty() {
        return router(data);
    }

    let base_path = if base_path.starts_with('/') {
        base_path.to_owned()
    } else {
        format!("/{base_path}")
    };

    Router::new().nest(&base_path, router(data))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request handled"
    );
    response
}
