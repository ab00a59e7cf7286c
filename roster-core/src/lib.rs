pub mod service;
pub mod validation;

use std::sync::Arc;

use roster_database::PlayerStore;
use roster_utils::parse::InvalidId;
use thiserror::Error;

pub use service::PlayerService;

/// Failures surfaced to API callers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<InvalidId> for Error {
    fn from(err: InvalidId) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// Shared state handed to every request handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub players: PlayerService,
}

impl Data {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self {
            players: PlayerService::new(store),
        }
    }
}
