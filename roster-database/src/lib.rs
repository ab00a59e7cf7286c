pub mod cache;
pub mod database;
pub mod impls;
pub mod memory;
pub mod model;
pub mod store;

pub use cache::CacheService;
pub use database::{DEFAULT_PLAYER_CACHE_TTL, Database, MIGRATOR};
pub use memory::MemoryStore;
pub use store::PlayerStore;
