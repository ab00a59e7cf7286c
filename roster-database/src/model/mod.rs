pub mod filter;
pub mod player;

pub use filter::{PageRequest, PlayerCriteria, PlayerFilter, PlayerOrder, Predicate};
pub use player::{
    Field, NewPlayer, Player, PlayerChanges, PlayerPatch, PlayerRecord, Profession, Race,
};
