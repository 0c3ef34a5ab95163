//! Core game types: state machine, items, shells, configuration, errors.

pub mod action;
pub mod config;
pub mod effects;
pub mod error;
pub mod item;
pub mod player;
pub mod rng;
pub mod shells;
pub mod snapshot;
pub mod state;

pub use action::{Move, MoveRecord, Outcome};
pub use config::GameConfig;
pub use effects::{ActiveEffects, HandcuffState};
pub use error::GameError;
pub use item::{ItemInventory, ItemKind, MAX_CARRIED};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use shells::ShellSequence;
pub use snapshot::Snapshot;
pub use state::{GameState, TurnState};
