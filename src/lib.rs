//! # buckshot
//!
//! Decision core for a turn-based, partial-information elimination game
//! played over a hidden shell sequence with single-use items.
//!
//! ## Design Principles
//!
//! 1. **Pure stepping**: `GameState::apply` is a pure function from
//!    `(state, move)` to `(outcome, new state)`. States are cheap value
//!    types, usable directly as search nodes and cache keys.
//!
//! 2. **Injected randomness**: every random draw (shuffles, reveal
//!    indices, coin flips) flows through a seeded, forkable `GameRng`, so
//!    games and searches replay deterministically.
//!
//! 3. **Per-engine knowledge**: the state tracks only *public* chamber
//!    knowledge; each engine keeps its own `ShellMemory` of private
//!    reveals, fed by orchestrator observations.
//!
//! ## Modules
//!
//! - `core`: state machine, items, shells, effects, config, errors,
//!   snapshots
//! - `oracle`: hypergeometric PMFs, bundle enumeration, memoized
//!   expected values
//! - `engines`: decision strategies from uniform-random to omniscient
//!   vote aggregation
//! - `session`: turn orchestration, reloads, win detection, experiments

pub mod core;
pub mod engines;
pub mod oracle;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ActiveEffects, GameConfig, GameError, GameRng, GameRngState, GameState, HandcuffState,
    ItemInventory, ItemKind, Move, MoveRecord, Outcome, PlayerId, PlayerMap, ShellSequence,
    Snapshot, TurnState, MAX_CARRIED,
};

pub use crate::oracle::{
    binomial, conditioned_draw_pmf, enumerate_bundles, hypergeometric_pmf, is_valid_bundle,
    shot_pool, Bundle, ShellOracle, SHOT_SHAPING,
};

pub use crate::engines::{
    DecisionEngine, ExactExpectationAgent, HeuristicAgent, Observation, OmniscientSearchAgent,
    RandomAgent, SearchAgent, SearchConfig, ShellMemory,
};

pub use crate::session::Session;
