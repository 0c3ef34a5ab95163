//! Decision engines: strategies that pick a move for the acting player.
//!
//! All engines expose the same capability surface and differ only in how
//! much of the probability/search machinery they bring to bear:
//!
//! - [`RandomAgent`]: uniform over legal moves (baseline/control).
//! - [`HeuristicAgent`]: fixed priority list over items, then a
//!   knowledge-driven shot.
//! - [`ExactExpectationAgent`]: exact bundle expectations via the oracle.
//! - [`SearchAgent`]: expectimax over count-space belief states with a
//!   transposition cache.
//! - [`OmniscientSearchAgent`]: perfect-information search per consistent
//!   arrangement, aggregated by vote.
//!
//! Knowledge is per-engine, not shared: engines that track reveals carry
//! their own [`ShellMemory`], fed by the orchestrator's `observe` calls.

pub mod expectation;
pub mod heuristic;
pub mod memory;
pub mod omniscient;
pub mod random;
pub mod search;

pub use expectation::ExactExpectationAgent;
pub use heuristic::HeuristicAgent;
pub use memory::ShellMemory;
pub use omniscient::OmniscientSearchAgent;
pub use random::RandomAgent;
pub use search::{SearchAgent, SearchConfig};

use crate::core::{GameState, Move, Outcome, PlayerId};

/// A resolved move as seen by an observer.
///
/// The outcome is `None` when it was private to the actor (a burner-phone
/// reveal seen by someone else).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    /// Who acted.
    pub actor: PlayerId,
    /// The move taken.
    pub mv: Move,
    /// The visible outcome, if any.
    pub outcome: Option<Outcome>,
}

/// A move-selection strategy.
///
/// Engines must filter through [`GameState::legal_moves`]; returning a move
/// outside that set is an engine defect and is rejected by the state
/// machine, not recovered from.
pub trait DecisionEngine: Send {
    /// Short stable name for logs and experiment tables.
    fn name(&self) -> &'static str;

    /// Pick a move for `observer`, who is the acting player.
    fn choose(&mut self, state: &GameState, observer: PlayerId) -> Move;

    /// Notification of a resolved move (the observer's own or anyone
    /// else's). Default: ignore.
    fn observe(&mut self, _state: &GameState, _obs: &Observation) {}

    /// Notification that a fresh sequence was loaded. Default: ignore.
    fn reloaded(&mut self, _state: &GameState) {}
}
