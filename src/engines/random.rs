//! Uniform-random baseline agent.

use crate::core::{GameRng, GameState, Move, PlayerId};

use super::DecisionEngine;

/// Picks uniformly from the legal move set. Baseline and regression
/// control; also the rollout policy of last resort.
#[derive(Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    /// Seeded agent; the same seed replays the same choices.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl DecisionEngine for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, state: &GameState, _observer: PlayerId) -> Move {
        let moves = state.legal_moves();
        // Shooting yourself is always legal, so the set is never empty.
        self.rng.choose(&moves).copied().unwrap_or(Move::ShootSelf)
    }
}
