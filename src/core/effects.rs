//! Transient table-wide effects that modify the next resolution.
//!
//! Effects are shared by the whole table (not per-player), exactly one
//! resolution deep, and reset wholesale on reload.

use serde::{Deserialize, Serialize};

/// Lifecycle of a handcuff use within a round.
///
/// Replaces the source material's fractional "half used" counter with an
/// explicit three-state machine:
/// - `Inactive`: handcuffs may be played.
/// - `PendingSecondShot`: an extra shot is owed to the shooter before the
///   turn passes. Survives a self-shot that misses.
/// - `Consumed`: the extra shot was granted; no further cuffing until the
///   next reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandcuffState {
    /// No cuff in play.
    #[default]
    Inactive,
    /// The next qualifying shot grants the shooter one extra shot.
    PendingSecondShot,
    /// The extra shot has been granted; cuffs are spent for this round.
    Consumed,
}

/// Transient flags active between moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// The next shot deals 2 damage instead of 1. Cleared after any shot.
    pub saw_primed: bool,
    /// Handcuff lifecycle, see [`HandcuffState`].
    pub handcuffs: HandcuffState,
    /// The next move must consume an item from an opponent's inventory.
    pub adrenaline: bool,
}

impl ActiveEffects {
    /// Reset to the post-reload baseline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
