//! Moves, resolution outcomes, and replay records.

use serde::{Deserialize, Serialize};

use super::item::ItemKind;
use super::player::PlayerId;

/// A single move available to the acting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    /// Fire the front shell at yourself.
    ShootSelf,
    /// Fire the front shell at the given opponent.
    ShootOpponent(PlayerId),
    /// Spend one item of the kind. Under an active adrenaline the spend
    /// comes from an opponent's inventory instead of the actor's own.
    Use(ItemKind),
}

impl Move {
    /// Whether this move fires the shotgun.
    #[must_use]
    pub const fn is_shot(self) -> bool {
        matches!(self, Move::ShootSelf | Move::ShootOpponent(_))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::ShootSelf => f.write_str("shoot self"),
            Move::ShootOpponent(target) => write!(f, "shoot {}", target),
            Move::Use(kind) => write!(f, "use {}", kind),
        }
    }
}

/// Typed result of applying a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Damage dealt by a shot; negative when self-inflicted, 0 on a blank.
    Damage(i8),
    /// A boolean revealed to the actor (front shell, or the ejected shell).
    Revealed(bool),
    /// A non-front shell revealed by the burner phone.
    RevealedShell {
        /// Index relative to the current front (>= 2).
        index: usize,
        /// Live (`true`) or blank.
        value: bool,
    },
    /// The move changed state without producing a value.
    None,
}

/// A resolved move with enough context to replay or audit a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who acted.
    pub player: PlayerId,
    /// The move taken.
    pub mv: Move,
    /// What it resolved to.
    pub outcome: Outcome,
    /// Round number at resolution time (1-based, bumps on reload).
    pub round: u32,
}
