//! Serializable state snapshots for tests, replay, and player-facing views.
//!
//! A full snapshot round-trips losslessly. A player-facing snapshot redacts
//! the shell sequence: observers get the public live/total counts and the
//! public chamber knowledge, never the hidden ordering.

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::effects::ActiveEffects;
use super::error::GameError;
use super::item::ItemInventory;
use super::player::{PlayerId, PlayerMap};
use super::shells::ShellSequence;
use super::state::{GameState, TurnState};

/// Point-in-time capture of a game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Charge ceiling.
    pub max_charges: u8,
    /// Per-seat charges.
    pub charges: Vec<u8>,
    /// Acting seat.
    pub current_turn: u8,
    /// Turn-walk direction, +1 or -1.
    pub direction: i8,
    /// Pending turn-skip flag.
    pub skip_next: bool,
    /// Front-first shell ordering; `None` in a redacted view.
    pub sequence: Option<Vec<bool>>,
    /// Live rounds remaining (public).
    pub live_count: u8,
    /// Total rounds remaining (public).
    pub total_shells: u8,
    /// Per-seat item counts in canonical kind order.
    pub items: Vec<[u8; 9]>,
    /// Transient effects.
    pub effects: ActiveEffects,
    /// Public front-shell knowledge.
    pub chamber: Option<bool>,
    /// 1-based round counter.
    pub round: u32,
}

impl Snapshot {
    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        bincode::serialize(self)
            .map_err(|e| GameError::Configuration(format!("snapshot encode: {e}")))
    }

    /// Decode a compact binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GameError> {
        bincode::deserialize(bytes)
            .map_err(|e| GameError::Configuration(format!("snapshot decode: {e}")))
    }

    /// Rebuild a game state from a full snapshot.
    ///
    /// Fails with [`GameError::Configuration`] when the snapshot was
    /// redacted or disagrees with the supplied configuration.
    pub fn restore(&self, config: GameConfig) -> Result<GameState, GameError> {
        config.validate()?;
        let sequence = self.sequence.as_ref().ok_or_else(|| {
            GameError::Configuration("cannot restore from a redacted snapshot".into())
        })?;

        if self.charges.len() != config.player_count || self.items.len() != config.player_count {
            return Err(GameError::Configuration(format!(
                "snapshot is for {} seats, config has {}",
                self.charges.len(),
                config.player_count
            )));
        }
        if self.max_charges != config.max_charges {
            return Err(GameError::Configuration(format!(
                "snapshot charge ceiling {} != config {}",
                self.max_charges, config.max_charges
            )));
        }

        let shells = ShellSequence::from_slice(sequence);
        if shells.live_count() != self.live_count || shells.total() != self.total_shells {
            return Err(GameError::Configuration(
                "snapshot shell counts disagree with sequence".into(),
            ));
        }
        if self.current_turn as usize >= config.player_count {
            return Err(GameError::Configuration("acting seat out of range".into()));
        }
        if !matches!(self.direction, 1 | -1) {
            return Err(GameError::Configuration("direction must be +1 or -1".into()));
        }

        let charges = PlayerMap::new(config.player_count, |p: PlayerId| {
            self.charges[p.index()].min(config.max_charges)
        });
        let items = PlayerMap::new(config.player_count, |p: PlayerId| {
            ItemInventory::from_counts(self.items[p.index()])
        });

        Ok(GameState {
            shells,
            chamber: self.chamber,
            charges,
            items,
            effects: self.effects,
            turn: TurnState {
                current: PlayerId::new(self.current_turn),
                skip_next: self.skip_next,
                direction: self.direction,
            },
            round: self.round,
            config,
        })
    }
}

impl GameState {
    fn snapshot_inner(&self, sequence: Option<Vec<bool>>) -> Snapshot {
        Snapshot {
            max_charges: self.config.max_charges,
            charges: self.charges.as_slice().to_vec(),
            current_turn: self.turn.current.0,
            direction: self.turn.direction,
            skip_next: self.turn.skip_next,
            sequence,
            live_count: self.shells.live_count(),
            total_shells: self.shells.total(),
            items: self
                .items
                .iter()
                .map(|(_, inv)| inv.as_counts())
                .collect(),
            effects: self.effects,
            chamber: self.chamber,
            round: self.round,
        }
    }

    /// Full, lossless snapshot (tests, replay, persistence).
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_inner(Some(self.shells.as_slice().to_vec()))
    }

    /// Player-facing snapshot: the shell sequence is redacted; only the
    /// public counts and public chamber knowledge remain.
    #[must_use]
    pub fn player_snapshot(&self) -> Snapshot {
        self.snapshot_inner(None)
    }
}
