//! Game configuration.

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::item::ItemInventory;

/// Table configuration, fixed for the lifetime of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (2 for the canonical game).
    pub player_count: usize,

    /// Per-round health ceiling; charges are clamped to `[0, max_charges]`.
    pub max_charges: u8,

    /// Fixed sequence length per reload. `None` draws uniformly from 2..=8.
    pub total_shells: Option<u8>,

    /// Fixed live count per reload. `None` defaults to `total / 2`.
    pub live_shells: Option<u8>,

    /// Items granted to each player per reload. `None` draws from 2..=5.
    pub item_drop: Option<u8>,

    /// Per-player cap per item kind.
    pub item_caps: ItemInventory,

    /// Optional table-wide cap per item kind (the multi-seat variant's
    /// scarcity rule). `None` disables the global check.
    pub global_caps: Option<ItemInventory>,

    /// Whether expired meds are in the item pool. The multi-agent ruleset
    /// forbids them; the single-agent ruleset allows them.
    pub allow_meds: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            max_charges: 4,
            total_shells: None,
            live_shells: None,
            item_drop: None,
            item_caps: ItemInventory::default_caps(),
            global_caps: None,
            allow_meds: true,
        }
    }
}

impl GameConfig {
    /// Set the seat count.
    #[must_use]
    pub fn with_players(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Set the charge ceiling.
    #[must_use]
    pub fn with_max_charges(mut self, charges: u8) -> Self {
        self.max_charges = charges;
        self
    }

    /// Fix the sequence composition for every reload.
    #[must_use]
    pub fn with_shells(mut self, live: u8, total: u8) -> Self {
        self.live_shells = Some(live);
        self.total_shells = Some(total);
        self
    }

    /// Fix the per-reload item drop count.
    #[must_use]
    pub fn with_item_drop(mut self, count: u8) -> Self {
        self.item_drop = Some(count);
        self
    }

    /// Enable or disable expired meds.
    #[must_use]
    pub fn with_meds(mut self, allowed: bool) -> Self {
        self.allow_meds = allowed;
        self
    }

    /// Set a table-wide item cap.
    #[must_use]
    pub fn with_global_caps(mut self, caps: ItemInventory) -> Self {
        self.global_caps = Some(caps);
        self
    }

    /// Validate internal consistency.
    ///
    /// Rejects empty tables, zero charge ceilings, and a requested live
    /// count exceeding the requested total.
    pub fn validate(&self) -> Result<(), GameError> {
        if !(2..=4).contains(&self.player_count) {
            return Err(GameError::Configuration(format!(
                "player_count must be 2..=4, got {}",
                self.player_count
            )));
        }
        if self.max_charges == 0 {
            return Err(GameError::Configuration(
                "max_charges must be positive".into(),
            ));
        }
        if let Some(total) = self.total_shells {
            if total == 0 {
                return Err(GameError::Configuration(
                    "total_shells must be positive".into(),
                ));
            }
            if let Some(live) = self.live_shells {
                if live > total {
                    return Err(GameError::Configuration(format!(
                        "live rounds ({live}) exceed total rounds ({total})"
                    )));
                }
            }
        } else if self.live_shells.is_some() {
            return Err(GameError::Configuration(
                "live_shells requires total_shells".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the next reload's composition, drawing defaults as needed.
    pub(crate) fn next_composition(&self, rng: &mut super::rng::GameRng) -> (u8, u8) {
        let total = self
            .total_shells
            .unwrap_or_else(|| rng.gen_range_usize(2..9) as u8);
        let live = self.live_shells.unwrap_or(total / 2);
        (live.min(total), total)
    }

    /// Resolve the next reload's per-player drop count.
    pub(crate) fn next_drop_count(&self, rng: &mut super::rng::GameRng) -> u8 {
        self.item_drop
            .unwrap_or_else(|| rng.gen_range_usize(2..6) as u8)
    }
}
