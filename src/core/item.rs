//! Item kinds and per-player inventories.
//!
//! ## ItemKind
//!
//! The fixed, ordered set of single-use items. The order is the table's
//! canonical iteration order and is load-bearing: move lists, inventory
//! encodings, and snapshots all iterate it.
//!
//! ## ItemInventory
//!
//! A fixed-size count record over `ItemKind` with typed getters, a per-kind
//! cap table, and an aggregate carry cap of 8.

use serde::{Deserialize, Serialize};

/// Maximum items a single player can carry, across all kinds.
pub const MAX_CARRIED: u8 = 8;

/// The fixed set of single-use item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    /// Owes the shooter one extra shot before the turn passes.
    Handcuffs,
    /// Reveals the front shell.
    MagnifyingGlass,
    /// Ejects the front shell without firing it.
    Beer,
    /// Heals the user by 1 charge.
    Cigarettes,
    /// Doubles the damage of the next shot.
    Saw,
    /// Flips the front shell's live/blank identity in place.
    Inverter,
    /// Reveals a random shell at index >= 2.
    BurnerPhone,
    /// Coin flip: heal 2 or take 1 damage. Single-agent ruleset only.
    Meds,
    /// Forces the next item use to come from an opponent's inventory.
    Adrenaline,
}

impl ItemKind {
    /// All kinds in canonical order.
    pub const ALL: [ItemKind; 9] = [
        ItemKind::Handcuffs,
        ItemKind::MagnifyingGlass,
        ItemKind::Beer,
        ItemKind::Cigarettes,
        ItemKind::Saw,
        ItemKind::Inverter,
        ItemKind::BurnerPhone,
        ItemKind::Meds,
        ItemKind::Adrenaline,
    ];

    /// Index of this kind in [`ItemKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind at the given canonical index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<ItemKind> {
        Self::ALL.get(index).copied()
    }

    /// Stable lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ItemKind::Handcuffs => "handcuffs",
            ItemKind::MagnifyingGlass => "magnifying_glass",
            ItemKind::Beer => "beer",
            ItemKind::Cigarettes => "cigarettes",
            ItemKind::Saw => "saw",
            ItemKind::Inverter => "inverter",
            ItemKind::BurnerPhone => "burner_phone",
            ItemKind::Meds => "meds",
            ItemKind::Adrenaline => "adrenaline",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-kind count table, used both for inventories and cap tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemInventory {
    counts: [u8; 9],
}

impl ItemInventory {
    /// Empty inventory.
    #[must_use]
    pub const fn empty() -> Self {
        Self { counts: [0; 9] }
    }

    /// Build from explicit `(kind, count)` pairs; unlisted kinds are 0.
    #[must_use]
    pub fn from_pairs(pairs: &[(ItemKind, u8)]) -> Self {
        let mut inv = Self::empty();
        for &(kind, count) in pairs {
            inv.counts[kind.index()] = count;
        }
        inv
    }

    /// Count held of one kind.
    #[must_use]
    pub const fn count(&self, kind: ItemKind) -> u8 {
        self.counts[kind.index()]
    }

    /// Whether at least one of the kind is held.
    #[must_use]
    pub const fn has(&self, kind: ItemKind) -> bool {
        self.counts[kind.index()] > 0
    }

    /// Total items held across all kinds.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    /// Add one item of the kind.
    pub fn add(&mut self, kind: ItemKind) {
        self.counts[kind.index()] += 1;
    }

    /// Remove one item of the kind. Returns `false` if none was held.
    pub fn remove(&mut self, kind: ItemKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Iterate `(kind, count)` over held kinds, in canonical order.
    pub fn iter_held(&self) -> impl Iterator<Item = (ItemKind, u8)> + '_ {
        ItemKind::ALL
            .iter()
            .filter_map(move |&kind| match self.count(kind) {
                0 => None,
                n => Some((kind, n)),
            })
    }

    /// Counts in canonical kind order.
    #[must_use]
    pub const fn as_counts(&self) -> [u8; 9] {
        self.counts
    }

    /// Rebuild from counts in canonical kind order.
    #[must_use]
    pub const fn from_counts(counts: [u8; 9]) -> Self {
        Self { counts }
    }

    /// Per-player drop caps of the single-agent ruleset.
    #[must_use]
    pub const fn default_caps() -> Self {
        let mut counts = [0u8; 9];
        counts[ItemKind::Handcuffs as usize] = 1;
        counts[ItemKind::MagnifyingGlass as usize] = 3;
        counts[ItemKind::Beer as usize] = 2;
        counts[ItemKind::Cigarettes as usize] = 1;
        counts[ItemKind::Saw as usize] = 3;
        counts[ItemKind::Inverter as usize] = 8;
        counts[ItemKind::BurnerPhone as usize] = 1;
        counts[ItemKind::Meds as usize] = 1;
        counts[ItemKind::Adrenaline as usize] = 2;
        Self { counts }
    }
}

impl std::fmt::Display for ItemInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (kind, count) in self.iter_held() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", kind, count)?;
            first = false;
        }
        Ok(())
    }
}
