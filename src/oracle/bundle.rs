//! Ordered item-bundle enumeration for pre-shot planning.
//!
//! A bundle is the ordered list of shot-shaping items a player commits to
//! using before firing: magnifying glass, beer, saw, handcuffs. Each item
//! appears at most once per bundle — only the first use of a kind changes
//! the decision-relevant state before a shot.
//!
//! One domain rule prunes the space: a beer anywhere after a magnifying
//! glass discards the revealed information for no benefit and is never
//! optimal, so such bundles are not emitted at all.

use smallvec::SmallVec;

use crate::core::{GameState, ItemKind};

/// An ordered sequence of pending item uses terminating in a shot.
pub type Bundle = SmallVec<[ItemKind; 4]>;

/// The item kinds that shape the terminal shot and participate in bundles.
pub const SHOT_SHAPING: [ItemKind; 4] = [
    ItemKind::MagnifyingGlass,
    ItemKind::Beer,
    ItemKind::Saw,
    ItemKind::Handcuffs,
];

/// Whether a bundle respects the ordering rule (no beer after a
/// magnifying glass).
#[must_use]
pub fn is_valid_bundle(bundle: &[ItemKind]) -> bool {
    let mut revealed = false;
    for &kind in bundle {
        match kind {
            ItemKind::MagnifyingGlass => revealed = true,
            ItemKind::Beer if revealed => return false,
            _ => {}
        }
    }
    true
}

/// Shot-shaping kinds the acting player can draw bundles from: held (one
/// charge each) and currently usable.
#[must_use]
pub fn shot_pool(state: &GameState) -> SmallVec<[ItemKind; 4]> {
    let actor = state.current_player();
    SHOT_SHAPING
        .iter()
        .copied()
        .filter(|&kind| state.items(actor).has(kind) && state.item_usable(kind))
        .collect()
}

/// Every valid ordered bundle over a pool of distinct kinds, including the
/// empty bundle.
#[must_use]
pub fn enumerate_bundles(pool: &[ItemKind]) -> Vec<Bundle> {
    let mut out = Vec::new();
    let mut current = Bundle::new();
    let mut used = [false; 9];
    extend(pool, &mut used, &mut current, &mut out);
    out
}

fn extend(pool: &[ItemKind], used: &mut [bool; 9], current: &mut Bundle, out: &mut Vec<Bundle>) {
    out.push(current.clone());
    for &kind in pool {
        if used[kind.index()] {
            continue;
        }
        current.push(kind);
        if is_valid_bundle(current) {
            used[kind.index()] = true;
            extend(pool, used, current, out);
            used[kind.index()] = false;
        }
        current.pop();
    }
}
