//! Exact-expectation agent: scores every valid item bundle with the
//! oracle and plays the head of the best one.
//!
//! Score of a bundle = expectation gain over shooting immediately, plus
//! the handcuffs follow-up term when the bundle buys an extra shot, minus
//! a scarcity penalty that discourages burning rare items for marginal
//! gains. Ties break toward the shortest bundle.
//!
//! Closed-form shortcuts bypass enumeration when the front is certain:
//! everything-live shoots the opponent, everything-blank (or a known-blank
//! front) shoots the actor, and a known-live front cuffs/saws/shoots.

use smallvec::SmallVec;

use crate::core::{GameState, ItemKind, Move, PlayerId};
use crate::oracle::{enumerate_bundles, shot_pool, Bundle, ShellOracle};

use super::DecisionEngine;

/// Per-kind scarcity weights, divided by the held count when penalizing.
const SCARCITY: [(ItemKind, f64); 5] = [
    (ItemKind::Beer, 0.1),
    (ItemKind::Cigarettes, 0.0),
    (ItemKind::Handcuffs, 0.3),
    (ItemKind::MagnifyingGlass, 0.3),
    (ItemKind::Saw, 0.1),
];

/// Steal preference under an active adrenaline, most valuable first.
const STEAL_ORDER: [ItemKind; 8] = [
    ItemKind::Cigarettes,
    ItemKind::MagnifyingGlass,
    ItemKind::Handcuffs,
    ItemKind::Saw,
    ItemKind::Beer,
    ItemKind::Inverter,
    ItemKind::BurnerPhone,
    ItemKind::Meds,
];

/// Bundle-expectation agent.
#[derive(Debug, Default)]
pub struct ExactExpectationAgent {
    oracle: ShellOracle,
}

impl ExactExpectationAgent {
    /// Fresh agent with an empty oracle memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The follow-up expectation an extra (handcuffed) shot is worth,
    /// re-enumerated over the items left after the bundle.
    fn handcuff_followup(&mut self, state: &GameState, bundle: &[ItemKind]) -> f64 {
        let live = state.live_count();
        let total = state.total_shells();
        let beers = bundle.iter().filter(|&&k| k == ItemKind::Beer).count() as u8;
        let total_after = total.saturating_sub(beers + 1);
        if total_after == 0 {
            return 0.0;
        }

        // Items still in hand after the bundle, handcuffs excluded (a
        // consumed cuff cannot be replayed this round).
        let actor = state.current_player();
        let pool: SmallVec<[ItemKind; 4]> = [ItemKind::MagnifyingGlass, ItemKind::Beer, ItemKind::Saw]
            .into_iter()
            .filter(|&kind| {
                let used = u8::from(bundle.contains(&kind));
                state.items(actor).count(kind) > used && state.item_usable(kind)
            })
            .collect();
        let followups = enumerate_bundles(&pool);

        let best = |oracle: &mut ShellOracle, live: u8, total: u8| -> f64 {
            followups
                .iter()
                .map(|b| oracle.expected_value(b, live, total))
                .fold(0.0, f64::max)
        };

        let p_live = live as f64 / total as f64;
        let follow_live = best(&mut self.oracle, live.saturating_sub(1), total_after);
        let follow_blank = best(&mut self.oracle, live.min(total_after), total_after);
        p_live * follow_live + (1.0 - p_live) * follow_blank
    }

    fn scarcity_penalty(state: &GameState, bundle: &[ItemKind]) -> f64 {
        let held = state.items(state.current_player());
        SCARCITY
            .iter()
            .filter(|(kind, _)| bundle.contains(kind) && held.has(*kind))
            .map(|&(kind, weight)| weight / held.count(kind) as f64)
            .sum()
    }

    /// Score all bundles and return the best, ties to the shortest.
    fn best_bundle(&mut self, state: &GameState) -> Bundle {
        let live = state.live_count();
        let total = state.total_shells();
        let baseline = self.oracle.expected_value(&[], live, total);

        let mut best = Bundle::new();
        let mut best_score = f64::NEG_INFINITY;
        for bundle in enumerate_bundles(&shot_pool(state)) {
            let mut score = self.oracle.expected_value(&bundle, live, total) - baseline;
            if bundle.contains(&ItemKind::Handcuffs) {
                score += self.handcuff_followup(state, &bundle);
            }
            score -= Self::scarcity_penalty(state, &bundle);

            let better = score > best_score + 1e-12
                || ((score - best_score).abs() <= 1e-12 && bundle.len() < best.len());
            if better {
                best_score = score;
                best = bundle;
            }
        }
        best
    }
}

impl DecisionEngine for ExactExpectationAgent {
    fn name(&self) -> &'static str {
        "exact-expectation"
    }

    fn choose(&mut self, state: &GameState, observer: PlayerId) -> Move {
        let moves = state.legal_moves();
        let shoot_opponent = state
            .primary_opponent(observer)
            .map(Move::ShootOpponent)
            .unwrap_or(Move::ShootSelf);

        // Forced steal: adrenaline is pending and the set is steals only.
        if !moves.contains(&Move::ShootSelf) {
            let hurt = state.charges(observer) < state.config().max_charges;
            for kind in STEAL_ORDER {
                if kind == ItemKind::Cigarettes && !hurt {
                    continue;
                }
                if moves.contains(&Move::Use(kind)) {
                    return Move::Use(kind);
                }
            }
            return moves.first().copied().unwrap_or(Move::ShootSelf);
        }

        // Heal before anything else.
        if state.charges(observer) < state.config().max_charges
            && moves.contains(&Move::Use(ItemKind::Cigarettes))
        {
            return Move::Use(ItemKind::Cigarettes);
        }

        // Certainty shortcuts: explicit chamber knowledge first (a known
        // live front is worth cuffing or sawing before the shot), then
        // bare counts (everything live / everything blank).
        match state.chamber() {
            Some(true) => {
                if state.total_shells() > 1 && moves.contains(&Move::Use(ItemKind::Handcuffs)) {
                    return Move::Use(ItemKind::Handcuffs);
                }
                if moves.contains(&Move::Use(ItemKind::Saw)) {
                    return Move::Use(ItemKind::Saw);
                }
                return shoot_opponent;
            }
            Some(false) => return Move::ShootSelf,
            None => {}
        }
        let live = state.live_count();
        let total = state.total_shells();
        if total > 0 && live == total {
            return shoot_opponent;
        }
        if live == 0 {
            return Move::ShootSelf;
        }

        let best = self.best_bundle(state);
        match best.first() {
            Some(&kind) => Move::Use(kind),
            None => shoot_opponent,
        }
    }
}
