//! Omniscient vote-aggregation agent.
//!
//! Approximates a fair, information-respecting policy with a solver that
//! internally sees everything: enumerate every shell arrangement
//! consistent with public knowledge, solve each one with perfect
//! information, and tally which move each world recommends. A fixed
//! per-move-type bias then corrects the systematic skew of
//! perfect-information play (a cheating solver self-shoots far more often
//! than a fair player ever should, and undervalues healing), and the
//! highest weighted vote wins.
//!
//! Arrangements are independent worlds, so they are solved in parallel
//! with a memo partitioned per arrangement.

use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{GameState, ItemKind, Move, PlayerId};

use super::search::{Node, TableRules};
use super::DecisionEngine;

/// Vote weight damping for self-shots.
const SELF_SHOT_BIAS: f64 = 0.8;
/// Vote weight boost for healing.
const CIGARETTES_BIAS: f64 = 1.2;

fn bias(mv: Move) -> f64 {
    match mv {
        Move::ShootSelf => SELF_SHOT_BIAS,
        Move::Use(ItemKind::Cigarettes) => CIGARETTES_BIAS,
        _ => 1.0,
    }
}

type Arrangement = SmallVec<[bool; 8]>;

/// Every placement of `live` lives among `total` shells whose front agrees
/// with the public chamber knowledge.
fn arrangements(total: u8, live: u8, front: Option<bool>) -> Vec<Arrangement> {
    let mut out = Vec::new();
    for mask in 0u32..(1 << total) {
        if mask.count_ones() != live as u32 {
            continue;
        }
        if let Some(known) = front {
            if (mask & 1 == 1) != known {
                continue;
            }
        }
        out.push((0..total).map(|i| mask >> i & 1 == 1).collect());
    }
    out
}

/// Perfect-information minimax over one concrete arrangement. The horizon
/// is the end of the current round (an empty sequence evaluates the static
/// heuristic); only the meds coin remains a chance node.
struct ArrangementSolver {
    rules: TableRules,
    observer: u8,
    memo: FxHashMap<(Node, Arrangement), f64>,
}

impl ArrangementSolver {
    fn new(rules: TableRules, observer: u8) -> Self {
        Self {
            rules,
            observer,
            memo: FxHashMap::default(),
        }
    }

    fn heuristic(&self, node: &Node) -> f64 {
        let me = node.charges[self.observer as usize];
        if me == 0 {
            return -1.0;
        }
        let strongest = node
            .charges
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != self.observer as usize)
            .map(|(_, &c)| c)
            .max()
            .unwrap_or(0);
        if strongest == 0 {
            return 1.0;
        }
        (me as f64 - strongest as f64) / self.rules.max_charges as f64
    }

    fn best_move(&mut self, node: &Node, seq: &Arrangement) -> Option<Move> {
        let moves = node.search_moves(self.rules);
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &mv in &moves {
            let v = self.move_value(node, mv, seq);
            if v > best_value {
                best_value = v;
                best = Some(mv);
            }
        }
        best
    }

    fn value(&mut self, node: &Node, seq: &Arrangement) -> f64 {
        if let Some(winner) = node.winner() {
            return if winner == self.observer { 1.0 } else { -1.0 };
        }
        if seq.is_empty() {
            return self.heuristic(node);
        }

        let key = (node.clone(), seq.clone());
        if let Some(&cached) = self.memo.get(&key) {
            return cached;
        }

        let maximizing = node.to_move == self.observer;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for mv in node.search_moves(self.rules) {
            let v = self.move_value(node, mv, seq);
            best = if maximizing { best.max(v) } else { best.min(v) };
        }

        self.memo.insert(key, best);
        best
    }

    fn move_value(&mut self, node: &Node, mv: Move, seq: &Arrangement) -> f64 {
        let front = seq.first().copied().unwrap_or(false);
        match mv {
            Move::ShootSelf => {
                let child = node.shoot(node.to_move, front);
                self.value(&child, &Arrangement::from_slice(&seq[1..]))
            }
            Move::ShootOpponent(target) => {
                let child = node.shoot(target.0, front);
                self.value(&child, &Arrangement::from_slice(&seq[1..]))
            }
            Move::Use(ItemKind::MagnifyingGlass) => {
                self.value(&node.use_glass(front), seq)
            }
            Move::Use(ItemKind::Beer) => {
                let child = node.use_beer(front);
                self.value(&child, &Arrangement::from_slice(&seq[1..]))
            }
            Move::Use(ItemKind::Saw) => self.value(&node.use_saw(), seq),
            Move::Use(ItemKind::Handcuffs) => self.value(&node.use_handcuffs(), seq),
            Move::Use(ItemKind::Cigarettes) => {
                let rules = self.rules;
                self.value(&node.use_cigarettes(rules), seq)
            }
            Move::Use(ItemKind::Inverter) => {
                let mut flipped = seq.clone();
                flipped[0] = !front;
                self.value(&node.use_inverter(front), &flipped)
            }
            Move::Use(ItemKind::Meds) => {
                let rules = self.rules;
                0.5 * self.value(&node.use_meds(true, rules), seq)
                    + 0.5 * self.value(&node.use_meds(false, rules), seq)
            }
            Move::Use(ItemKind::Adrenaline) => self.value(&node.use_adrenaline(), seq),
            // Never emitted by search_moves; worthless if forced.
            Move::Use(ItemKind::BurnerPhone) => self.heuristic(node),
        }
    }
}

/// Majority-vote agent over all consistent hidden worlds.
#[derive(Clone, Copy, Debug, Default)]
pub struct OmniscientSearchAgent;

impl OmniscientSearchAgent {
    /// Fresh agent.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DecisionEngine for OmniscientSearchAgent {
    fn name(&self) -> &'static str {
        "omniscient"
    }

    fn choose(&mut self, state: &GameState, observer: PlayerId) -> Move {
        let total = state.total_shells();
        let live = state.live_count();
        let node = Node::from_state(state);
        let rules = TableRules::of(state);
        let candidates = node.search_moves(rules);

        if total == 0 {
            return candidates.first().copied().unwrap_or(Move::ShootSelf);
        }
        let worlds = arrangements(total, live, state.chamber());
        if worlds.is_empty() {
            return candidates.first().copied().unwrap_or(Move::ShootSelf);
        }

        let votes: Vec<Move> = worlds
            .par_iter()
            .filter_map(|seq| {
                let mut solver = ArrangementSolver::new(rules, observer.0);
                solver.best_move(&node, seq)
            })
            .collect();

        let mut tally: FxHashMap<Move, u32> = FxHashMap::default();
        for &mv in &votes {
            *tally.entry(mv).or_insert(0) += 1;
        }

        let mut best = candidates.first().copied().unwrap_or(Move::ShootSelf);
        let mut best_score = f64::NEG_INFINITY;
        for &mv in &candidates {
            let count = tally.get(&mv).copied().unwrap_or(0);
            let score = count as f64 * bias(mv);
            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        debug!(
            "omniscient: {} worlds, picked {best} with weighted score {best_score:.2}",
            worlds.len()
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameRng, ItemInventory, ShellSequence};

    fn state_with(shells: &[bool], chamber: Option<bool>, mine: ItemInventory) -> GameState {
        let config = GameConfig::default()
            .with_shells(
                shells.iter().filter(|&&s| s).count() as u8,
                shells.len() as u8,
            )
            .with_item_drop(0);
        let mut rng = GameRng::new(0);
        let mut state = GameState::new(config, &mut rng).unwrap();
        state.shells = ShellSequence::from_slice(shells);
        state.chamber = chamber;
        state.items[PlayerId::new(0)] = mine;
        state
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_arrangement_counts() {
        assert_eq!(arrangements(4, 2, None).len(), 6);
        assert_eq!(arrangements(4, 2, Some(true)).len(), 3);
        assert_eq!(arrangements(1, 1, None).len(), 1);
        assert_eq!(arrangements(3, 0, None).len(), 1);
    }

    #[test]
    fn test_arrangements_respect_front_knowledge() {
        for seq in arrangements(5, 2, Some(false)) {
            assert!(!seq[0]);
            assert_eq!(seq.iter().filter(|&&s| s).count(), 2);
        }
    }

    #[test]
    fn test_single_live_shell_shoots_opponent() {
        let state = state_with(&[true], None, ItemInventory::empty());
        let mut agent = OmniscientSearchAgent::new();
        assert_eq!(agent.choose(&state, p(0)), Move::ShootOpponent(p(1)));
    }

    #[test]
    fn test_single_blank_shell_shoots_self() {
        let state = state_with(&[false], None, ItemInventory::empty());
        let mut agent = OmniscientSearchAgent::new();
        assert_eq!(agent.choose(&state, p(0)), Move::ShootSelf);
    }

    #[test]
    fn test_known_blank_front_shoots_self() {
        let state = state_with(&[false, true], Some(false), ItemInventory::empty());
        let mut agent = OmniscientSearchAgent::new();
        assert_eq!(agent.choose(&state, p(0)), Move::ShootSelf);
    }

    #[test]
    fn test_choice_is_legal_and_deterministic() {
        let state = state_with(
            &[true, false, true, false],
            None,
            ItemInventory::from_pairs(&[(ItemKind::Beer, 1), (ItemKind::Saw, 1)]),
        );
        let mut agent = OmniscientSearchAgent::new();
        let first = agent.choose(&state, p(0));
        assert!(state.legal_moves().contains(&first));
        assert_eq!(agent.choose(&state, p(0)), first);
    }

    #[test]
    fn test_bias_table() {
        assert!(bias(Move::ShootSelf) < 1.0);
        assert!(bias(Move::Use(ItemKind::Cigarettes)) > 1.0);
        assert_eq!(bias(Move::ShootOpponent(p(1))), 1.0);
    }
}
