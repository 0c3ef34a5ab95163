//! Expectimax search over count-space belief states.
//!
//! The searcher never looks at the hidden ordering: a node carries only
//! the public facts (live/total counts, chamber knowledge, charges,
//! inventories, effects, turn). Shots and reveals become chance nodes
//! weighted `live/total` (or 1/0 when the front is known). Item moves do
//! not consume depth — they do not advance real time — while every shot
//! recurses at `depth - 1`.
//!
//! Strictly dominated branches are pruned before recursing, and results
//! are memoized in a transposition cache keyed by the full canonical node
//! plus depth, so symmetric move orders collapse to one evaluation.

use std::time::{Duration, Instant};

use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{GameState, HandcuffState, ItemInventory, ItemKind, Move, PlayerId};
use crate::oracle::conditioned_draw_pmf;

use super::DecisionEngine;

/// Flat bonus for holding public knowledge of the next shell.
const KNOWLEDGE_BONUS: f64 = 0.05;

/// Search parameters.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Shots of lookahead. Item uses are free.
    pub depth: u8,
    /// Optional wall-clock budget; exhausted nodes fall back to the
    /// static heuristic instead of raising.
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            time_budget: None,
        }
    }
}

impl SearchConfig {
    /// Set the shot depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Set a wall-clock budget.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Rule context a node needs beyond its own fields.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TableRules {
    pub max_charges: u8,
    pub allow_meds: bool,
}

impl TableRules {
    pub(crate) fn of(state: &GameState) -> Self {
        Self {
            max_charges: state.config().max_charges,
            allow_meds: state.config().allow_meds,
        }
    }
}

/// Canonical belief-state node; doubles as the transposition-cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Node {
    pub live: u8,
    pub total: u8,
    pub chamber: Option<bool>,
    pub charges: SmallVec<[u8; 4]>,
    pub items: SmallVec<[ItemInventory; 4]>,
    pub saw_primed: bool,
    pub handcuffs: HandcuffState,
    pub adrenaline: bool,
    pub to_move: u8,
    pub skip_next: bool,
    pub direction: i8,
}

impl Node {
    pub(crate) fn from_state(state: &GameState) -> Self {
        let count = state.config().player_count;
        Self {
            live: state.live_count(),
            total: state.total_shells(),
            chamber: state.chamber(),
            charges: PlayerId::all(count).map(|p| state.charges(p)).collect(),
            items: PlayerId::all(count).map(|p| *state.items(p)).collect(),
            saw_primed: state.effects().saw_primed,
            handcuffs: state.effects().handcuffs,
            adrenaline: state.effects().adrenaline,
            to_move: state.current_player().0,
            skip_next: state.turn().skip_next,
            direction: state.turn().direction,
        }
    }

    pub(crate) fn player_count(&self) -> usize {
        self.charges.len()
    }

    /// Probability the front shell is live under current knowledge: the
    /// one-draw PMF conditioned on the public chamber state.
    pub(crate) fn p_live(&self) -> f64 {
        conditioned_draw_pmf(self.total, self.live, self.chamber, 1, 1)
    }

    pub(crate) fn winner(&self) -> Option<u8> {
        let mut alive = self
            .charges
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| i as u8);
        let first = alive.next()?;
        alive.next().is_none().then_some(first)
    }

    /// Living opponents of `seat`, walked in turn direction.
    pub(crate) fn opponents_of(&self, seat: u8) -> SmallVec<[u8; 3]> {
        let count = self.player_count() as i16;
        let mut out = SmallVec::new();
        let mut cursor = seat as i16;
        for _ in 1..count {
            cursor = (cursor + self.direction as i16).rem_euclid(count);
            if self.charges[cursor as usize] > 0 {
                out.push(cursor as u8);
            }
        }
        out
    }

    fn advance_turn(&mut self) {
        let count = self.player_count() as i16;
        let mut cursor = self.to_move as i16;
        for _ in 0..count {
            cursor = (cursor + self.direction as i16).rem_euclid(count);
            if self.charges[cursor as usize] > 0 {
                self.to_move = cursor as u8;
                return;
            }
        }
    }

    fn item_usable(&self, kind: ItemKind, rules: TableRules) -> bool {
        match kind {
            ItemKind::Saw => !self.saw_primed,
            ItemKind::Handcuffs => self.handcuffs == HandcuffState::Inactive,
            ItemKind::Adrenaline => !self.adrenaline,
            ItemKind::Meds => rules.allow_meds,
            _ => true,
        }
    }

    fn steal_source(&self, kind: ItemKind) -> Option<u8> {
        self.opponents_of(self.to_move)
            .into_iter()
            .find(|&opp| self.items[opp as usize].has(kind))
    }

    /// Consume one `kind`, honoring an active adrenaline redirect.
    fn spend(&mut self, kind: ItemKind) {
        if self.adrenaline {
            self.adrenaline = false;
            if let Some(source) = self.steal_source(kind) {
                self.items[source as usize].remove(kind);
                return;
            }
        }
        self.items[self.to_move as usize].remove(kind);
    }

    // === Transitions (chance outcomes resolved by the caller) ===

    pub(crate) fn shoot(&self, target: u8, live_shell: bool) -> Node {
        let mut n = self.clone();
        n.total -= 1;
        n.chamber = None;
        if live_shell {
            n.live -= 1;
            let damage = if n.saw_primed { 2 } else { 1 };
            n.charges[target as usize] = n.charges[target as usize].saturating_sub(damage);
        }
        n.saw_primed = false;

        let self_miss = target == n.to_move && !live_shell;
        if !self_miss {
            if n.handcuffs == HandcuffState::PendingSecondShot {
                n.handcuffs = HandcuffState::Consumed;
                n.skip_next = true;
            }
            if n.skip_next {
                n.skip_next = false;
            } else {
                n.advance_turn();
            }
        }
        n
    }

    pub(crate) fn use_glass(&self, revealed: bool) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::MagnifyingGlass);
        n.chamber = Some(revealed);
        n
    }

    pub(crate) fn use_beer(&self, ejected_live: bool) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Beer);
        n.total -= 1;
        if ejected_live {
            n.live -= 1;
        }
        n.chamber = None;
        n
    }

    pub(crate) fn use_saw(&self) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Saw);
        n.saw_primed = true;
        n
    }

    pub(crate) fn use_handcuffs(&self) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Handcuffs);
        n.handcuffs = HandcuffState::PendingSecondShot;
        n.skip_next = true;
        n
    }

    pub(crate) fn use_cigarettes(&self, rules: TableRules) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Cigarettes);
        let seat = n.to_move as usize;
        n.charges[seat] = (n.charges[seat] + 1).min(rules.max_charges);
        n
    }

    pub(crate) fn use_inverter(&self, front_was_live: bool) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Inverter);
        if front_was_live {
            n.live -= 1;
        } else {
            n.live += 1;
        }
        if let Some(known) = n.chamber {
            n.chamber = Some(!known);
        }
        n
    }

    pub(crate) fn use_meds(&self, healed: bool, rules: TableRules) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Meds);
        let seat = n.to_move as usize;
        if healed {
            n.charges[seat] = (n.charges[seat] + 2).min(rules.max_charges);
        } else {
            n.charges[seat] = n.charges[seat].saturating_sub(1);
        }
        n
    }

    pub(crate) fn use_adrenaline(&self) -> Node {
        let mut n = self.clone();
        n.spend(ItemKind::Adrenaline);
        n.adrenaline = true;
        n
    }

    // === Move generation ===

    fn raw_moves(&self, rules: TableRules) -> SmallVec<[Move; 16]> {
        if self.adrenaline {
            let mut steals: SmallVec<[Move; 16]> = SmallVec::new();
            let mut seen = [false; 9];
            for opp in self.opponents_of(self.to_move) {
                for (kind, _) in self.items[opp as usize].iter_held() {
                    if kind == ItemKind::Adrenaline || seen[kind.index()] {
                        continue;
                    }
                    if self.item_usable(kind, rules) {
                        seen[kind.index()] = true;
                        steals.push(Move::Use(kind));
                    }
                }
            }
            steals.sort();
            if !steals.is_empty() {
                return steals;
            }
        }

        let mut moves: SmallVec<[Move; 16]> = SmallVec::new();
        moves.push(Move::ShootSelf);
        for opp in self.opponents_of(self.to_move) {
            moves.push(Move::ShootOpponent(PlayerId::new(opp)));
        }
        for kind in ItemKind::ALL {
            if self.items[self.to_move as usize].has(kind) && self.item_usable(kind, rules) {
                moves.push(Move::Use(kind));
            }
        }
        moves
    }

    /// Legal moves minus strictly dominated branches.
    pub(crate) fn search_moves(&self, rules: TableRules) -> SmallVec<[Move; 16]> {
        let raw = self.raw_moves(rules);

        // A reachable heal is strictly best: take it without branching.
        let hurt = self.charges[self.to_move as usize] < rules.max_charges;
        if hurt && raw.contains(&Move::Use(ItemKind::Cigarettes)) {
            let mut forced = SmallVec::new();
            forced.push(Move::Use(ItemKind::Cigarettes));
            return forced;
        }

        let front_certain_live = self.chamber == Some(true) || (self.total > 0 && self.live == self.total);
        let opponents_all_at_floor = self
            .opponents_of(self.to_move)
            .iter()
            .all(|&opp| self.charges[opp as usize] <= 1);
        let steal_possible = self
            .opponents_of(self.to_move)
            .iter()
            .any(|&opp| {
                self.items[opp as usize]
                    .iter_held()
                    .any(|(kind, _)| kind != ItemKind::Adrenaline)
            });

        let pruned: SmallVec<[Move; 16]> = raw
            .iter()
            .copied()
            .filter(|&mv| match mv {
                Move::ShootSelf => !front_certain_live,
                Move::ShootOpponent(_) => true,
                Move::Use(ItemKind::MagnifyingGlass) => {
                    self.chamber.is_none() && self.total >= 2 && self.live > 0 && self.live < self.total
                }
                Move::Use(ItemKind::Saw) => !opponents_all_at_floor,
                Move::Use(ItemKind::Handcuffs) => self.total >= 2,
                Move::Use(ItemKind::BurnerPhone) => false,
                Move::Use(ItemKind::Cigarettes) => false, // at max, dominated
                Move::Use(ItemKind::Meds) => hurt,
                Move::Use(ItemKind::Adrenaline) => steal_possible,
                Move::Use(_) => true,
            })
            .collect();

        if pruned.is_empty() {
            raw
        } else {
            pruned
        }
    }
}

/// Expectimax agent with a transposition cache.
pub struct SearchAgent {
    config: SearchConfig,
    cache: FxHashMap<(Node, u8), f64>,
    rules: TableRules,
    observer: u8,
    deadline: Option<Instant>,
}

impl SearchAgent {
    /// Agent with the given search parameters.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cache: FxHashMap::default(),
            rules: TableRules {
                max_charges: 1,
                allow_meds: true,
            },
            observer: 0,
            deadline: None,
        }
    }

    fn heuristic(&self, node: &Node) -> f64 {
        let me = node.charges[self.observer as usize];
        if me == 0 {
            return -1.0;
        }
        let strongest_opponent = node
            .charges
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != self.observer as usize)
            .map(|(_, &c)| c)
            .max()
            .unwrap_or(0);
        if strongest_opponent == 0 {
            return 1.0;
        }

        let mut h = (me as f64 - strongest_opponent as f64) / self.rules.max_charges as f64;
        if node.chamber.is_some() {
            h += if node.to_move == self.observer {
                KNOWLEDGE_BONUS
            } else {
                -KNOWLEDGE_BONUS
            };
        }
        h
    }

    fn out_of_time(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn value(&mut self, node: &Node, depth: u8) -> f64 {
        if let Some(winner) = node.winner() {
            return if winner == self.observer { 1.0 } else { -1.0 };
        }
        if depth == 0 || node.total == 0 || self.out_of_time() {
            return self.heuristic(node);
        }

        let key = (node.clone(), depth);
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let maximizing = node.to_move == self.observer;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for mv in node.search_moves(self.rules) {
            let v = self.move_value(node, mv, depth);
            best = if maximizing { best.max(v) } else { best.min(v) };
        }

        self.cache.insert(key, best);
        best
    }

    fn chance<F: Fn(&Node, bool) -> Node>(
        &mut self,
        node: &Node,
        p_true: f64,
        depth: u8,
        transition: F,
    ) -> f64 {
        let mut v = 0.0;
        if p_true > 0.0 {
            v += p_true * self.value(&transition(node, true), depth);
        }
        if p_true < 1.0 {
            v += (1.0 - p_true) * self.value(&transition(node, false), depth);
        }
        v
    }

    fn move_value(&mut self, node: &Node, mv: Move, depth: u8) -> f64 {
        let p = node.p_live();
        match mv {
            Move::ShootSelf => {
                let seat = node.to_move;
                self.chance(node, p, depth - 1, |n, live| n.shoot(seat, live))
            }
            Move::ShootOpponent(target) => {
                self.chance(node, p, depth - 1, |n, live| n.shoot(target.0, live))
            }
            Move::Use(ItemKind::MagnifyingGlass) => {
                self.chance(node, p, depth, |n, live| n.use_glass(live))
            }
            Move::Use(ItemKind::Beer) => self.chance(node, p, depth, |n, live| n.use_beer(live)),
            Move::Use(ItemKind::Saw) => self.value(&node.use_saw(), depth),
            Move::Use(ItemKind::Handcuffs) => self.value(&node.use_handcuffs(), depth),
            Move::Use(ItemKind::Cigarettes) => {
                let rules = self.rules;
                self.value(&node.use_cigarettes(rules), depth)
            }
            Move::Use(ItemKind::Inverter) => match node.chamber {
                Some(known) => self.value(&node.use_inverter(known), depth),
                None => self.chance(node, p, depth, |n, live| n.use_inverter(live)),
            },
            Move::Use(ItemKind::Meds) => {
                let rules = self.rules;
                self.chance(node, 0.5, depth, |n, healed| n.use_meds(healed, rules))
            }
            Move::Use(ItemKind::Adrenaline) => self.value(&node.use_adrenaline(), depth),
            // Pruned from search: no public-state effect.
            Move::Use(ItemKind::BurnerPhone) => self.heuristic(node),
        }
    }
}

impl DecisionEngine for SearchAgent {
    fn name(&self) -> &'static str {
        "search"
    }

    fn choose(&mut self, state: &GameState, observer: PlayerId) -> Move {
        let rules = TableRules::of(state);
        if observer.0 != self.observer || rules.max_charges != self.rules.max_charges {
            self.cache.clear();
        }
        self.rules = rules;
        self.observer = observer.0;
        self.deadline = self.config.time_budget.map(|b| Instant::now() + b);

        let node = Node::from_state(state);
        let moves = node.search_moves(self.rules);
        let depth = self.config.depth.max(1);

        // An exhausted sequence is the orchestrator's cue to reload; there
        // is nothing to search over.
        if node.total == 0 {
            return moves[0];
        }

        let mut best = moves[0];
        let mut best_value = f64::NEG_INFINITY;
        for &mv in &moves {
            if self.out_of_time() && best_value > f64::NEG_INFINITY {
                break;
            }
            let v = self.move_value(&node, mv, depth);
            trace!("search: {mv} scores {v:.4}");
            if v > best_value {
                best_value = v;
                best = mv;
            }
        }
        debug!(
            "search: picked {best} at depth {depth} ({} cached nodes)",
            self.cache.len()
        );
        best
    }

    fn reloaded(&mut self, _state: &GameState) {
        self.cache.clear();
    }
}
