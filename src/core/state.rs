//! The authoritative game state machine.
//!
//! ## GameState
//!
//! Holds the hidden shell sequence, per-player charges and inventories,
//! transient effects, and the turn pointer. `apply` is a pure step: it
//! never mutates in place, and returns a typed [`Outcome`] plus the
//! successor state. This makes states usable as search nodes and cache
//! keys without defensive copying.
//!
//! ## Resolution order
//!
//! Every move resolves in a fixed order: consume the item, compute and
//! apply the outcome, clear one-shot flags, resolve the turn pass. Later
//! items (saw, handcuffs) read flags set earlier in the same shot, so the
//! order is part of the contract.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::{Move, Outcome};
use super::config::GameConfig;
use super::effects::{ActiveEffects, HandcuffState};
use super::error::GameError;
use super::item::{ItemInventory, ItemKind, MAX_CARRIED};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::shells::ShellSequence;

/// Turn pointer: current actor, pending skip, direction multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    /// The acting seat.
    pub current: PlayerId,
    /// The next turn pass is swallowed (set when handcuffs land).
    pub skip_next: bool,
    /// Seat-walk direction, +1 or -1.
    pub direction: i8,
}

impl TurnState {
    fn starting() -> Self {
        Self {
            current: PlayerId::new(0),
            skip_next: false,
            direction: 1,
        }
    }
}

/// Complete game state. See the module docs for the stepping contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) shells: ShellSequence,
    /// Public knowledge of the front shell, if any.
    pub(crate) chamber: Option<bool>,
    pub(crate) charges: PlayerMap<u8>,
    pub(crate) items: PlayerMap<ItemInventory>,
    pub(crate) effects: ActiveEffects,
    pub(crate) turn: TurnState,
    /// 1-based round counter, bumped on reload.
    pub(crate) round: u32,
}

impl GameState {
    /// Create the opening state: full charges, a freshly drawn sequence,
    /// and the initial item drop.
    pub fn new(config: GameConfig, rng: &mut GameRng) -> Result<Self, GameError> {
        config.validate()?;

        let (live, total) = config.next_composition(rng);
        let drop = config.next_drop_count(rng);
        let mut state = Self {
            shells: ShellSequence::draw(live, total, rng),
            chamber: None,
            charges: PlayerMap::with_value(config.player_count, config.max_charges),
            items: PlayerMap::with_default(config.player_count),
            effects: ActiveEffects::default(),
            turn: TurnState::starting(),
            round: 1,
            config,
        };
        state.drop_items(drop, rng);
        Ok(state)
    }

    // === Accessors ===

    /// The table configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Live rounds remaining in the sequence.
    #[must_use]
    pub fn live_count(&self) -> u8 {
        self.shells.live_count()
    }

    /// Total rounds remaining in the sequence.
    #[must_use]
    pub fn total_shells(&self) -> u8 {
        self.shells.total()
    }

    /// Public knowledge of the front shell.
    #[must_use]
    pub fn chamber(&self) -> Option<bool> {
        self.chamber
    }

    /// A player's remaining charges.
    #[must_use]
    pub fn charges(&self, player: PlayerId) -> u8 {
        self.charges[player]
    }

    /// A player's inventory.
    #[must_use]
    pub fn items(&self, player: PlayerId) -> &ItemInventory {
        &self.items[player]
    }

    /// The transient effects currently in play.
    #[must_use]
    pub fn effects(&self) -> ActiveEffects {
        self.effects
    }

    /// The turn pointer.
    #[must_use]
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// The acting seat.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn.current
    }

    /// 1-based round number.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether the sequence is exhausted and a reload is due.
    #[must_use]
    pub fn needs_reload(&self) -> bool {
        self.shells.is_empty()
    }

    /// Seats still holding charges, in seat order.
    pub fn alive_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.charges
            .iter()
            .filter(|(_, &c)| c > 0)
            .map(|(p, _)| p)
    }

    /// The winner, once all but one seat is out of charges.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let mut alive = self.alive_players();
        let first = alive.next()?;
        if alive.next().is_none() {
            Some(first)
        } else {
            None
        }
    }

    /// Living opponents of `player`, walked in turn direction from their
    /// seat.
    #[must_use]
    pub fn opponents_of(&self, player: PlayerId) -> SmallVec<[PlayerId; 3]> {
        let count = self.config.player_count as i16;
        let mut out = SmallVec::new();
        let mut seat = player.0 as i16;
        for _ in 1..count {
            seat = (seat + self.turn.direction as i16).rem_euclid(count);
            let candidate = PlayerId::new(seat as u8);
            if self.charges[candidate] > 0 {
                out.push(candidate);
            }
        }
        out
    }

    /// The nearest living opponent in turn order (the canonical "the
    /// opponent" for 2-seat tables).
    #[must_use]
    pub fn primary_opponent(&self, player: PlayerId) -> Option<PlayerId> {
        self.opponents_of(player).first().copied()
    }

    // === Move legality ===

    /// Whether an item kind can currently be played, counts aside.
    #[must_use]
    pub fn item_usable(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Saw => !self.effects.saw_primed,
            ItemKind::Handcuffs => self.effects.handcuffs == HandcuffState::Inactive,
            ItemKind::Adrenaline => !self.effects.adrenaline,
            ItemKind::Meds => self.config.allow_meds,
            _ => true,
        }
    }

    /// Steal moves available under an active adrenaline: one `Use` entry
    /// per item kind held by any living opponent, adrenaline excluded.
    #[must_use]
    pub fn steal_moves(&self) -> SmallVec<[Move; 16]> {
        let mut moves = SmallVec::new();
        let mut seen = [false; 9];
        for opponent in self.opponents_of(self.turn.current) {
            for (kind, _) in self.items[opponent].iter_held() {
                if kind == ItemKind::Adrenaline || seen[kind.index()] {
                    continue;
                }
                if self.item_usable(kind) {
                    seen[kind.index()] = true;
                    moves.push(Move::Use(kind));
                }
            }
        }
        moves.sort();
        moves
    }

    /// The ordered legal move set for the acting player.
    ///
    /// With adrenaline active the set is restricted to steals from
    /// opponents' inventories; when no stealable item exists the stale
    /// flag is ignored and the normal set applies.
    #[must_use]
    pub fn legal_moves(&self) -> SmallVec<[Move; 16]> {
        if self.effects.adrenaline {
            let steals = self.steal_moves();
            if !steals.is_empty() {
                return steals;
            }
        }

        let mut moves = SmallVec::new();
        moves.push(Move::ShootSelf);
        for opponent in self.opponents_of(self.turn.current) {
            moves.push(Move::ShootOpponent(opponent));
        }
        for kind in ItemKind::ALL {
            if self.items[self.turn.current].has(kind) && self.item_usable(kind) {
                moves.push(Move::Use(kind));
            }
        }
        moves
    }

    // === Stepping ===

    /// Apply a move, returning the typed outcome and the successor state.
    ///
    /// Moves outside [`legal_moves`](Self::legal_moves) are rejected with
    /// [`GameError::InvalidMove`] (or [`GameError::InsufficientItem`] for
    /// a zero-count spend outside the adrenaline exception).
    pub fn apply(&self, mv: Move, rng: &mut GameRng) -> Result<(Outcome, GameState), GameError> {
        if !self.legal_moves().contains(&mv) {
            if let Move::Use(kind) = mv {
                let stealing = self.effects.adrenaline && !self.steal_moves().is_empty();
                if !stealing
                    && self.item_usable(kind)
                    && !self.items[self.turn.current].has(kind)
                {
                    return Err(GameError::InsufficientItem(kind));
                }
            }
            return Err(GameError::InvalidMove(mv));
        }

        let mut next = self.clone();
        // A pending adrenaline with nothing to steal is stale; clear it so
        // it cannot spring back to life after a later item drop.
        if next.effects.adrenaline && self.steal_moves().is_empty() {
            next.effects.adrenaline = false;
        }
        let outcome = match mv {
            Move::ShootSelf => next.resolve_shot(self.turn.current)?,
            Move::ShootOpponent(target) => next.resolve_shot(target)?,
            Move::Use(kind) => next.resolve_item(kind, rng)?,
        };
        Ok((outcome, next))
    }

    /// Fire the front shell at `target` and resolve the turn pass.
    fn resolve_shot(&mut self, target: PlayerId) -> Result<Outcome, GameError> {
        let actor = self.turn.current;
        let shell = self
            .shells
            .pop_front()
            .ok_or(GameError::DegenerateState("fired on an empty sequence"))?;
        self.chamber = None;

        let mut damage: u8 = 0;
        if shell {
            damage = if self.effects.saw_primed { 2 } else { 1 };
            self.charges[target] = self.charges[target].saturating_sub(damage);
        }
        self.effects.saw_primed = false;

        // Switch rule: a self-shot that misses never passes the turn and
        // leaves a pending handcuff untouched. Any other shot first pays
        // out a pending handcuff (one extra shot for the actor), then
        // passes to the next eligible seat.
        let self_miss = target == actor && !shell;
        if !self_miss {
            if self.effects.handcuffs == HandcuffState::PendingSecondShot {
                self.effects.handcuffs = HandcuffState::Consumed;
                self.turn.skip_next = true;
            }
            if self.turn.skip_next {
                self.turn.skip_next = false;
            } else {
                self.advance_turn()?;
            }
        }

        let signed = if target == actor {
            -(damage as i8)
        } else {
            damage as i8
        };
        Ok(Outcome::Damage(signed))
    }

    /// Spend and resolve an item.
    fn resolve_item(&mut self, kind: ItemKind, rng: &mut GameRng) -> Result<Outcome, GameError> {
        let actor = self.turn.current;

        // Consume: an active adrenaline redirects the spend to the nearest
        // opponent holding the kind; a stale flag (no stealable items)
        // clears silently and the spend is the actor's own.
        if self.effects.adrenaline {
            self.effects.adrenaline = false;
            if let Some(source) = self.steal_source(kind) {
                self.items[source].remove(kind);
            } else if !self.items[actor].remove(kind) {
                return Err(GameError::InsufficientItem(kind));
            }
        } else if !self.items[actor].remove(kind) {
            return Err(GameError::InsufficientItem(kind));
        }

        match kind {
            ItemKind::Handcuffs => {
                self.effects.handcuffs = HandcuffState::PendingSecondShot;
                self.turn.skip_next = true;
                Ok(Outcome::None)
            }
            ItemKind::MagnifyingGlass => {
                let front = self
                    .shells
                    .peek()
                    .ok_or(GameError::DegenerateState("inspected an empty chamber"))?;
                self.chamber = Some(front);
                Ok(Outcome::Revealed(front))
            }
            ItemKind::Beer => {
                let ejected = self
                    .shells
                    .pop_front()
                    .ok_or(GameError::DegenerateState("ejected from an empty sequence"))?;
                self.chamber = None;
                Ok(Outcome::Revealed(ejected))
            }
            ItemKind::Cigarettes => {
                self.heal(actor, 1);
                Ok(Outcome::None)
            }
            ItemKind::Saw => {
                self.effects.saw_primed = true;
                Ok(Outcome::None)
            }
            ItemKind::Inverter => {
                self.shells
                    .invert_front()
                    .ok_or(GameError::DegenerateState("inverted an empty chamber"))?;
                if let Some(known) = self.chamber {
                    self.chamber = Some(!known);
                }
                Ok(Outcome::None)
            }
            ItemKind::BurnerPhone => {
                let total = self.shells.total() as usize;
                if total >= 3 {
                    let index = rng.gen_range_usize(2..total);
                    let value = self
                        .shells
                        .reveal(index)
                        .ok_or(GameError::DegenerateState("burner index out of range"))?;
                    Ok(Outcome::RevealedShell { index, value })
                } else {
                    Ok(Outcome::None)
                }
            }
            ItemKind::Meds => {
                if rng.gen_bool(0.5) {
                    self.heal(actor, 2);
                } else {
                    self.charges[actor] = self.charges[actor].saturating_sub(1);
                }
                Ok(Outcome::None)
            }
            ItemKind::Adrenaline => {
                self.effects.adrenaline = true;
                Ok(Outcome::None)
            }
        }
    }

    fn heal(&mut self, player: PlayerId, amount: u8) {
        self.charges[player] = (self.charges[player] + amount).min(self.config.max_charges);
    }

    /// The opponent an adrenaline steal of `kind` would draw from.
    fn steal_source(&self, kind: ItemKind) -> Option<PlayerId> {
        self.opponents_of(self.turn.current)
            .into_iter()
            .find(|&opponent| self.items[opponent].has(kind))
    }

    fn advance_turn(&mut self) -> Result<(), GameError> {
        let count = self.config.player_count as i16;
        let mut seat = self.turn.current.0 as i16;
        for _ in 0..count {
            seat = (seat + self.turn.direction as i16).rem_euclid(count);
            let candidate = PlayerId::new(seat as u8);
            if self.charges[candidate] > 0 {
                self.turn.current = candidate;
                return Ok(());
            }
        }
        Err(GameError::DegenerateState("no eligible actor remains"))
    }

    // === Reload ===

    /// Start the next round: fresh sequence, effects and knowledge reset,
    /// item top-up, turn back to the starting seat.
    pub fn reload(&self, rng: &mut GameRng) -> Result<GameState, GameError> {
        let mut next = self.clone();
        next.round += 1;

        let (live, total) = next.config.next_composition(rng);
        next.shells = ShellSequence::draw(live, total, rng);
        next.chamber = None;
        next.effects.reset();
        next.turn.skip_next = false;

        next.turn.current = PlayerId::new(0);
        if next.charges[next.turn.current] == 0 {
            next.advance_turn()?;
        }

        let drop = next.config.next_drop_count(rng);
        next.drop_items(drop, rng);
        Ok(next)
    }

    /// Grant up to `count` items to every seat, re-checking caps on each
    /// draw so neither per-player nor table-wide ceilings are exceeded.
    fn drop_items(&mut self, count: u8, rng: &mut GameRng) {
        for player in PlayerId::all(self.config.player_count).collect::<Vec<_>>() {
            for _ in 0..count {
                if self.items[player].total() >= MAX_CARRIED {
                    break;
                }
                let choices: SmallVec<[ItemKind; 9]> = ItemKind::ALL
                    .iter()
                    .copied()
                    .filter(|&kind| self.drop_eligible(kind, player))
                    .collect();
                match rng.choose(&choices) {
                    Some(&kind) => self.items[player].add(kind),
                    None => break,
                }
            }
        }
    }

    fn drop_eligible(&self, kind: ItemKind, player: PlayerId) -> bool {
        if self.items[player].count(kind) >= self.config.item_caps.count(kind) {
            return false;
        }
        if let Some(global) = &self.config.global_caps {
            let table_total: u16 = self
                .items
                .iter()
                .map(|(_, inv)| inv.count(kind) as u16)
                .sum();
            if table_total >= global.count(kind) as u16 {
                return false;
            }
        }
        if kind == ItemKind::Meds && !self.config.allow_meds {
            return false;
        }
        // Low charge ceilings make a doubled hit an instant kill, so the
        // saw is pulled from the pool (ruleset patch 1.2.1).
        if kind == ItemKind::Saw && self.config.max_charges <= 2 {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_state(shells: &[bool]) -> GameState {
        let config = GameConfig::default()
            .with_max_charges(4)
            .with_shells(
                shells.iter().filter(|&&s| s).count() as u8,
                shells.len() as u8,
            )
            .with_item_drop(0);
        let mut rng = GameRng::new(0);
        let mut state = GameState::new(config, &mut rng).unwrap();
        state.shells = ShellSequence::from_slice(shells);
        state
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_invariant_counts() {
        let state = fixed_state(&[true, false, true]);
        assert_eq!(state.live_count(), 2);
        assert_eq!(state.total_shells(), 3);
    }

    #[test]
    fn test_shoot_opponent_live() {
        let state = fixed_state(&[true, false]);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::ShootOpponent(p(1)), &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Damage(1));
        assert_eq!(next.charges(p(1)), 3);
        assert_eq!(next.total_shells(), 1);
        assert_eq!(next.current_player(), p(1));
    }

    #[test]
    fn test_shoot_opponent_blank_passes_turn() {
        let state = fixed_state(&[false, true]);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::ShootOpponent(p(1)), &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Damage(0));
        assert_eq!(next.charges(p(1)), 4);
        assert_eq!(next.current_player(), p(1));
    }

    #[test]
    fn test_self_shot_miss_keeps_turn() {
        let state = fixed_state(&[false, true]);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::ShootSelf, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Damage(0));
        assert_eq!(next.current_player(), p(0));
    }

    #[test]
    fn test_self_shot_live_damages_and_passes() {
        let state = fixed_state(&[true, false]);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::ShootSelf, &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Damage(-1));
        assert_eq!(next.charges(p(0)), 3);
        assert_eq!(next.current_player(), p(1));
    }

    #[test]
    fn test_saw_doubles_then_clears() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::Saw);
        let mut rng = GameRng::new(1);

        let (_, armed) = state.apply(Move::Use(ItemKind::Saw), &mut rng).unwrap();
        assert!(armed.effects().saw_primed);
        // Saw use does not pass the turn.
        assert_eq!(armed.current_player(), p(0));

        let (outcome, next) = armed.apply(Move::ShootOpponent(p(1)), &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Damage(2));
        assert_eq!(next.charges(p(1)), 2);
        assert!(!next.effects().saw_primed);
    }

    #[test]
    fn test_saw_cleared_even_on_blank_shot() {
        let mut state = fixed_state(&[false, true]);
        state.items[p(0)].add(ItemKind::Saw);
        let mut rng = GameRng::new(1);

        let (_, armed) = state.apply(Move::Use(ItemKind::Saw), &mut rng).unwrap();
        let (_, next) = armed.apply(Move::ShootSelf, &mut rng).unwrap();
        assert!(!next.effects().saw_primed);
    }

    #[test]
    fn test_handcuffs_grant_extra_shot() {
        let mut state = fixed_state(&[true, true, false]);
        state.items[p(0)].add(ItemKind::Handcuffs);
        let mut rng = GameRng::new(1);

        let (_, cuffed) = state.apply(Move::Use(ItemKind::Handcuffs), &mut rng).unwrap();
        assert_eq!(cuffed.effects().handcuffs, HandcuffState::PendingSecondShot);

        // First shot: pending pays out, actor keeps the turn.
        let (_, after_first) = cuffed.apply(Move::ShootOpponent(p(1)), &mut rng).unwrap();
        assert_eq!(after_first.current_player(), p(0));
        assert_eq!(after_first.effects().handcuffs, HandcuffState::Consumed);

        // Second shot: turn passes normally.
        let (_, after_second) = after_first
            .apply(Move::ShootOpponent(p(1)), &mut rng)
            .unwrap();
        assert_eq!(after_second.current_player(), p(1));
    }

    #[test]
    fn test_handcuffs_pending_survives_self_miss() {
        let mut state = fixed_state(&[false, true, false]);
        state.items[p(0)].add(ItemKind::Handcuffs);
        let mut rng = GameRng::new(1);

        let (_, cuffed) = state.apply(Move::Use(ItemKind::Handcuffs), &mut rng).unwrap();
        let (_, after) = cuffed.apply(Move::ShootSelf, &mut rng).unwrap();
        assert_eq!(after.current_player(), p(0));
        assert_eq!(after.effects().handcuffs, HandcuffState::PendingSecondShot);
    }

    #[test]
    fn test_handcuffs_unusable_until_reload() {
        let mut state = fixed_state(&[true, true, false]);
        state.items[p(0)].add(ItemKind::Handcuffs);
        state.effects.handcuffs = HandcuffState::Consumed;

        assert!(!state.legal_moves().contains(&Move::Use(ItemKind::Handcuffs)));
    }

    #[test]
    fn test_magnifying_glass_reveals_front() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::MagnifyingGlass);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state
            .apply(Move::Use(ItemKind::MagnifyingGlass), &mut rng)
            .unwrap();
        assert_eq!(outcome, Outcome::Revealed(true));
        assert_eq!(next.chamber(), Some(true));
    }

    #[test]
    fn test_knowledge_invalidated_by_shot() {
        let mut state = fixed_state(&[true, false]);
        state.chamber = Some(true);
        let mut rng = GameRng::new(1);

        let (_, next) = state.apply(Move::ShootOpponent(p(1)), &mut rng).unwrap();
        assert_eq!(next.chamber(), None);
    }

    #[test]
    fn test_beer_ejects_and_reports_value() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::Beer);
        state.chamber = Some(true);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::Use(ItemKind::Beer), &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Revealed(true));
        assert_eq!(next.total_shells(), 1);
        assert_eq!(next.chamber(), None);
        assert_eq!(next.current_player(), p(0));
    }

    #[test]
    fn test_beer_ejects_last_shell() {
        let mut state = fixed_state(&[false]);
        state.items[p(0)].add(ItemKind::Beer);
        let mut rng = GameRng::new(1);

        let (outcome, next) = state.apply(Move::Use(ItemKind::Beer), &mut rng).unwrap();
        assert_eq!(outcome, Outcome::Revealed(false));
        assert!(next.needs_reload());
    }

    #[test]
    fn test_inverter_flips_shell_and_knowledge() {
        let mut state = fixed_state(&[false, true]);
        state.items[p(0)].add(ItemKind::Inverter);
        state.chamber = Some(false);
        let mut rng = GameRng::new(1);

        let (_, next) = state.apply(Move::Use(ItemKind::Inverter), &mut rng).unwrap();
        assert_eq!(next.chamber(), Some(true));
        assert_eq!(next.live_count(), 2);
    }

    #[test]
    fn test_cigarettes_heal_capped() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::Cigarettes);
        state.charges[p(0)] = 4;
        let mut rng = GameRng::new(1);

        let (_, next) = state.apply(Move::Use(ItemKind::Cigarettes), &mut rng).unwrap();
        assert_eq!(next.charges(p(0)), 4);
    }

    #[test]
    fn test_burner_phone_reveals_deep_shell() {
        let mut state = fixed_state(&[true, false, true, false]);
        state.items[p(0)].add(ItemKind::BurnerPhone);
        let mut rng = GameRng::new(3);

        let (outcome, next) = state
            .apply(Move::Use(ItemKind::BurnerPhone), &mut rng)
            .unwrap();
        match outcome {
            Outcome::RevealedShell { index, value } => {
                assert!(index >= 2);
                assert_eq!(Some(value), next.shells.reveal(index));
            }
            other => panic!("expected a shell reveal, got {other:?}"),
        }
        assert_eq!(next.total_shells(), 4);
    }

    #[test]
    fn test_burner_phone_short_sequence_reveals_nothing() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::BurnerPhone);
        let mut rng = GameRng::new(3);

        let (outcome, _) = state
            .apply(Move::Use(ItemKind::BurnerPhone), &mut rng)
            .unwrap();
        assert_eq!(outcome, Outcome::None);
    }

    #[test]
    fn test_meds_gate() {
        let mut state = fixed_state(&[true, false]);
        state.config.allow_meds = false;
        state.items[p(0)].add(ItemKind::Meds);

        assert!(!state.legal_moves().contains(&Move::Use(ItemKind::Meds)));
    }

    #[test]
    fn test_adrenaline_restricts_to_steals() {
        let mut state = fixed_state(&[true, false]);
        state.items[p(0)].add(ItemKind::Adrenaline);
        state.items[p(1)].add(ItemKind::Saw);
        state.items[p(1)].add(ItemKind::Adrenaline);
        let mut rng = GameRng::new(1);

        let (_, pumped) = state.apply(Move::Use(ItemKind::Adrenaline), &mut rng).unwrap();
        let moves = pumped.legal_moves();
        // Opponent's adrenaline is never stealable; shooting is not open.
        assert_eq!(moves.as_slice(), &[Move::Use(ItemKind::Saw)]);

        let (_, stolen) = pumped.apply(Move::Use(ItemKind::Saw), &mut rng).unwrap();
        assert_eq!(stolen.items(p(1)).count(ItemKind::Saw), 0);
        assert!(stolen.effects().saw_primed);
        assert!(!stolen.effects().adrenaline);
    }

    #[test]
    fn test_adrenaline_with_no_steals_falls_back() {
        let mut state = fixed_state(&[true, false]);
        state.effects.adrenaline = true;

        let moves = state.legal_moves();
        assert!(moves.contains(&Move::ShootSelf));
        assert!(moves.contains(&Move::ShootOpponent(p(1))));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let state = fixed_state(&[true, false]);
        let mut rng = GameRng::new(1);

        let err = state
            .apply(Move::Use(ItemKind::Beer), &mut rng)
            .unwrap_err();
        assert_eq!(err, GameError::InsufficientItem(ItemKind::Beer));

        let err = state
            .apply(Move::ShootOpponent(p(0)), &mut rng)
            .unwrap_err();
        assert_eq!(err, GameError::InvalidMove(Move::ShootOpponent(p(0))));
    }

    #[test]
    fn test_reload_resets_round_state() {
        let mut state = fixed_state(&[true]);
        state.effects.saw_primed = true;
        state.effects.handcuffs = HandcuffState::Consumed;
        state.chamber = Some(true);
        state.turn.current = p(1);
        let mut rng = GameRng::new(7);

        let next = state.reload(&mut rng).unwrap();
        assert_eq!(next.round(), 2);
        assert_eq!(next.effects(), ActiveEffects::default());
        assert_eq!(next.chamber(), None);
        assert_eq!(next.current_player(), p(0));
        assert!(!next.needs_reload());
    }

    #[test]
    fn test_drops_respect_caps() {
        let config = GameConfig::default().with_shells(1, 2).with_item_drop(8);
        let mut rng = GameRng::new(11);
        let mut state = GameState::new(config, &mut rng).unwrap();

        for _ in 0..5 {
            state = state.reload(&mut rng).unwrap();
            for (_, inv) in state.items.iter() {
                assert!(inv.total() <= MAX_CARRIED);
                for kind in ItemKind::ALL {
                    assert!(inv.count(kind) <= state.config.item_caps.count(kind));
                }
            }
        }
    }

    #[test]
    fn test_no_saw_drops_at_low_ceiling() {
        let config = GameConfig::default()
            .with_max_charges(2)
            .with_shells(1, 2)
            .with_item_drop(8);
        let mut rng = GameRng::new(13);
        let mut state = GameState::new(config, &mut rng).unwrap();

        for _ in 0..5 {
            state = state.reload(&mut rng).unwrap();
            for (_, inv) in state.items.iter() {
                assert_eq!(inv.count(ItemKind::Saw), 0);
            }
        }
    }

    #[test]
    fn test_winner_detection() {
        let mut state = fixed_state(&[true, false]);
        assert_eq!(state.winner(), None);

        state.charges[p(0)] = 0;
        assert_eq!(state.winner(), Some(p(1)));
    }
}
