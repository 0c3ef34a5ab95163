//! Rule-based agent with a fixed priority list.
//!
//! Evaluates rules in order and takes the first that applies:
//!
//! 1. cigarettes when below max charge;
//! 2. magnifying glass when the front is unknown and more than one shell
//!    remains;
//! 3. beer when the front is not known live and more than one remains;
//! 4. handcuffs when more than one remains;
//! 5. saw when the front is known live;
//! 6. burner phone when more than two remain;
//! 7. inverter when the front is known blank.
//!
//! If no rule applies it shoots: the opponent on a known-live front,
//! itself on a known blank, a fair coin otherwise. "Known" combines the
//! public chamber knowledge with this agent's private reveals and count
//! deduction. When a wanted item is not held directly but can be stolen,
//! the agent plays adrenaline instead.

use crate::core::{GameRng, GameState, ItemKind, Move, PlayerId};

use super::memory::ShellMemory;
use super::{DecisionEngine, Observation};

/// Priority-list agent, the scripted dealer of the original game.
#[derive(Debug)]
pub struct HeuristicAgent {
    rng: GameRng,
    memory: ShellMemory,
}

impl HeuristicAgent {
    /// Seeded agent (the seed drives only the unknown-front coin flip).
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            memory: ShellMemory::default(),
        }
    }

    /// What this agent believes about the front shell.
    fn front(&self, state: &GameState) -> Option<bool> {
        state
            .chamber()
            .or_else(|| self.memory.deduce(0, state.live_count(), state.total_shells()))
    }

    /// Whether `kind` could be taken from an opponent via adrenaline.
    fn stealable(state: &GameState, kind: ItemKind) -> bool {
        state.item_usable(kind)
            && state
                .opponents_of(state.current_player())
                .iter()
                .any(|&opponent| state.items(opponent).has(kind))
    }

    /// Resolve a wanted item against the legal move set, substituting
    /// adrenaline when only a steal can provide it.
    fn resolve(state: &GameState, moves: &[Move], kind: ItemKind) -> Option<Move> {
        let direct = Move::Use(kind);
        if moves.contains(&direct) {
            return Some(direct);
        }
        if moves.contains(&Move::Use(ItemKind::Adrenaline)) && Self::stealable(state, kind) {
            return Some(Move::Use(ItemKind::Adrenaline));
        }
        None
    }
}

impl DecisionEngine for HeuristicAgent {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose(&mut self, state: &GameState, observer: PlayerId) -> Move {
        if self.memory.len() != state.total_shells() as usize {
            self.memory.reset(state.total_shells() as usize);
        }

        let moves = state.legal_moves();
        let front = self.front(state);
        let total = state.total_shells();

        let wanted: &[(ItemKind, bool)] = &[
            (
                ItemKind::Cigarettes,
                state.charges(observer) < state.config().max_charges,
            ),
            (ItemKind::MagnifyingGlass, front.is_none() && total > 1),
            (ItemKind::Beer, front != Some(true) && total > 1),
            (ItemKind::Handcuffs, total > 1),
            (ItemKind::Saw, front == Some(true)),
            (ItemKind::BurnerPhone, total > 2),
            (ItemKind::Inverter, front == Some(false)),
        ];
        for &(kind, applies) in wanted {
            if !applies {
                continue;
            }
            if let Some(mv) = Self::resolve(state, &moves, kind) {
                return mv;
            }
        }

        let shoot_opponent = state
            .primary_opponent(observer)
            .map(Move::ShootOpponent)
            .unwrap_or(Move::ShootSelf);
        let shot = match front {
            Some(true) => shoot_opponent,
            Some(false) => Move::ShootSelf,
            None => {
                if self.rng.gen_bool(0.5) {
                    shoot_opponent
                } else {
                    Move::ShootSelf
                }
            }
        };
        if moves.contains(&shot) {
            shot
        } else {
            // Adrenaline forced a steal and nothing on the list applied;
            // take the first steal on offer.
            moves.first().copied().unwrap_or(Move::ShootSelf)
        }
    }

    fn observe(&mut self, state: &GameState, obs: &Observation) {
        self.memory.track(obs, state.total_shells() as usize);
    }

    fn reloaded(&mut self, state: &GameState) {
        self.memory.reset(state.total_shells() as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameRng, ItemInventory};

    fn bare_state(shells: &[bool]) -> GameState {
        let config = GameConfig::default()
            .with_shells(
                shells.iter().filter(|&&s| s).count() as u8,
                shells.len() as u8,
            )
            .with_item_drop(0);
        let mut rng = GameRng::new(0);
        let mut state = GameState::new(config, &mut rng).unwrap();
        state.shells = crate::core::ShellSequence::from_slice(shells);
        state
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_heals_first_when_hurt() {
        let mut state = bare_state(&[true, false]);
        state.charges[p(0)] = 2;
        state.items[p(0)] = ItemInventory::from_pairs(&[
            (ItemKind::Cigarettes, 1),
            (ItemKind::MagnifyingGlass, 1),
        ]);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(
            agent.choose(&state, p(0)),
            Move::Use(ItemKind::Cigarettes)
        );
    }

    #[test]
    fn test_inspects_unknown_front() {
        let mut state = bare_state(&[true, false, false]);
        state.items[p(0)] = ItemInventory::from_pairs(&[(ItemKind::MagnifyingGlass, 1)]);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(
            agent.choose(&state, p(0)),
            Move::Use(ItemKind::MagnifyingGlass)
        );
    }

    #[test]
    fn test_saw_on_known_live_front() {
        let mut state = bare_state(&[true, false]);
        state.chamber = Some(true);
        state.items[p(0)] = ItemInventory::from_pairs(&[(ItemKind::Saw, 1)]);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(agent.choose(&state, p(0)), Move::Use(ItemKind::Saw));
    }

    #[test]
    fn test_shoots_opponent_on_known_live() {
        let mut state = bare_state(&[true, false]);
        state.chamber = Some(true);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(agent.choose(&state, p(0)), Move::ShootOpponent(p(1)));
    }

    #[test]
    fn test_shoots_self_on_known_blank() {
        let mut state = bare_state(&[false, true]);
        state.chamber = Some(false);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(agent.choose(&state, p(0)), Move::ShootSelf);
    }

    #[test]
    fn test_single_shell_deduction() {
        // No items, one live shell: counts alone identify it.
        let mut agent = HeuristicAgent::new(1);
        let state = bare_state(&[true]);
        assert_eq!(agent.choose(&state, p(0)), Move::ShootOpponent(p(1)));

        let state = bare_state(&[false]);
        assert_eq!(agent.choose(&state, p(0)), Move::ShootSelf);
    }

    #[test]
    fn test_adrenaline_substitution() {
        // Wants the glass, holds only adrenaline, opponent has the glass.
        let mut state = bare_state(&[true, false, false]);
        state.items[p(0)] = ItemInventory::from_pairs(&[(ItemKind::Adrenaline, 1)]);
        state.items[p(1)] = ItemInventory::from_pairs(&[(ItemKind::MagnifyingGlass, 1)]);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(
            agent.choose(&state, p(0)),
            Move::Use(ItemKind::Adrenaline)
        );
    }

    #[test]
    fn test_burner_reveal_feeds_memory() {
        let mut state = bare_state(&[false, false, true]);
        let mut agent = HeuristicAgent::new(1);
        agent.reloaded(&state);

        // The agent sees its own burner result: index 2 is the only live
        // shell, so the front deduces blank.
        agent.observe(
            &state,
            &Observation {
                actor: p(0),
                mv: Move::Use(ItemKind::BurnerPhone),
                outcome: Some(crate::core::Outcome::RevealedShell {
                    index: 2,
                    value: true,
                }),
            },
        );
        state.items[p(0)] = ItemInventory::empty();
        assert_eq!(agent.choose(&state, p(0)), Move::ShootSelf);
    }
}
