//! Turn orchestration: engine choice, move resolution, reloads, win
//! detection, and the win-rate experiment driver.
//!
//! The session owns the authoritative state and one engine per seat. Each
//! step asks the acting seat's engine to choose, applies the move (an
//! illegal choice is an engine defect and propagates), fans the resolved
//! observation out to every engine — burner-phone results stay private to
//! the actor — and reloads when the sequence runs dry.

use log::{debug, info};

use crate::core::{
    GameConfig, GameError, GameRng, GameState, ItemKind, Move, MoveRecord, PlayerId,
};
use crate::engines::{DecisionEngine, Observation};

/// Hard ceiling on steps per match; hitting it means the rules stalled.
const MAX_STEPS: u32 = 100_000;

/// A running match: state plus one engine per seat.
pub struct Session {
    state: GameState,
    rng: GameRng,
    engines: Vec<Box<dyn DecisionEngine>>,
    history: Vec<MoveRecord>,
    steps: u32,
}

impl Session {
    /// Start a match. Engine count must match the configured seat count.
    pub fn new(
        config: GameConfig,
        engines: Vec<Box<dyn DecisionEngine>>,
        seed: u64,
    ) -> Result<Self, GameError> {
        if engines.len() != config.player_count {
            return Err(GameError::Configuration(format!(
                "{} engines for {} seats",
                engines.len(),
                config.player_count
            )));
        }
        let mut rng = GameRng::new(seed);
        let state = GameState::new(config, &mut rng)?;
        Ok(Self {
            state,
            rng,
            engines,
            history: Vec::new(),
            steps: 0,
        })
    }

    /// The current authoritative state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Every resolved move so far, in order.
    #[must_use]
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Resolve one move of the acting seat.
    pub fn step(&mut self) -> Result<MoveRecord, GameError> {
        if self.state.winner().is_some() {
            return Err(GameError::DegenerateState("stepped a finished match"));
        }

        let actor = self.state.current_player();
        let mv = self.engines[actor.index()].choose(&self.state, actor);
        let (outcome, next) = self.state.apply(mv, &mut self.rng)?;
        self.state = next;
        self.steps += 1;
        debug!("{actor}: {mv} -> {outcome:?}");

        let record = MoveRecord {
            player: actor,
            mv,
            outcome,
            round: self.state.round(),
        };

        for (seat, engine) in self.engines.iter_mut().enumerate() {
            // Burner-phone reveals are the actor's private information.
            let private = matches!(mv, Move::Use(ItemKind::BurnerPhone)) && seat != actor.index();
            engine.observe(
                &self.state,
                &Observation {
                    actor,
                    mv,
                    outcome: if private { None } else { Some(outcome) },
                },
            );
        }

        if self.state.needs_reload() && self.state.winner().is_none() {
            self.state = self.state.reload(&mut self.rng)?;
            debug!(
                "reload: round {}, {} live / {} total",
                self.state.round(),
                self.state.live_count(),
                self.state.total_shells()
            );
            for engine in &mut self.engines {
                engine.reloaded(&self.state);
            }
        }

        self.history.push(record.clone());
        Ok(record)
    }

    /// Run until a winner emerges.
    pub fn play(&mut self) -> Result<PlayerId, GameError> {
        loop {
            if let Some(winner) = self.state.winner() {
                info!(
                    "{winner} wins after {} moves, {} rounds",
                    self.history.len(),
                    self.state.round()
                );
                return Ok(winner);
            }
            if self.steps >= MAX_STEPS {
                return Err(GameError::DegenerateState("match failed to terminate"));
            }
            self.step()?;
        }
    }

    /// Win-rate experiment: play `matches` games, deriving one seed per
    /// match from `base_seed`, building fresh engines each time. Returns
    /// wins per seat.
    pub fn play_many(
        config: &GameConfig,
        mut engine_factory: impl FnMut(u64) -> Vec<Box<dyn DecisionEngine>>,
        matches: u32,
        base_seed: u64,
    ) -> Result<Vec<u32>, GameError> {
        let mut wins = vec![0u32; config.player_count];
        for index in 0..matches {
            let seed = base_seed.wrapping_add(index as u64);
            let mut session = Session::new(config.clone(), engine_factory(seed), seed)?;
            let winner = session.play()?;
            wins[winner.index()] += 1;
        }
        Ok(wins)
    }
}
