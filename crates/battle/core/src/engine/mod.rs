//! Battle orchestration: the phase state machine owning one battle.
//!
//! [`BattleEngine`] is the authoritative reducer for a [`BattleState`]:
//! the host starts a battle, asks who acts, submits actions in turn order,
//! checks the end condition after each resolution, and finally collects
//! rewards. Host-misuse (acting out of turn, acting after the end,
//! querying before the start) surfaces as [`EngineError`]; in-game
//! failures and negative rolls come back inside the action outcome.

pub mod turns;

pub use turns::{preemptive_strike, turn_order};

use crate::action::{ActionOutcome, BattleAction, resolve};
use crate::config::GameConfig;
use crate::rewards::{BattleRewards, calculate_rewards};
use crate::rng::{PcgRng, RngOracle};
use crate::state::combatant::{CombatantId, Enemy, PartyMember, Side};
use crate::state::{ActionRecord, BattleOutcome, BattlePhase, BattleState};

/// Errors surfaced for host programming mistakes.
///
/// Everything here means the integrating host drove the engine wrong;
/// valid in-game situations never produce these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("battle state required: no battle has been started")]
    NotStarted,

    #[error("a battle is already in progress")]
    AlreadyStarted,

    #[error("battle already ended")]
    AlreadyEnded,

    #[error("cannot start a battle with an empty {side:?} side")]
    EmptySide { side: Side },

    #[error("no living combatants remain to schedule")]
    RosterExhausted,

    #[error("actor {actor} does not match current turn actor {current}")]
    ActorNotCurrent {
        actor: CombatantId,
        current: CombatantId,
    },

    #[error("battle is not decided: no end condition holds and no escape occurred")]
    NotDecided,
}

/// One battle's orchestrator.
///
/// Owns the [`BattleState`] exclusively; single-threaded and synchronous.
/// All randomness flows through the injected [`RngOracle`] seeded from the
/// battle seed, so a battle is a pure function of
/// `(party, enemies, config, seed)`.
pub struct BattleEngine<R: RngOracle = PcgRng> {
    config: GameConfig,
    rng: R,
    state: Option<BattleState>,
}

impl BattleEngine<PcgRng> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, PcgRng)
    }
}

impl<R: RngOracle> BattleEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            state: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The battle state. Host misuse to call before [`Self::start_battle`].
    pub fn state(&self) -> Result<&BattleState, EngineError> {
        self.state.as_ref().ok_or(EngineError::NotStarted)
    }

    /// Begin a battle: seed state, compute the advisory preemptive flag,
    /// derive the first round's turn order over the living roster, and
    /// set the phase to the first actor's allegiance.
    pub fn start_battle(
        &mut self,
        party: Vec<PartyMember>,
        enemies: Vec<Enemy>,
        seed: u64,
    ) -> Result<&BattleState, EngineError> {
        if let Some(state) = &self.state {
            if state.phase != BattlePhase::Ended {
                return Err(EngineError::AlreadyStarted);
            }
        }
        if party.is_empty() {
            return Err(EngineError::EmptySide { side: Side::Party });
        }
        if enemies.is_empty() {
            return Err(EngineError::EmptySide { side: Side::Enemy });
        }

        let mut state = BattleState::new(party, enemies, seed);

        let party_speeds: Vec<i32> = state
            .party
            .iter()
            .filter(|m| m.combatant.is_alive())
            .map(|m| m.combatant.stats.speed)
            .collect();
        let enemy_speeds: Vec<i32> = state
            .enemies
            .iter()
            .filter(|e| e.combatant.is_alive())
            .map(|e| e.combatant.stats.speed)
            .collect();
        state.preemptive = preemptive_strike(&party_speeds, &enemy_speeds, &self.config);

        state.turn_order = turn_order(
            &Self::living_roster(&state),
            &self.config,
            &self.rng,
            state.seed,
            state.turn,
        );
        state.cursor = 0;

        if let Some(first) = state.current_actor() {
            state.phase = Self::phase_for(first);
        }

        self.state = Some(state);
        Ok(self.state.as_ref().ok_or(EngineError::NotStarted)?)
    }

    /// The combatant whose turn it is.
    pub fn current_actor(&self) -> Result<CombatantId, EngineError> {
        self.state()?
            .current_actor()
            .ok_or(EngineError::RosterExhausted)
    }

    /// Move the cursor to the next living actor.
    ///
    /// Crossing the end of the order starts a new round: the turn number
    /// increments and the order is recomputed from the currently-living
    /// roster, so the defeated are excluded rather than merely skipped.
    pub fn advance_turn(&mut self) -> Result<CombatantId, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NotStarted)?;
        if state.phase == BattlePhase::Ended {
            return Err(EngineError::AlreadyEnded);
        }

        state.cursor += 1;
        loop {
            if state.cursor >= state.turn_order.len() {
                state.turn += 1;
                state.cursor = 0;
                let living = Self::living_roster(state);
                if living.is_empty() {
                    return Err(EngineError::RosterExhausted);
                }
                state.turn_order =
                    turn_order(&living, &self.config, &self.rng, state.seed, state.turn);
            }

            let id = state.turn_order[state.cursor];
            let alive = state.combatant(id).is_some_and(|c| c.is_alive());
            if alive {
                state.phase = Self::phase_for(id);
                return Ok(id);
            }
            // Defeated mid-round: skip until the round boundary rebuild.
            state.cursor += 1;
        }
    }

    /// Resolve one action for the current actor.
    ///
    /// Sets the phase to `Processing`, dispatches to the resolver, appends
    /// the action to history, and returns the structured outcome. Except
    /// for a successful escape (which is terminal), the phase transition
    /// afterwards belongs to the caller: advance the turn or end the
    /// battle based on [`Self::check_battle_end`].
    pub fn execute_action(
        &mut self,
        actor: CombatantId,
        action: &BattleAction,
    ) -> Result<ActionOutcome, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::NotStarted)?;
        if state.phase == BattlePhase::Ended {
            return Err(EngineError::AlreadyEnded);
        }
        let current = state.current_actor().ok_or(EngineError::RosterExhausted)?;
        if actor != current {
            return Err(EngineError::ActorNotCurrent { actor, current });
        }

        state.phase = BattlePhase::Processing;
        let outcome = resolve::resolve(state, actor, action, &self.config, &self.rng);
        state.nonce += 1;

        state.history.push(ActionRecord {
            turn: state.turn,
            actor,
            action: action.clone(),
            outcome: outcome.clone(),
        });

        Ok(outcome)
    }

    /// End-condition check. Victory takes priority over defeat when both
    /// sides are wiped in the same resolution.
    pub fn check_battle_end(&self) -> Result<Option<BattleOutcome>, EngineError> {
        let state = self.state()?;
        if let Some(outcome) = state.outcome() {
            return Ok(Some(outcome));
        }
        if state.all_enemies_down() {
            return Ok(Some(BattleOutcome::Victory));
        }
        if state.all_party_down() {
            return Ok(Some(BattleOutcome::Defeat));
        }
        Ok(None)
    }

    /// Seal the battle: fix the outcome, optionally restore surviving
    /// party members to full HP, compute rewards over the defeated
    /// enemies, and return them. Rewards are computed once; a second call
    /// is host misuse.
    pub fn end_battle(&mut self, restore_hp_on_end: bool) -> Result<BattleRewards, EngineError> {
        let outcome = self.check_battle_end()?.ok_or(EngineError::NotDecided)?;

        let state = self.state.as_mut().ok_or(EngineError::NotStarted)?;
        if state.rewards().is_some() {
            return Err(EngineError::AlreadyEnded);
        }
        state.set_outcome(outcome);

        if restore_hp_on_end {
            for member in &mut state.party {
                if member.combatant.is_alive() {
                    member.combatant.restore_hp();
                }
            }
        }

        let defeated: Vec<&Enemy> = state
            .enemies
            .iter()
            .filter(|e| !e.combatant.is_alive())
            .collect();
        let rewards = calculate_rewards(&defeated, &self.rng, state.seed, state.nonce);
        state.rewards = Some(rewards.clone());

        Ok(rewards)
    }

    fn phase_for(actor: CombatantId) -> BattlePhase {
        match actor.side {
            Side::Party => BattlePhase::PlayerTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        }
    }

    fn living_roster(state: &BattleState) -> Vec<(CombatantId, i32)> {
        state
            .living_ids()
            .into_iter()
            .filter_map(|id| state.combatant(id).map(|c| (id, c.stats.speed)))
            .collect()
    }
}
