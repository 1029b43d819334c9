//! Batch battle simulation for balance tuning.
//!
//! Plays out many independent, non-interactive battles over deep copies of
//! the given rosters and aggregates win/turn/damage statistics. Each
//! simulated battle is a simplified exchange of basic attacks driven by
//! `battle-core`'s combat math directly; the full orchestrator is bypassed
//! for throughput. Iterations run sequentially and aggregate into a single
//! accumulator, so repeated runs never touch shared template data.

use battle_core::{
    Enemy, GameConfig, PartyMember, PcgRng, RollContext, Skill, compute_seed, resolve_damage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Hard per-battle turn cap. Battles that outlast it count as stalled
/// rather than looping forever under pathological stat balance.
pub const MAX_SIMULATION_TURNS: u32 = 200;

/// Errors from driving the simulator with unusable input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("cannot simulate with an empty {side} roster")]
    EmptyRoster { side: &'static str },
}

/// How one simulated battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SimOutcome {
    Win,
    Loss,
    Stalled,
}

/// Aggregate statistics over a batch of simulated battles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub iterations: u32,
    pub wins: u32,
    pub losses: u32,
    /// Battles cut off at [`MAX_SIMULATION_TURNS`].
    pub stalled: u32,
    pub total_turns: u64,
    pub damage_dealt: u64,
    pub damage_taken: u64,
}

impl SimulationReport {
    pub fn win_rate(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.wins as f64 / self.iterations as f64
    }

    pub fn average_turns(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.iterations as f64
    }

    pub fn average_damage_dealt(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.damage_dealt as f64 / self.iterations as f64
    }

    pub fn average_damage_taken(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.damage_taken as f64 / self.iterations as f64
    }
}

/// Plain-text summary for balance tooling. Human-readable, not a stable
/// machine format.
impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "simulation: {} battles", self.iterations)?;
        writeln!(
            f,
            "  wins:    {} ({:.1}%)",
            self.wins,
            self.win_rate() * 100.0
        )?;
        writeln!(f, "  losses:  {}", self.losses)?;
        writeln!(f, "  stalled: {}", self.stalled)?;
        writeln!(f, "  avg turns:        {:.1}", self.average_turns())?;
        writeln!(f, "  avg damage dealt: {:.1}", self.average_damage_dealt())?;
        write!(f, "  avg damage taken: {:.1}", self.average_damage_taken())
    }
}

/// Batch simulator over one party/enemy matchup.
pub struct Simulator {
    config: GameConfig,
}

impl Simulator {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Run `iterations` independent battles from `base_seed`.
    ///
    /// Deterministic: the same rosters, config, seed, and iteration count
    /// produce the same report. The input rosters are deep-copied per
    /// iteration and never mutated.
    pub fn run(
        &self,
        party: &[PartyMember],
        enemies: &[Enemy],
        iterations: u32,
        base_seed: u64,
    ) -> Result<SimulationReport, SimulationError> {
        if party.is_empty() {
            return Err(SimulationError::EmptyRoster { side: "party" });
        }
        if enemies.is_empty() {
            return Err(SimulationError::EmptyRoster { side: "enemy" });
        }

        let mut report = SimulationReport {
            iterations,
            ..SimulationReport::default()
        };

        for iteration in 0..iterations {
            let battle_seed =
                base_seed ^ (iteration as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let (outcome, turns, dealt, taken) =
                self.run_one(party.to_vec(), enemies.to_vec(), battle_seed);

            debug!(iteration, ?outcome, turns, dealt, taken, "simulated battle");

            match outcome {
                SimOutcome::Win => report.wins += 1,
                SimOutcome::Loss => report.losses += 1,
                SimOutcome::Stalled => report.stalled += 1,
            }
            report.total_turns += turns as u64;
            report.damage_dealt += dealt;
            report.damage_taken += taken;
        }

        info!(
            iterations,
            wins = report.wins,
            losses = report.losses,
            stalled = report.stalled,
            "simulation batch finished"
        );
        Ok(report)
    }

    /// Convenience entry point seeded from host entropy.
    pub fn run_with_entropy(
        &self,
        party: &[PartyMember],
        enemies: &[Enemy],
        iterations: u32,
    ) -> Result<SimulationReport, SimulationError> {
        self.run(party, enemies, iterations, rand::random())
    }

    /// One simplified battle: every living combatant swings a basic attack
    /// at a random living opponent each turn, party side first.
    fn run_one(
        &self,
        mut party: Vec<PartyMember>,
        mut enemies: Vec<Enemy>,
        battle_seed: u64,
    ) -> (SimOutcome, u32, u64, u64) {
        let rng = PcgRng;
        let skill = Skill::basic_attack();
        let mut picker = StdRng::seed_from_u64(battle_seed);
        let mut nonce: u64 = 0;
        let mut dealt: u64 = 0;
        let mut taken: u64 = 0;

        for turn in 1..=MAX_SIMULATION_TURNS {
            // Party swings.
            for index in 0..party.len() {
                if !party[index].combatant.is_alive() {
                    continue;
                }
                let living: Vec<usize> = (0..enemies.len())
                    .filter(|&i| enemies[i].combatant.is_alive())
                    .collect();
                let Some(&target) = living.get(picker.gen_range(0..living.len().max(1))) else {
                    break;
                };

                let result = resolve_damage(
                    &party[index].combatant,
                    &enemies[target].combatant,
                    &skill,
                    &self.config,
                    &rng,
                    compute_seed(battle_seed, nonce, index as u32, RollContext::Hit),
                    compute_seed(battle_seed, nonce, index as u32, RollContext::Critical),
                    compute_seed(battle_seed, nonce, index as u32, RollContext::Variance),
                );
                nonce += 1;
                if result.hit {
                    dealt += enemies[target].combatant.apply_damage(result.damage) as u64;
                }
            }
            if enemies.iter().all(|e| !e.combatant.is_alive()) {
                return (SimOutcome::Win, turn, dealt, taken);
            }

            // Enemies swing back.
            for index in 0..enemies.len() {
                if !enemies[index].combatant.is_alive() {
                    continue;
                }
                let living: Vec<usize> = (0..party.len())
                    .filter(|&i| party[i].combatant.is_alive())
                    .collect();
                let Some(&target) = living.get(picker.gen_range(0..living.len().max(1))) else {
                    break;
                };

                let result = resolve_damage(
                    &enemies[index].combatant,
                    &party[target].combatant,
                    &skill,
                    &self.config,
                    &rng,
                    compute_seed(battle_seed, nonce, 0x100 + index as u32, RollContext::Hit),
                    compute_seed(battle_seed, nonce, 0x100 + index as u32, RollContext::Critical),
                    compute_seed(battle_seed, nonce, 0x100 + index as u32, RollContext::Variance),
                );
                nonce += 1;
                if result.hit {
                    taken += party[target].combatant.apply_damage(result.damage) as u64;
                }
            }
            if party.iter().all(|m| !m.combatant.is_alive()) {
                return (SimOutcome::Loss, turn, dealt, taken);
            }
        }

        (SimOutcome::Stalled, MAX_SIMULATION_TURNS, dealt, taken)
    }
}
