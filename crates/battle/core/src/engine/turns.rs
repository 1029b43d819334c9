//! Turn ordering and preemptive-strike detection.

use crate::config::GameConfig;
use crate::rng::{RngOracle, RollContext, compute_seed};
use crate::state::combatant::CombatantId;

/// Order combatants for one round by randomized effective speed.
///
/// Each combatant rolls `speed × (1 + uniform(−v, +v))` with
/// `v = config.speed_variance`, then the roster sorts descending. Ties
/// break deterministically by [`CombatantId`] ordering (party slots first,
/// then index), the same rule the engine uses everywhere ordering must be
/// reproducible.
///
/// The output is always a permutation of the input; an empty roster
/// yields an empty order.
pub fn turn_order(
    combatants: &[(CombatantId, i32)],
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
    battle_seed: u64,
    round: u32,
) -> Vec<CombatantId> {
    let mut rolled: Vec<(f64, CombatantId)> = combatants
        .iter()
        .map(|&(id, speed)| {
            let seed = compute_seed(battle_seed, round as u64, id.slot(), RollContext::Speed);
            let jitter = rng.variance(seed, config.speed_variance);
            (speed as f64 * jitter, id)
        })
        .collect();

    rolled.sort_by(|(speed_a, id_a), (speed_b, id_b)| {
        speed_b
            .partial_cmp(speed_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(id_a.cmp(id_b))
    });

    rolled.into_iter().map(|(_, id)| id).collect()
}

/// Whether the party opens with a preemptive strike.
///
/// True when the party's average speed exceeds the enemies' by at least
/// `config.preemptive_strike_threshold`. Either side being empty is
/// never preemptive. Advisory only: the engine stores the flag and
/// leaves its meaning to the host.
pub fn preemptive_strike(party_speeds: &[i32], enemy_speeds: &[i32], config: &GameConfig) -> bool {
    if party_speeds.is_empty() || enemy_speeds.is_empty() {
        return false;
    }
    let avg = |speeds: &[i32]| speeds.iter().map(|&s| s as f64).sum::<f64>() / speeds.len() as f64;
    avg(party_speeds) - avg(enemy_speeds) >= config.preemptive_strike_threshold
}
