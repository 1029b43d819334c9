//! Hit and critical chance calculations.

use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::state::combatant::Combatant;
use crate::state::skill::Skill;

/// Calculate the chance of a skill connecting.
///
/// # Formula
///
/// ```text
/// hit_rate = skill.accuracy + attacker.accuracy/100 - target.evasion/100
/// clamped to [config.min_hit_rate, 1.0]
/// ```
///
/// A registered hit override replaces the computation entirely (its output
/// is still clamped). A guaranteed-hit skill returns exactly 1.0 and
/// bypasses the override: guaranteed means absolute.
pub fn hit_rate(attacker: &Combatant, target: &Combatant, skill: &Skill, config: &GameConfig) -> f64 {
    if skill.guaranteed_hit {
        return 1.0;
    }

    let rate = match config.formulas.hit_formula() {
        Some(formula) => formula.hit_rate(attacker, target, skill, config),
        None => {
            skill.accuracy + attacker.stats.accuracy as f64 / 100.0
                - target.stats.evasion as f64 / 100.0
        }
    };

    rate.clamp(config.min_hit_rate, 1.0)
}

/// Single Bernoulli trial against a hit rate.
pub fn check_hit(rate: f64, rng: &(impl RngOracle + ?Sized), seed: u64) -> bool {
    rng.unit(seed) < rate
}

/// Calculate the chance of a critical hit.
///
/// # Formula
///
/// ```text
/// crit_rate = config.base_critical_rate
///           + attacker.luck * 0.001
///           + attacker.critical_rate
///           + skill.critical_bonus
/// clamped to [0.0, 1.0]
/// ```
///
/// A registered critical override replaces the computation (still clamped).
pub fn critical_rate(attacker: &Combatant, skill: &Skill, config: &GameConfig) -> f64 {
    let rate = match config.formulas.critical_formula() {
        Some(formula) => formula.critical_rate(attacker, skill, config),
        None => {
            config.base_critical_rate
                + attacker.stats.luck as f64 * 0.001
                + attacker.stats.critical_rate
                + skill.critical_bonus
        }
    };

    rate.clamp(0.0, 1.0)
}

/// Single Bernoulli trial against a critical rate.
pub fn check_critical(rate: f64, rng: &(impl RngOracle + ?Sized), seed: u64) -> bool {
    rng.unit(seed) < rate
}
