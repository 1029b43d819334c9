//! Action resolution: turns one submitted action into a structured
//! outcome, mutating combatant HP/MP/status along the way.
//!
//! The resolver never raises errors; everything it reports is an
//! [`ActionOutcome`]. Host-misuse checks (wrong actor, ended battle) live
//! one layer up in the engine.

use crate::action::{ActionFailure, ActionOutcome, BattleAction};
use crate::combat::damage::{heal_amount, is_heal, resolve_damage};
use crate::config::GameConfig;
use crate::rng::{RngOracle, RollContext, compute_seed};
use crate::state::combatant::{CombatantId, Side};
use crate::state::skill::Skill;
use crate::state::status::{StatusEffect, StatusKind};
use crate::state::BattleState;

/// Resolve one action for `actor` against the battle state.
pub(crate) fn resolve(
    state: &mut BattleState,
    actor: CombatantId,
    action: &BattleAction,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
) -> ActionOutcome {
    match action {
        BattleAction::Attack { target } => {
            let skill = Skill::basic_attack();
            resolve_offense(state, actor, *target, &skill, config, rng)
        }
        BattleAction::UseSkill { skill, target } => {
            resolve_skill(state, actor, *target, skill, config, rng)
        }
        BattleAction::Defend => resolve_defend(state, actor, config),
        BattleAction::Escape => resolve_escape(state, config, rng),
    }
}

/// Hit/crit/damage pipeline shared by attacks and offensive skills.
fn resolve_offense(
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    skill: &Skill,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
) -> ActionOutcome {
    let result = {
        // An unresolvable actor is a lookup failure, not a targeting one.
        let Some(attacker) = state.combatant(actor) else {
            return ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget);
        };
        let Some(defender) = state.combatant(target) else {
            return ActionOutcome::Failed(ActionFailure::NoTarget);
        };
        if !defender.is_alive() {
            return ActionOutcome::Failed(ActionFailure::NoTarget);
        }

        let hit_seed = compute_seed(state.seed, state.nonce, actor.slot(), RollContext::Hit);
        let crit_seed = compute_seed(state.seed, state.nonce, actor.slot(), RollContext::Critical);
        let var_seed = compute_seed(state.seed, state.nonce, actor.slot(), RollContext::Variance);

        resolve_damage(
            attacker, defender, skill, config, rng, hit_seed, crit_seed, var_seed,
        )
    };

    if result.hit {
        if let Some(defender) = state.combatant_mut(target) {
            defender.apply_damage(result.damage);
        }
    }

    ActionOutcome::Damage { target, result }
}

fn resolve_skill(
    state: &mut BattleState,
    actor: CombatantId,
    target: CombatantId,
    skill: &Skill,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
) -> ActionOutcome {
    if state.combatant(target).is_none() {
        return ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget);
    }

    // MP gate: refuse without touching MP, otherwise the cost is spent
    // before the roll and stays spent on a miss.
    let cost = skill.cost.mp;
    {
        let Some(caster) = state.combatant_mut(actor) else {
            return ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget);
        };
        if caster.mp() < cost {
            return ActionOutcome::Failed(ActionFailure::InsufficientMp {
                required: cost,
                current: caster.mp(),
            });
        }
        let paid = caster.spend_mp(cost);
        debug_assert!(paid, "MP was checked above");
    }

    if is_heal(&skill.kind) {
        let amount = {
            let Some(caster) = state.combatant(actor) else {
                return ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget);
            };
            let Some(patient) = state.combatant(target) else {
                return ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget);
            };
            if !patient.is_alive() {
                return ActionOutcome::Failed(ActionFailure::NoTarget);
            }
            let heal_seed = compute_seed(state.seed, state.nonce, actor.slot(), RollContext::Heal);
            heal_amount(caster, patient, skill, config, rng, heal_seed)
        };

        let healed = state
            .combatant_mut(target)
            .map(|patient| patient.apply_heal(amount))
            .unwrap_or(0);

        return ActionOutcome::Heal {
            target,
            amount: healed,
        };
    }

    resolve_offense(state, actor, target, skill, config, rng)
}

/// Defend attaches a time-boxed defense-up tag rather than touching the
/// defense stat; duration and expiry belong to the external status
/// subsystem. Always succeeds, even when the stack cap leaves the tag
/// unapplied.
fn resolve_defend(state: &mut BattleState, actor: CombatantId, config: &GameConfig) -> ActionOutcome {
    let applied = state
        .combatant_mut(actor)
        .map(|combatant| {
            combatant.statuses.add_capped(
                StatusEffect {
                    kind: StatusKind::DefenseUp,
                    turns: config.defend_duration_turns,
                    magnitude: config.defend_multiplier,
                },
                config.defend_stack_cap,
            )
        })
        .unwrap_or(false);

    ActionOutcome::Defend { applied }
}

/// Escape rate from the configured base, the failed-attempt increment,
/// and the living-average speed gap; clamped so escape is never certain
/// nor hopeless.
pub(crate) fn escape_rate(state: &BattleState, config: &GameConfig) -> f64 {
    let gap = state.average_speed(Side::Party) - state.average_speed(Side::Enemy);
    let rate = config.escape_base_rate
        + state.escape_attempts as f64 * config.escape_rate_increment
        + gap / config.escape_speed_factor;
    rate.clamp(config.min_escape_rate, config.max_escape_rate)
}

fn resolve_escape(
    state: &mut BattleState,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
) -> ActionOutcome {
    let rate = escape_rate(state, config);
    let seed = compute_seed(state.seed, state.nonce, 0, RollContext::Escape);
    let escaped = rng.unit(seed) < rate;

    if escaped {
        // Terminal: the whole battle ends immediately.
        state.set_outcome(crate::state::BattleOutcome::Escaped);
    } else {
        state.escape_attempts += 1;
    }

    ActionOutcome::Escape { escaped, rate }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::rng::PcgRng;
    use crate::state::combatant::{Combatant, Enemy, PartyMember, Stats};
    use crate::state::skill::{SkillCost, SkillKind};
    use crate::state::{BattleOutcome, BattlePhase};

    fn member(attack: i32, magic: i32, mp: u32, speed: i32) -> PartyMember {
        PartyMember::new(
            Combatant::new(
                "hero",
                1,
                Stats {
                    max_hp: 100,
                    max_mp: mp,
                    attack,
                    magic,
                    speed,
                    accuracy: 100,
                    ..Stats::default()
                },
            ),
            "fighter",
        )
    }

    fn enemy(hp: u32, defense: i32, speed: i32) -> Enemy {
        Enemy::new(
            Combatant::new(
                "slime",
                1,
                Stats {
                    max_hp: hp,
                    defense,
                    speed,
                    ..Stats::default()
                },
            ),
            10,
            5,
        )
    }

    fn battle() -> BattleState {
        BattleState::new(vec![member(50, 40, 50, 20)], vec![enemy(200, 30, 10)], 7)
    }

    fn config() -> GameConfig {
        let mut config = GameConfig::without_variance();
        config.base_critical_rate = 0.0;
        config
    }

    #[test]
    fn attack_deals_exact_damage_without_variance() {
        let mut state = battle();
        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::Attack {
                target: CombatantId::enemy(0),
            },
            &config(),
            &PcgRng,
        );

        // accuracy 100 stat pushes the hit rate to the 1.0 ceiling.
        match outcome {
            ActionOutcome::Damage { result, .. } => {
                assert!(result.hit);
                assert_eq!(result.damage, 20);
            }
            other => panic!("expected damage outcome, got {other:?}"),
        }
        assert_eq!(state.combatant(CombatantId::enemy(0)).unwrap().hp(), 180);
    }

    #[test]
    fn attack_on_downed_target_fails_with_no_target() {
        let mut state = battle();
        state
            .combatant_mut(CombatantId::enemy(0))
            .unwrap()
            .apply_damage(9999);

        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::Attack {
                target: CombatantId::enemy(0),
            },
            &config(),
            &PcgRng,
        );
        assert_eq!(outcome, ActionOutcome::Failed(ActionFailure::NoTarget));
    }

    #[test]
    fn attack_on_absent_slot_fails_with_no_target() {
        let mut state = battle();
        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::Attack {
                target: CombatantId::enemy(5),
            },
            &config(),
            &PcgRng,
        );
        assert_eq!(outcome, ActionOutcome::Failed(ActionFailure::NoTarget));
    }

    #[test]
    fn attack_from_absent_actor_fails_as_invalid() {
        let mut state = battle();
        let outcome = resolve(
            &mut state,
            CombatantId::party(5),
            &BattleAction::Attack {
                target: CombatantId::enemy(0),
            },
            &config(),
            &PcgRng,
        );
        assert_eq!(
            outcome,
            ActionOutcome::Failed(ActionFailure::InvalidSkillOrTarget)
        );
        // The target is untouched.
        assert_eq!(state.combatant(CombatantId::enemy(0)).unwrap().hp(), 200);
    }

    #[test]
    fn skill_with_insufficient_mp_fails_and_leaves_mp_unchanged() {
        let mut state = battle();
        let skill = Arc::new(Skill {
            cost: SkillCost::mp(100),
            ..Skill::basic_attack()
        });

        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::UseSkill {
                skill,
                target: CombatantId::enemy(0),
            },
            &config(),
            &PcgRng,
        );

        assert_eq!(
            outcome,
            ActionOutcome::Failed(ActionFailure::InsufficientMp {
                required: 100,
                current: 50,
            })
        );
        assert!(outcome.message().contains("MP"));
        assert_eq!(state.combatant(CombatantId::party(0)).unwrap().mp(), 50);
    }

    #[test]
    fn skill_cost_is_spent_even_on_a_miss() {
        let skill = Arc::new(Skill {
            cost: SkillCost::mp(10),
            ..Skill::basic_attack()
        });

        // Evasion high enough to pin the hit rate at the 0.05 floor, then
        // search for a seed whose roll misses; at 5% nearly every seed does.
        let mut missed = false;
        for seed in 0..50u64 {
            let mut state = battle();
            state.seed = seed;
            state
                .combatant_mut(CombatantId::enemy(0))
                .unwrap()
                .stats
                .evasion = 10_000;

            let outcome = resolve(
                &mut state,
                CombatantId::party(0),
                &BattleAction::UseSkill {
                    skill: Arc::clone(&skill),
                    target: CombatantId::enemy(0),
                },
                &config(),
                &PcgRng,
            );
            if outcome.missed() {
                assert_eq!(state.combatant(CombatantId::party(0)).unwrap().mp(), 40);
                missed = true;
                break;
            }
        }
        assert!(missed, "no miss found across 50 seeds at a 5% hit rate");
    }

    #[test]
    fn heal_skill_caps_at_max_hp() {
        let mut state = battle();
        state
            .combatant_mut(CombatantId::party(0))
            .unwrap()
            .apply_damage(30);

        let skill = Arc::new(Skill {
            kind: SkillKind::Heal,
            power: 2.0, // 40 magic × 2.0 = 80 raw heal, only 30 missing
            cost: SkillCost::mp(5),
            ..Skill::basic_attack()
        });

        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::UseSkill {
                skill,
                target: CombatantId::party(0),
            },
            &config(),
            &PcgRng,
        );

        assert_eq!(
            outcome,
            ActionOutcome::Heal {
                target: CombatantId::party(0),
                amount: 30,
            }
        );
        assert_eq!(state.combatant(CombatantId::party(0)).unwrap().hp(), 100);
        assert_eq!(state.combatant(CombatantId::party(0)).unwrap().mp(), 45);
    }

    #[test]
    fn unknown_custom_skill_kind_resolves_via_fallback() {
        let mut state = battle();
        let skill = Arc::new(Skill {
            kind: SkillKind::Custom("breath".to_owned()),
            guaranteed_hit: true,
            ..Skill::basic_attack()
        });

        let outcome = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::UseSkill {
                skill,
                target: CombatantId::enemy(0),
            },
            &config(),
            &PcgRng,
        );
        match outcome {
            ActionOutcome::Damage { result, .. } => {
                assert!(result.hit);
                assert_eq!(result.damage, 20); // generic attack-based fallback
            }
            other => panic!("expected damage outcome, got {other:?}"),
        }
    }

    #[test]
    fn defend_attaches_capped_status_tag() {
        let mut state = battle();
        let config = config();

        let first = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::Defend,
            &config,
            &PcgRng,
        );
        assert_eq!(first, ActionOutcome::Defend { applied: true });

        // Cap is 1: a second defend still succeeds but applies nothing.
        let second = resolve(
            &mut state,
            CombatantId::party(0),
            &BattleAction::Defend,
            &config,
            &PcgRng,
        );
        assert_eq!(second, ActionOutcome::Defend { applied: false });

        let combatant = state.combatant(CombatantId::party(0)).unwrap();
        assert_eq!(combatant.statuses.count(StatusKind::DefenseUp), 1);
        // The defense stat itself is untouched.
        assert_eq!(combatant.stats.defense, 0);
    }

    #[test]
    fn escape_rate_is_clamped_below_certainty() {
        let mut state =
            BattleState::new(vec![member(10, 0, 0, 200)], vec![enemy(50, 0, 10)], 7);
        let config = GameConfig::default();
        // 0.5 + (200-10)/100 = 2.4 before the clamp.
        assert_eq!(escape_rate(&state, &config), config.max_escape_rate);
        state.escape_attempts = 5;
        assert_eq!(escape_rate(&state, &config), config.max_escape_rate);
    }

    #[test]
    fn escape_mostly_succeeds_with_a_huge_speed_edge() {
        let config = GameConfig::default();
        let mut successes = 0;
        for seed in 0..20u64 {
            let mut state =
                BattleState::new(vec![member(10, 0, 0, 200)], vec![enemy(50, 0, 10)], seed);
            let outcome = resolve(
                &mut state,
                CombatantId::party(0),
                &BattleAction::Escape,
                &config,
                &PcgRng,
            );
            if let ActionOutcome::Escape { escaped: true, .. } = outcome {
                successes += 1;
                assert_eq!(state.outcome(), Some(BattleOutcome::Escaped));
                assert_eq!(state.phase, BattlePhase::Ended);
            }
        }
        // Rate is pinned at 0.95: the large majority succeed.
        assert!(successes >= 12, "only {successes}/20 escapes succeeded");
    }

    #[test]
    fn failed_escape_increments_attempts_and_continues() {
        let config = GameConfig::default();
        // Slow party, fast enemies: rate pinned at the 0.1 floor.
        let mut found_failure = false;
        for seed in 0..50u64 {
            let mut state =
                BattleState::new(vec![member(10, 0, 0, 1)], vec![enemy(50, 0, 200)], seed);
            let outcome = resolve(
                &mut state,
                CombatantId::party(0),
                &BattleAction::Escape,
                &config,
                &PcgRng,
            );
            if let ActionOutcome::Escape { escaped: false, rate } = outcome {
                assert_eq!(rate, config.min_escape_rate);
                assert_eq!(state.escape_attempts, 1);
                assert_eq!(state.outcome(), None);
                found_failure = true;
                break;
            }
        }
        assert!(found_failure, "no failed escape across 50 seeds at 10%");
    }
}
