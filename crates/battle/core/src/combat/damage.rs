//! Damage and heal amount calculation.

use crate::combat::element::elemental_modifier;
use crate::combat::result::{AppliedModifier, DamageResult};
use crate::config::GameConfig;
use crate::rng::RngOracle;
use crate::state::combatant::Combatant;
use crate::state::skill::{Skill, SkillKind};

/// Calculate base damage for a skill through the formula registry.
///
/// Dispatch order: the registered entry for the skill's kind key (the
/// built-in "physical"/"magic" formulas are ordinary entries), else the
/// mandatory generic attack-based default. Unknown kinds therefore always
/// resolve, never fail.
pub fn base_damage(
    attacker: &Combatant,
    target: &Combatant,
    skill: &Skill,
    is_critical: bool,
    config: &GameConfig,
) -> u32 {
    config
        .formulas
        .damage_formula(skill.kind.as_key())
        .base_damage(attacker, target, skill, is_critical, config)
}

/// Apply the post-formula modifier pipeline to a base damage value.
///
/// # Pipeline
///
/// ```text
/// damage = base
/// if critical:      damage ×= config.critical_multiplier   (traced)
/// if element != none and target has a table:
///                   damage ×= resistance entry             (traced)
/// always:           damage ×= uniform(1 ± damage_variance) (traced)
/// floor, minimum 1
/// ```
///
/// A target without a resistance table is not an error; the elemental
/// modifier simply stays 1.0.
pub fn apply_damage_modifiers(
    base: u32,
    is_critical: bool,
    skill: &Skill,
    target: &Combatant,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
) -> DamageResult {
    let mut damage = base as f64;
    let mut modifiers = Vec::new();

    if is_critical {
        damage *= config.critical_multiplier;
        modifiers.push(AppliedModifier::new("critical", config.critical_multiplier));
    }

    let elemental = elemental_modifier(skill.element, target.resistances.as_ref());
    if elemental != 1.0 {
        modifiers.push(AppliedModifier::new("elemental", elemental));
    }
    damage *= elemental;

    let variance = rng.variance(seed, config.damage_variance);
    modifiers.push(AppliedModifier::new("variance", variance));
    damage *= variance;

    DamageResult {
        damage: damage.floor().max(1.0) as u32,
        base_damage: base,
        hit: true,
        critical: is_critical,
        elemental,
        variance,
        modifiers,
    }
}

/// Calculate a heal amount.
///
/// `magic × power` (or the registered heal override), times a fixed ±5%
/// variance band, floored, minimum 1.
pub fn heal_amount(
    caster: &Combatant,
    target: &Combatant,
    skill: &Skill,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
) -> u32 {
    let base = match config.formulas.heal_formula() {
        Some(formula) => formula.heal_amount(caster, target, skill, config),
        None => caster.stats.magic as f64 * skill.power,
    };

    let variance = rng.variance(seed, config.heal_variance);
    (base * variance).floor().max(1.0) as u32
}

/// Resolve hit, critical, base damage, and modifiers in one pass.
///
/// Convenience wrapper used by the action resolver and the simulation
/// runner: the three rolls consume the distinct seeds so they stay
/// independent. A miss short-circuits to [`DamageResult::miss`].
pub fn resolve_damage(
    attacker: &Combatant,
    target: &Combatant,
    skill: &Skill,
    config: &GameConfig,
    rng: &(impl RngOracle + ?Sized),
    hit_seed: u64,
    crit_seed: u64,
    variance_seed: u64,
) -> DamageResult {
    use crate::combat::hit::{check_critical, check_hit, critical_rate, hit_rate};

    let rate = hit_rate(attacker, target, skill, config);
    if !check_hit(rate, rng, hit_seed) {
        return DamageResult::miss();
    }

    let crit = check_critical(critical_rate(attacker, skill, config), rng, crit_seed);
    let base = base_damage(attacker, target, skill, crit, config);
    apply_damage_modifiers(base, crit, skill, target, config, rng, variance_seed)
}

/// Skill kinds the damage pipeline treats as healing rather than harm.
pub fn is_heal(kind: &SkillKind) -> bool {
    matches!(kind, SkillKind::Heal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::element::{Element, ResistanceTable};
    use crate::rng::PcgRng;
    use crate::state::combatant::Stats;

    fn combatant(attack: i32, defense: i32, magic: i32) -> Combatant {
        Combatant::new(
            "t",
            1,
            Stats {
                max_hp: 100,
                attack,
                defense,
                magic,
                ..Stats::default()
            },
        )
    }

    #[test]
    fn exact_damage_with_variance_disabled() {
        // attack 50, defense 30, power 1.0, no randomness anywhere.
        let mut config = GameConfig::without_variance();
        config.base_critical_rate = 0.0;

        let attacker = combatant(50, 0, 0);
        let target = combatant(0, 30, 0);
        let skill = Skill {
            guaranteed_hit: true,
            ..Skill::basic_attack()
        };

        let result = resolve_damage(&attacker, &target, &skill, &config, &PcgRng, 1, 2, 3);
        assert!(result.hit);
        assert!(!result.critical);
        assert_eq!(result.base_damage, 20);
        assert_eq!(result.damage, 20);
    }

    #[test]
    fn critical_multiplier_applied_and_traced() {
        let config = GameConfig::without_variance();
        let attacker = combatant(50, 0, 0);
        let target = combatant(0, 30, 0);
        let skill = Skill::basic_attack();

        let result =
            apply_damage_modifiers(20, true, &skill, &target, &config, &PcgRng, 99);
        assert_eq!(result.damage, 30); // 20 × 1.5
        assert_eq!(result.modifiers[0].source, "critical");
        assert_eq!(result.modifiers[0].multiplier, config.critical_multiplier);
    }

    #[test]
    fn elemental_weakness_and_immunity() {
        let config = GameConfig::without_variance();
        let skill = Skill {
            element: Element::Fire,
            ..Skill::basic_attack()
        };
        let target = combatant(0, 0, 0)
            .with_resistances(ResistanceTable::new().with(Element::Fire, 2.0));

        let result = apply_damage_modifiers(10, false, &skill, &target, &config, &PcgRng, 7);
        assert_eq!(result.damage, 20);
        assert_eq!(result.elemental, 2.0);

        // Immunity still floors at 1: no zero-damage hits.
        let immune = combatant(0, 0, 0)
            .with_resistances(ResistanceTable::new().with(Element::Fire, 0.0));
        let result = apply_damage_modifiers(10, false, &skill, &immune, &config, &PcgRng, 7);
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn missing_resistance_table_is_neutral() {
        let config = GameConfig::without_variance();
        let skill = Skill {
            element: Element::Fire,
            ..Skill::basic_attack()
        };
        let target = combatant(0, 0, 0);

        let result = apply_damage_modifiers(10, false, &skill, &target, &config, &PcgRng, 7);
        assert_eq!(result.damage, 10);
        assert_eq!(result.elemental, 1.0);
        // Only the variance entry is traced.
        assert_eq!(result.modifiers.len(), 1);
        assert_eq!(result.modifiers[0].source, "variance");
    }

    #[test]
    fn variance_bounds_final_damage() {
        let config = GameConfig::default(); // ±10%
        let skill = Skill::basic_attack();
        let target = combatant(0, 0, 0);

        for seed in 0..500u64 {
            let result = apply_damage_modifiers(100, false, &skill, &target, &config, &PcgRng, seed);
            assert!(
                (90..110).contains(&result.damage),
                "damage {} outside variance band",
                result.damage
            );
        }
    }

    #[test]
    fn damage_on_hit_is_at_least_one() {
        let config = GameConfig::default();
        let attacker = combatant(1, 0, 0);
        let target = combatant(0, 9999, 0);
        let skill = Skill {
            guaranteed_hit: true,
            ..Skill::basic_attack()
        };

        for seed in 0..200u64 {
            let result =
                resolve_damage(&attacker, &target, &skill, &config, &PcgRng, seed, seed, seed);
            assert!(result.hit);
            assert!(result.damage >= 1);
        }
    }

    #[test]
    fn heal_amount_scales_magic_and_floors_at_one() {
        let config = GameConfig::without_variance();
        let caster = combatant(0, 0, 40);
        let target = combatant(0, 0, 0);
        let skill = Skill {
            kind: SkillKind::Heal,
            power: 1.5,
            ..Skill::basic_attack()
        };

        assert_eq!(
            heal_amount(&caster, &target, &skill, &config, &PcgRng, 1),
            60
        );

        let feeble = combatant(0, 0, 0);
        assert_eq!(
            heal_amount(&feeble, &target, &skill, &config, &PcgRng, 1),
            1
        );
    }

    #[test]
    fn heal_override_replaces_base() {
        let mut config = GameConfig::without_variance();
        struct Flat;
        impl crate::combat::formula::HealFormula for Flat {
            fn heal_amount(&self, _: &Combatant, _: &Combatant, _: &Skill, _: &GameConfig) -> f64 {
                123.0
            }
        }
        config.formulas.register_heal(std::sync::Arc::new(Flat));

        let caster = combatant(0, 0, 40);
        let target = combatant(0, 0, 0);
        let skill = Skill {
            kind: SkillKind::Heal,
            ..Skill::basic_attack()
        };
        assert_eq!(
            heal_amount(&caster, &target, &skill, &config, &PcgRng, 1),
            123
        );
    }
}
