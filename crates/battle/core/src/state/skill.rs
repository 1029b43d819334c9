//! Skill definitions.
//!
//! Skills are static data shared by reference (`Arc<Skill>`) across many
//! combatants; the engine never mutates one.

use crate::combat::element::Element;

/// Skill-type tag driving formula dispatch.
///
/// `Physical`, `Magic`, and `Heal` are the engine's built-in kinds.
/// `Custom` lets a game introduce new kinds purely through configuration:
/// registering a formula under the same key in
/// [`FormulaRegistry`](crate::combat::formula::FormulaRegistry) is all it
/// takes — unregistered custom kinds fall back to the generic attack
/// formula rather than failing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    Physical,
    Magic,
    Heal,
    Custom(String),
}

impl SkillKind {
    /// Stable string key used by the formula registry.
    pub fn as_key(&self) -> &str {
        match self {
            SkillKind::Physical => "physical",
            SkillKind::Magic => "magic",
            SkillKind::Heal => "heal",
            SkillKind::Custom(key) => key,
        }
    }
}

impl std::fmt::Display for SkillKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Resource cost paid when a skill is used.
///
/// The cost is spent before the effect roll, so a missed skill still
/// consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCost {
    pub mp: u32,
}

impl SkillCost {
    pub const fn mp(mp: u32) -> Self {
        Self { mp }
    }
}

/// What a skill may target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    SingleEnemy,
    SingleAlly,
    SelfOnly,
}

/// Static skill definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub kind: SkillKind,
    /// Stat multiplier fed to the damage/heal formula.
    pub power: f64,
    /// Base accuracy in `[0, 1]` before attacker/target stat adjustment.
    pub accuracy: f64,
    /// Added to the attacker's critical rate.
    pub critical_bonus: f64,
    pub cost: SkillCost,
    pub target: TargetKind,
    pub element: Element,
    /// Bypasses the hit computation entirely: the hit rate is exactly 1.0
    /// regardless of stats or overrides.
    pub guaranteed_hit: bool,
}

impl Skill {
    /// The implicit skill behind a basic attack command.
    pub fn basic_attack() -> Self {
        Self {
            name: "Attack".to_owned(),
            kind: SkillKind::Physical,
            power: 1.0,
            accuracy: 0.95,
            critical_bonus: 0.0,
            cost: SkillCost::default(),
            target: TargetKind::SingleEnemy,
            element: Element::None,
            guaranteed_hit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_attack_shape() {
        let skill = Skill::basic_attack();
        assert_eq!(skill.kind, SkillKind::Physical);
        assert_eq!(skill.power, 1.0);
        assert_eq!(skill.accuracy, 0.95);
        assert_eq!(skill.element, Element::None);
        assert!(!skill.guaranteed_hit);
        assert_eq!(skill.cost.mp, 0);
    }

    #[test]
    fn custom_kind_key_passes_through() {
        let kind = SkillKind::Custom("breath".to_owned());
        assert_eq!(kind.as_key(), "breath");
        assert_eq!(SkillKind::Magic.as_key(), "magic");
    }
}
