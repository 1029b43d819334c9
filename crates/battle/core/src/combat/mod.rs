//! Combat math: hit/critical rates, damage dispatch, heals, elements.
//!
//! Everything here is a pure function of combatant records, skill data,
//! and config; battle state never enters. Probabilistic entry points take
//! an [`RngOracle`](crate::rng::RngOracle) plus an explicit seed.

pub mod damage;
pub mod element;
pub mod formula;
pub mod hit;
pub mod result;

pub use damage::{apply_damage_modifiers, base_damage, heal_amount, resolve_damage};
pub use element::{Element, ResistanceTable, elemental_modifier};
pub use formula::{
    CritFormula, DamageFormula, FormulaRegistry, HealFormula, HitFormula, MagicDamage,
    PhysicalDamage,
};
pub use hit::{check_critical, check_hit, critical_rate, hit_rate};
pub use result::{AppliedModifier, DamageResult};
