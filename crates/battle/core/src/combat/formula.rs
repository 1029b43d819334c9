//! Formula registry: skill-kind keyed damage dispatch plus rate overrides.
//!
//! The registry is the engine's extensibility seam. New games add skill
//! kinds by registering a damage formula under the kind's string key;
//! nothing in the engine special-cases them. The built-in "physical" and
//! "magic" formulas are ordinary pre-registered entries, and a mandatory
//! generic default backs every lookup so an unknown kind can never fail.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GameConfig;
use crate::state::combatant::Combatant;
use crate::state::skill::Skill;

// ============================================================================
// Formula traits
// ============================================================================

/// Base-damage computation for one skill kind.
///
/// Implementations return the pre-modifier base damage and own their
/// minimum-damage floor (the built-ins use `max(1, ..)`).
pub trait DamageFormula: Send + Sync {
    fn base_damage(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        skill: &Skill,
        is_critical: bool,
        config: &GameConfig,
    ) -> u32;
}

/// Replacement hit-rate computation.
///
/// The returned rate is clamped by the caller into
/// `[config.min_hit_rate, 1.0]`; guaranteed-hit skills never reach an
/// override.
pub trait HitFormula: Send + Sync {
    fn hit_rate(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        skill: &Skill,
        config: &GameConfig,
    ) -> f64;
}

/// Replacement critical-rate computation. Clamped by the caller into
/// `[0, 1]`.
pub trait CritFormula: Send + Sync {
    fn critical_rate(&self, attacker: &Combatant, skill: &Skill, config: &GameConfig) -> f64;
}

/// Replacement heal computation, pre-variance. Floored at 1 by the caller.
pub trait HealFormula: Send + Sync {
    fn heal_amount(
        &self,
        caster: &Combatant,
        target: &Combatant,
        skill: &Skill,
        config: &GameConfig,
    ) -> f64;
}

impl<F> DamageFormula for F
where
    F: Fn(&Combatant, &Combatant, &Skill, bool, &GameConfig) -> u32 + Send + Sync,
{
    fn base_damage(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        skill: &Skill,
        is_critical: bool,
        config: &GameConfig,
    ) -> u32 {
        self(attacker, target, skill, is_critical, config)
    }
}

// ============================================================================
// Built-in formulas
// ============================================================================

/// `max(1, attack × power − defense)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhysicalDamage;

impl DamageFormula for PhysicalDamage {
    fn base_damage(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        skill: &Skill,
        _is_critical: bool,
        _config: &GameConfig,
    ) -> u32 {
        let raw = attacker.stats.attack as f64 * skill.power - target.stats.defense as f64;
        raw.floor().max(1.0) as u32
    }
}

/// `max(1, magic × power − magic_defense)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicDamage;

impl DamageFormula for MagicDamage {
    fn base_damage(
        &self,
        attacker: &Combatant,
        target: &Combatant,
        skill: &Skill,
        _is_critical: bool,
        _config: &GameConfig,
    ) -> u32 {
        let raw = attacker.stats.magic as f64 * skill.power - target.stats.magic_defense as f64;
        raw.floor().max(1.0) as u32
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Maps skill-kind keys to damage formulas, with dedicated override slots
/// for hit rate, critical rate, and healing.
///
/// Lookups go: registered entry for the kind's key, else the mandatory
/// generic default (the physical formula). The default can be replaced but
/// never removed.
#[derive(Clone)]
pub struct FormulaRegistry {
    damage: HashMap<String, Arc<dyn DamageFormula>>,
    default_damage: Arc<dyn DamageFormula>,
    hit: Option<Arc<dyn HitFormula>>,
    critical: Option<Arc<dyn CritFormula>>,
    heal: Option<Arc<dyn HealFormula>>,
}

impl FormulaRegistry {
    /// Registry with the built-in physical/magic entries and the generic
    /// attack-based default.
    pub fn new() -> Self {
        let mut damage: HashMap<String, Arc<dyn DamageFormula>> = HashMap::new();
        damage.insert("physical".to_owned(), Arc::new(PhysicalDamage));
        damage.insert("magic".to_owned(), Arc::new(MagicDamage));

        Self {
            damage,
            default_damage: Arc::new(PhysicalDamage),
            hit: None,
            critical: None,
            heal: None,
        }
    }

    /// Registers (or replaces) the damage formula for a skill-kind key.
    pub fn register(&mut self, kind_key: impl Into<String>, formula: Arc<dyn DamageFormula>) {
        self.damage.insert(kind_key.into(), formula);
    }

    /// Replaces the generic fallback used for unregistered kinds.
    pub fn register_default(&mut self, formula: Arc<dyn DamageFormula>) {
        self.default_damage = formula;
    }

    /// Installs a hit-rate override.
    pub fn register_hit(&mut self, formula: Arc<dyn HitFormula>) {
        self.hit = Some(formula);
    }

    /// Installs a critical-rate override.
    pub fn register_critical(&mut self, formula: Arc<dyn CritFormula>) {
        self.critical = Some(formula);
    }

    /// Installs a heal override.
    pub fn register_heal(&mut self, formula: Arc<dyn HealFormula>) {
        self.heal = Some(formula);
    }

    /// Resolves the damage formula for a skill-kind key. Never fails: an
    /// unregistered key resolves to the generic default.
    pub fn damage_formula(&self, kind_key: &str) -> &dyn DamageFormula {
        self.damage
            .get(kind_key)
            .map(Arc::as_ref)
            .unwrap_or(self.default_damage.as_ref())
    }

    pub fn hit_formula(&self) -> Option<&dyn HitFormula> {
        self.hit.as_deref()
    }

    pub fn critical_formula(&self) -> Option<&dyn CritFormula> {
        self.critical.as_deref()
    }

    pub fn heal_formula(&self) -> Option<&dyn HealFormula> {
        self.heal.as_deref()
    }
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormulaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.damage.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("FormulaRegistry")
            .field("damage_keys", &keys)
            .field("hit_override", &self.hit.is_some())
            .field("critical_override", &self.critical.is_some())
            .field("heal_override", &self.heal.is_some())
            .finish()
    }
}
