//! Deterministic turn-based battle logic, headless by construction.
//!
//! `battle-core` defines the canonical combat rules (combat math, turn
//! scheduling, action resolution, rewards) and exposes pure synchronous
//! APIs for hosts to drive. All battle mutation flows through
//! [`engine::BattleEngine`]; given the same rosters, configuration, and
//! battle seed, every roll and outcome replays identically.
pub mod action;
pub mod combat;
pub mod config;
pub mod engine;
pub mod factory;
pub mod rewards;
pub mod rng;
pub mod state;

pub use action::{ActionFailure, ActionOutcome, BattleAction};
pub use combat::{
    AppliedModifier, CritFormula, DamageFormula, DamageResult, Element, FormulaRegistry,
    HealFormula, HitFormula, MagicDamage, PhysicalDamage, ResistanceTable, apply_damage_modifiers,
    base_damage, check_critical, check_hit, critical_rate, elemental_modifier, heal_amount,
    hit_rate, resolve_damage,
};
pub use config::GameConfig;
pub use engine::{BattleEngine, EngineError, preemptive_strike, turn_order};
pub use factory::{EnemyCatalog, EnemyTemplate, FactoryError, GrowthCurve};
pub use rewards::{BattleRewards, DropRecord, calculate_rewards};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
pub use state::{
    ActionRecord, AiStrategy, BattleOutcome, BattlePhase, BattleState, Combatant, CombatantId,
    DropEntry, Enemy, FormationRow, PartyMember, Side, Skill, SkillCost, SkillKind, Stats,
    StatusEffect, StatusEffects, StatusKind, TargetKind,
};
