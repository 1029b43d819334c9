//! Enemy templates and level-scaled instantiation.
//!
//! A [`EnemyCatalog`] holds reusable [`EnemyTemplate`]s by id; spawning
//! clones a template and scales its stats and rewards to the requested
//! level. Templates are never mutated by a spawn.

use std::collections::HashMap;

use crate::combat::element::ResistanceTable;
use crate::state::combatant::{AiStrategy, Combatant, DropEntry, Enemy, Stats};

/// Errors from enemy instantiation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown enemy template `{template_id}`")]
    UnknownTemplate { template_id: String },
}

/// Per-stat growth multipliers, as growth per level above 1.
///
/// A stat's multiplier at `level` is `1 + (level − 1) × growth`. Stats
/// without an explicit growth use [`EnemyTemplate::DEFAULT_GROWTH`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthCurve {
    pub max_hp: Option<f64>,
    pub max_mp: Option<f64>,
    pub attack: Option<f64>,
    pub defense: Option<f64>,
    pub magic: Option<f64>,
    pub magic_defense: Option<f64>,
    pub speed: Option<f64>,
    pub luck: Option<f64>,
}

impl GrowthCurve {
    pub const fn uniform(growth: f64) -> Self {
        Self {
            max_hp: Some(growth),
            max_mp: Some(growth),
            attack: Some(growth),
            defense: Some(growth),
            magic: Some(growth),
            magic_defense: Some(growth),
            speed: Some(growth),
            luck: Some(growth),
        }
    }

    pub const fn none() -> Self {
        Self {
            max_hp: None,
            max_mp: None,
            attack: None,
            defense: None,
            magic: None,
            magic_defense: None,
            speed: None,
            luck: None,
        }
    }
}

impl Default for GrowthCurve {
    fn default() -> Self {
        Self::none()
    }
}

/// Blueprint for an enemy kind: level-1 stats, rewards, and drops.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    /// Base stats at level 1.
    pub stats: Stats,
    /// Base rewards at level 1; scaled by the default growth.
    pub exp_reward: u32,
    pub money_reward: u32,
    pub drop_table: Vec<DropEntry>,
    pub resistances: Option<ResistanceTable>,
    pub growth: GrowthCurve,
    /// Behavior preset copied onto every spawned instance.
    pub strategy: AiStrategy,
}

impl EnemyTemplate {
    /// Default per-level growth: +10% of the base per level above 1.
    pub const DEFAULT_GROWTH: f64 = 0.1;

    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            exp_reward: 0,
            money_reward: 0,
            drop_table: Vec::new(),
            resistances: None,
            growth: GrowthCurve::none(),
            strategy: AiStrategy::default(),
        }
    }

    pub fn with_rewards(mut self, exp: u32, money: u32) -> Self {
        self.exp_reward = exp;
        self.money_reward = money;
        self
    }

    pub fn with_drop_table(mut self, drop_table: Vec<DropEntry>) -> Self {
        self.drop_table = drop_table;
        self
    }

    pub fn with_resistances(mut self, resistances: ResistanceTable) -> Self {
        self.resistances = Some(resistances);
        self
    }

    pub fn with_growth(mut self, growth: GrowthCurve) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_strategy(mut self, strategy: AiStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Instantiate this template at `level`.
    ///
    /// Each stat scales by `floor(base × (1 + (level − 1) × growth))`;
    /// rewards scale by the default growth. Levels 0 and 1 both mean the
    /// base values. Accuracy, evasion, and critical rate do not scale.
    pub fn spawn(&self, level: u32) -> Enemy {
        let levels_above = level.saturating_sub(1) as f64;
        let scale =
            |growth: Option<f64>| 1.0 + levels_above * growth.unwrap_or(Self::DEFAULT_GROWTH);
        let scaled_u32 = |base: u32, growth: Option<f64>| (base as f64 * scale(growth)) as u32;
        let scaled_i32 = |base: i32, growth: Option<f64>| (base as f64 * scale(growth)) as i32;

        let stats = Stats {
            max_hp: scaled_u32(self.stats.max_hp, self.growth.max_hp),
            max_mp: scaled_u32(self.stats.max_mp, self.growth.max_mp),
            attack: scaled_i32(self.stats.attack, self.growth.attack),
            defense: scaled_i32(self.stats.defense, self.growth.defense),
            magic: scaled_i32(self.stats.magic, self.growth.magic),
            magic_defense: scaled_i32(self.stats.magic_defense, self.growth.magic_defense),
            speed: scaled_i32(self.stats.speed, self.growth.speed),
            luck: scaled_i32(self.stats.luck, self.growth.luck),
            accuracy: self.stats.accuracy,
            evasion: self.stats.evasion,
            critical_rate: self.stats.critical_rate,
        };

        let mut combatant = Combatant::new(self.name.clone(), level.max(1), stats);
        if let Some(resistances) = &self.resistances {
            combatant = combatant.with_resistances(resistances.clone());
        }

        Enemy::new(
            combatant,
            scaled_u32(self.exp_reward, None),
            scaled_u32(self.money_reward, None),
        )
        .with_strategy(self.strategy)
        .with_drop_table(self.drop_table.clone())
    }
}

/// Registry of enemy templates, keyed by template id.
#[derive(Clone, Debug, Default)]
pub struct EnemyCatalog {
    templates: HashMap<String, EnemyTemplate>,
}

impl EnemyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous one with the same id.
    pub fn register(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn template(&self, template_id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(template_id)
    }

    /// Spawn one enemy from a registered template at `level`.
    pub fn spawn(&self, template_id: &str, level: u32) -> Result<Enemy, FactoryError> {
        let template =
            self.templates
                .get(template_id)
                .ok_or_else(|| FactoryError::UnknownTemplate {
                    template_id: template_id.to_owned(),
                })?;
        Ok(template.spawn(level))
    }

    /// Spawn a whole encounter group. Any unknown template id fails the
    /// entire group; no partial rosters.
    pub fn spawn_group(&self, requests: &[(&str, u32)]) -> Result<Vec<Enemy>, FactoryError> {
        requests
            .iter()
            .map(|&(template_id, level)| self.spawn(template_id, level))
            .collect()
    }
}
