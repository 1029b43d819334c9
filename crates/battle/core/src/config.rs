//! Battle configuration constants and tunable parameters.

use crate::combat::formula::FormulaRegistry;

/// Combat tunables plus the formula-override registry.
///
/// Consumed by value at engine construction and never mutated by the core.
/// All rates are fractions in `[0, 1]`; multipliers are plain factors.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Critical chance every attacker has before luck/skill bonuses.
    pub base_critical_rate: f64,

    /// Damage multiplier applied on a critical hit.
    pub critical_multiplier: f64,

    /// Half-width of the uniform damage variance band (0.1 = ±10%).
    pub damage_variance: f64,

    /// Half-width of the heal variance band.
    pub heal_variance: f64,

    /// Floor for computed hit rates. Guaranteed-hit skills bypass this.
    pub min_hit_rate: f64,

    /// Escape chance before the speed differential term.
    pub escape_base_rate: f64,

    /// Added to the escape rate for each previously failed attempt.
    pub escape_rate_increment: f64,

    /// Divisor converting the party/enemy average-speed gap into escape
    /// chance.
    pub escape_speed_factor: f64,

    /// Escape rate clamp, lower bound.
    pub min_escape_rate: f64,

    /// Escape rate clamp, upper bound. Kept below 1.0 so escape is never
    /// certain.
    pub max_escape_rate: f64,

    /// Average-speed advantage the party needs for a preemptive strike.
    pub preemptive_strike_threshold: f64,

    /// Half-width of the per-round effective-speed jitter.
    pub speed_variance: f64,

    /// Incoming-damage multiplier recorded on the defend status tag.
    pub defend_multiplier: f64,

    /// Turns a defend status tag lasts before the status subsystem expires
    /// it.
    pub defend_duration_turns: u32,

    /// How many defend tags may stack on one combatant.
    pub defend_stack_cap: u32,

    /// Per-skill-kind formula overrides. Defaults to the built-in
    /// physical/magic entries plus the generic fallback.
    #[cfg_attr(feature = "serde", serde(skip, default))]
    pub formulas: FormulaRegistry,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum status-effect tags carried by one combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum combatants on either side of a battle.
    pub const MAX_SIDE_SIZE: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_CRITICAL_RATE: f64 = 0.05;
    pub const DEFAULT_CRITICAL_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_DAMAGE_VARIANCE: f64 = 0.1;
    pub const DEFAULT_HEAL_VARIANCE: f64 = 0.05;
    pub const DEFAULT_MIN_HIT_RATE: f64 = 0.05;
    pub const DEFAULT_ESCAPE_BASE_RATE: f64 = 0.5;
    pub const DEFAULT_ESCAPE_RATE_INCREMENT: f64 = 0.1;
    pub const DEFAULT_ESCAPE_SPEED_FACTOR: f64 = 100.0;
    pub const DEFAULT_MIN_ESCAPE_RATE: f64 = 0.1;
    pub const DEFAULT_MAX_ESCAPE_RATE: f64 = 0.95;
    pub const DEFAULT_PREEMPTIVE_THRESHOLD: f64 = 10.0;
    pub const DEFAULT_SPEED_VARIANCE: f64 = 0.1;
    pub const DEFAULT_DEFEND_MULTIPLIER: f64 = 0.5;
    pub const DEFAULT_DEFEND_DURATION_TURNS: u32 = 1;
    pub const DEFAULT_DEFEND_STACK_CAP: u32 = 1;

    pub fn new() -> Self {
        Self {
            base_critical_rate: Self::DEFAULT_BASE_CRITICAL_RATE,
            critical_multiplier: Self::DEFAULT_CRITICAL_MULTIPLIER,
            damage_variance: Self::DEFAULT_DAMAGE_VARIANCE,
            heal_variance: Self::DEFAULT_HEAL_VARIANCE,
            min_hit_rate: Self::DEFAULT_MIN_HIT_RATE,
            escape_base_rate: Self::DEFAULT_ESCAPE_BASE_RATE,
            escape_rate_increment: Self::DEFAULT_ESCAPE_RATE_INCREMENT,
            escape_speed_factor: Self::DEFAULT_ESCAPE_SPEED_FACTOR,
            min_escape_rate: Self::DEFAULT_MIN_ESCAPE_RATE,
            max_escape_rate: Self::DEFAULT_MAX_ESCAPE_RATE,
            preemptive_strike_threshold: Self::DEFAULT_PREEMPTIVE_THRESHOLD,
            speed_variance: Self::DEFAULT_SPEED_VARIANCE,
            defend_multiplier: Self::DEFAULT_DEFEND_MULTIPLIER,
            defend_duration_turns: Self::DEFAULT_DEFEND_DURATION_TURNS,
            defend_stack_cap: Self::DEFAULT_DEFEND_STACK_CAP,
            formulas: FormulaRegistry::default(),
        }
    }

    /// A config with every random band collapsed to zero width.
    ///
    /// Hit and critical rates still apply; damage and heal amounts become
    /// exact. Used by scenario tests and balance previews.
    pub fn without_variance() -> Self {
        Self {
            damage_variance: 0.0,
            heal_variance: 0.0,
            speed_variance: 0.0,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
