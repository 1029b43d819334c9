//! Combat result types.

/// One named multiplier recorded while damage modifiers were applied.
///
/// The trace exists for diagnostics and UI narration only; nothing in the
/// engine reads it back.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedModifier {
    /// Modifier source (e.g. "critical", "elemental", "variance").
    pub source: String,
    pub multiplier: f64,
}

impl AppliedModifier {
    pub fn new(source: impl Into<String>, multiplier: f64) -> Self {
        Self {
            source: source.into(),
            multiplier,
        }
    }
}

/// Full outcome of one damage computation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    /// Final damage after every modifier, floored, at least 1 on a hit.
    pub damage: u32,
    /// Formula output before modifiers.
    pub base_damage: u32,
    pub hit: bool,
    pub critical: bool,
    /// Elemental multiplier that was applied (1.0 when not applicable).
    pub elemental: f64,
    /// Variance factor that was applied.
    pub variance: f64,
    /// Ordered trace of the modifiers applied, for narration.
    pub modifiers: Vec<AppliedModifier>,
}

impl DamageResult {
    /// Result for an attack that missed: no damage, empty trace.
    pub fn miss() -> Self {
        Self {
            damage: 0,
            base_damage: 0,
            hit: false,
            critical: false,
            elemental: 1.0,
            variance: 1.0,
            modifiers: Vec::new(),
        }
    }
}
