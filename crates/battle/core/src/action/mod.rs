//! Battle actions and their structured outcomes.
//!
//! Actions are a closed sum type: there is no "unknown action type" at
//! runtime because one cannot be constructed. Expected resolution failures
//! (no target, insufficient MP, …) are ordinary [`ActionOutcome::Failed`]
//! values the host branches on — never errors. Probabilistic negatives
//! (a miss, a failed escape) are successful outcomes carrying their own
//! flags, distinct from both.

pub mod resolve;

use std::sync::Arc;

use crate::combat::DamageResult;
use crate::state::combatant::CombatantId;
use crate::state::skill::Skill;

// ============================================================================
// Actions
// ============================================================================

/// A command submitted for the current actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    /// Basic attack with the implicit physical skill.
    Attack { target: CombatantId },
    /// Use a skill on a target.
    UseSkill {
        skill: Arc<Skill>,
        target: CombatantId,
    },
    /// Brace for incoming damage until the actor's next turn.
    Defend,
    /// Attempt to flee; success ends the whole battle.
    Escape,
}

impl BattleAction {
    /// Short name for logs and history narration.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BattleAction::Attack { .. } => "attack",
            BattleAction::UseSkill { .. } => "skill",
            BattleAction::Defend => "defend",
            BattleAction::Escape => "escape",
        }
    }
}

// ============================================================================
// Failures (expected, value-level)
// ============================================================================

/// Why an action could not be resolved.
///
/// These are input-driven outcomes the host must branch on, so they are
/// returned as values rather than raised as engine errors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionFailure {
    /// The target slot is empty or the target is already down.
    NoTarget,
    /// The skill or its target could not be resolved.
    InvalidSkillOrTarget,
    /// The actor cannot pay the skill's MP cost. MP is left untouched.
    InsufficientMp { required: u32, current: u32 },
}

impl std::fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionFailure::NoTarget => write!(f, "no target"),
            ActionFailure::InvalidSkillOrTarget => write!(f, "invalid skill or target"),
            ActionFailure::InsufficientMp { required, current } => {
                write!(f, "insufficient MP: need {required}, have {current}")
            }
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Structured result of one resolved action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// An attack or offensive skill resolved (including misses: a miss is
    /// a successful computation with `result.hit == false`).
    Damage {
        target: CombatantId,
        result: DamageResult,
    },
    /// A heal resolved; `amount` is the HP actually restored after the
    /// max-HP cap.
    Heal { target: CombatantId, amount: u32 },
    /// The actor braced. `applied` is false when the stack cap already
    /// held the tag; the action still succeeds.
    Defend { applied: bool },
    /// An escape attempt resolved. `escaped == true` is terminal for the
    /// battle; `false` just reports the failed attempt.
    Escape { escaped: bool, rate: f64 },
    /// The action could not be resolved.
    Failed(ActionFailure),
}

impl ActionOutcome {
    /// Whether the action resolved (misses and failed escapes count as
    /// resolved; [`ActionOutcome::Failed`] does not).
    pub fn success(&self) -> bool {
        !matches!(self, ActionOutcome::Failed(_))
    }

    /// Whether this outcome was an offensive roll that missed.
    pub fn missed(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Damage { result, .. } if !result.hit
        )
    }

    /// Host-facing one-line description.
    pub fn message(&self) -> String {
        match self {
            ActionOutcome::Damage { target, result } if result.hit => {
                if result.critical {
                    format!("critical hit on {target} for {}", result.damage)
                } else {
                    format!("hit {target} for {}", result.damage)
                }
            }
            ActionOutcome::Damage { target, .. } => format!("missed {target}"),
            ActionOutcome::Heal { target, amount } => format!("healed {target} for {amount}"),
            ActionOutcome::Defend { .. } => "defending".to_owned(),
            ActionOutcome::Escape { escaped: true, .. } => "escaped".to_owned(),
            ActionOutcome::Escape { escaped: false, .. } => "failed to escape".to_owned(),
            ActionOutcome::Failed(failure) => failure.to_string(),
        }
    }
}
