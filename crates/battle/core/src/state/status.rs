//! Status-effect tags carried by combatants.
//!
//! The combat core only *applies* tags (defend attaches a `DefenseUp`
//! tag); duration ticking, expiry, and stacking rules beyond the simple
//! per-kind cap belong to the host's status-effect subsystem. Tags record
//! everything that subsystem needs: kind, remaining turns, and magnitude.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Types of status-effect tags the core can attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Incoming damage reduced (applied by the defend action).
    DefenseUp,
    /// Attack raised by a skill effect.
    AttackUp,
    /// HP loss over time.
    Poisoned,
    /// Cannot act.
    Stunned,
}

/// A single status tag.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Turns remaining; decremented by the external status subsystem.
    pub turns: u32,
    /// Effect magnitude (e.g. the defend damage multiplier).
    pub magnitude: f64,
}

/// Active status tags on one combatant, capped at
/// [`GameConfig::MAX_STATUS_EFFECTS`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty tag set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks whether any tag of the given kind is present.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Number of tags of the given kind.
    pub fn count(&self, kind: StatusKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    /// Attaches a tag unless the per-kind stack cap (or the overall list
    /// cap) is already reached. Returns whether the tag was attached.
    pub fn add_capped(&mut self, effect: StatusEffect, stack_cap: u32) -> bool {
        if self.count(effect.kind) >= stack_cap as usize {
            return false;
        }
        if self.effects.is_full() {
            return false;
        }
        self.effects.push(effect);
        true
    }

    /// Removes every tag of the given kind.
    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defend_tag() -> StatusEffect {
        StatusEffect {
            kind: StatusKind::DefenseUp,
            turns: 1,
            magnitude: 0.5,
        }
    }

    #[test]
    fn add_respects_stack_cap() {
        let mut statuses = StatusEffects::empty();
        assert!(statuses.add_capped(defend_tag(), 1));
        assert!(!statuses.add_capped(defend_tag(), 1));
        assert_eq!(statuses.count(StatusKind::DefenseUp), 1);
    }

    #[test]
    fn distinct_kinds_do_not_share_cap() {
        let mut statuses = StatusEffects::empty();
        assert!(statuses.add_capped(defend_tag(), 1));
        assert!(statuses.add_capped(
            StatusEffect {
                kind: StatusKind::AttackUp,
                turns: 2,
                magnitude: 1.2,
            },
            1
        ));
        assert!(statuses.has(StatusKind::DefenseUp));
        assert!(statuses.has(StatusKind::AttackUp));
    }

    #[test]
    fn remove_clears_all_of_kind() {
        let mut statuses = StatusEffects::empty();
        statuses.add_capped(defend_tag(), 3);
        statuses.add_capped(defend_tag(), 3);
        statuses.remove(StatusKind::DefenseUp);
        assert!(statuses.is_empty());
    }
}
