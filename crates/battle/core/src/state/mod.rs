//! Battle state: the single mutable record one orchestrator owns.

pub mod combatant;
pub mod skill;
pub mod status;

pub use combatant::{
    AiStrategy, Combatant, CombatantId, DropEntry, Enemy, FormationRow, PartyMember, Side, Stats,
};
pub use skill::{Skill, SkillCost, SkillKind, TargetKind};
pub use status::{StatusEffect, StatusEffects, StatusKind};

use crate::action::{ActionOutcome, BattleAction};

// ============================================================================
// Phase and outcome
// ============================================================================

/// Orchestrator state-machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    Initializing,
    PlayerTurn,
    EnemyTurn,
    Processing,
    Ended,
}

/// Terminal result of a battle. Write-once: once set, the phase is
/// [`BattlePhase::Ended`] and no further actions resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Escaped,
}

// ============================================================================
// History
// ============================================================================

/// One resolved action, as appended to the battle history.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    pub turn: u32,
    pub actor: CombatantId,
    pub action: BattleAction,
    pub outcome: ActionOutcome,
}

// ============================================================================
// Battle state
// ============================================================================

/// Complete state of one battle.
///
/// Exclusively owned by one [`BattleEngine`](crate::engine::BattleEngine);
/// never shared across concurrent battles. The turn order is re-derived
/// from the living roster at every round boundary, never precomputed for
/// the whole battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub phase: BattlePhase,
    /// 1-based round counter.
    pub turn: u32,
    pub party: Vec<PartyMember>,
    pub enemies: Vec<Enemy>,
    /// Acting order for the current round.
    pub turn_order: Vec<CombatantId>,
    /// Index of the current actor within `turn_order`.
    pub cursor: usize,
    /// Terminal result; write-once.
    outcome: Option<BattleOutcome>,
    /// Rewards computed at battle end; write-once.
    pub(crate) rewards: Option<crate::rewards::BattleRewards>,
    /// Append-only resolved-action log.
    pub history: Vec<ActionRecord>,
    /// Advisory preemptive-strike flag computed at battle start. The
    /// engine neither reorders nor skips turns for it; hosts decide what
    /// it means.
    pub preemptive: bool,
    /// Failed escape attempts so far; raises later escape rates.
    pub escape_attempts: u32,
    /// Replay anchor for every roll in this battle.
    pub seed: u64,
    /// Resolved-action counter mixed into roll seeds.
    pub nonce: u64,
}

impl BattleState {
    pub(crate) fn new(party: Vec<PartyMember>, enemies: Vec<Enemy>, seed: u64) -> Self {
        Self {
            phase: BattlePhase::Initializing,
            turn: 1,
            party,
            enemies,
            turn_order: Vec::new(),
            cursor: 0,
            outcome: None,
            rewards: None,
            history: Vec::new(),
            preemptive: false,
            escape_attempts: 0,
            seed,
            nonce: 0,
        }
    }

    /// Shared combatant view by id.
    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        match id.side {
            Side::Party => self.party.get(id.index as usize).map(|m| &m.combatant),
            Side::Enemy => self.enemies.get(id.index as usize).map(|e| &e.combatant),
        }
    }

    /// Mutable combatant view by id.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        match id.side {
            Side::Party => self
                .party
                .get_mut(id.index as usize)
                .map(|m| &mut m.combatant),
            Side::Enemy => self
                .enemies
                .get_mut(id.index as usize)
                .map(|e| &mut e.combatant),
        }
    }

    /// Ids of every living combatant, party first, in slot order.
    pub fn living_ids(&self) -> Vec<CombatantId> {
        let party = self
            .party
            .iter()
            .enumerate()
            .filter(|(_, m)| m.combatant.is_alive())
            .map(|(i, _)| CombatantId::party(i as u8));
        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.combatant.is_alive())
            .map(|(i, _)| CombatantId::enemy(i as u8));
        party.chain(enemies).collect()
    }

    pub fn all_enemies_down(&self) -> bool {
        self.enemies.iter().all(|e| !e.combatant.is_alive())
    }

    pub fn all_party_down(&self) -> bool {
        self.party.iter().all(|m| !m.combatant.is_alive())
    }

    /// The combatant whose turn it is, per the current order and cursor.
    pub fn current_actor(&self) -> Option<CombatantId> {
        self.turn_order.get(self.cursor).copied()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn rewards(&self) -> Option<&crate::rewards::BattleRewards> {
        self.rewards.as_ref()
    }

    /// Sets the terminal outcome and phase. The first write wins; later
    /// writes are ignored.
    pub(crate) fn set_outcome(&mut self, outcome: BattleOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            self.phase = BattlePhase::Ended;
        }
    }

    /// Average speed over the living members of a side. Zero when the
    /// side is empty or wiped.
    pub fn average_speed(&self, side: Side) -> f64 {
        let speeds: Vec<i32> = match side {
            Side::Party => self
                .party
                .iter()
                .filter(|m| m.combatant.is_alive())
                .map(|m| m.combatant.stats.speed)
                .collect(),
            Side::Enemy => self
                .enemies
                .iter()
                .filter(|e| e.combatant.is_alive())
                .map(|e| e.combatant.stats.speed)
                .collect(),
        };
        if speeds.is_empty() {
            return 0.0;
        }
        speeds.iter().map(|&s| s as f64).sum::<f64>() / speeds.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::combatant::Stats;

    fn member(name: &str, hp: u32, speed: i32) -> PartyMember {
        PartyMember::new(
            Combatant::new(
                name,
                1,
                Stats {
                    max_hp: hp,
                    speed,
                    ..Stats::default()
                },
            ),
            "fighter",
        )
    }

    fn enemy(name: &str, hp: u32, speed: i32) -> Enemy {
        Enemy::new(
            Combatant::new(
                name,
                1,
                Stats {
                    max_hp: hp,
                    speed,
                    ..Stats::default()
                },
            ),
            10,
            5,
        )
    }

    #[test]
    fn living_ids_excludes_the_defeated() {
        let mut state = BattleState::new(
            vec![member("a", 10, 5), member("b", 10, 5)],
            vec![enemy("x", 10, 5)],
            0,
        );
        state
            .combatant_mut(CombatantId::party(0))
            .unwrap()
            .apply_damage(10);

        assert_eq!(
            state.living_ids(),
            vec![CombatantId::party(1), CombatantId::enemy(0)]
        );
    }

    #[test]
    fn outcome_is_write_once() {
        let mut state = BattleState::new(vec![member("a", 10, 5)], vec![enemy("x", 10, 5)], 0);
        state.set_outcome(BattleOutcome::Escaped);
        state.set_outcome(BattleOutcome::Defeat);
        assert_eq!(state.outcome(), Some(BattleOutcome::Escaped));
        assert_eq!(state.phase, BattlePhase::Ended);
    }

    #[test]
    fn average_speed_ignores_the_dead_and_handles_empty() {
        let mut state = BattleState::new(
            vec![member("a", 10, 10), member("b", 10, 30)],
            vec![],
            0,
        );
        assert_eq!(state.average_speed(Side::Party), 20.0);
        assert_eq!(state.average_speed(Side::Enemy), 0.0);

        state
            .combatant_mut(CombatantId::party(1))
            .unwrap()
            .apply_damage(10);
        assert_eq!(state.average_speed(Side::Party), 10.0);
    }
}
