//! Combatant records: stats, party members, and enemies.
//!
//! A [`Combatant`] is anything that can act in a battle. Party members and
//! enemies compose one rather than inherit from it; the battle engine only
//! ever needs the shared [`Combatant`] view plus side-specific extras
//! (skills for the party, rewards and drops for enemies).

use std::sync::Arc;

use crate::combat::element::ResistanceTable;
use crate::state::skill::Skill;
use crate::state::status::StatusEffects;

// ============================================================================
// Identity
// ============================================================================

/// Which side of the battle a combatant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Party,
    Enemy,
}

/// Stable identity of a combatant within one battle.
///
/// Ordered: party slots sort before enemy slots, then by index. The turn
/// scheduler uses this ordering as its deterministic tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId {
    pub side: Side,
    pub index: u8,
}

impl CombatantId {
    pub const fn party(index: u8) -> Self {
        Self {
            side: Side::Party,
            index,
        }
    }

    pub const fn enemy(index: u8) -> Self {
        Self {
            side: Side::Enemy,
            index,
        }
    }

    /// Compact numeric form mixed into roll seeds. Party and enemy slots
    /// occupy disjoint ranges.
    pub(crate) fn slot(self) -> u32 {
        match self.side {
            Side::Party => self.index as u32,
            Side::Enemy => 0x100 + self.index as u32,
        }
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Side::Party => write!(f, "party[{}]", self.index),
            Side::Enemy => write!(f, "enemy[{}]", self.index),
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Named numeric attributes of a combatant.
///
/// Owned by the combatant holding it and copied, never aliased, when
/// scaling or previewing. `accuracy`/`evasion` are percentage points
/// (80 = +0.80 hit contribution); `critical_rate` is a fraction added
/// directly to the critical chance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub magic_defense: i32,
    pub speed: i32,
    pub luck: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub critical_rate: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            max_hp: 1,
            max_mp: 0,
            attack: 0,
            defense: 0,
            magic: 0,
            magic_defense: 0,
            speed: 0,
            luck: 0,
            accuracy: 0,
            evasion: 0,
            critical_rate: 0.0,
        }
    }
}

/// Row a combatant occupies in formation.
///
/// The core records it for targeting/narration; row modifiers belong to
/// game-specific formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormationRow {
    #[default]
    Front,
    Back,
}

// ============================================================================
// Combatant
// ============================================================================

/// A single battle participant: identity, stats, and mutable resources.
///
/// Created by the enemy factory or external character tooling; mutated in
/// place by the action resolver. Defeat is `hp == 0`, never removal from
/// the roster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub name: String,
    pub level: u32,
    pub stats: Stats,
    hp: u32,
    mp: u32,
    pub statuses: StatusEffects,
    pub position: FormationRow,
    /// Elemental resistance table, when this combatant has one. Absence
    /// means every element lands at modifier 1.0.
    pub resistances: Option<ResistanceTable>,
}

impl Combatant {
    /// Creates a combatant at full HP/MP.
    pub fn new(name: impl Into<String>, level: u32, stats: Stats) -> Self {
        let hp = stats.max_hp;
        let mp = stats.max_mp;
        Self {
            name: name.into(),
            level,
            stats,
            hp,
            mp,
            statuses: StatusEffects::empty(),
            position: FormationRow::default(),
            resistances: None,
        }
    }

    pub fn with_resistances(mut self, resistances: ResistanceTable) -> Self {
        self.resistances = Some(resistances);
        self
    }

    pub fn with_position(mut self, position: FormationRow) -> Self {
        self.position = position;
        self
    }

    /// Current HP. Always within `[0, max_hp]`.
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Current MP. Always within `[0, max_mp]`.
    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage, flooring HP at zero. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Applies healing, capping HP at the maximum. Returns the HP actually
    /// restored.
    pub fn apply_heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.stats.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Restores HP to the maximum.
    pub fn restore_hp(&mut self) {
        self.hp = self.stats.max_hp;
    }

    /// Spends MP. Returns false (leaving MP untouched) when short.
    #[must_use]
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    /// Restores MP, capping at the maximum.
    pub fn restore_mp(&mut self, amount: u32) {
        self.mp = (self.mp + amount).min(self.stats.max_mp);
    }
}

// ============================================================================
// Party members and enemies
// ============================================================================

/// A player-controlled combatant: shared combatant record plus a job tag
/// and learned skills.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub combatant: Combatant,
    pub job: String,
    pub skills: Vec<Arc<Skill>>,
}

impl PartyMember {
    pub fn new(combatant: Combatant, job: impl Into<String>) -> Self {
        Self {
            combatant,
            job: job.into(),
            skills: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: Vec<Arc<Skill>>) -> Self {
        self.skills = skills;
        self
    }
}

/// One potential item reward on an enemy's drop table.
///
/// Every entry is rolled independently when the enemy's battle is won;
/// several entries from the same enemy may all drop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item_id: String,
    /// Drop probability in `[0, 1]`.
    pub probability: f64,
    pub quantity: u32,
}

/// Behavior preset an enemy's controller follows.
///
/// Data only: the engine never picks actions for anyone. The host's
/// enemy-AI layer reads this tag when deciding what to submit for an
/// enemy's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiStrategy {
    /// Attack the weakest-looking opponent.
    #[default]
    Aggressive,
    /// Prefer defending when hurt.
    Defensive,
    /// Pick targets and actions uniformly.
    Random,
    /// Prefer skills over basic attacks.
    Caster,
}

/// An enemy combatant: shared combatant record plus an AI-strategy tag,
/// reward yields, and a drop table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub combatant: Combatant,
    pub strategy: AiStrategy,
    pub exp_reward: u32,
    pub money_reward: u32,
    pub drop_table: Vec<DropEntry>,
}

impl Enemy {
    pub fn new(combatant: Combatant, exp_reward: u32, money_reward: u32) -> Self {
        Self {
            combatant,
            strategy: AiStrategy::default(),
            exp_reward,
            money_reward,
            drop_table: Vec::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: AiStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_drop_table(mut self, drop_table: Vec<DropEntry>) -> Self {
        self.drop_table = drop_table;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        Stats {
            max_hp: 100,
            max_mp: 30,
            ..Stats::default()
        }
    }

    #[test]
    fn new_combatant_starts_at_full_resources() {
        let c = Combatant::new("hero", 1, stats());
        assert_eq!(c.hp(), 100);
        assert_eq!(c.mp(), 30);
        assert!(c.is_alive());
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut c = Combatant::new("hero", 1, stats());
        let lost = c.apply_damage(250);
        assert_eq!(lost, 100);
        assert_eq!(c.hp(), 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn heal_caps_at_max() {
        let mut c = Combatant::new("hero", 1, stats());
        c.apply_damage(40);
        let healed = c.apply_heal(9999);
        assert_eq!(healed, 40);
        assert_eq!(c.hp(), 100);
    }

    #[test]
    fn spend_mp_refuses_when_short() {
        let mut c = Combatant::new("hero", 1, stats());
        assert!(!c.spend_mp(31));
        assert_eq!(c.mp(), 30);
        assert!(c.spend_mp(30));
        assert_eq!(c.mp(), 0);
    }

    #[test]
    fn party_ids_sort_before_enemy_ids() {
        assert!(CombatantId::party(7) < CombatantId::enemy(0));
        assert!(CombatantId::enemy(0) < CombatantId::enemy(1));
    }
}
