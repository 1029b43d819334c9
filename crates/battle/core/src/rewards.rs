//! Reward aggregation and drop-table rolls.

use crate::rng::{RngOracle, RollContext, compute_seed};
use crate::state::combatant::Enemy;

/// One item that dropped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropRecord {
    pub item_id: String,
    /// Probability the entry was rolled at, for host-side narration.
    pub probability: f64,
    pub quantity: u32,
}

/// Everything a won (or fled-from) battle yields, handed to the host's
/// leveling/inventory systems.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRewards {
    pub exp: u32,
    pub money: u32,
    /// Drops in roll order. Entries are independent trials: several drops
    /// from the same enemy can all succeed.
    pub items: Vec<DropRecord>,
}

/// Aggregate rewards over the defeated enemies.
///
/// Experience and money sum across enemies; every drop-table entry rolls
/// an independent Bernoulli trial under its own derived seed, with no
/// mutual exclusion and no per-battle cap.
pub fn calculate_rewards(
    defeated: &[&Enemy],
    rng: &(impl RngOracle + ?Sized),
    battle_seed: u64,
    nonce: u64,
) -> BattleRewards {
    let mut rewards = BattleRewards::default();

    for (enemy_index, enemy) in defeated.iter().enumerate() {
        rewards.exp += enemy.exp_reward;
        rewards.money += enemy.money_reward;

        for (entry_index, entry) in enemy.drop_table.iter().enumerate() {
            // Distinct slot per (enemy, entry) keeps the trials independent.
            let slot = (enemy_index as u32) << 8 | entry_index as u32;
            let seed = compute_seed(battle_seed, nonce, slot, RollContext::Drop);
            if rng.unit(seed) < entry.probability {
                rewards.items.push(DropRecord {
                    item_id: entry.item_id.clone(),
                    probability: entry.probability,
                    quantity: entry.quantity,
                });
            }
        }
    }

    rewards
}
