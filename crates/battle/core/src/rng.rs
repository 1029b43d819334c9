//! Deterministic random oracle for battle resolution.
//!
//! Every probabilistic entry point in the engine (hit, critical, variance,
//! escape, drops, turn-order jitter) draws from an [`RngOracle`] with an
//! explicit seed instead of an ambient random function. Given the same
//! battle seed, a battle replays identically, which is what makes the
//! scenario tests and the simulation runner deterministic.

/// Stateless random oracle.
///
/// Implementations must be deterministic: the same seed always produces
/// the same value. State lives in the caller (battle seed + action nonce),
/// not in the oracle.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    ///
    /// Used for Bernoulli trials: an event with probability `p` occurs
    /// when `unit(seed) < p`, so `p = 1.0` always occurs and `p = 0.0`
    /// never does.
    fn unit(&self, seed: u64) -> f64 {
        self.next_u32(seed) as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform value in `[min, max)`.
    fn range(&self, seed: u64, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        min + self.unit(seed) * (max - min)
    }

    /// Multiplicative variance factor in `[1 - spread, 1 + spread)`.
    ///
    /// A spread of zero returns exactly 1.0.
    fn variance(&self, seed: u64, spread: f64) -> f64 {
        self.range(seed, 1.0 - spread, 1.0 + spread)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output permuted from 64-bit state. Deterministic,
/// fast, small state, passes PractRand/TestU01.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one LCG step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Which roll within a single action a seed is derived for.
///
/// One resolved action can need several independent rolls (hit check, then
/// critical check, then damage variance). Mixing a distinct context into
/// the seed keeps the rolls independent while staying replayable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollContext {
    /// Hit check.
    Hit,
    /// Critical check.
    Critical,
    /// Damage variance factor.
    Variance,
    /// Heal variance factor.
    Heal,
    /// Escape attempt.
    Escape,
    /// Turn-order speed jitter.
    Speed,
    /// Drop-table trial.
    Drop,
}

impl RollContext {
    fn as_u32(self) -> u32 {
        match self {
            RollContext::Hit => 0,
            RollContext::Critical => 1,
            RollContext::Variance => 2,
            RollContext::Heal => 3,
            RollContext::Escape => 4,
            RollContext::Speed => 5,
            RollContext::Drop => 6,
        }
    }
}

/// Compute a deterministic roll seed from battle state components.
///
/// # Arguments
///
/// * `battle_seed` - Base seed fixed at `start_battle` (replay anchor)
/// * `nonce` - Action sequence number (increments each resolved action)
/// * `slot` - Index of the combatant (or table entry) the roll concerns
/// * `context` - Which roll within the action this is
pub fn compute_seed(battle_seed: u64, nonce: u64, slot: u32, context: RollContext) -> u64 {
    // Mix inputs with SplitMix64/FxHash multipliers, then avalanche.
    let mut hash = battle_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (slot as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context.as_u32() as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_output() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_eq!(rng.unit(42).to_bits(), rng.unit(42).to_bits());
    }

    #[test]
    fn unit_stays_in_half_open_interval() {
        let rng = PcgRng;
        for seed in 0..1000u64 {
            let v = rng.unit(seed);
            assert!((0.0..1.0).contains(&v), "unit out of range: {v}");
        }
    }

    #[test]
    fn variance_with_zero_spread_is_one() {
        let rng = PcgRng;
        for seed in 0..100u64 {
            assert_eq!(rng.variance(seed, 0.0), 1.0);
        }
    }

    #[test]
    fn variance_bounded_by_spread() {
        let rng = PcgRng;
        for seed in 0..1000u64 {
            let v = rng.variance(seed, 0.1);
            assert!((0.9..1.1).contains(&v), "variance out of range: {v}");
        }
    }

    #[test]
    fn contexts_produce_distinct_seeds() {
        let hit = compute_seed(7, 1, 0, RollContext::Hit);
        let crit = compute_seed(7, 1, 0, RollContext::Critical);
        let var = compute_seed(7, 1, 0, RollContext::Variance);
        assert_ne!(hit, crit);
        assert_ne!(crit, var);
        assert_ne!(hit, var);
    }

    #[test]
    fn nonce_changes_seed() {
        assert_ne!(
            compute_seed(7, 1, 0, RollContext::Hit),
            compute_seed(7, 2, 0, RollContext::Hit)
        );
    }
}
