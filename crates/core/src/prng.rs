//! Replaceable random streams for particle spawning.
//!
//! Simulations never touch a global random source. They draw from a
//! [`RandomSource`], which is [`Xorshift64`] in production (seedable, same
//! sequence on every platform) and can be swapped for a [`ScriptedRandom`]
//! when a test needs to pin exact spawn values.

use serde::{Deserialize, Serialize};

/// A stream of uniformly distributed random values.
///
/// Only [`next_u64`](RandomSource::next_u64) is required; the float and range
/// helpers derive from it. Implementors may override the helpers when they
/// have a more direct representation.
pub trait RandomSource {
    /// Returns the next 64-bit value of the stream.
    fn next_u64(&mut self) -> u64;

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` for full mantissa precision.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed u32 in [min, max).
    ///
    /// Returns `min` when the range is empty.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as f64;
        min + ((self.next_f64() * span) as u32).min(max - min - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }

    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17). Seed of 0 is replaced with
/// a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed (0 maps to a fixed fallback).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }
}

impl RandomSource for Xorshift64 {
    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

/// A random source that replays a fixed list of unit-interval values.
///
/// Values cycle once exhausted. Inputs are clamped into [0, 1) so the range
/// helpers keep their half-open contract.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Creates a stream replaying `values`. An empty list replays `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() {
            vec![0.0]
        } else {
            values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect()
        };
        Self { values, cursor: 0 }
    }

    /// A stream that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u64(&mut self) -> u64 {
        (self.next_f64() * (1u64 << 53) as f64) as u64 * (1 << 11)
    }

    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, every saved scene replays differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0, "seed=0 guard failed");
        }
    }

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "sequences diverged at {i}");
        }
    }

    #[test]
    fn next_range_stays_within_specified_bounds() {
        let mut rng = Xorshift64::new(9999);
        for i in 0..10_000 {
            let v = rng.next_range(10.0, 20.0);
            assert!(
                (10.0..20.0).contains(&v),
                "next_range(10, 20) = {v} out of bounds at iteration {i}"
            );
        }
    }

    #[test]
    fn next_u32_range_covers_both_ends() {
        let mut rng = Xorshift64::new(31);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..10_000 {
            let v = rng.next_u32_range(100, 103);
            assert!((100..103).contains(&v));
            seen_min |= v == 100;
            seen_max |= v == 102;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn next_u32_range_empty_range_returns_min() {
        let mut rng = Xorshift64::new(1);
        assert_eq!(rng.next_u32_range(5, 5), 5);
        assert_eq!(rng.next_u32_range(9, 2), 9);
    }

    #[test]
    fn scripted_random_replays_and_cycles() {
        let mut rng = ScriptedRandom::new(vec![0.25, 0.5]);
        assert_eq!(rng.next_f64(), 0.25);
        assert_eq!(rng.next_f64(), 0.5);
        assert_eq!(rng.next_f64(), 0.25);
    }

    #[test]
    fn scripted_random_keeps_half_open_contract() {
        let mut rng = ScriptedRandom::constant(1.0);
        let v = rng.next_range(0.0, 10.0);
        assert!(v < 10.0, "scripted 1.0 must stay below max, got {v}");
        assert_eq!(rng.next_u32_range(100, 300), 299);
    }

    #[test]
    fn boxed_source_delegates() {
        let mut boxed: Box<dyn RandomSource> = Box::new(ScriptedRandom::constant(0.5));
        assert_eq!(boxed.next_range(0.0, 4.0), 2.0);
    }

    #[test]
    fn serialization_roundtrip_preserves_state() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for i in 0..100 {
            assert_eq!(
                rng.next_u64(),
                restored.next_u64(),
                "sequences diverged after deserialization at index {i}"
            );
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_u32_range_in_bounds_for_any_seed(
                seed: u64,
                min in 0_u32..1000,
                span in 1_u32..1000,
            ) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_u32_range(min, min + span);
                    prop_assert!(v >= min && v < min + span);
                }
            }
        }
    }
}
