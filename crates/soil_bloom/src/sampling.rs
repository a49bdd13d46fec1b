//! Random sampling helpers shared by the soil generator and the population spawner.
//!
//! Every helper takes any [`Rng`], so callers decide between a seeded generator
//! (reproducible runs, tests) and an entropy-seeded one.
use rand::Rng;

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float in `[lo, hi)`.
#[inline]
pub fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    let v = lo + rand01(rng) * (hi - lo);
    // rand01 may round up to 1.0 in f32.
    if v >= hi && hi > lo {
        next_down(hi)
    } else {
        v
    }
}

/// Uniform index in `[0, bound)`. `bound` must be non-zero.
#[inline]
pub fn rand_index(rng: &mut dyn Rng, bound: usize) -> usize {
    debug_assert!(bound > 0, "rand_index bound must be > 0");
    if bound <= u32::MAX as usize {
        ((rng.next_u32() as u64 * bound as u64) >> 32) as usize
    } else {
        (rng.next_u64() % bound as u64) as usize
    }
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn Rng) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}

/// Uniform random permutation of `0..n`.
pub fn permutation(n: usize, rng: &mut dyn Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    shuffle(&mut indices, rng);
    indices
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::convert::Infallible;

    use rand::rngs::StdRng;
    use rand::{SeedableRng, TryRng};

    use super::*;

    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl TryRng for FixedRng {
        type Error = Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Infallible> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Infallible> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Infallible> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand_range_stays_below_upper_bound() {
        let mut rng = FixedRng { value: u32::MAX };
        let v = rand_range(&mut rng, -3.0, 3.0);
        assert!((-3.0..3.0).contains(&v), "{v} escaped [-3, 3)");

        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand_range(&mut rng, -3.0, 3.0), -3.0);
    }

    #[test]
    fn rand_index_covers_bounds() {
        let mut low = FixedRng { value: 0 };
        assert_eq!(rand_index(&mut low, 10), 0);
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut high, 10), 9);
    }

    #[test]
    fn permutation_contains_every_index_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let perm = permutation(500, &mut rng);
        assert_eq!(perm.len(), 500);
        let unique: HashSet<_> = perm.iter().copied().collect();
        assert_eq!(unique.len(), 500);
        assert!(perm.iter().all(|&i| i < 500));
        assert_ne!(perm, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_reproducible_for_same_seed() {
        let mut a: Vec<u32> = (0..64).collect();
        let mut b = a.clone();
        shuffle(&mut a, &mut StdRng::seed_from_u64(11));
        shuffle(&mut b, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_prefix_is_spatially_unbiased() {
        // Keep 10% of 1000 indices many times; every decile should receive ~10% of picks.
        let mut rng = StdRng::seed_from_u64(99);
        let mut buckets = [0usize; 10];
        let runs = 400;
        for _ in 0..runs {
            let perm = permutation(1000, &mut rng);
            for &i in &perm[..100] {
                buckets[i / 100] += 1;
            }
        }
        let expected = (runs * 100 / 10) as f32;
        for count in buckets {
            let dev = (count as f32 - expected).abs() / expected;
            assert!(dev < 0.1, "bucket deviates by {dev}");
        }
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());
        let mut one = vec![7];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn next_down_handles_edge_cases() {
        assert!(next_down(1.0) < 1.0);
        assert_eq!(next_down(0.0), -f32::MIN_POSITIVE);
        assert!(next_down(-1.0) < -1.0);
        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert!(next_down(f32::NAN).is_nan());
    }
}
