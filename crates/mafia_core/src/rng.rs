//! Deterministic random number generation.
//!
//! Every random decision the engine makes (role draft, seat shuffle, proxy
//! choice) flows through one [`EngineRng`] built from the caller's seed.
//! The generator is Mulberry32, so a given seed yields the same draw
//! sequence as any other Mulberry32 consumer of the same persisted seed.

use rand::RngCore;

use crate::error::RngError;

const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32: 32-bit state, one increment + two multiply/xorshift rounds.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(1 | t);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
        r ^ (r >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Engine-facing RNG: uniform draw, integer range, choice, weighted choice
/// and Fisher-Yates shuffle, all driven by a single uniform stream.
#[derive(Debug, Clone)]
pub struct EngineRng {
    inner: Mulberry32,
    seed: u32,
}

impl EngineRng {
    /// Seeds are truncated to their low 32 bits (negative seeds wrap).
    pub fn from_seed(seed: i64) -> Self {
        let seed = seed as u32;
        Self { inner: Mulberry32::new(seed), seed }
    }

    /// Unseeded engines still run on Mulberry32; the drawn seed is exposed
    /// through [`EngineRng::seed`] so the host can persist it.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random::<u32>() as i64)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.inner.next_u32() as f64 / TWO_POW_32
    }

    /// Integer in `[min, max]` inclusive.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max as i128 - min as i128 + 1) as f64;
        let offset = ((self.uniform() * span).floor() as i128).min(max as i128 - min as i128);
        (min as i128 + offset) as i64
    }

    fn index(&mut self, len: usize) -> usize {
        ((self.uniform() * len as f64).floor() as usize).min(len - 1)
    }

    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptyDomain);
        }
        let idx = self.index(items.len());
        Ok(&items[idx])
    }

    /// Fisher-Yates over a copy; the input is left untouched.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut copy = items.to_vec();
        for i in (1..copy.len()).rev() {
            let j = self.index(i + 1);
            copy.swap(i, j);
        }
        copy
    }

    /// `k` independent weighted draws (with replacement).
    ///
    /// Weights are normalized into a cumulative distribution; each draw picks
    /// the first item whose cumulative bound is `>=` the uniform draw, so ties
    /// resolve to the earlier item. If no bound matches (all-zero weights,
    /// float rounding) the last item is picked.
    pub fn choices<'a, T>(
        &mut self,
        items: &'a [T],
        weights: &[f64],
        k: usize,
    ) -> Result<Vec<&'a T>, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptyDomain);
        }
        if items.len() != weights.len() {
            return Err(RngError::WeightMismatch { items: items.len(), weights: weights.len() });
        }

        let total: f64 = weights.iter().sum();
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for w in weights {
            acc += w / total;
            cumulative.push(acc);
        }

        let mut picks = Vec::with_capacity(k);
        for _ in 0..k {
            let r = self.uniform();
            let idx = cumulative.iter().position(|c| r <= *c).unwrap_or(items.len() - 1);
            picks.push(&items[idx]);
        }
        Ok(picks)
    }

    pub fn weighted_choice<'a, T>(
        &mut self,
        items: &'a [T],
        weights: &[f64],
    ) -> Result<&'a T, RngError> {
        let mut picks = self.choices(items, weights, 1)?;
        picks.pop().ok_or(RngError::EmptyDomain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mulberry32_reference_sequence() {
        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_u32(), 2_581_720_956);
        assert_eq!(rng.next_u32(), 1_925_393_290);
        assert_eq!(rng.next_u32(), 3_661_312_704);
    }

    #[test]
    fn test_uniform_matches_reference_floats() {
        let mut rng = EngineRng::from_seed(42);
        assert!((rng.uniform() - 0.601_103_751_920_163_6).abs() < 1e-15);
        assert!((rng.uniform() - 0.448_290_558_997_541_67).abs() < 1e-15);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = EngineRng::from_seed(999);
        let mut b = EngineRng::from_seed(999);
        let items = [1, 2, 3, 4, 5, 6, 7];
        for _ in 0..20 {
            assert_eq!(a.int(1, 6), b.int(1, 6));
            assert_eq!(a.shuffle(&items), b.shuffle(&items));
            assert_eq!(
                a.choices(&items, &[1.0; 7], 3).unwrap(),
                b.choices(&items, &[1.0; 7], 3).unwrap()
            );
        }
    }

    #[test]
    fn test_seed_truncates_to_32_bits() {
        let mut a = EngineRng::from_seed(42 + (1_i64 << 32));
        let mut b = EngineRng::from_seed(42);
        assert_eq!(a.seed(), 42);
        assert_eq!(a.uniform(), b.uniform());
        assert_eq!(EngineRng::from_seed(-1).seed(), u32::MAX);
    }

    #[test]
    fn test_int_stays_in_range() {
        let mut rng = EngineRng::from_seed(7);
        for _ in 0..500 {
            let v = rng.int(-3, 3);
            assert!((-3..=3).contains(&v));
        }
    }

    #[test]
    fn test_int_full_range_does_not_overflow() {
        let mut rng = EngineRng::from_seed(11);
        for _ in 0..100 {
            rng.int(i64::MIN, i64::MAX);
            assert_eq!(rng.int(i64::MAX, i64::MAX), i64::MAX);
            assert_eq!(rng.int(i64::MIN, i64::MIN), i64::MIN);
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = EngineRng::from_seed(3);
        let items: Vec<u8> = (1..=15).collect();
        let mut shuffled = rng.shuffle(&items);
        assert_eq!(shuffled.len(), items.len());
        shuffled.sort();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_empty_domain() {
        let mut rng = EngineRng::from_seed(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choice(&empty), Err(RngError::EmptyDomain));
        assert_eq!(rng.choices(&empty, &[], 1), Err(RngError::EmptyDomain));
        assert_eq!(rng.weighted_choice(&empty, &[]), Err(RngError::EmptyDomain));
    }

    #[test]
    fn test_weight_mismatch() {
        let mut rng = EngineRng::from_seed(1);
        assert_eq!(
            rng.choices(&["a", "b"], &[1.0], 1),
            Err(RngError::WeightMismatch { items: 2, weights: 1 })
        );
    }

    #[test]
    fn test_zero_weight_is_never_picked_when_others_positive() {
        let mut rng = EngineRng::from_seed(11);
        for _ in 0..200 {
            let pick = rng.weighted_choice(&["never", "always"], &[0.0, 1.0]).unwrap();
            assert_eq!(*pick, "always");
        }
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_last() {
        let mut rng = EngineRng::from_seed(11);
        let pick = rng.weighted_choice(&["a", "b", "c"], &[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(*pick, "c");
    }

    #[test]
    fn test_weighted_choice_follows_cumulative_bounds() {
        // First draw for seed 42 is ~0.601: bounds [0.5, 1.0] -> second item.
        let mut rng = EngineRng::from_seed(42);
        assert_eq!(*rng.weighted_choice(&["a", "b"], &[1.0, 1.0]).unwrap(), "b");
        // Second draw ~0.448 -> first bound 0.5 covers it.
        assert_eq!(*rng.weighted_choice(&["a", "b"], &[1.0, 1.0]).unwrap(), "a");
    }
}
