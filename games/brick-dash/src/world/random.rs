//! Random draws for world generation.
//!
//! Everything that rolls dice goes through [`RandomSource`] so tests can
//! swap in a scripted or seeded source and get repeatable worlds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;

/// Source of uniform random draws.
pub trait RandomSource {
    /// Uniform float in [0, 1).
    fn unit(&mut self) -> f32;

    /// Uniform integer in the inclusive range between `a` and `b`.
    /// The bounds may be given in either order.
    fn between(&mut self, a: i32, b: i32) -> i32;

    /// Bernoulli draw succeeding with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform float in [lo, hi).
    fn float_between(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// -1.0 or 1.0 with equal odds.
    fn pick_sign(&mut self) -> f32 {
        if self.unit() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }
}

/// Production random source backed by a seeded `StdRng`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn between(&mut self, a: i32, b: i32) -> i32 {
        self.rng.gen_range(a.min(b)..=a.max(b))
    }
}

/// Cumulative-weight lookup table.
///
/// Entries are `(cumulative_weight, value)` in ascending order. A roll in
/// [0, 1) resolves to the first entry whose cumulative weight exceeds it;
/// rolls at or past the last weight resolve to nothing. Two equal
/// consecutive weights give the later entry zero probability.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<T> {
    entries: Vec<(f32, T)>,
}

fn is_cumulative<T>(entries: &[(f32, T)]) -> bool {
    entries.windows(2).all(|w| w[0].0 <= w[1].0) && entries.iter().all(|(w, _)| (0.0..=1.0).contains(w))
}

impl<T: Copy> WeightTable<T> {
    pub fn new(entries: Vec<(f32, T)>) -> Result<Self, ConfigError> {
        if !is_cumulative(&entries) {
            return Err(ConfigError::UnorderedWeights(
                entries.iter().map(|(w, _)| *w).collect(),
            ));
        }
        Ok(Self { entries })
    }

    /// For built-in tables whose weights are fixed in code.
    pub(crate) fn from_cumulative(entries: Vec<(f32, T)>) -> Self {
        debug_assert!(is_cumulative(&entries), "built-in weight table out of order");
        Self { entries }
    }

    pub fn resolve(&self, roll: f32) -> Option<T> {
        self.entries
            .iter()
            .find(|(cumulative, _)| roll < *cumulative)
            .map(|(_, value)| *value)
    }

    /// Roll once and resolve.
    pub fn draw(&self, rng: &mut dyn RandomSource) -> Option<T> {
        self.resolve(rng.unit())
    }

    /// Probability mass of each entry, in table order.
    pub fn weights(&self) -> Vec<(T, f32)> {
        let mut previous = 0.0;
        self.entries
            .iter()
            .map(|&(cumulative, value)| {
                let weight = cumulative - previous;
                previous = cumulative;
                (value, weight)
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Pick {
        A,
        B,
        C,
    }

    #[test]
    fn seeded_random_is_deterministic() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..20 {
            assert_eq!(a.between(150, 250), b.between(150, 250));
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn between_is_inclusive_and_order_free() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..500 {
            let v = rng.between(300, 100);
            assert!((100..=300).contains(&v), "out of range: {}", v);
        }
        assert_eq!(rng.between(5, 5), 5);
    }

    #[test]
    fn unit_stays_below_one() {
        let mut rng = SeededRandom::new(1);
        assert!((0..1000).map(|_| rng.unit()).all(|u| (0.0..1.0).contains(&u)));
    }

    #[test]
    fn table_resolves_by_cumulative_weight() {
        let table = WeightTable::new(vec![(0.12, Pick::A), (0.35, Pick::B), (1.0, Pick::C)]).unwrap();
        assert_eq!(table.resolve(0.0), Some(Pick::A));
        assert_eq!(table.resolve(0.1199), Some(Pick::A));
        assert_eq!(table.resolve(0.12), Some(Pick::B));
        assert_eq!(table.resolve(0.34), Some(Pick::B));
        assert_eq!(table.resolve(0.35), Some(Pick::C));
        assert_eq!(table.resolve(0.999), Some(Pick::C));
    }

    #[test]
    fn rolls_past_the_last_weight_resolve_to_nothing() {
        let table = WeightTable::new(vec![(0.5, Pick::A), (0.8, Pick::B), (0.8, Pick::C)]).unwrap();
        assert_eq!(table.resolve(0.79), Some(Pick::B));
        assert_eq!(table.resolve(0.8), None, "zero-width entry is never chosen");
        assert_eq!(table.resolve(0.95), None);
    }

    #[test]
    fn weights_are_differences() {
        let table = WeightTable::new(vec![(0.5, Pick::A), (0.85, Pick::B)]).unwrap();
        let weights = table.weights();
        assert_eq!(weights[0], (Pick::A, 0.5));
        assert!((weights[1].1 - 0.35).abs() < 1e-6);
    }

    #[test]
    fn descending_or_out_of_range_weights_are_rejected() {
        assert!(WeightTable::new(vec![(0.5, Pick::A), (0.3, Pick::B)]).is_err());
        assert!(WeightTable::new(vec![(0.5, Pick::A), (1.2, Pick::B)]).is_err());
        assert!(WeightTable::new(vec![(f32::NAN, Pick::A)]).is_err());
    }
}
