use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::CascadeError;

/// Weighted coin-flip source used for every edge-activation decision.
///
/// Each simulation run owns one source so that results are reproducible
/// given a fixed seed: the engine draws in graph edge order, and the
/// stream is fully determined by the seed.
pub struct BernoulliSource {
    rng: ChaCha20Rng,
}

impl BernoulliSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible source seeded from the process-wide entropy pool.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Independent stream for one Monte-Carlo replication.
    pub fn for_replication(global_seed: u64, replication_id: u64) -> Self {
        // Combine seeds deterministically
        let seed = global_seed.wrapping_add(replication_id.wrapping_mul(0x9e3779b97f4a7c15));
        Self::new(seed)
    }

    /// Returns `true` with probability `p`.
    ///
    /// `p` outside `[0, 1]` (including NaN) is a precondition violation.
    pub fn fire(&mut self, p: f64) -> Result<bool, CascadeError> {
        let coin = Bernoulli::new(p).map_err(|_| CascadeError::InvalidProbability(p))?;
        Ok(coin.sample(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_probabilities() {
        let mut src = BernoulliSource::new(7);
        for _ in 0..50 {
            assert!(src.fire(1.0).unwrap());
            assert!(!src.fire(0.0).unwrap());
        }
    }

    #[test]
    fn out_of_range_probability_rejected() {
        let mut src = BernoulliSource::new(0);
        assert!(matches!(
            src.fire(1.5),
            Err(CascadeError::InvalidProbability(_))
        ));
        assert!(matches!(
            src.fire(-0.1),
            Err(CascadeError::InvalidProbability(_))
        ));
        assert!(matches!(
            src.fire(f64::NAN),
            Err(CascadeError::InvalidProbability(_))
        ));
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = BernoulliSource::new(42);
        let mut b = BernoulliSource::new(42);
        for _ in 0..200 {
            assert_eq!(a.fire(0.5).unwrap(), b.fire(0.5).unwrap());
        }
    }

    #[test]
    fn replication_streams_differ() {
        let mut a = BernoulliSource::for_replication(42, 0);
        let mut b = BernoulliSource::for_replication(42, 1);
        let draws_a: Vec<bool> = (0..64).map(|_| a.fire(0.5).unwrap()).collect();
        let draws_b: Vec<bool> = (0..64).map(|_| b.fire(0.5).unwrap()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn rough_frequency() {
        let mut src = BernoulliSource::new(1234);
        let n = 10_000;
        let heads = (0..n).filter(|_| src.fire(0.3).unwrap()).count();
        let freq = heads as f64 / n as f64;
        assert!((freq - 0.3).abs() < 0.02, "freq = {freq}");
    }
}
