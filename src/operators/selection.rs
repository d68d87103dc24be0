//! Rank-based stochastic parent selection.
//!
//! Rank `i` (0 = best) is drawn with probability proportional to
//! `exp(-i / (tau * pop_size))`. Writing `λ = 1 / (tau * pop_size)` and
//! `q = exp(-λ)`, this is a geometric distribution truncated to
//! `[0, pop_size)`:
//!
//! ```text
//! P(i) = q^i (1 - q) / (1 - q^N)
//! ```
//!
//! Sampling inverts its CDF exactly. For `u` uniform in `[0, 1)`:
//!
//! ```text
//! i = floor( ln(1 - u (1 - q^N)) / ln q )
//! ```
//!
//! evaluated as `-ln_1p(-u c) / λ` with `c = -expm1(-λ N)` so that very large
//! and very small `tau` stay accurate. The result is clipped to
//! `[0, pop_size - 1]` to absorb rounding at the upper edge.
//!
//! Large `tau` flattens the distribution toward uniform. Small `tau`
//! concentrates it on rank 0. Once `tau * pop_size` overflows, `λ` and the
//! normalizing mass both underflow to zero and the selector switches to the
//! uniform limit.

use crate::ConfigError;
use crate::config::validate_tau;
use rand::Rng;

/// Samples rank indices from the truncated exponential rank distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSelector {
    pop_size: usize,
    tau: f64,
    lambda: f64,
    /// `1 - q^N`, the normalizing mass of the truncated distribution.
    mass: f64,
}

impl RankSelector {
    /// Creates a selector over `pop_size` ranks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PopulationTooSmall`] for an empty population and
    /// [`ConfigError::InvalidTau`] unless `tau` is finite and positive.
    pub fn new(pop_size: usize, tau: f64) -> Result<Self, ConfigError> {
        if pop_size == 0 {
            return Err(ConfigError::PopulationTooSmall(pop_size));
        }
        let tau = validate_tau(tau)?;
        let lambda = 1.0 / (tau * pop_size as f64);
        let mass = -(-lambda * pop_size as f64).exp_m1();
        Ok(Self {
            pop_size,
            tau,
            lambda,
            mass,
        })
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// The designed probability of drawing `rank`. Zero outside the population.
    pub fn probability(&self, rank: usize) -> f64 {
        if rank >= self.pop_size {
            return 0.0;
        }
        if self.is_uniform() {
            return 1.0 / self.pop_size as f64;
        }
        // exp(-inf * 0) would be NaN for vanishing tau.
        let weight = if rank == 0 {
            1.0
        } else {
            (-self.lambda * rank as f64).exp()
        };
        weight * -(-self.lambda).exp_m1() / self.mass
    }

    /// Draws one rank index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.is_uniform() {
            return rng.random_range(0..self.pop_size);
        }
        let u: f64 = rng.random();
        let x = -(-u * self.mass).ln_1p() / self.lambda;
        if x.is_nan() {
            return 0;
        }
        (x.floor() as usize).min(self.pop_size - 1)
    }

    fn is_uniform(&self) -> bool {
        self.lambda == 0.0 || self.mass <= 0.0
    }

    /// Draws `n` independent rank indices.
    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn histogram(selector: &RankSelector, draws: usize, seed: u64) -> Vec<usize> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut counts = vec![0; selector.pop_size()];
        for rank in selector.sample_n(draws, &mut rng) {
            counts[rank] += 1;
        }
        counts
    }

    #[test]
    fn it_rejects_invalid_parameters() {
        assert_eq!(
            RankSelector::new(0, 1.0),
            Err(ConfigError::PopulationTooSmall(0))
        );
        assert!(matches!(
            RankSelector::new(10, 0.0),
            Err(ConfigError::InvalidTau(_))
        ));
        assert!(matches!(
            RankSelector::new(10, -1.0),
            Err(ConfigError::InvalidTau(_))
        ));
    }

    #[test]
    fn it_normalizes_probabilities() {
        for tau in [1e-6, 0.05, 1.0, 1e9] {
            let selector = RankSelector::new(100, tau).unwrap();
            let total: f64 = (0..100).map(|i| selector.probability(i)).sum();
            assert!((total - 1.0).abs() < 1e-9, "tau {} sums to {}", tau, total);
        }
    }

    #[test]
    fn it_decreases_with_rank() {
        let selector = RankSelector::new(50, 0.5).unwrap();
        for i in 1..50 {
            assert!(selector.probability(i) < selector.probability(i - 1));
        }
        assert_eq!(selector.probability(50), 0.0);
    }

    #[test]
    fn it_matches_the_designed_pdf() {
        let selector = RankSelector::new(10, 0.3).unwrap();
        let draws = 100_000;
        let counts = histogram(&selector, draws, 42);
        for (rank, &count) in counts.iter().enumerate() {
            let observed = count as f64 / draws as f64;
            let expected = selector.probability(rank);
            assert!(
                (observed - expected).abs() < 0.01,
                "rank {}: observed {:.4}, expected {:.4}",
                rank,
                observed,
                expected
            );
        }
    }

    #[test]
    fn it_stays_in_range() {
        for tau in [1e-12, 0.1, 1.0, 1e12] {
            let selector = RankSelector::new(7, tau).unwrap();
            let mut rng = Pcg64::seed_from_u64(3);
            assert!(selector.sample_n(5_000, &mut rng).iter().all(|&r| r < 7));
        }
    }

    #[test]
    fn it_falls_back_to_uniform_when_tau_overflows() {
        let selector = RankSelector::new(1_000, 1e306).unwrap();
        for rank in [0, 500, 999] {
            assert_eq!(selector.probability(rank), 1.0 / 1_000.0);
        }

        let counts = histogram(&selector, 100_000, 42);
        assert!(counts.iter().all(|&c| c > 0));
        let share = counts[0] as f64 / 100_000.0;
        assert!(share < 0.01, "rank 0 share {}", share);
        let upper_half: usize = counts[500..].iter().sum();
        let upper_share = upper_half as f64 / 100_000.0;
        assert!((upper_share - 0.5).abs() < 0.02, "upper half share {}", upper_share);
    }

    #[test]
    fn it_handles_a_single_rank() {
        let selector = RankSelector::new(1, 1.0).unwrap();
        let mut rng = Pcg64::seed_from_u64(0);
        assert!(selector.sample_n(100, &mut rng).iter().all(|&r| r == 0));
        assert!((selector.probability(0) - 1.0).abs() < 1e-12);
    }
}
