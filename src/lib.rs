//! Rank-selection genetic algorithm engine for real-valued genomes.
//!
//! The engine evolves a fixed-size population of [`Element`]s (fixed-length
//! vectors of `f64` genes) toward higher values of a caller-supplied fitness
//! function. Each generation evaluates every element, ranks the population,
//! samples parent ranks from a truncated exponential distribution, mixes the
//! parents gene by gene and occasionally perturbs one gene of the offspring.
//!
//! # Example
//!
//! ```rust
//! use rank_ga::{Engine, EngineConfig};
//!
//! let config = EngineConfig::new(40, 3, 2.0).with_tau(0.2).with_mutation_rate(0.3);
//! let mut engine = Engine::new(config, 42).unwrap();
//!
//! // Fit (1.0, -0.5, 0.25); 0 is a perfect score, errors are negative.
//! let target = [1.0, -0.5, 0.25];
//! engine.set_fitness(move |element| {
//!     let err: f64 = element
//!         .genes()
//!         .iter()
//!         .zip(&target)
//!         .map(|(g, t)| (g - t).powi(2))
//!         .sum();
//!     Ok(-err)
//! });
//!
//! for _ in 0..50 {
//!     let stats = engine.evolve().unwrap();
//!     assert!(stats.best >= stats.worst);
//! }
//! assert!(engine.best_fitness().unwrap() <= 0.0);
//! ```

use rand::RngCore;

pub use config::EngineConfig;
pub use engine::{Engine, EngineState};
pub use error::{ConfigError, Error};
pub use operators::crossover::UniformMix;
pub use operators::selection::RankSelector;
pub use population::{Element, Gene};
pub use ranking::{GenerationStats, Ranking, Scored};

/// Scores an [`Element`]. Higher is better.
///
/// Implemented for every `Fn(&Element) -> anyhow::Result<f64>` closure, so most
/// callers never name this trait directly.
pub trait Fitness: Send + Sync {
    fn evaluate(&self, element: &Element) -> anyhow::Result<f64>;
}

impl<F> Fitness for F
where
    F: Fn(&Element) -> anyhow::Result<f64> + Send + Sync,
{
    fn evaluate(&self, element: &Element) -> anyhow::Result<f64> {
        self(element)
    }
}

/// Produces one offspring from two parents of equal length.
///
/// The engine calls this with its own random source, so a deterministic
/// implementation stays reproducible under a fixed seed.
pub trait Crossover: Send + Sync {
    fn crossover(&self, a: &Element, b: &Element, rng: &mut dyn RngCore) -> Element;
}

pub mod config;
pub mod engine;
pub mod error;
pub mod population;
pub mod ranking;

pub mod operators {
    pub mod crossover;
    pub mod mutation;
    pub mod selection;
}
