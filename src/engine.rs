//! The evolution engine.
//!
//! # Generation step
//!
//! Each call to [`Engine::evolve`]:
//! 1. Evaluates every element once and ranks the population
//! 2. Records best, mean and worst fitness
//! 3. Samples two parent ranks per offspring from the [`RankSelector`]
//! 4. Mixes the parents with the configured [`Crossover`] and applies [`mutate`]
//! 5. Replaces the whole population with the offspring
//!
//! The step works on a copy of the random source and a fresh offspring vector.
//! Nothing is written back until the step has succeeded, so a failed step
//! leaves population, random state and best-ever record exactly as they were.
//!
//! # Determinism
//!
//! All randomness comes from one seeded [`Pcg64`]. Two engines built from the
//! same configuration and seed, given the same fitness function, produce the
//! same populations and statistics generation after generation. Serializing an
//! engine captures the random state, so a restored engine continues the same
//! trajectory.

use crate::config::{validate_mutation_rate, validate_mutation_scale, validate_tau};
use crate::operators::mutation::mutate;
use crate::population::random_population;
use crate::ranking::rank;
use crate::{
    ConfigError, Crossover, Element, EngineConfig, Error, Fitness, GenerationStats, RankSelector,
    Ranking, UniformMix,
};
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Whether [`Engine::evolve`] can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No fitness function has been set.
    Uninitialized,
    /// Population exists and a fitness function is set.
    Ready,
}

/// The best element seen across all generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Elite {
    element: Element,
    fitness: f64,
}

/// Serialized form of an [`Engine`] (excludes fitness and crossover strategies).
#[derive(Serialize, Deserialize)]
struct EngineData {
    config: EngineConfig,
    population: Vec<Element>,
    best: Option<Elite>,
    generation: u64,
    rng: Pcg64,
}

/// Rank-selection genetic algorithm over real-valued elements.
pub struct Engine {
    config: EngineConfig,
    population: Vec<Element>,
    fitness: Option<Box<dyn Fitness>>,
    crossover: Box<dyn Crossover>,
    best: Option<Elite>,
    generation: u64,
    rng: Pcg64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .field("best_fitness", &self.best_fitness())
            .finish_non_exhaustive()
    }
}

impl Serialize for Engine {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("EngineData", 5)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("population", &self.population)?;
        state.serialize_field("best", &self.best)?;
        state.serialize_field("generation", &self.generation)?;
        state.serialize_field("rng", &self.rng)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Engine {
    /// Restores an engine in the [`EngineState::Uninitialized`] state with the
    /// default [`UniformMix`] crossover.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let data = EngineData::deserialize(deserializer)?;
        data.config.validate().map_err(D::Error::custom)?;
        if data.population.len() != data.config.pop_size
            || data.population.iter().any(|e| e.len() != data.config.dna_size)
        {
            return Err(D::Error::custom(
                "population does not match the configured pop_size and dna_size",
            ));
        }
        if data
            .best
            .as_ref()
            .is_some_and(|e| e.element.len() != data.config.dna_size)
        {
            return Err(D::Error::custom(
                "best element does not match the configured dna_size",
            ));
        }
        Ok(Self {
            config: data.config,
            population: data.population,
            fitness: None,
            crossover: Box::new(UniformMix),
            best: data.best,
            generation: data.generation,
            rng: data.rng,
        })
    }
}

impl Engine {
    /// Creates an engine with a random initial population.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine parameters, validated eagerly
    /// * `seed` - RNG seed for deterministic execution
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if any parameter is invalid.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, Error> {
        Self::with_rng(config, Pcg64::seed_from_u64(seed))
    }

    /// Creates an engine drawing all randomness from `rng`.
    pub fn with_rng(config: EngineConfig, mut rng: Pcg64) -> Result<Self, Error> {
        config.validate()?;
        let population = random_population(&config, &mut rng);
        tracing::debug!(
            pop_size = config.pop_size,
            dna_size = config.dna_size,
            scale = config.scale,
            "initialized population"
        );
        Ok(Self {
            config,
            population,
            fitness: None,
            crossover: Box::new(UniformMix),
            best: None,
            generation: 0,
            rng,
        })
    }

    pub fn state(&self) -> EngineState {
        if self.fitness.is_some() {
            EngineState::Ready
        } else {
            EngineState::Uninitialized
        }
    }

    /// Sets the fitness function from a closure. Higher return values are better.
    pub fn set_fitness<F>(&mut self, fitness: F)
    where
        F: Fn(&Element) -> anyhow::Result<f64> + Send + Sync + 'static,
    {
        self.fitness = Some(Box::new(fitness));
    }

    /// Sets the fitness function from any [`Fitness`] implementation.
    pub fn set_evaluator<E: Fitness + 'static>(&mut self, evaluator: E) {
        self.fitness = Some(Box::new(evaluator));
    }

    /// Replaces the default [`UniformMix`] crossover.
    ///
    /// The strategy must return offspring with the configured gene count.
    pub fn set_crossover<C: Crossover + 'static>(&mut self, crossover: C) {
        self.crossover = Box::new(crossover);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tau(&self) -> f64 {
        self.config.tau
    }

    /// Sets the selection sharpness. Must be finite and > 0.
    pub fn set_tau(&mut self, tau: f64) -> Result<(), Error> {
        self.config.tau = validate_tau(tau)?;
        Ok(())
    }

    pub fn mutation_rate(&self) -> f64 {
        self.config.mutation_rate
    }

    /// Sets the per-offspring mutation probability. Must lie in `[0, 1]`.
    pub fn set_mutation_rate(&mut self, rate: f64) -> Result<(), Error> {
        self.config.mutation_rate = validate_mutation_rate(rate)?;
        Ok(())
    }

    /// Sets the bound of the uniform mutation offset. Must be finite and > 0.
    pub fn set_mutation_scale(&mut self, magnitude: f64) -> Result<(), Error> {
        self.config.mutation_scale = Some(validate_mutation_scale(magnitude)?);
        Ok(())
    }

    /// The current population. Unordered unless freshly ranked.
    pub fn population(&self) -> &[Element] {
        &self.population
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The best element seen in any evaluated generation.
    pub fn best_element(&self) -> Option<&Element> {
        self.best.as_ref().map(|e| &e.element)
    }

    /// Fitness of [`best_element`](Self::best_element). Never decreases.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|e| e.fitness)
    }

    fn fitness(&self) -> Result<&dyn Fitness, Error> {
        self.fitness.as_deref().ok_or(Error::NotConfigured)
    }

    fn selector(&self) -> Result<RankSelector, Error> {
        Ok(RankSelector::new(self.config.pop_size, self.config.tau)?)
    }

    /// Evaluates and ranks the current population without changing it.
    pub fn rank(&self) -> Result<Ranking<'_>, Error> {
        rank(&self.population, self.fitness()?)
    }

    /// Performs one generation and returns its statistics.
    ///
    /// # Errors
    ///
    /// * [`Error::NotConfigured`] if no fitness function is set
    /// * [`Error::Evaluation`] if the fitness function fails on an element
    /// * [`Error::Configuration`] if a custom crossover returns the wrong gene count
    ///
    /// On error the engine is unchanged.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation))]
    pub fn evolve(&mut self) -> Result<GenerationStats, Error> {
        let ranking = self.rank()?;
        let stats = ranking.stats();
        let selector = self.selector()?;
        let dna_size = self.config.dna_size;
        let rate = self.config.mutation_rate;
        let magnitude = self.config.mutation_magnitude();

        let mut rng = self.rng.clone();
        let mut offspring = Vec::with_capacity(self.config.pop_size);
        while offspring.len() < self.config.pop_size {
            let a = ranking.members()[selector.sample(&mut rng)].element;
            let b = ranking.members()[selector.sample(&mut rng)].element;
            let child = self.crossover.crossover(a, b, &mut rng);
            if child.len() != dna_size {
                return Err(ConfigError::OffspringLength {
                    expected: dna_size,
                    actual: child.len(),
                }
                .into());
            }
            offspring.push(mutate(&child, rate, magnitude, &mut rng));
        }

        let improved = ranking.best().and_then(|top| {
            // NaN only ranks first when every fitness is NaN.
            let better = !top.fitness.is_nan()
                && self.best.as_ref().is_none_or(|e| top.fitness > e.fitness);
            better.then(|| Elite {
                element: top.element.clone(),
                fitness: top.fitness,
            })
        });

        if let Some(elite) = improved {
            tracing::info!(
                generation = self.generation,
                fitness = elite.fitness,
                "new best element"
            );
            self.best = Some(elite);
        }
        self.population = offspring;
        self.rng = rng;
        self.generation += 1;

        tracing::debug!(
            best = stats.best,
            mean = stats.mean,
            worst = stats.worst,
            "generation complete"
        );
        Ok(stats)
    }

    /// Runs `generations` steps, stopping at the first error.
    ///
    /// Generations completed before an error stay committed.
    pub fn evolve_n(&mut self, generations: usize) -> Result<Vec<GenerationStats>, Error> {
        (0..generations).map(|_| self.evolve()).collect()
    }

    /// Draws `n` rank indices from the selection distribution.
    ///
    /// Advances the random source but leaves the population untouched.
    pub fn try_selection(&mut self, n: usize) -> Result<Vec<usize>, Error> {
        if n == 0 {
            return Err(ConfigError::InvalidSelectionCount.into());
        }
        let selector = self.selector()?;
        Ok(selector.sample_n(n, &mut self.rng))
    }
}
