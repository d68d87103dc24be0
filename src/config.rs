//! Engine configuration.
//!
//! [`EngineConfig`] is plain serde data, so it can be loaded from any format
//! the caller already uses:
//!
//! ```rust
//! use rank_ga::EngineConfig;
//!
//! let config: EngineConfig = serde_json::from_str(
//!     r#"{ "pop_size": 100, "dna_size": 8, "scale": 1.5, "tau": 0.3 }"#,
//! ).unwrap();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.mutation_rate, 0.1);
//! assert_eq!(config.mutation_magnitude(), 1.5);
//! ```

use crate::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TAU: f64 = 0.2;
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;

fn default_tau() -> f64 {
    DEFAULT_TAU
}

fn default_mutation_rate() -> f64 {
    DEFAULT_MUTATION_RATE
}

/// Parameters of an [`Engine`](crate::Engine).
///
/// * `pop_size` - Elements per generation. Must be at least 2.
/// * `dna_size` - Genes per element. Must be > 0.
/// * `scale` - Initial genes are drawn from `[-scale, scale]`.
/// * `tau` - Selection sharpness. Larger values flatten the rank distribution.
/// * `mutation_rate` - Probability that an offspring gets one perturbed gene.
/// * `mutation_scale` - Bound of the uniform perturbation. Falls back to `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub pop_size: usize,
    pub dna_size: usize,
    pub scale: f64,
    #[serde(default = "default_tau")]
    pub tau: f64,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default)]
    pub mutation_scale: Option<f64>,
}

impl EngineConfig {
    pub fn new(pop_size: usize, dna_size: usize, scale: f64) -> Self {
        Self {
            pop_size,
            dna_size,
            scale,
            tau: DEFAULT_TAU,
            mutation_rate: DEFAULT_MUTATION_RATE,
            mutation_scale: None,
        }
    }

    pub fn with_tau(mut self, tau: f64) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_mutation_scale(mut self, magnitude: f64) -> Self {
        self.mutation_scale = Some(magnitude);
        self
    }

    /// Bound of the perturbation added to a mutated gene.
    pub fn mutation_magnitude(&self) -> f64 {
        self.mutation_scale.unwrap_or(self.scale)
    }

    /// Checks every parameter, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pop_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.pop_size));
        }
        if self.dna_size == 0 {
            return Err(ConfigError::EmptyDna);
        }
        if !is_positive(self.scale) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        validate_tau(self.tau)?;
        validate_mutation_rate(self.mutation_rate)?;
        if let Some(magnitude) = self.mutation_scale {
            validate_mutation_scale(magnitude)?;
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn validate_tau(tau: f64) -> Result<f64, ConfigError> {
    if !is_positive(tau) {
        return Err(ConfigError::InvalidTau(tau));
    }
    Ok(tau)
}

pub(crate) fn validate_mutation_rate(rate: f64) -> Result<f64, ConfigError> {
    // NaN fails the range check.
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::MutationRateOutOfRange(rate));
    }
    Ok(rate)
}

pub(crate) fn validate_mutation_scale(magnitude: f64) -> Result<f64, ConfigError> {
    if !is_positive(magnitude) {
        return Err(ConfigError::InvalidMutationScale(magnitude));
    }
    Ok(magnitude)
}
