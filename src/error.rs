/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("pop_size must be at least 2, got: {0}")]
    PopulationTooSmall(usize),
    #[error("dna_size must be greater than 0")]
    EmptyDna,
    #[error("scale must be finite and greater than 0.0, got: {0}")]
    InvalidScale(f64),
    #[error("tau must be finite and greater than 0.0, got: {0}")]
    InvalidTau(f64),
    #[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
    MutationRateOutOfRange(f64),
    #[error("mutation_scale must be finite and greater than 0.0, got: {0}")]
    InvalidMutationScale(f64),
    #[error("selection count must be greater than 0")]
    InvalidSelectionCount,
    #[error("crossover produced {actual} genes, expected {expected}")]
    OffspringLength { expected: usize, actual: usize },
}

/// Errors returned by [`Engine`](crate::Engine) operations.
///
/// None of these leave a partially evolved population behind: the engine
/// stays at its last completed generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ConfigurationError: {0}")]
    Configuration(#[from] ConfigError),
    #[error("NotConfiguredError: no fitness function has been set")]
    NotConfigured,
    #[error("EvaluationError: element {index}: {source}")]
    Evaluation {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}
