use crate::EngineConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single real-valued component of an [`Element`].
pub type Gene = f64;

/// One candidate solution: a fixed-length sequence of genes.
///
/// Elements are never edited in place. Crossover and mutation always build a
/// new `Element`, so offspring cannot alias genes of the generation they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element(Vec<Gene>);

impl Element {
    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_genes(self) -> Vec<Gene> {
        self.0
    }
}

impl From<Vec<Gene>> for Element {
    fn from(genes: Vec<Gene>) -> Self {
        Self(genes)
    }
}

impl FromIterator<Gene> for Element {
    fn from_iter<I: IntoIterator<Item = Gene>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Draws `pop_size` elements with every gene uniform in `[-scale, scale]`.
///
/// The configuration is assumed to be valid.
pub fn random_population<R: Rng + ?Sized>(config: &EngineConfig, rng: &mut R) -> Vec<Element> {
    let scale = config.scale;
    (0..config.pop_size)
        .map(|_| {
            (0..config.dna_size)
                .map(|_| rng.random_range(-scale..=scale))
                .collect()
        })
        .collect()
}
