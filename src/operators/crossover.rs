use crate::{Crossover, Element};
use rand::{Rng, RngCore};

/// Uniform per-gene mixing: each offspring gene comes from either parent with
/// probability one half. This is the engine's default [`Crossover`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformMix;

impl Crossover for UniformMix {
    fn crossover(&self, a: &Element, b: &Element, rng: &mut dyn RngCore) -> Element {
        uniform_mix(a, b, rng)
    }
}

/// Mixes two equal-length parents gene by gene.
///
/// Draws exactly one random bit per gene, in gene order.
pub fn uniform_mix<R: Rng + ?Sized>(a: &Element, b: &Element, rng: &mut R) -> Element {
    debug_assert_eq!(a.len(), b.len(), "parents must have equal gene counts");
    a.genes()
        .iter()
        .zip(b.genes())
        .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
        .collect()
}
