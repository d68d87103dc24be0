use crate::Element;
use rand::Rng;

/// Returns a possibly mutated copy of `element`.
///
/// With probability `rate` (one draw per element, not per gene) a single gene,
/// chosen uniformly, receives an offset drawn uniformly from
/// `[-magnitude, magnitude]`. Otherwise the copy equals the input.
///
/// A drawn offset of exactly zero is redrawn. An offset smaller than half the
/// spacing of floating-point values around the chosen gene is still absorbed
/// by rounding, so a gene far larger than `magnitude` can come back unchanged.
///
/// `rate` must lie in `[0, 1]` and `magnitude` must be finite and positive.
pub fn mutate<R: Rng + ?Sized>(
    element: &Element,
    rate: f64,
    magnitude: f64,
    rng: &mut R,
) -> Element {
    let mut genes = element.genes().to_vec();
    if !genes.is_empty() && rng.random::<f64>() < rate {
        let position = rng.random_range(0..genes.len());
        let offset = loop {
            let offset: f64 = rng.random_range(-magnitude..=magnitude);
            if offset != 0.0 {
                break offset;
            }
        };
        genes[position] += offset;
    }
    Element::from(genes)
}
