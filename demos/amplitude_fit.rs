//! Recovers the amplitudes of a sum of sines from sampled data.
//!
//! Run with `RUST_LOG=rank_ga=debug` to see per-generation statistics.

use rank_ga::{Element, Engine, EngineConfig};
use tracing_subscriber::EnvFilter;

const AMPLITUDES: [f64; 6] = [1.2, -0.4, 0.8, 0.0, -0.3, 0.15];
const SAMPLES: usize = 200;
const GENERATIONS: usize = 2_000;

/// `sum_k a_k * sin((k + 1) * t)` for `t` in `[0, 2π)`.
fn signal(amplitudes: &[f64], t: f64) -> f64 {
    amplitudes
        .iter()
        .enumerate()
        .map(|(k, a)| a * ((k + 1) as f64 * t).sin())
        .sum()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let times: Vec<f64> = (0..SAMPLES)
        .map(|i| i as f64 * std::f64::consts::TAU / SAMPLES as f64)
        .collect();
    let observed: Vec<f64> = times.iter().map(|&t| signal(&AMPLITUDES, t)).collect();

    let config = EngineConfig::new(80, AMPLITUDES.len(), 2.0)
        .with_tau(0.15)
        .with_mutation_rate(0.4)
        .with_mutation_scale(0.1);
    let mut engine = Engine::new(config, 42)?;

    // Negative mean squared error: 0 is a perfect reconstruction.
    engine.set_fitness(move |element: &Element| {
        let mse = times
            .iter()
            .zip(&observed)
            .map(|(&t, y)| (signal(element.genes(), t) - y).powi(2))
            .sum::<f64>()
            / times.len() as f64;
        Ok(-mse)
    });

    for generation in 0..GENERATIONS {
        let stats = engine.evolve()?;
        if generation % 200 == 0 {
            println!(
                "Gen {}: best {:.6} mean {:.6} worst {:.6}",
                generation, stats.best, stats.mean, stats.worst
            );
        }
    }

    if let (Some(best), Some(fitness)) = (engine.best_element(), engine.best_fitness()) {
        println!("Best fitness: {:.8}", fitness);
        for (k, (found, actual)) in best.genes().iter().zip(AMPLITUDES).enumerate() {
            println!("  a{}: {:+.4} (actual {:+.4})", k + 1, found, actual);
        }
    }
    Ok(())
}
