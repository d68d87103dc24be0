use rank_ga::{ConfigError, Engine, EngineConfig, Error};

fn rank_histogram(pop_size: usize, tau: f64, draws: usize) -> Vec<usize> {
    let config = EngineConfig::new(pop_size, 2, 1.0).with_tau(tau);
    let mut engine = Engine::new(config, 42).unwrap();
    let mut counts = vec![0; pop_size];
    for rank in engine.try_selection(draws).unwrap() {
        counts[rank] += 1;
    }
    counts
}

#[test]
fn test_selection_favors_better_ranks() {
    let counts = rank_histogram(100, 1.0, 10_000);
    assert_eq!(counts.iter().sum::<usize>(), 10_000);
    assert!(
        counts[0] > counts[99],
        "rank 0 drawn {} times, rank 99 drawn {} times",
        counts[0],
        counts[99]
    );
}

#[test]
fn test_large_tau_approaches_uniform() {
    let counts = rank_histogram(100, 1e9, 1_000_000);
    let max = *counts.iter().max().unwrap() as f64;
    let min = *counts.iter().min().unwrap() as f64;
    assert!(min > 0.0);
    assert!(max / min < 1.15, "max/min ratio {}", max / min);
}

#[test]
fn test_small_tau_concentrates_on_the_best_rank() {
    let counts = rank_histogram(100, 1e-6, 10_000);
    let share = counts[0] as f64 / 10_000.0;
    assert!(share > 0.999, "rank 0 share {}", share);
}

#[test]
fn test_mean_rank_grows_with_tau() {
    let mean_rank = |tau: f64| {
        let counts = rank_histogram(50, tau, 20_000);
        let total: usize = counts.iter().enumerate().map(|(r, c)| r * c).sum();
        total as f64 / 20_000.0
    };
    let sharp = mean_rank(0.05);
    let medium = mean_rank(0.5);
    let flat = mean_rank(50.0);
    assert!(sharp < medium && medium < flat, "{} {} {}", sharp, medium, flat);
    // A flat distribution over 50 ranks averages 24.5.
    assert!((flat - 24.5).abs() < 1.0);
}

#[test]
fn test_try_selection_leaves_population_untouched() {
    let mut engine = Engine::new(EngineConfig::new(20, 3, 1.0), 5).unwrap();
    let before = engine.population().to_vec();

    let draws = engine.try_selection(500).unwrap();
    assert_eq!(draws.len(), 500);
    assert!(draws.iter().all(|&r| r < 20));
    assert_eq!(engine.population(), before.as_slice());
    assert_eq!(engine.generation(), 0);
}

#[test]
fn test_try_selection_follows_tau_changes() {
    let mut engine = Engine::new(EngineConfig::new(100, 1, 1.0), 5).unwrap();
    engine.set_tau(1e-6).unwrap();
    assert!(engine.try_selection(1_000).unwrap().iter().all(|&r| r == 0));

    engine.set_tau(1e6).unwrap();
    let draws = engine.try_selection(1_000).unwrap();
    assert!(draws.iter().any(|&r| r > 50));
}

#[test]
fn test_try_selection_rejects_zero_draws() {
    let mut engine = Engine::new(EngineConfig::new(10, 1, 1.0), 0).unwrap();
    assert!(matches!(
        engine.try_selection(0),
        Err(Error::Configuration(ConfigError::InvalidSelectionCount))
    ));
}

#[test]
fn test_try_selection_is_reproducible() {
    let draw = || {
        let mut engine = Engine::new(EngineConfig::new(30, 2, 1.0).with_tau(0.3), 77).unwrap();
        engine.try_selection(100).unwrap()
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_overflowing_tau_selects_uniformly() {
    let config = EngineConfig::new(1_000, 2, 1.0).with_tau(1e306);
    assert!(config.validate().is_ok());

    let counts = rank_histogram(1_000, 1e306, 100_000);
    let zeros = counts[0];
    assert!(zeros < 1_000, "rank 0 drawn {} times", zeros);
    assert!(counts[500..].iter().sum::<usize>() > 45_000);
}
