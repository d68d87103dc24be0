//! Fitness evaluation, ranking and per-generation statistics.

use crate::{Element, Error, Fitness};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compare two f64 values, treating NaN as less than all other values.
/// NaN fitness therefore always ranks last.
fn cmp_f64_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// An element paired with the fitness it scored this generation.
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub element: &'a Element,
    pub fitness: f64,
    /// Position of the element in the unranked population.
    pub index: usize,
}

/// Best, mean and worst fitness of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
}

impl GenerationStats {
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.best, self.mean, self.worst)
    }
}

/// A population sorted by descending fitness. Rank 0 is the best element.
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    members: Vec<Scored<'a>>,
}

impl<'a> Ranking<'a> {
    pub fn members(&self) -> &[Scored<'a>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&Scored<'a>> {
        self.members.get(rank)
    }

    pub fn best(&self) -> Option<&Scored<'a>> {
        self.members.first()
    }

    /// Fitness values in rank order.
    pub fn fitness_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.members.iter().map(|s| s.fitness)
    }

    /// Summary statistics over this generation.
    ///
    /// An empty ranking yields NaN for all three values.
    pub fn stats(&self) -> GenerationStats {
        let (Some(first), Some(last)) = (self.members.first(), self.members.last()) else {
            return GenerationStats {
                best: f64::NAN,
                mean: f64::NAN,
                worst: f64::NAN,
            };
        };
        let mean = self.fitness_values().sum::<f64>() / self.members.len() as f64;
        GenerationStats {
            best: first.fitness,
            mean,
            worst: last.fitness,
        }
    }
}

/// Evaluates every element once and sorts by descending fitness.
///
/// The sort is stable, so equal fitness keeps population order. Evaluation
/// stops at the first failing element, whose index is reported. With the
/// `parallel` feature all elements are evaluated concurrently and the lowest
/// failing index is reported.
pub fn rank<'a, F>(population: &'a [Element], fitness: &F) -> Result<Ranking<'a>, Error>
where
    F: Fitness + ?Sized,
{
    #[cfg(feature = "parallel")]
    let scores: Vec<f64> = population
        .par_iter()
        .map(|element| fitness.evaluate(element))
        .collect::<Vec<_>>()
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.map_err(|source| evaluation_failed(index, source)))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let scores: Vec<f64> = population
        .iter()
        .enumerate()
        .map(|(index, element)| {
            fitness
                .evaluate(element)
                .map_err(|source| evaluation_failed(index, source))
        })
        .collect::<Result<_, _>>()?;

    let mut members: Vec<Scored<'a>> = population
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(index, (element, fitness))| Scored {
            element,
            fitness,
            index,
        })
        .collect();
    members.sort_by(|a, b| cmp_f64_nan_last(b.fitness, a.fitness));

    Ok(Ranking { members })
}

fn evaluation_failed(index: usize, source: anyhow::Error) -> Error {
    tracing::warn!(index, error = %source, "fitness evaluation failed");
    Error::Evaluation { index, source }
}
