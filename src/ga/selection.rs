//! Parent selection strategies.
//!
//! Every strategy takes the current individuals and returns the index of
//! the chosen parent. Parents are drawn independently, so the same
//! individual may be chosen twice.
//!
//! | Strategy | Weight | Notes |
//! |----------|--------|-------|
//! | Roulette | shifted primary fitness | uniform pick when all weights are zero |
//! | Tournament | none (best of `size` draws) | draws with replacement |
//! | Rank | sort position `1..N` | reorders the individuals |

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{Candidate, Direction};
use crate::error::EvolutionError;

/// Keeps the minimization weights finite when all fitnesses coincide.
const MIN_WEIGHT_EPSILON: f64 = 1e-4;

/// Default number of contestants per tournament.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 4;

/// Selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionType {
    /// Fitness-proportionate (roulette wheel) selection.
    Roulette,
    /// Best of `size` uniformly drawn contestants.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
    /// Rank-proportionate selection.
    Rank,
}

fn default_tournament_size() -> usize {
    DEFAULT_TOURNAMENT_SIZE
}

impl SelectionType {
    /// Tournament with the default size.
    pub fn tournament() -> Self {
        SelectionType::Tournament {
            size: DEFAULT_TOURNAMENT_SIZE,
        }
    }

    /// Picks one parent and returns its index.
    ///
    /// `Rank` sorts `individuals` in place before picking.
    pub fn select<G>(
        &self,
        individuals: &mut [Candidate<G>],
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Result<usize, EvolutionError> {
        match *self {
            SelectionType::Roulette => roulette_selection(individuals, direction, rng),
            SelectionType::Tournament { size } => {
                tournament_selection(individuals, direction, size, rng)
            }
            SelectionType::Rank => rank_selection(individuals, direction, rng),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EvolutionError> {
        match *self {
            SelectionType::Tournament { size: 0 } => Err(EvolutionError::InvalidConfig(
                "tournament size must be at least 1".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Fitness-proportionate selection.
///
/// Primary fitnesses are shifted by `|min|` when the minimum is negative.
/// For `Max` the weight is the shifted fitness; for `Min` it is
/// `(max_shifted - shifted) / (max_shifted + ε)`.
pub fn roulette_selection<G>(
    individuals: &[Candidate<G>],
    direction: Direction,
    rng: &mut dyn RngCore,
) -> Result<usize, EvolutionError> {
    if individuals.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }

    let lowest = individuals
        .iter()
        .map(Candidate::primary)
        .fold(f64::INFINITY, f64::min);
    let offset = if lowest < 0.0 { -lowest } else { 0.0 };
    let shifted = individuals.iter().map(|c| c.primary() + offset);

    let weights: Vec<f64> = match direction {
        Direction::Max => shifted.collect(),
        Direction::Min => {
            let max_shifted = individuals
                .iter()
                .map(|c| c.primary() + offset)
                .fold(f64::NEG_INFINITY, f64::max);
            shifted
                .map(|f| (max_shifted - f) / (max_shifted + MIN_WEIGHT_EPSILON))
                .collect()
        }
    };

    Ok(spin_wheel(&weights, rng))
}

/// Tournament selection: best of `size` draws with replacement.
pub fn tournament_selection<G>(
    individuals: &[Candidate<G>],
    direction: Direction,
    size: usize,
    rng: &mut dyn RngCore,
) -> Result<usize, EvolutionError> {
    if individuals.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    if size == 0 {
        return Err(EvolutionError::InvalidConfig(
            "tournament size must be at least 1".into(),
        ));
    }

    let contestants: Vec<usize> = (0..size)
        .map(|_| rng.random_range(0..individuals.len()))
        .collect();
    let winner = direction
        .best_index(contestants.iter().map(|&i| individuals[i].fitness()))
        .unwrap_or(0);

    Ok(contestants[winner])
}

/// Rank selection.
///
/// Sorts `individuals` so the best ends up last (ascending tuple order for
/// `Max`, descending for `Min`), then picks position `k` with weight `k + 1`.
pub fn rank_selection<G>(
    individuals: &mut [Candidate<G>],
    direction: Direction,
    rng: &mut dyn RngCore,
) -> Result<usize, EvolutionError> {
    if individuals.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }

    individuals.sort_by(|a, b| direction.compare(a.fitness(), b.fitness()));

    let weights: Vec<f64> = (1..=individuals.len()).map(|rank| rank as f64).collect();
    Ok(spin_wheel(&weights, rng))
}

/// Spins a wheel over non-negative weights and returns the first index
/// whose cumulative weight exceeds the spin.
fn spin_wheel(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..weights.len());
    }

    let spin = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative > spin {
            return idx;
        }
    }

    // Rounding can leave the cumulative sum a hair below the spin.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}
