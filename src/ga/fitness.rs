//! Multi-objective fitness tuple and optimization direction.
//!
//! A [`Fitness`] is a primary scalar followed by integer diagnostic
//! counters. Candidates are ordered lexicographically over the whole
//! tuple: ties on the primary value are broken by the diagnostics in
//! declaration order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;

/// Primary reward/penalty plus diagnostic counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    /// Scalar objective value.
    pub primary: f64,
    /// Diagnostic counters, compared after `primary` in this order.
    pub diagnostics: Vec<i64>,
}

impl Fitness {
    /// Creates a fitness tuple.
    pub fn new(primary: f64, diagnostics: Vec<i64>) -> Self {
        Self {
            primary,
            diagnostics,
        }
    }

    /// Creates a fitness with no diagnostics.
    pub fn scalar(primary: f64) -> Self {
        Self::new(primary, Vec::new())
    }

    /// Total lexicographic order over `(primary, diagnostics...)`.
    ///
    /// `primary` uses IEEE total ordering so NaN never panics a sort.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then_with(|| self.diagnostics.cmp(&other.diagnostics))
    }
}

/// Optimization direction, fixed for a run.
///
/// Controls every ordering decision: selection, elitism and reporting.
/// Deserialization goes through [`FromStr`], so configuration accepts the
/// same spellings as `"max".parse()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Direction {
    /// Larger fitness is better.
    Max,
    /// Smaller fitness is better.
    Min,
}

impl Direction {
    /// Orders `a` relative to `b` so that `Greater` means "`a` is better".
    pub fn compare(self, a: &Fitness, b: &Fitness) -> Ordering {
        match self {
            Direction::Max => a.total_cmp(b),
            Direction::Min => b.total_cmp(a),
        }
    }

    /// Returns `true` when `a` is strictly better than `b`.
    pub fn is_better(self, a: &Fitness, b: &Fitness) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Index of the best fitness in `items`, first occurrence on ties.
    pub fn best_index<'a, I>(self, items: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a Fitness>,
    {
        extreme_index(items, |candidate, current| self.is_better(candidate, current))
    }

    /// Index of the worst fitness in `items`, first occurrence on ties.
    pub fn worst_index<'a, I>(self, items: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a Fitness>,
    {
        extreme_index(items, |candidate, current| self.is_better(current, candidate))
    }
}

fn extreme_index<'a, I, F>(items: I, replaces: F) -> Option<usize>
where
    I: IntoIterator<Item = &'a Fitness>,
    F: Fn(&Fitness, &Fitness) -> bool,
{
    let mut best: Option<(usize, &Fitness)> = None;
    for (idx, fitness) in items.into_iter().enumerate() {
        match best {
            Some((_, current)) if !replaces(fitness, current) => {}
            _ => best = Some((idx, fitness)),
        }
    }
    best.map(|(idx, _)| idx)
}

impl FromStr for Direction {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Direction::Max),
            "min" => Ok(Direction::Min),
            _ => Err(EvolutionError::UnknownDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = EvolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Max => write!(f, "max"),
            Direction::Min => write!(f, "min"),
        }
    }
}
