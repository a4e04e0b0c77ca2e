//! A single encoded solution plus its fitness.

use rand::RngCore;

use super::{Fitness, Problem};
use crate::error::EvolutionError;

/// One solution encoding with its computed fitness.
///
/// Fitness is evaluated once at construction and never recomputed;
/// both fields are read-only after that.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<G> {
    representation: Vec<G>,
    fitness: Fitness,
}

impl<G> Candidate<G> {
    /// Wraps a caller-supplied representation and evaluates it.
    ///
    /// # Errors
    /// [`EvolutionError::LengthMismatch`] if the representation length
    /// differs from the problem's genome length.
    pub fn new<P>(problem: &P, representation: Vec<G>) -> Result<Self, EvolutionError>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        let expected = problem.genome_len();
        if representation.len() != expected {
            return Err(EvolutionError::LengthMismatch {
                expected,
                actual: representation.len(),
            });
        }
        let fitness = problem.evaluate(&representation);
        Ok(Self {
            representation,
            fitness,
        })
    }

    /// Generates a representation with the problem's generator and evaluates it.
    pub fn random<P>(problem: &P, rng: &mut dyn RngCore) -> Result<Self, EvolutionError>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        Self::new(problem, problem.generate(rng))
    }

    /// Gene vector.
    pub fn representation(&self) -> &[G] {
        &self.representation
    }

    /// Full fitness tuple.
    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    /// Primary fitness value.
    pub fn primary(&self) -> f64 {
        self.fitness.primary
    }

    /// Representation length.
    pub fn len(&self) -> usize {
        self.representation.len()
    }

    /// Returns `true` for an empty representation.
    pub fn is_empty(&self) -> bool {
        self.representation.is_empty()
    }

    /// Consumes the candidate, returning its representation.
    pub fn into_representation(self) -> Vec<G> {
        self.representation
    }
}
