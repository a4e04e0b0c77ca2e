//! Configurable genetic operators.
//!
//! Bundles the selection, crossover and mutation strategies used by one
//! run via [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_roster::ga::{CrossoverType, GeneticOperators, MutationType, SelectionType};
//!
//! let ops = GeneticOperators::<u8>::default();
//! assert_eq!(ops.selection, SelectionType::Rank);
//! assert_eq!(ops.crossover, CrossoverType::Uniform);
//!
//! let ops = GeneticOperators::new(
//!     SelectionType::tournament(),
//!     CrossoverType::SinglePoint,
//!     MutationType::BinaryFlip,
//! );
//! ```

use std::fmt;

use rand::RngCore;

use super::crossover::{CrossoverType, Offspring};
use super::mutation::{Mutation, MutationType};
use super::selection::SelectionType;
use super::{Candidate, Direction};
use crate::error::EvolutionError;

/// Runtime-selectable operators for one evolution run.
pub struct GeneticOperators<G> {
    /// Parent selection strategy.
    pub selection: SelectionType,
    /// Crossover strategy.
    pub crossover: CrossoverType,
    /// Mutation transform.
    pub mutation: Box<dyn Mutation<G>>,
}

impl<G> GeneticOperators<G> {
    /// Creates an operator set.
    pub fn new<M>(selection: SelectionType, crossover: CrossoverType, mutation: M) -> Self
    where
        M: Mutation<G> + 'static,
    {
        Self {
            selection,
            crossover,
            mutation: Box::new(mutation),
        }
    }

    /// Replaces the selection strategy.
    pub fn with_selection(mut self, selection: SelectionType) -> Self {
        self.selection = selection;
        self
    }

    /// Replaces the crossover strategy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Replaces the mutation transform.
    pub fn with_mutation<M>(mut self, mutation: M) -> Self
    where
        M: Mutation<G> + 'static,
    {
        self.mutation = Box::new(mutation);
        self
    }

    /// Picks a parent index with the configured selection strategy.
    pub fn select(
        &self,
        individuals: &mut [Candidate<G>],
        direction: Direction,
        rng: &mut dyn RngCore,
    ) -> Result<usize, EvolutionError> {
        self.selection.select(individuals, direction, rng)
    }

    /// Performs crossover with the configured strategy.
    pub fn crossover(
        &self,
        p1: &[G],
        p2: &[G],
        rng: &mut dyn RngCore,
    ) -> Result<Offspring<G>, EvolutionError>
    where
        G: Clone,
    {
        self.crossover.crossover(p1, p2, rng)
    }

    /// Applies the mutation transform.
    pub fn mutate(&self, representation: Vec<G>, rng: &mut dyn RngCore) -> Vec<G> {
        self.mutation.mutate(representation, rng)
    }

    pub(crate) fn validate(&self) -> Result<(), EvolutionError> {
        self.selection.validate()
    }
}

impl Default for GeneticOperators<u8> {
    fn default() -> Self {
        Self::new(SelectionType::Rank, CrossoverType::Uniform, MutationType::Swap)
    }
}

impl<G> fmt::Debug for GeneticOperators<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneticOperators")
            .field("selection", &self.selection)
            .field("crossover", &self.crossover)
            .finish_non_exhaustive()
    }
}
