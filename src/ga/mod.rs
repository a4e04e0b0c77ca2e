//! Generational genetic-algorithm engine.
//!
//! Problem-agnostic: a [`Problem`] supplies the representation generator
//! and the fitness evaluator, and the [`Population`] runs the loop
//! Selection → Crossover → Mutation → elitism → next generation.
//!
//! # Submodules
//!
//! - [`selection`]: roulette, tournament and rank selection
//! - [`crossover`]: single-point, index-cycle, index-PMX and uniform crossover
//! - [`mutation`]: the [`Mutation`] contract and binary-flip/swap/inversion
//! - [`operators`]: runtime-selectable operator bundle
//!
//! # Randomness
//!
//! Every generator and operator call takes an explicit `&mut dyn RngCore`;
//! the engine holds no global random state, so a seeded generator makes a
//! run reproducible.
//!
//! # Reference
//! Eiben & Smith (2015), "Introduction to Evolutionary Computing", Ch. 4–5

mod candidate;
pub mod crossover;
mod fitness;
pub mod mutation;
pub mod operators;
mod population;
mod problem;
pub mod selection;

pub use candidate::Candidate;
pub use crossover::{CrossoverType, Offspring};
pub use fitness::{Direction, Fitness};
pub use mutation::{Mutation, MutationType};
pub use operators::GeneticOperators;
pub use population::{EvolutionSettings, Population, PopulationBuilder};
pub use problem::Problem;
pub use selection::SelectionType;
