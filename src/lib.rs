//! Evolutionary rostering for the U-Engine ecosystem.
//!
//! Provides a generational genetic-algorithm engine over fixed-length
//! encoded solutions and a shift-rostering problem built on it.
//!
//! # Modules
//!
//! - **`ga`**: Engine core: `Problem` contract, `Candidate`, `Population`,
//!   selection / crossover / mutation operators, `Fitness` and `Direction`
//! - **`roster`**: Shift-rostering problem: representation generator,
//!   seven-rule fitness evaluator, `RosterEvaluation` counters
//! - **`validation`**: Roster input integrity checks (table dimensions,
//!   preference domain, skilled slots, headcount feasibility)
//! - **`config`**: serde-driven run configuration (`EvolutionConfig`)
//! - **`persistence`**: `FitnessSink` contract and the append-only CSV log
//! - **`error`**: `EvolutionError`, `PersistenceError`
//!
//! # Example
//!
//! ```
//! use u_roster::config::EvolutionConfig;
//! use u_roster::roster::RosterProblem;
//!
//! let problem = RosterProblem::uniform(7, 2, 4, 2).validated().unwrap();
//! let config = EvolutionConfig {
//!     population_size: 20,
//!     generations: 10,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let population = config.run(problem).unwrap();
//! assert_eq!(population.fitness_history().len(), 10);
//! ```
//!
//! # References
//!
//! - Eiben & Smith (2015), "Introduction to Evolutionary Computing"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

pub mod config;
pub mod error;
pub mod ga;
pub mod persistence;
pub mod roster;
pub mod validation;

pub use config::EvolutionConfig;
pub use error::{EvolutionError, PersistenceError};
pub use persistence::{CsvFitnessLog, FitnessSink};
pub use roster::RosterProblem;
