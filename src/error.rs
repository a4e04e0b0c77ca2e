//! Error types for the evolution engine and the persistence layer.

use crate::validation::ValidationError;

/// Errors raised by the evolution engine.
///
/// Configuration errors are fatal: they are surfaced immediately and
/// never retried.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// A population was requested without a problem to generate and evaluate candidates.
    #[error("no problem bound: a problem must be supplied before candidates can be created")]
    UnboundProblem,

    /// Optimization direction other than `max` or `min`.
    #[error("unknown optimization direction '{0}' (expected 'max' or 'min')")]
    UnknownDirection(String),

    /// Two representations that must share a length do not.
    #[error("representation length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An operator was asked to pick from an empty population.
    #[error("cannot select from an empty population")]
    EmptyPopulation,

    /// Out-of-range run parameter (size, probability, tournament size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Problem data failed validation.
    #[error("invalid problem data ({} issue(s)): {}", .0.len(), join_messages(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// Configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors raised by a [`FitnessSink`](crate::persistence::FitnessSink).
///
/// These never abort a run; the population logs and continues.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
