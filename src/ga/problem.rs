//! Problem contract consumed by the evolution engine.

use std::fmt::Debug;

use rand::RngCore;

use super::Fitness;

/// A problem the engine can search.
///
/// Supplies the representation generator and the fitness evaluator.
/// The engine holds the problem behind an `Arc` and only reads from it,
/// so one instance is shared by every candidate of a run.
///
/// `evaluate` must be a pure function of the representation.
pub trait Problem {
    /// Gene type of the representation.
    type Gene: Clone + PartialEq + Debug;

    /// Fixed representation length `L`.
    fn genome_len(&self) -> usize;

    /// Creates a fresh random representation of length [`genome_len`](Self::genome_len).
    fn generate(&self, rng: &mut dyn RngCore) -> Vec<Self::Gene>;

    /// Evaluates a representation.
    fn evaluate(&self, representation: &[Self::Gene]) -> Fitness;

    /// Names of the diagnostic counters, in tuple order. Used for reporting.
    fn diagnostic_labels(&self) -> &[&'static str] {
        &[]
    }
}
