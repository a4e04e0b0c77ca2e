//! Mutation operators.
//!
//! Mutation is an opaque `representation -> representation` transform. The
//! engine only requires that it preserves length; a candidate built from a
//! representation of the wrong length is rejected.
//!
//! Closures implement [`Mutation`] directly:
//!
//! ```
//! use u_roster::ga::Mutation;
//! use rand::RngCore;
//!
//! let reverse = |mut genes: Vec<u8>, _rng: &mut dyn RngCore| {
//!     genes.reverse();
//!     genes
//! };
//! let mut rng = rand::rng();
//! assert_eq!(reverse.mutate(vec![1, 0, 0], &mut rng), vec![0, 0, 1]);
//! ```

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// A length-preserving representation transform.
pub trait Mutation<G> {
    /// Returns the mutated representation.
    fn mutate(&self, representation: Vec<G>, rng: &mut dyn RngCore) -> Vec<G>;
}

impl<G, F> Mutation<G> for F
where
    F: Fn(Vec<G>, &mut dyn RngCore) -> Vec<G>,
{
    fn mutate(&self, representation: Vec<G>, rng: &mut dyn RngCore) -> Vec<G> {
        self(representation, rng)
    }
}

/// Built-in mutation strategies for binary representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Flip one random bit.
    BinaryFlip,
    /// Swap two random positions.
    Swap,
    /// Reverse a random segment.
    Inversion,
}

impl Mutation<u8> for MutationType {
    fn mutate(&self, representation: Vec<u8>, rng: &mut dyn RngCore) -> Vec<u8> {
        match self {
            MutationType::BinaryFlip => binary_flip_mutation(representation, rng),
            MutationType::Swap => swap_mutation(representation, rng),
            MutationType::Inversion => inversion_mutation(representation, rng),
        }
    }
}

/// Flips one uniformly chosen bit (`0 <-> 1`).
pub fn binary_flip_mutation(mut genes: Vec<u8>, rng: &mut dyn RngCore) -> Vec<u8> {
    if genes.is_empty() {
        return genes;
    }
    let i = rng.random_range(0..genes.len());
    genes[i] = if genes[i] == 0 { 1 } else { 0 };
    genes
}

/// Exchanges two distinct random positions.
pub fn swap_mutation<G>(mut genes: Vec<G>, rng: &mut dyn RngCore) -> Vec<G> {
    if genes.len() < 2 {
        return genes;
    }
    let picked = rand::seq::index::sample(rng, genes.len(), 2);
    genes.swap(picked.index(0), picked.index(1));
    genes
}

/// Reverses the segment between two distinct random positions (inclusive).
pub fn inversion_mutation<G>(mut genes: Vec<G>, rng: &mut dyn RngCore) -> Vec<G> {
    if genes.len() < 2 {
        return genes;
    }
    let picked = rand::seq::index::sample(rng, genes.len(), 2);
    let (i, j) = {
        let (a, b) = (picked.index(0), picked.index(1));
        (a.min(b), a.max(b))
    };
    genes[i..=j].reverse();
    genes
}
