//! Initial roster generation.
//!
//! Each worker block receives `floor(total_required / workers)` distinct
//! duty slots, then random positions anywhere in the genome are switched on
//! until the number of ones equals the total required headcount. Per-slot
//! and per-worker balance is left to the evaluator.

use rand::seq::index::sample;
use rand::{Rng, RngCore};

use super::RosterProblem;
use crate::ga::Problem;

pub(super) fn generate(problem: &RosterProblem, rng: &mut dyn RngCore) -> Vec<u8> {
    let len = problem.genome_len();
    let mut representation = vec![0u8; len];
    if len == 0 {
        return representation;
    }

    let slots = problem.slots();
    // An unvalidated problem may ask for more than fits.
    let target = problem.total_required().min(len);
    let per_worker = (target / problem.workers).min(slots);

    let mut placed = 0;
    for worker in 0..problem.workers {
        let offset = worker * slots;
        for slot in sample(rng, slots, per_worker) {
            representation[offset + slot] = 1;
            placed += 1;
        }
    }

    while placed < target {
        let position = rng.random_range(0..len);
        if representation[position] == 0 {
            representation[position] = 1;
            placed += 1;
        }
    }

    representation
}
