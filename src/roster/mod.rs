//! Shift-rostering problem.
//!
//! Assigns `workers` to `days × shifts` slots. The representation is a flat
//! binary vector made of one contiguous block per worker:
//!
//! ```text
//! | worker 0: slot 0 .. slot S-1 | worker 1: slot 0 .. slot S-1 | ...
//! ```
//!
//! where `S = days × shifts` and slot `day × shifts + shift`. Gene `1`
//! means the worker is on duty in that slot.
//!
//! # Domain Mappings
//!
//! | u-roster | Hospital | Retail | Call centre |
//! |----------|----------|--------|-------------|
//! | Worker | Nurse | Clerk | Agent |
//! | Slot | Ward shift | Opening shift | Phone shift |
//! | Skill | Certification | Key holder | Language |

mod evaluation;
mod generator;

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};

pub use evaluation::{RosterEvaluation, DIAGNOSTIC_LABELS};

use crate::error::EvolutionError;
use crate::ga::{Fitness, Problem};
use crate::validation::{validate_roster, ValidationResult};

/// Fixed rostering data, shared read-only by every candidate of a run.
///
/// Optional tables (`holidays`, `skills`, `preferences`) may be left empty,
/// meaning "none" / "indifferent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterProblem {
    /// Planning horizon in days.
    pub days: usize,
    /// Shifts per day.
    pub shifts: usize,
    /// Number of workers.
    pub workers: usize,
    /// Required headcount per slot (`days × shifts` entries).
    pub workers_per_shift: Vec<u32>,
    /// `holidays[worker][slot]`: worker is on leave in that slot.
    #[serde(default)]
    pub holidays: Vec<Vec<bool>>,
    /// Slot → skills every assigned worker must have.
    #[serde(default)]
    pub skilled_shifts: BTreeMap<usize, Vec<String>>,
    /// `skills[worker]`: skills the worker has.
    #[serde(default)]
    pub skills: Vec<Vec<String>>,
    /// `preferences[worker][slot]`: -1 prefers off, 0 indifferent, 1 prefers on.
    #[serde(default)]
    pub preferences: Vec<Vec<i8>>,
}

impl RosterProblem {
    /// Creates a problem with no holidays, skills or preferences.
    pub fn new(days: usize, shifts: usize, workers: usize, workers_per_shift: Vec<u32>) -> Self {
        Self {
            days,
            shifts,
            workers,
            workers_per_shift,
            holidays: Vec::new(),
            skilled_shifts: BTreeMap::new(),
            skills: Vec::new(),
            preferences: Vec::new(),
        }
    }

    /// Creates a problem requiring the same headcount in every slot.
    pub fn uniform(days: usize, shifts: usize, workers: usize, per_slot: u32) -> Self {
        Self::new(days, shifts, workers, vec![per_slot; days * shifts])
    }

    /// Sets the holiday table.
    pub fn with_holidays(mut self, holidays: Vec<Vec<bool>>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Marks one `(worker, slot)` as holiday, growing the table as needed.
    pub fn with_holiday(mut self, worker: usize, slot: usize) -> Self {
        let slots = self.slots();
        if self.holidays.len() < self.workers {
            self.holidays.resize(self.workers, vec![false; slots]);
        }
        if let Some(cell) = self.holidays.get_mut(worker).and_then(|row| row.get_mut(slot)) {
            *cell = true;
        }
        self
    }

    /// Requires `skills` for everyone assigned to `slot`.
    pub fn with_skilled_shift(mut self, slot: usize, skills: Vec<String>) -> Self {
        self.skilled_shifts.insert(slot, skills);
        self
    }

    /// Sets the per-worker skill table.
    pub fn with_skills(mut self, skills: Vec<Vec<String>>) -> Self {
        self.skills = skills;
        self
    }

    /// Sets the preference table.
    pub fn with_preferences(mut self, preferences: Vec<Vec<i8>>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Checks table dimensions, preference values, skilled slots and headcount.
    pub fn validate(&self) -> ValidationResult {
        validate_roster(self)
    }

    /// Validates the tables, returning the problem on success.
    pub fn validated(self) -> Result<Self, EvolutionError> {
        self.validate().map_err(EvolutionError::InvalidProblem)?;
        Ok(self)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, EvolutionError> {
        let problem: Self = serde_json::from_str(json)?;
        problem.validated()
    }

    /// Slots per worker (`days × shifts`).
    pub fn slots(&self) -> usize {
        self.days * self.shifts
    }

    /// Total required worker-shifts (`Σ workers_per_shift`).
    pub fn total_required(&self) -> usize {
        self.workers_per_shift.iter().map(|&n| n as usize).sum()
    }

    /// Gene index of `(worker, slot)`.
    pub fn gene_index(&self, worker: usize, slot: usize) -> usize {
        worker * self.slots() + slot
    }

    /// Slot index of `(day, shift)`.
    pub fn slot_index(&self, day: usize, shift: usize) -> usize {
        day * self.shifts + shift
    }

    /// Evaluates a representation into named counters.
    pub fn evaluate_detailed(&self, representation: &[u8]) -> RosterEvaluation {
        evaluation::evaluate(self, representation)
    }

    fn is_holiday(&self, worker: usize, slot: usize) -> bool {
        self.holidays
            .get(worker)
            .and_then(|row| row.get(slot))
            .copied()
            .unwrap_or(false)
    }

    fn preference(&self, worker: usize, slot: usize) -> i8 {
        self.preferences
            .get(worker)
            .and_then(|row| row.get(slot))
            .copied()
            .unwrap_or(0)
    }

    fn worker_skills(&self, worker: usize) -> &[String] {
        self.skills.get(worker).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Problem for RosterProblem {
    type Gene = u8;

    fn genome_len(&self) -> usize {
        self.workers * self.slots()
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec<u8> {
        generator::generate(self, rng)
    }

    fn evaluate(&self, representation: &[u8]) -> Fitness {
        self.evaluate_detailed(representation).into()
    }

    fn diagnostic_labels(&self) -> &[&'static str] {
        &DIAGNOSTIC_LABELS
    }
}
