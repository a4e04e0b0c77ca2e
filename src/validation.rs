//! Input validation for rostering problems.
//!
//! Checks structural integrity of the roster tables before any run.
//! Detects:
//! - Zero days, shifts or workers
//! - Tables whose dimensions disagree with `workers × days × shifts`
//! - Preference values outside `{-1, 0, 1}`
//! - Skill requirements on slots that don't exist
//! - Headcount requirements no roster can meet
//!
//! Every issue is collected; validation never stops at the first one.

use std::fmt;

use crate::roster::RosterProblem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `days`, `shifts` or `workers` is zero.
    EmptyDimension,
    /// A table's row count or row length is wrong.
    DimensionMismatch,
    /// A preference is not -1, 0 or 1.
    InvalidPreference,
    /// A skilled slot index is outside the planning horizon.
    InvalidSkilledShift,
    /// A slot requires more workers than exist, or the total exceeds the genome.
    InfeasibleHeadcount,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a rostering problem.
///
/// Checks:
/// 1. `days`, `shifts` and `workers` are non-zero
/// 2. `workers_per_shift` has one entry per slot
/// 3. Optional per-worker tables (`holidays`, `skills`, `preferences`) are
///    either empty or have one row per worker, each row one entry per slot
/// 4. Preferences are in `{-1, 0, 1}`
/// 5. Skilled slots are within `0..days × shifts`
/// 6. No slot requires more than `workers`, and the total fits the genome
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(problem: &RosterProblem) -> ValidationResult {
    let mut errors = Vec::new();
    let slots = problem.slots();

    for (name, value) in [
        ("days", problem.days),
        ("shifts", problem.shifts),
        ("workers", problem.workers),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyDimension,
                format!("{name} must be at least 1"),
            ));
        }
    }

    if problem.workers_per_shift.len() != slots {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "workers_per_shift has {} entries, expected {}",
                problem.workers_per_shift.len(),
                slots
            ),
        ));
    }

    check_worker_table("holidays", &problem.holidays, problem.workers, slots, &mut errors);
    check_worker_table(
        "preferences",
        &problem.preferences,
        problem.workers,
        slots,
        &mut errors,
    );

    if !problem.skills.is_empty() && problem.skills.len() != problem.workers {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "skills has {} rows, expected {}",
                problem.skills.len(),
                problem.workers
            ),
        ));
    }

    for (worker, row) in problem.preferences.iter().enumerate() {
        for (slot, &value) in row.iter().enumerate() {
            if !(-1..=1).contains(&value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPreference,
                    format!("Worker {worker} has preference {value} for slot {slot}"),
                ));
            }
        }
    }

    for &slot in problem.skilled_shifts.keys() {
        if slot >= slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSkilledShift,
                format!("Skilled slot {slot} is outside 0..{slots}"),
            ));
        }
    }

    for (slot, &required) in problem.workers_per_shift.iter().enumerate() {
        if required as usize > problem.workers {
            errors.push(ValidationError::new(
                ValidationErrorKind::InfeasibleHeadcount,
                format!(
                    "Slot {slot} requires {required} workers, only {} exist",
                    problem.workers
                ),
            ));
        }
    }

    let total = problem.total_required();
    let capacity = problem.workers * slots;
    if total > capacity {
        errors.push(ValidationError::new(
            ValidationErrorKind::InfeasibleHeadcount,
            format!("{total} worker-shifts required, roster holds {capacity}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_worker_table<T>(
    name: &str,
    table: &[Vec<T>],
    workers: usize,
    slots: usize,
    errors: &mut Vec<ValidationError>,
) {
    if table.is_empty() {
        return;
    }
    if table.len() != workers {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!("{name} has {} rows, expected {workers}", table.len()),
        ));
    }
    for (worker, row) in table.iter().enumerate() {
        if row.len() != slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("{name} row {worker} has {} entries, expected {slots}", row.len()),
            ));
        }
    }
}
