//! Roster fitness rules.
//!
//! | Rule | Counter | Weight |
//! |------|---------|--------|
//! | Duty count within `[4·days/7, 6·days/7]` | `balanced_workers` | +1000 per worker |
//! | Two adjacent duty slots | `consecutive_violations` | −100 per pair |
//! | More than 3 duties in a two-day window | `two_day_violations` | −100 per window |
//! | Slot headcount differs from requirement | `headcount_violations` | −300 per slot |
//! | Duty on a holiday | `holiday_violations` | −100 per slot |
//! | Duty in a skilled slot without the skill | `skill_violations` | −200 per slot |
//! | Preference honoured / ignored | `preferences_met` / `preferences_missed` | ±10 |
//!
//! Two-day windows are consecutive, non-overlapping chunks of
//! `2 × shifts` slots in a worker's block; an odd trailing day forms a
//! window on its own.

use serde::{Deserialize, Serialize};

use super::RosterProblem;
use crate::ga::Fitness;

const BALANCED_REWARD: f64 = 1000.0;
const CONSECUTIVE_PENALTY: f64 = 100.0;
const TWO_DAY_PENALTY: f64 = 100.0;
const HEADCOUNT_PENALTY: f64 = 300.0;
const HOLIDAY_PENALTY: f64 = 100.0;
const SKILL_PENALTY: f64 = 200.0;
const PREFERENCE_WEIGHT: f64 = 10.0;

/// Duties allowed in one two-day window.
const TWO_DAY_LIMIT: usize = 3;

/// Labels of the diagnostic counters, in fitness-tuple order.
pub const DIAGNOSTIC_LABELS: [&str; 8] = [
    "balanced_workers",
    "consecutive_violations",
    "two_day_violations",
    "headcount_violations",
    "holiday_violations",
    "skill_violations",
    "preferences_met",
    "preferences_missed",
];

/// Rule counters of one evaluated roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterEvaluation {
    pub score: f64,
    pub balanced_workers: u32,
    pub consecutive_violations: u32,
    pub two_day_violations: u32,
    pub headcount_violations: u32,
    pub holiday_violations: u32,
    pub skill_violations: u32,
    pub preferences_met: u32,
    pub preferences_missed: u32,
}

impl RosterEvaluation {
    /// Counters in fitness-tuple order.
    pub fn diagnostics(&self) -> [u32; 8] {
        [
            self.balanced_workers,
            self.consecutive_violations,
            self.two_day_violations,
            self.headcount_violations,
            self.holiday_violations,
            self.skill_violations,
            self.preferences_met,
            self.preferences_missed,
        ]
    }

    /// Returns `true` if no hard rule (b)–(f) is broken.
    pub fn is_feasible(&self) -> bool {
        self.consecutive_violations == 0
            && self.two_day_violations == 0
            && self.headcount_violations == 0
            && self.holiday_violations == 0
            && self.skill_violations == 0
    }
}

impl From<RosterEvaluation> for Fitness {
    fn from(eval: RosterEvaluation) -> Self {
        Fitness::new(
            eval.score,
            eval.diagnostics().iter().map(|&c| i64::from(c)).collect(),
        )
    }
}

pub(super) fn evaluate(problem: &RosterProblem, representation: &[u8]) -> RosterEvaluation {
    let mut eval = RosterEvaluation::default();
    let slots = problem.slots();
    if slots == 0 {
        return eval;
    }

    let low = 4.0 * problem.days as f64 / 7.0;
    let high = 6.0 * problem.days as f64 / 7.0;

    for (worker, calendar) in representation
        .chunks(slots)
        .take(problem.workers)
        .enumerate()
    {
        let duties = calendar.iter().filter(|&&g| g == 1).count();
        if (low..=high).contains(&(duties as f64)) {
            eval.balanced_workers += 1;
        }

        eval.consecutive_violations += calendar
            .windows(2)
            .filter(|pair| pair[0] == 1 && pair[1] == 1)
            .count() as u32;

        eval.two_day_violations += calendar
            .chunks(2 * problem.shifts)
            .filter(|window| window.iter().filter(|&&g| g == 1).count() > TWO_DAY_LIMIT)
            .count() as u32;

        let skills = problem.worker_skills(worker);
        for (slot, &gene) in calendar.iter().enumerate() {
            let on_duty = gene == 1;

            if on_duty && problem.is_holiday(worker, slot) {
                eval.holiday_violations += 1;
            }

            if on_duty {
                if let Some(required) = problem.skilled_shifts.get(&slot) {
                    if required.iter().any(|skill| !skills.contains(skill)) {
                        eval.skill_violations += 1;
                    }
                }
            }

            match (problem.preference(worker, slot), on_duty) {
                (1, true) | (-1, false) => eval.preferences_met += 1,
                (1, false) | (-1, true) => eval.preferences_missed += 1,
                _ => {}
            }
        }
    }

    for (slot, &required) in problem.workers_per_shift.iter().enumerate().take(slots) {
        let assigned = (0..problem.workers)
            .filter(|&worker| representation.get(worker * slots + slot) == Some(&1))
            .count();
        if assigned != required as usize {
            eval.headcount_violations += 1;
        }
    }

    let total = BALANCED_REWARD * f64::from(eval.balanced_workers)
        - CONSECUTIVE_PENALTY * f64::from(eval.consecutive_violations)
        - TWO_DAY_PENALTY * f64::from(eval.two_day_violations)
        - HEADCOUNT_PENALTY * f64::from(eval.headcount_violations)
        - HOLIDAY_PENALTY * f64::from(eval.holiday_violations)
        - SKILL_PENALTY * f64::from(eval.skill_violations)
        + PREFERENCE_WEIGHT * f64::from(eval.preferences_met)
        - PREFERENCE_WEIGHT * f64::from(eval.preferences_missed);
    eval.score = (total * 100.0).round() / 100.0;

    eval
}
