//! Deterministic analysis layer for imported activity and the entry log
//!
//! Rolling-window health statistics and the consecutive-day streak. Every
//! function here is pure: same inputs, same numbers, nothing is cached.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::entry::sorted_by_date_desc;
use crate::models::{Entry, HealthDay, HealthStore};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// A day is "active" with at least this many steps...
pub const ACTIVE_DAY_STEPS: f64 = 6000.0;
/// ...or at least this many workout minutes
pub const ACTIVE_DAY_WORKOUT_MIN: f64 = 20.0;

/// Shift a calendar date by a signed number of days; None on overflow
pub fn shift_date(date: NaiveDate, delta_days: i64) -> Option<NaiveDate> {
  let magnitude = Days::new(delta_days.unsigned_abs());
  if delta_days >= 0 {
    date.checked_add_days(magnitude)
  } else {
    date.checked_sub_days(magnitude)
  }
}

/// ---------------------------------------------------------------------------
/// Rolling Window Summary
/// ---------------------------------------------------------------------------

/// Trailing N-day health statistics ending at (and including) a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
  pub total_steps: f64,
  /// Always `total_steps / window_days`, even when some days have no data
  pub avg_steps: f64,
  pub total_workout_min: f64,
  pub total_run_min: f64,
  pub workout_days: u32,
  pub active_days: u32,
  pub window_days: u32,
}

impl WindowSummary {
  /// Walk `days` calendar days back from `end`. Missing days count as zeros.
  pub fn compute(store: &HealthStore, end: NaiveDate, days: u32) -> Self {
    let empty = HealthDay::default();

    let mut total_steps = 0.0;
    let mut total_workout_min = 0.0;
    let mut total_run_min = 0.0;
    let mut workout_days = 0;
    let mut active_days = 0;

    for offset in 0..days {
      let Some(key) = shift_date(end, -i64::from(offset)) else {
        continue;
      };
      let day = store.get(&key).unwrap_or(&empty);

      let steps = day.steps();
      let workout_min = day.workout_min();

      total_steps += steps;
      total_workout_min += workout_min;
      total_run_min += day.run_min();

      if day.has_workout() {
        workout_days += 1;
      }
      if steps >= ACTIVE_DAY_STEPS || workout_min >= ACTIVE_DAY_WORKOUT_MIN {
        active_days += 1;
      }
    }

    let avg_steps = if days > 0 {
      total_steps / f64::from(days)
    } else {
      0.0
    };

    Self {
      total_steps,
      avg_steps,
      total_workout_min,
      total_run_min,
      workout_days,
      active_days,
      window_days: days,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Streak
/// ---------------------------------------------------------------------------

/// Consecutive exercised days counted back from `today`.
///
/// Entries are walked newest first; each one must sit exactly `streak` days
/// before today. The first rest day or the first gap in dates ends the run.
pub fn current_streak(entries: &[Entry], today: NaiveDate) -> u32 {
  let mut streak: u32 = 0;

  for entry in sorted_by_date_desc(entries) {
    let diff_days = (today - entry.date).num_days();
    if diff_days != i64::from(streak) {
      break;
    }

    if entry.did_exercise {
      streak += 1;
      continue;
    }
    break;
  }

  streak
}

/// Whether the entry log has an exercised day dated yesterday
pub fn trained_yesterday(entries: &[Entry], today: NaiveDate) -> bool {
  let Some(yesterday) = shift_date(today, -1) else {
    return false;
  };
  entries.iter().any(|e| e.did_exercise && e.date == yesterday)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
