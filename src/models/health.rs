use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entry::WorkoutType;
use super::lenient;

/// Imported activity aggregated per calendar date.
/// The whole map is replaced on every import.
pub type HealthStore = BTreeMap<NaiveDate, HealthDay>;

/// One day of normalized health import data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthDay {
  #[serde(default, deserialize_with = "lenient::number_or_zero")]
  pub steps: f64,
  #[serde(default, deserialize_with = "lenient::number_or_zero")]
  pub workout_min: f64,
  #[serde(default, deserialize_with = "lenient::count_or_zero")]
  pub workout_count: u32,
  #[serde(default, deserialize_with = "lenient::number_or_zero")]
  pub run_min: f64,
  /// Most frequent workout classification; None on step-only days
  #[serde(default, deserialize_with = "lenient::optional_workout_type")]
  pub primary_type: Option<WorkoutType>,
}

impl HealthDay {
  pub fn steps(&self) -> f64 {
    finite_or_zero(self.steps)
  }

  pub fn workout_min(&self) -> f64 {
    finite_or_zero(self.workout_min)
  }

  pub fn run_min(&self) -> f64 {
    finite_or_zero(self.run_min)
  }

  /// A day counts as a workout day if anything was logged as a workout
  pub fn has_workout(&self) -> bool {
    self.workout_count > 0 || self.workout_min() > 0.0
  }
}

/// Missing or non-finite numbers count as zero throughout aggregation
pub fn finite_or_zero(value: f64) -> f64 {
  if value.is_finite() {
    value
  } else {
    0.0
  }
}

/// Round a non-negative quantity to a whole number, clamping garbage to 0
pub fn round_non_negative(value: f64) -> u64 {
  let v = finite_or_zero(value).round();
  if v > 0.0 {
    v as u64
  } else {
    0
  }
}

pub fn latest_health_date(store: &HealthStore) -> Option<NaiveDate> {
  store.keys().next_back().copied()
}

pub fn health_dates_desc(store: &HealthStore) -> Vec<NaiveDate> {
  store.keys().rev().copied().collect()
}
