use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Workout classification stored on an entry.
///
/// `Rest` only ever comes from a human (or a note saved on a day without
/// activity); imported workouts classify into one of the other four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
  #[default]
  Cardio,
  Strength,
  Mobility,
  Sports,
  Rest,
}

impl WorkoutType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Cardio => "cardio",
      WorkoutType::Strength => "strength",
      WorkoutType::Mobility => "mobility",
      WorkoutType::Sports => "sports",
      WorkoutType::Rest => "rest",
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for WorkoutType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "cardio" => Ok(Self::Cardio),
      "strength" => Ok(Self::Strength),
      "mobility" => Ok(Self::Mobility),
      "sports" => Ok(Self::Sports),
      "rest" => Ok(Self::Rest),
      other => Err(format!("Unknown workout type: {}", other)),
    }
  }
}

/// One day of the training log. Unique per `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
  pub date: NaiveDate,
  #[serde(default, deserialize_with = "lenient::bool_or_false")]
  pub did_exercise: bool,
  #[serde(rename = "type", default, deserialize_with = "lenient::workout_type")]
  pub workout_type: WorkoutType,
  #[serde(default, deserialize_with = "lenient::number_or_zero")]
  pub duration_min: f64,

  // Manual fields: the health sync never overwrites these.
  #[serde(default, deserialize_with = "lenient::optional_number")]
  pub intensity: Option<f64>,
  #[serde(default, deserialize_with = "lenient::optional_number")]
  pub sleep_hours: Option<f64>,
  #[serde(default, deserialize_with = "lenient::optional_number")]
  pub energy: Option<f64>,
  #[serde(default, deserialize_with = "lenient::optional_number")]
  pub soreness: Option<f64>,
  #[serde(default, deserialize_with = "lenient::string_or_empty")]
  pub notes: String,

  #[serde(default, deserialize_with = "lenient::bool_or_false")]
  pub auto_from_health: bool,
  #[serde(default, deserialize_with = "lenient::optional_count")]
  pub imported_steps: Option<u64>,
}

impl Entry {
  /// A blank manual entry for `date`
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date,
      did_exercise: false,
      workout_type: WorkoutType::Rest,
      duration_min: 0.0,
      intensity: None,
      sleep_hours: None,
      energy: None,
      soreness: None,
      notes: String::new(),
      auto_from_health: false,
      imported_steps: None,
    }
  }
}

/// Replace the entry sharing `entry.date`, or append it.
/// Returns true when an existing entry was replaced.
pub fn upsert_entry(entries: &mut Vec<Entry>, entry: Entry) -> bool {
  match entries.iter_mut().find(|e| e.date == entry.date) {
    Some(existing) => {
      *existing = entry;
      true
    }
    None => {
      entries.push(entry);
      false
    }
  }
}

pub fn find_entry(entries: &[Entry], date: NaiveDate) -> Option<&Entry> {
  entries.iter().find(|e| e.date == date)
}

/// Entries sorted newest first
pub fn sorted_by_date_desc(entries: &[Entry]) -> Vec<&Entry> {
  let mut sorted: Vec<&Entry> = entries.iter().collect();
  sorted.sort_by(|a, b| b.date.cmp(&a.date));
  sorted
}
