//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Health export XML builder
//! - Entry and health-day factories

use chrono::NaiveDate;

use crate::clock::FixedClock;
use crate::db::{Journal, MemoryStore, SqliteStore};
use crate::models::{Entry, HealthDay, WorkoutType};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite store for testing
/// Runs all migrations and returns a ready-to-use store
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqliteStore {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  SqliteStore::from_pool(pool)
    .await
    .expect("Failed to run migrations")
}

/// Journal over a fresh in-memory map
pub fn memory_journal() -> Journal<MemoryStore> {
  Journal::new(MemoryStore::new())
}

/// ---------------------------------------------------------------------------
/// Export Builder
/// ---------------------------------------------------------------------------

/// Builds a minimal Apple Health `export.xml`
#[derive(Default)]
pub struct ExportBuilder {
  body: Vec<String>,
}

impl ExportBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(mut self, kind: &str, end_date: &str, value: &str) -> Self {
    self.body.push(format!(
      r#"  <Record type="{}" sourceName="Watch" unit="count" endDate="{}" value="{}"/>"#,
      kind, end_date, value
    ));
    self
  }

  pub fn steps(self, end_date: &str, value: &str) -> Self {
    self.record("HKQuantityTypeIdentifierStepCount", end_date, value)
  }

  pub fn workout(mut self, activity: &str, end_date: &str, duration: &str, unit: Option<&str>) -> Self {
    let unit_attr = unit
      .map(|u| format!(r#" durationUnit="{}""#, u))
      .unwrap_or_default();
    self.body.push(format!(
      r#"  <Workout workoutActivityType="{}" duration="{}"{} endDate="{}"/>"#,
      activity, duration, unit_attr, end_date
    ));
    self
  }

  /// Append a raw element verbatim
  pub fn raw(mut self, element: &str) -> Self {
    self.body.push(format!("  {}", element));
    self
  }

  pub fn build(self) -> String {
    format!(
      "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<HealthData locale=\"en_US\">\n  <ExportDate value=\"2025-01-01 00:00:00 +0000\"/>\n{}\n</HealthData>\n",
      self.body.join("\n")
    )
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("bad test date")
}

pub fn fixed_clock(s: &str) -> FixedClock {
  FixedClock(date(s))
}

/// Manual entry; exercised days get 30 min of cardio
pub fn entry_on(day: &str, did_exercise: bool) -> Entry {
  let mut entry = Entry::new(date(day));
  entry.did_exercise = did_exercise;
  if did_exercise {
    entry.workout_type = WorkoutType::Cardio;
    entry.duration_min = 30.0;
  }
  entry
}

pub fn exercised_entry(day: &str, minutes: u32) -> Entry {
  Entry {
    duration_min: f64::from(minutes),
    ..entry_on(day, true)
  }
}

/// Health day without a primary type
pub fn health_day(steps: f64, workout_min: f64, workout_count: u32, run_min: f64) -> HealthDay {
  HealthDay {
    steps,
    workout_min,
    workout_count,
    run_min,
    primary_type: None,
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::KeyValueStore;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let store = setup_test_db().await;

    store.set("ready", serde_json::json!(true)).await.unwrap();
    assert_eq!(store.get("ready").await.unwrap(), Some(serde_json::json!(true)));

    store.close().await;
  }

  #[test]
  fn test_export_builder_emits_attributes() {
    let xml = ExportBuilder::new()
      .steps("2025-01-01 10:00:00 +0000", "10")
      .workout("HKWorkoutActivityTypeYoga", "2025-01-01 11:00:00 +0000", "20", None)
      .build();

    assert!(xml.contains(r#"type="HKQuantityTypeIdentifierStepCount""#));
    assert!(xml.contains(r#"workoutActivityType="HKWorkoutActivityTypeYoga""#));
    assert!(!xml.contains("durationUnit"));
  }

  #[test]
  fn test_entry_factories() {
    let rest = entry_on("2025-01-01", false);
    assert_eq!(rest.workout_type, WorkoutType::Rest);
    assert_eq!(rest.duration_min, 0.0);

    let run = exercised_entry("2025-01-01", 55);
    assert!(run.did_exercise);
    assert_eq!(run.duration_min, 55.0);
  }
}
