//! Health -> entry log reconciliation
//!
//! Every imported day with workout activity gets an entry. Machine-derived
//! fields are (re)written from the health data on each pass; the fields a
//! human fills in (intensity, sleep, energy, soreness, notes) are carried over
//! untouched. Re-running on unchanged inputs creates nothing new and leaves
//! every field value as it was.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::health::{health_dates_desc, round_non_negative};
use crate::models::{Entry, HealthDay, HealthStore, WorkoutType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
  pub created: usize,
  pub updated: usize,
}

impl SyncReport {
  pub fn touched(&self) -> bool {
    self.created > 0 || self.updated > 0
  }
}

/// Type for a synced entry: imported primary type, else a non-rest existing
/// type, else cardio
fn synced_type(health: &HealthDay, existing: Option<&Entry>) -> WorkoutType {
  health
    .primary_type
    .or_else(|| {
      existing
        .map(|e| e.workout_type)
        .filter(|t| *t != WorkoutType::Rest)
    })
    .unwrap_or(WorkoutType::Cardio)
}

/// Whole minutes, as shown on the entry
fn duration_from_health(health: &HealthDay) -> f64 {
  round_non_negative(health.workout_min()) as f64
}

/// Merge health aggregates into `entries` in place
pub fn reconcile(entries: &mut Vec<Entry>, health: &HealthStore) -> SyncReport {
  let mut report = SyncReport::default();

  for date in health_dates_desc(health) {
    let Some(day) = health.get(&date) else {
      continue;
    };
    if !day.has_workout() {
      continue;
    }

    let workout_type = synced_type(day, entries.iter().find(|e| e.date == date));
    let duration_min = duration_from_health(day);
    let imported_steps = Some(round_non_negative(day.steps()));

    match entries.iter_mut().find(|e| e.date == date) {
      Some(existing) => {
        existing.did_exercise = true;
        existing.workout_type = workout_type;
        existing.duration_min = duration_min;
        existing.auto_from_health = true;
        existing.imported_steps = imported_steps;
        report.updated += 1;
      }
      None => {
        entries.push(Entry {
          did_exercise: true,
          workout_type,
          duration_min,
          auto_from_health: true,
          imported_steps,
          ..Entry::new(date)
        });
        report.created += 1;
      }
    }
  }

  report
}

/// Attach a note to `date`. Without an existing entry, one is derived from
/// the health day (or an empty rest day when nothing was imported).
pub fn apply_note(entries: &mut Vec<Entry>, health: &HealthStore, date: NaiveDate, note: &str) {
  if let Some(existing) = entries.iter_mut().find(|e| e.date == date) {
    existing.notes = note.to_string();
    return;
  }

  let day = health.get(&date).cloned().unwrap_or_default();
  let did_exercise = day.has_workout();

  entries.push(Entry {
    did_exercise,
    workout_type: if did_exercise {
      day.primary_type.unwrap_or(WorkoutType::Cardio)
    } else {
      WorkoutType::Rest
    },
    duration_min: duration_from_health(&day),
    notes: note.to_string(),
    auto_from_health: did_exercise,
    imported_steps: Some(round_non_negative(day.steps())),
    ..Entry::new(date)
  });
}

/// Status text shown after (or instead of) a sync
pub fn auto_log_status(entries: &[Entry], report: Option<SyncReport>) -> String {
  let auto_count = entries.iter().filter(|e| e.auto_from_health).count();

  if let Some(report) = report.filter(SyncReport::touched) {
    return format!(
      "Auto sync complete. Created {}, updated {} log(s). Total auto logs: {}.",
      report.created, report.updated, auto_count
    );
  }

  if auto_count == 0 {
    return "No auto logs yet. Import Health data to create exercise logs automatically.".to_string();
  }

  format!("Auto logs ready: {} day(s) synced from Health data.", auto_count)
}
