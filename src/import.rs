//! Health export normalization
//!
//! Turns an Apple Health `export.xml` into per-day aggregates. Parsing is
//! all-or-nothing: a malformed document yields `ImportError::Parse` before
//! anything is aggregated, so callers never persist partial state.
//!
//! Individual samples are forgiving: a missing or unparseable end date skips
//! the sample, and non-finite numbers count as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::health::{finite_or_zero, latest_health_date};
use crate::models::{HealthDay, HealthStore, WorkoutType};

/// ---------------------------------------------------------------------------
/// Export Format Constants
/// ---------------------------------------------------------------------------

const RECORD_TAG: &str = "Record";
const WORKOUT_TAG: &str = "Workout";
const STEP_COUNT_TYPE: &str = "HKQuantityTypeIdentifierStepCount";
const ACTIVITY_TYPE_PREFIX: &str = "HKWorkoutActivityType";

const STRENGTH_KEYWORDS: &[&str] = &[
  "strength",
  "crossfit",
  "functional",
  "traditional",
  "weight",
  "resistance",
];

const MOBILITY_KEYWORDS: &[&str] = &[
  "yoga",
  "pilates",
  "stretch",
  "flexibility",
  "mobility",
  "mindandbody",
  "cooldown",
];

const SPORTS_KEYWORDS: &[&str] = &[
  "basketball",
  "soccer",
  "football",
  "tennis",
  "baseball",
  "volleyball",
  "hockey",
  "rugby",
  "martial",
  "wrestling",
  "sport",
];

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
  #[error("Invalid XML file: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Raw Samples
/// ---------------------------------------------------------------------------

/// A `<Record>` element: one quantity sample
#[derive(Debug, Clone, PartialEq)]
pub struct QuantitySample {
  pub kind: Option<String>,
  pub end_date: Option<NaiveDate>,
  pub value: f64,
}

/// A `<Workout>` element
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSample {
  pub activity_type: Option<String>,
  pub end_date: Option<NaiveDate>,
  pub duration: Option<f64>,
  pub duration_unit: Option<String>,
}

/// The two record kinds we read out of an export; everything else is ignored
#[derive(Debug, Clone, Default)]
pub struct ExportDocument {
  pub records: Vec<QuantitySample>,
  pub workouts: Vec<WorkoutSample>,
}

impl ExportDocument {
  /// Parse a full export document. Fails if the XML is not well-formed.
  pub fn parse(xml: &str) -> Result<Self, ImportError> {
    // Real exports carry an internal DTD
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;

    let doc = roxmltree::Document::parse_with_options(xml, options)
      .map_err(|e| ImportError::Parse(e.to_string()))?;

    let mut parsed = Self::default();

    for node in doc.descendants().filter(|n| n.is_element()) {
      if node.has_tag_name(RECORD_TAG) {
        parsed.records.push(QuantitySample {
          kind: node.attribute("type").map(str::to_string),
          end_date: parse_date_part(node.attribute("endDate")),
          value: parse_number(node.attribute("value")),
        });
      } else if node.has_tag_name(WORKOUT_TAG) {
        parsed.workouts.push(WorkoutSample {
          activity_type: node.attribute("workoutActivityType").map(str::to_string),
          end_date: parse_date_part(node.attribute("endDate")),
          duration: node.attribute("duration").and_then(|d| d.trim().parse().ok()),
          duration_unit: node.attribute("durationUnit").map(str::to_string),
        });
      }
    }

    Ok(parsed)
  }
}

/// Date key of a timestamp such as `2025-01-09 07:45:10 -0800`
fn parse_date_part(raw: Option<&str>) -> Option<NaiveDate> {
  let prefix = raw?.trim().get(..10)?;
  NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn parse_number(raw: Option<&str>) -> f64 {
  raw
    .and_then(|v| v.trim().parse::<f64>().ok())
    .map(finite_or_zero)
    .unwrap_or(0.0)
}

/// ---------------------------------------------------------------------------
/// Unit Conversion and Classification
/// ---------------------------------------------------------------------------

/// Convert a workout duration to minutes.
/// Seconds divide by 60, hours multiply by 60, minutes and unknown units pass
/// through. A missing duration is 0.
pub fn duration_to_minutes(duration: Option<f64>, unit: Option<&str>) -> f64 {
  let value = match duration {
    Some(v) if v.is_finite() => v,
    _ => return 0.0,
  };

  let unit = unit.unwrap_or("min").trim().to_lowercase();
  if unit.starts_with("sec") || unit == "s" {
    value / 60.0
  } else if unit.starts_with("hour") || unit == "h" {
    value * 60.0
  } else {
    value
  }
}

/// Map a raw activity tag onto one of cardio/strength/mobility/sports.
/// Keyword groups are checked in that priority; cardio is the fallback.
pub fn classify_workout(raw_activity_type: Option<&str>) -> WorkoutType {
  let Some(raw) = raw_activity_type else {
    return WorkoutType::Cardio;
  };
  let tag = raw.replace(ACTIVITY_TYPE_PREFIX, "").to_lowercase();
  let matches_any = |keywords: &[&str]| keywords.iter().any(|k| tag.contains(k));

  if matches_any(STRENGTH_KEYWORDS) {
    WorkoutType::Strength
  } else if matches_any(MOBILITY_KEYWORDS) {
    WorkoutType::Mobility
  } else if matches_any(SPORTS_KEYWORDS) {
    WorkoutType::Sports
  } else {
    WorkoutType::Cardio
  }
}

/// Running is tracked separately from classification (it also feeds run minutes)
pub fn is_running_workout(raw_activity_type: Option<&str>) -> bool {
  raw_activity_type
    .map(|t| t.to_lowercase().contains("running"))
    .unwrap_or(false)
}

/// Highest count wins; ties go to whichever classification was seen first
pub fn resolve_primary_type(type_counts: &[(WorkoutType, u32)]) -> Option<WorkoutType> {
  let mut best: Option<(WorkoutType, u32)> = None;
  for &(workout_type, count) in type_counts {
    if best.map_or(true, |(_, best_count)| count > best_count) {
      best = Some((workout_type, count));
    }
  }
  best.map(|(workout_type, _)| workout_type)
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Summary returned to the caller after an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
  pub days_imported: usize,
  pub record_count: usize,
  pub workout_count: usize,
  pub latest_date: Option<NaiveDate>,
}

impl ImportReport {
  pub fn status_line(&self) -> String {
    format!(
      "Imported {} day(s), {} records, {} workouts. Latest imported date: {}.",
      self.days_imported,
      self.record_count,
      self.workout_count,
      self
        .latest_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "n/a".to_string())
    )
  }
}

/// Fully aggregated import, ready to replace the health store
#[derive(Debug, Clone)]
pub struct ImportOutcome {
  pub health: HealthStore,
  pub report: ImportReport,
}

#[derive(Default)]
struct DayAccumulator {
  day: HealthDay,
  /// Insertion-ordered tally so ties resolve to the first type seen
  type_counts: Vec<(WorkoutType, u32)>,
}

impl DayAccumulator {
  fn tally(&mut self, workout_type: WorkoutType) {
    match self.type_counts.iter_mut().find(|(t, _)| *t == workout_type) {
      Some((_, count)) => *count += 1,
      None => self.type_counts.push((workout_type, 1)),
    }
  }

  fn finish(self) -> HealthDay {
    HealthDay {
      primary_type: resolve_primary_type(&self.type_counts),
      ..self.day
    }
  }
}

/// Aggregate parsed samples into per-day health data
pub fn aggregate(document: &ExportDocument) -> ImportOutcome {
  let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
  let mut skipped = 0usize;

  for record in &document.records {
    let Some(date) = record.end_date else {
      skipped += 1;
      continue;
    };
    if record.kind.as_deref() == Some(STEP_COUNT_TYPE) {
      days.entry(date).or_default().day.steps += finite_or_zero(record.value);
    }
  }

  for workout in &document.workouts {
    let Some(date) = workout.end_date else {
      skipped += 1;
      continue;
    };
    let raw_type = workout.activity_type.as_deref();
    let minutes = duration_to_minutes(workout.duration, workout.duration_unit.as_deref());

    let acc = days.entry(date).or_default();
    acc.day.workout_min += minutes;
    acc.day.workout_count += 1;
    acc.tally(classify_workout(raw_type));
    if is_running_workout(raw_type) {
      acc.day.run_min += minutes;
    }
  }

  if skipped > 0 {
    tracing::debug!(skipped, "Skipped samples without a usable end date");
  }

  let health: HealthStore = days
    .into_iter()
    .map(|(date, acc)| (date, acc.finish()))
    .collect();

  let report = ImportReport {
    days_imported: health.len(),
    record_count: document.records.len(),
    workout_count: document.workouts.len(),
    latest_date: latest_health_date(&health),
  };

  ImportOutcome { health, report }
}

/// Parse and aggregate an export in one step
pub fn normalize_export(xml: &str) -> Result<ImportOutcome, ImportError> {
  let document = ExportDocument::parse(xml)?;
  let outcome = aggregate(&document);

  tracing::info!(
    days = outcome.report.days_imported,
    records = outcome.report.record_count,
    workouts = outcome.report.workout_count,
    "Health export normalized"
  );

  Ok(outcome)
}
