//! Week-over-week training feedback and the history table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{current_streak, shift_date, WindowSummary};
use crate::models::entry::sorted_by_date_desc;
use crate::models::health::{finite_or_zero, health_dates_desc};
use crate::models::{Entry, HealthStore};

/// Default number of rows shown in the history table
pub const HISTORY_ROW_LIMIT: usize = 30;

/// Trained days and minutes inside a window of the entry log
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingWindow {
  pub days: u32,
  pub minutes: f64,
}

impl TrainingWindow {
  /// Exercised entries dated in `[end - (days - 1), end]`
  pub fn compute(entries: &[Entry], end: NaiveDate, days: u32) -> Self {
    let Some(start) = shift_date(end, -(i64::from(days) - 1)) else {
      return Self::default();
    };

    entries
      .iter()
      .filter(|e| e.date >= start && e.date <= end && e.did_exercise)
      .fold(Self::default(), |acc, e| Self {
        days: acc.days + 1,
        minutes: acc.minutes + finite_or_zero(e.duration_min),
      })
  }
}

/// Dashboard feedback derived from the entry log and the health window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryInsights {
  pub streak: u32,
  pub last7: TrainingWindow,
  pub prev7: TrainingWindow,
  pub delta_days: i64,
  pub delta_minutes: f64,
  pub avg_steps: i64,
  pub run_min: i64,
}

impl HistoryInsights {
  /// `health_date` is the imported date the coaching context is anchored on.
  /// Without one, everything except the streak is zero.
  pub fn compute(
    entries: &[Entry],
    today: NaiveDate,
    health_date: Option<NaiveDate>,
    health_summary: Option<&WindowSummary>,
  ) -> Self {
    let streak = current_streak(entries, today);

    let Some(end) = health_date else {
      return Self {
        streak,
        last7: TrainingWindow::default(),
        prev7: TrainingWindow::default(),
        delta_days: 0,
        delta_minutes: 0.0,
        avg_steps: 0,
        run_min: 0,
      };
    };

    let last7 = TrainingWindow::compute(entries, end, 7);
    let prev7 = shift_date(end, -7)
      .map(|prev_end| TrainingWindow::compute(entries, prev_end, 7))
      .unwrap_or_default();

    let (avg_steps, run_min) = health_summary
      .map(|s| {
        (
          finite_or_zero(s.avg_steps).round() as i64,
          finite_or_zero(s.total_run_min).round() as i64,
        )
      })
      .unwrap_or((0, 0));

    Self {
      streak,
      last7,
      prev7,
      delta_days: i64::from(last7.days) - i64::from(prev7.days),
      delta_minutes: last7.minutes - prev7.minutes,
      avg_steps,
      run_min,
    }
  }
}

/// ---------------------------------------------------------------------------
/// History Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSource {
  /// Entry written by the health sync
  Auto,
  /// Entry written by a human
  Manual,
  /// Health day with no entry and no workout
  Imported,
}

impl RowSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      RowSource::Auto => "Auto",
      RowSource::Manual => "Manual",
      RowSource::Imported => "Imported",
    }
  }
}

/// One display row; metrics are pre-formatted, "-" when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
  pub date: NaiveDate,
  pub exercised: bool,
  pub workout_type: String,
  pub duration: String,
  pub sleep: String,
  pub energy: String,
  pub soreness: String,
  pub source: RowSource,
  pub steps: String,
}

/// Rounded whole number, or "-" for missing / non-finite values
pub fn metric_or_dash(value: Option<f64>) -> String {
  match value {
    Some(v) if v.is_finite() => format!("{}", v.round() as i64),
    _ => "-".to_string(),
  }
}

/// Most recent rows first. Falls back to raw health days while the log is empty.
pub fn history_rows(entries: &[Entry], health: &HealthStore, limit: usize) -> Vec<HistoryRow> {
  if entries.is_empty() {
    return health_dates_desc(health)
      .into_iter()
      .take(limit)
      .filter_map(|date| {
        let day = health.get(&date)?;
        let exercised = day.has_workout();
        Some(HistoryRow {
          date,
          exercised,
          workout_type: if exercised {
            day.primary_type.unwrap_or_default().to_string()
          } else {
            "-".to_string()
          },
          duration: metric_or_dash(Some(day.workout_min)),
          sleep: "-".to_string(),
          energy: "-".to_string(),
          soreness: "-".to_string(),
          source: if exercised { RowSource::Auto } else { RowSource::Imported },
          steps: metric_or_dash(Some(day.steps)),
        })
      })
      .collect();
  }

  sorted_by_date_desc(entries)
    .into_iter()
    .take(limit)
    .map(|entry| {
      let steps = entry
        .imported_steps
        .map(|s| s as f64)
        .or_else(|| health.get(&entry.date).map(|d| d.steps));
      HistoryRow {
        date: entry.date,
        exercised: entry.did_exercise,
        workout_type: entry.workout_type.to_string(),
        duration: metric_or_dash(Some(entry.duration_min)),
        sleep: metric_or_dash(entry.sleep_hours),
        energy: metric_or_dash(entry.energy),
        soreness: metric_or_dash(entry.soreness),
        source: if entry.auto_from_health {
          RowSource::Auto
        } else {
          RowSource::Manual
        },
        steps: metric_or_dash(steps),
      }
    })
    .collect()
}
