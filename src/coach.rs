//! Coach text: encouragement line, trend stats, and health explanations
//!
//! Everything here formats already-computed numbers into the plain strings a
//! front end shows. No decisions about training are made in this module.

use chrono::NaiveDate;

use crate::analysis::WindowSummary;
use crate::history::HistoryInsights;
use crate::models::health::finite_or_zero;
use crate::models::{Decision, GoalCategory, HealthDay, Mood, Profile, SupportStyle};

/// Motivation at or below this gets the "start small" line
pub const LOW_MOTIVATION: f64 = 4.0;
/// Streak at or above this counts as strong consistency
pub const STRONG_STREAK: u32 = 3;

/// State the support line reacts to
#[derive(Debug, Clone, Copy)]
pub struct ToneInputs {
  pub decision: Decision,
  pub style: SupportStyle,
  pub mood: Mood,
  pub motivation: f64,
  pub streak: u32,
  pub delta_days: i64,
}

/// Pick one encouragement sentence for the style and current condition
pub fn support_line(inputs: &ToneInputs) -> &'static str {
  let low_motivation = finite_or_zero(inputs.motivation) <= LOW_MOTIVATION;

  if !inputs.decision.wants_exercise() {
    return match inputs.style {
      SupportStyle::Direct => {
        "One rest day is a strategy, not a failure. Recover hard and come back tomorrow."
      }
      SupportStyle::Calm => "Rest is part of training. A calmer day now protects consistency later.",
      SupportStyle::Encouraging => {
        "Resting today is valid. You are still building progress through recovery."
      }
    };
  }

  match inputs.style {
    SupportStyle::Direct => {
      if low_motivation {
        "No pressure for perfect. Start 10 minutes, then decide again."
      } else if inputs.mood.is_low() {
        "Keep it controlled and finish feeling better than you started."
      } else {
        "You are ready. Execute the plan and keep the quality high."
      }
    }
    SupportStyle::Calm => {
      if low_motivation {
        "Keep it simple: gentle start, then settle into rhythm."
      } else if inputs.streak >= STRONG_STREAK {
        "Your consistency is strong. Choose a smooth, sustainable pace today."
      } else {
        "You are building quietly and steadily. One focused session is enough."
      }
    }
    SupportStyle::Encouraging => {
      if low_motivation {
        "You only need one small win today. Start easy and let momentum grow."
      } else if inputs.delta_days > 0 {
        "You are trending up this week. Keep that streak alive today."
      } else {
        "You\u{2019}ve got this. A focused session today moves you closer to your goal."
      }
    }
  }
}

/// Explicit `+` for positive deltas, plain number otherwise
pub fn trend_text(delta: i64) -> String {
  if delta > 0 {
    format!("+{}", delta)
  } else {
    delta.to_string()
  }
}

/// `"{message} {support line}"`
pub fn coach_message(message: &str, inputs: &ToneInputs) -> String {
  format!("{} {}", message, support_line(inputs))
}

/// Last-7 vs previous-7 trend plus the current streak
pub fn stats_line(insights: &HistoryInsights) -> String {
  format!(
    "Your trend: last 7d {} training day(s), {} min ({} day(s), {} min vs previous 7d). Streak: {} day(s).",
    insights.last7.days,
    finite_or_zero(insights.last7.minutes).round() as i64,
    trend_text(insights.delta_days),
    trend_text(finite_or_zero(insights.delta_minutes).round() as i64),
    insights.streak
  )
}

/// ---------------------------------------------------------------------------
/// Health Explanations
/// ---------------------------------------------------------------------------

/// Which imported date a suggestion is anchored on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthAnchor {
  pub selected: NaiveDate,
  pub used: NaiveDate,
}

impl HealthAnchor {
  pub fn is_selected(&self) -> bool {
    self.selected == self.used
  }
}

/// Trailing note appended to the suggestion. Empty without health data.
pub fn health_explain_text(
  anchor: Option<HealthAnchor>,
  summary: Option<&WindowSummary>,
  goal: GoalCategory,
) -> String {
  let (Some(anchor), Some(summary)) = (anchor, summary) else {
    return String::new();
  };

  let source_note = if anchor.is_selected() {
    format!(" Using imported date {}.", anchor.used)
  } else {
    format!(
      " Using latest imported date {} (no data on selected date {}).",
      anchor.used, anchor.selected
    )
  };

  format!(
    "{} Goal: {}. Last {}d avg steps: {}; workout minutes: {}.",
    source_note,
    goal.label(),
    summary.window_days,
    finite_or_zero(summary.avg_steps).round() as i64,
    finite_or_zero(summary.total_workout_min).round() as i64
  )
}

/// Plan text prefixed with the profile name (if any) plus the health note
pub fn suggestion_line(profile: &Profile, message: &str, explain: &str) -> String {
  match profile.display_name() {
    Some(name) => format!("{}, {}{}", name, message, explain),
    None => format!("{}{}", message, explain),
  }
}

/// Dashboard line describing the imported day and its 7-day window
pub fn health_insight_line(
  anchor: Option<HealthAnchor>,
  day: Option<&HealthDay>,
  summary: Option<&WindowSummary>,
) -> String {
  let (Some(anchor), Some(summary)) = (anchor, summary) else {
    return "No imported health data yet.".to_string();
  };
  let empty = HealthDay::default();
  let day = day.unwrap_or(&empty);

  let source_note = if anchor.is_selected() {
    format!("Using selected date {}.", anchor.used)
  } else {
    format!(
      "Using latest imported date {} (no imported data on {}).",
      anchor.used, anchor.selected
    )
  };

  format!(
    "{} Steps: {}, workouts: {}, workout min: {}. Last {w}d avg steps: {}, last {w}d workout min: {}, last {w}d run min: {}.",
    source_note,
    day.steps().round() as i64,
    day.workout_count,
    day.workout_min().round() as i64,
    finite_or_zero(summary.avg_steps).round() as i64,
    finite_or_zero(summary.total_workout_min).round() as i64,
    finite_or_zero(summary.total_run_min).round() as i64,
    w = summary.window_days
  )
}
