use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Self-reported mood for the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
  Great,
  Good,
  #[default]
  Neutral,
  Drained,
  Stressed,
}

impl Mood {
  /// Moods that ask for a gentler framing
  pub fn is_low(&self) -> bool {
    matches!(self, Mood::Drained | Mood::Stressed)
  }
}

impl std::str::FromStr for Mood {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "great" => Ok(Self::Great),
      "good" => Ok(Self::Good),
      "neutral" => Ok(Self::Neutral),
      "drained" => Ok(Self::Drained),
      "stressed" => Ok(Self::Stressed),
      other => Err(format!("Unknown mood: {}", other)),
    }
  }
}

/// Exercise-or-rest choice made by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  Exercise,
  Rest,
}

impl Decision {
  pub fn wants_exercise(&self) -> bool {
    matches!(self, Decision::Exercise)
  }
}

/// Daily state submitted alongside the exercise/rest decision.
/// Unset numbers are treated as 0, which disables the matching guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
  /// Date the user is asking about; defaults to the clock's today
  pub date: Option<NaiveDate>,
  pub sleep_hours: Option<f64>,
  pub energy: Option<f64>,
  pub soreness: Option<f64>,
  pub mood: Mood,
  /// 1-10
  pub motivation: f64,
}

impl Default for CheckIn {
  fn default() -> Self {
    Self {
      date: None,
      sleep_hours: None,
      energy: None,
      soreness: None,
      mood: Mood::Neutral,
      motivation: 5.0,
    }
  }
}
