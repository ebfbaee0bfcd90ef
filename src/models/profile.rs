use serde::{Deserialize, Serialize};

use super::lenient::{self, RawName};

/// Training focus that selects recovery and training plan variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "RawName")]
pub enum GoalCategory {
  #[default]
  LookFit,
  HalfMarathon,
  GainMuscle,
  General,
}

impl GoalCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::LookFit => "look_fit",
      Self::HalfMarathon => "half_marathon",
      Self::GainMuscle => "gain_muscle",
      Self::General => "general",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::LookFit => "Looking Fit / 塑造线条",
      Self::HalfMarathon => "Run Half Marathon / 半马",
      Self::GainMuscle => "Gain Muscle / 增肌",
      Self::General => "General Health / 综合体能",
    }
  }
}

impl std::fmt::Display for GoalCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for GoalCategory {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "look_fit" => Ok(Self::LookFit),
      "half_marathon" => Ok(Self::HalfMarathon),
      "gain_muscle" => Ok(Self::GainMuscle),
      "general" => Ok(Self::General),
      _ => Err(format!("Unknown goal category: {}", s)),
    }
  }
}

// Stored values outside the known set (or null) fall back to the default focus.
impl From<RawName> for GoalCategory {
  fn from(raw: RawName) -> Self {
    raw.0.and_then(|name| name.parse().ok()).unwrap_or_default()
  }
}

/// Tone of the encouragement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "RawName")]
pub enum SupportStyle {
  #[default]
  Encouraging,
  Calm,
  Direct,
}

impl SupportStyle {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Encouraging => "encouraging",
      Self::Calm => "calm",
      Self::Direct => "direct",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Encouraging => "Encouraging",
      Self::Calm => "Calm",
      Self::Direct => "Direct",
    }
  }
}

impl std::fmt::Display for SupportStyle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for SupportStyle {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "encouraging" => Ok(Self::Encouraging),
      "calm" => Ok(Self::Calm),
      "direct" => Ok(Self::Direct),
      _ => Err(format!("Unknown support style: {}", s)),
    }
  }
}

impl From<RawName> for SupportStyle {
  fn from(raw: RawName) -> Self {
    raw.0.and_then(|name| name.parse().ok()).unwrap_or_default()
  }
}

/// Singleton user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  #[serde(default, deserialize_with = "lenient::string_or_empty")]
  pub name: String,
  /// Free-text goal
  #[serde(default, deserialize_with = "lenient::string_or_empty")]
  pub goal: String,
  #[serde(default, alias = "category")]
  pub goal_category: GoalCategory,
  #[serde(default)]
  pub support_style: SupportStyle,
}

impl Profile {
  /// Trimmed name, None when blank
  pub fn display_name(&self) -> Option<&str> {
    let name = self.name.trim();
    (!name.is_empty()).then_some(name)
  }

  pub fn headline(&self) -> String {
    match self.display_name() {
      Some(name) => format!("{}'s Training Space", name),
      None => "Daily Training Space".to_string(),
    }
  }

  pub fn focus_line(&self) -> String {
    let goal = self.goal.trim();
    if goal.is_empty() {
      format!(
        "Focus: {}. Coaching style: {}.",
        self.goal_category.label(),
        self.support_style.label()
      )
    } else {
      format!(
        "Focus: {}. Goal: {}. Coaching style: {}.",
        self.goal_category.label(),
        goal,
        self.support_style.label()
      )
    }
  }
}

/// Independent field updates; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub name: Option<String>,
  pub goal: Option<String>,
  pub goal_category: Option<GoalCategory>,
  pub support_style: Option<SupportStyle>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.goal.is_none()
      && self.goal_category.is_none()
      && self.support_style.is_none()
  }

  pub fn apply(self, profile: &mut Profile) {
    if let Some(name) = self.name {
      profile.name = name;
    }
    if let Some(goal) = self.goal {
      profile.goal = goal;
    }
    if let Some(category) = self.goal_category {
      profile.goal_category = category;
    }
    if let Some(style) = self.support_style {
      profile.support_style = style;
    }
  }
}
