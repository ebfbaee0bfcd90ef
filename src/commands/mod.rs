//! Operations a front end invokes. Each one takes the journal (and a clock
//! where "today" matters) explicitly, loads what it needs, and writes back
//! only what it changed.

pub mod coach;
pub mod entries;
pub mod health;
pub mod profile;

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::analysis::{shift_date, WindowSummary};
use crate::coach::HealthAnchor;
use crate::db::StoreError;
use crate::import::ImportError;
use crate::models::health::latest_health_date;
use crate::models::{HealthDay, HealthStore};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
  #[error(transparent)]
  Import(#[from] ImportError),

  #[error("Storage error: {0}")]
  Store(#[from] StoreError),

  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid input: {0}")]
  InvalidInput(String),
}

/// Parse a `YYYY-MM-DD` date typed by the user
pub fn parse_date(raw: &str) -> Result<NaiveDate, JournalError> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
    .map_err(|_| JournalError::InvalidInput(format!("Expected a YYYY-MM-DD date, got '{}'", raw)))
}

/// ---------------------------------------------------------------------------
/// Health Context
/// ---------------------------------------------------------------------------

/// The slice of imported health data a request is anchored on.
///
/// The anchor is the selected date when the store has it, otherwise the latest
/// imported date. An empty store yields an empty context.
#[derive(Debug, Clone, Default)]
pub struct HealthContext {
  pub anchor: Option<HealthAnchor>,
  pub today: Option<HealthDay>,
  pub yesterday: Option<HealthDay>,
  pub window: Option<WindowSummary>,
}

impl HealthContext {
  pub fn resolve(health: &HealthStore, selected: NaiveDate, window_days: u32) -> Self {
    let used = if health.contains_key(&selected) {
      Some(selected)
    } else {
      latest_health_date(health)
    };

    let Some(used) = used else {
      return Self::default();
    };

    Self {
      anchor: Some(HealthAnchor { selected, used }),
      today: health.get(&used).cloned(),
      yesterday: shift_date(used, -1).and_then(|d| health.get(&d).cloned()),
      window: Some(WindowSummary::compute(health, used, window_days)),
    }
  }

  pub fn used_date(&self) -> Option<NaiveDate> {
    self.anchor.map(|a| a.used)
  }
}
