use std::env;

use crate::analysis::DEFAULT_WINDOW_DAYS;

pub const DEFAULT_DB_PATH: &str = "training-journal.db";

const DB_VAR: &str = "TRAINING_JOURNAL_DB";
const WINDOW_VAR: &str = "TRAINING_JOURNAL_WINDOW_DAYS";
const LOG_JSON_VAR: &str = "TRAINING_JOURNAL_LOG_JSON";

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
  /// sqlite URL or plain file path
  pub database: String,
  /// Rolling window length for health summaries, always >= 1
  pub window_days: u32,
  pub log_json: bool,
}

impl Default for JournalConfig {
  fn default() -> Self {
    Self {
      database: DEFAULT_DB_PATH.to_string(),
      window_days: DEFAULT_WINDOW_DAYS,
      log_json: false,
    }
  }
}

/// An environment value that was ignored in favour of the default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedVar {
  pub name: &'static str,
  pub value: String,
}

impl JournalConfig {
  /// Every variable is optional; bad values fall back to the defaults and
  /// are logged
  pub fn from_env() -> Self {
    let (config, rejected) = Self::from_env_checked();
    for var in &rejected {
      var.log();
    }
    config
  }

  /// Like `from_env`, but hands back the ignored values instead of logging
  /// them. Use this before the subscriber is installed.
  pub fn from_env_checked() -> (Self, Vec<RejectedVar>) {
    let mut rejected = Vec::new();

    let database = env::var(DB_VAR)
      .ok()
      .map(|v| v.trim().to_string())
      .filter(|v| !v.is_empty())
      .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    let window_days = match env::var(WINDOW_VAR) {
      Ok(raw) => parse_window_days(&raw).unwrap_or_else(|| {
        rejected.push(RejectedVar {
          name: WINDOW_VAR,
          value: raw,
        });
        DEFAULT_WINDOW_DAYS
      }),
      Err(_) => DEFAULT_WINDOW_DAYS,
    };

    let log_json = env::var(LOG_JSON_VAR)
      .map(|v| parse_flag(&v))
      .unwrap_or(false);

    let config = Self {
      database,
      window_days,
      log_json,
    };
    (config, rejected)
  }
}

impl RejectedVar {
  pub fn log(&self) {
    tracing::warn!(value = %self.value, "Invalid {}, using the default", self.name);
  }
}

fn parse_window_days(raw: &str) -> Option<u32> {
  raw.trim().parse::<u32>().ok().filter(|days| *days >= 1)
}

fn parse_flag(raw: &str) -> bool {
  matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_without_env() {
    temp_env::with_vars_unset([DB_VAR, WINDOW_VAR, LOG_JSON_VAR], || {
      assert_eq!(JournalConfig::from_env(), JournalConfig::default());
    });
  }

  #[test]
  #[serial]
  fn test_reads_env_values() {
    temp_env::with_vars(
      [
        (DB_VAR, Some("sqlite::memory:")),
        (WINDOW_VAR, Some("14")),
        (LOG_JSON_VAR, Some("TRUE")),
      ],
      || {
        let config = JournalConfig::from_env();
        assert_eq!(config.database, "sqlite::memory:");
        assert_eq!(config.window_days, 14);
        assert!(config.log_json);
      },
    );
  }

  #[test]
  #[serial]
  fn test_invalid_window_falls_back() {
    for bad in ["0", "-3", "week", ""] {
      temp_env::with_var(WINDOW_VAR, Some(bad), || {
        assert_eq!(JournalConfig::from_env().window_days, DEFAULT_WINDOW_DAYS, "{}", bad);
      });
    }
  }

  #[test]
  #[serial]
  fn test_rejected_window_value_is_reported() {
    temp_env::with_var(WINDOW_VAR, Some("week"), || {
      let (config, rejected) = JournalConfig::from_env_checked();
      assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
      assert_eq!(
        rejected,
        vec![RejectedVar {
          name: WINDOW_VAR,
          value: "week".to_string(),
        }]
      );
    });

    temp_env::with_var(WINDOW_VAR, Some("10"), || {
      let (config, rejected) = JournalConfig::from_env_checked();
      assert_eq!(config.window_days, 10);
      assert!(rejected.is_empty());
    });
  }

  #[test]
  #[serial]
  fn test_blank_db_uses_default() {
    temp_env::with_var(DB_VAR, Some("  "), || {
      assert_eq!(JournalConfig::from_env().database, DEFAULT_DB_PATH);
    });
  }
}
