use chrono::{Local, NaiveDate};

/// Source of "today" for streak and yesterday lookups
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// Local calendar date of the machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    Local::now().date_naive()
  }
}

/// Pinned date, used by tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    self.0
  }
}
