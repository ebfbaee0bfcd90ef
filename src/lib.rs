//! Daily training journal engine.
//!
//! Imports Apple Health exports into per-day aggregates, keeps the training
//! log in step with them, and turns a daily check-in into a rule-based
//! exercise/rest plan with coaching text.

pub mod analysis;
pub mod clock;
pub mod coach;
pub mod commands;
pub mod config;
pub mod db;
pub mod history;
pub mod import;
pub mod logging;
pub mod models;
pub mod suggestion;
pub mod sync;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::JournalError;
pub use config::{JournalConfig, RejectedVar};
pub use db::{Journal, KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use import::ImportError;
