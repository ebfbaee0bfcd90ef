use chrono::NaiveDate;

use super::JournalError;
use crate::db::{Journal, KeyValueStore};
use crate::history::{history_rows, HistoryRow, HISTORY_ROW_LIMIT};
use crate::models::entry::{find_entry, upsert_entry};
use crate::models::Entry;
use crate::sync::{apply_note, auto_log_status, reconcile, SyncReport};

/// ---------------------------------------------------------------------------
/// Sync
/// ---------------------------------------------------------------------------

/// Reconcile the entry log against the stored health data.
/// Entries are only written back when something changed.
pub async fn sync_entries<S: KeyValueStore>(journal: &Journal<S>) -> Result<SyncReport, JournalError> {
  let health = journal.health().await?;
  let mut entries = journal.entries().await?;

  let report = reconcile(&mut entries, &health);
  if report.touched() {
    journal.set_entries(&entries).await?;
  }

  tracing::info!(created = report.created, updated = report.updated, "Entry sync finished");
  Ok(report)
}

pub async fn auto_log_status_text<S: KeyValueStore>(
  journal: &Journal<S>,
  report: Option<SyncReport>,
) -> Result<String, JournalError> {
  let entries = journal.entries().await?;
  Ok(auto_log_status(&entries, report))
}

/// ---------------------------------------------------------------------------
/// Manual Entries
/// ---------------------------------------------------------------------------

/// Save a manual entry, replacing whatever was stored for that date.
/// Returns true when an existing entry was replaced.
pub async fn log_entry<S: KeyValueStore>(journal: &Journal<S>, entry: Entry) -> Result<bool, JournalError> {
  let date = entry.date;
  let mut entries = journal.entries().await?;
  let replaced = upsert_entry(&mut entries, entry);
  journal.set_entries(&entries).await?;

  tracing::info!(%date, replaced, "Entry saved");
  Ok(replaced)
}

pub async fn save_note<S: KeyValueStore>(
  journal: &Journal<S>,
  date: NaiveDate,
  note: &str,
) -> Result<(), JournalError> {
  let health = journal.health().await?;
  let mut entries = journal.entries().await?;
  apply_note(&mut entries, &health, date, note);
  journal.set_entries(&entries).await?;

  tracing::info!(%date, "Note saved");
  Ok(())
}

/// Stored note for `date`, empty when there is none
pub async fn note_for_date<S: KeyValueStore>(journal: &Journal<S>, date: NaiveDate) -> Result<String, JournalError> {
  let entries = journal.entries().await?;
  Ok(find_entry(&entries, date).map(|e| e.notes.clone()).unwrap_or_default())
}

/// Most recent history rows, newest first
pub async fn history<S: KeyValueStore>(journal: &Journal<S>) -> Result<Vec<HistoryRow>, JournalError> {
  let entries = journal.entries().await?;
  let health = journal.health().await?;
  Ok(history_rows(&entries, &health, HISTORY_ROW_LIMIT))
}
