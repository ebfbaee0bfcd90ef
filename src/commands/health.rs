use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use super::{HealthContext, JournalError};
use crate::clock::Clock;
use crate::coach::health_insight_line;
use crate::db::{Journal, KeyValueStore};
use crate::import::{normalize_export, ImportReport};
use crate::sync::{auto_log_status, reconcile, SyncReport};

/// Result of an import followed by the automatic entry sync
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
  pub report: ImportReport,
  pub sync: SyncReport,
  pub status: String,
  pub auto_log_status: String,
}

/// ---------------------------------------------------------------------------
/// Import Commands
/// ---------------------------------------------------------------------------

/// Replace the stored health data with the contents of an export, then
/// reconcile the entry log. A parse failure leaves the store untouched.
pub async fn import_health_export<S: KeyValueStore>(
  journal: &Journal<S>,
  xml: &str,
) -> Result<ImportSummary, JournalError> {
  let outcome = normalize_export(xml)?;
  journal.set_health(&outcome.health).await?;

  let mut entries = journal.entries().await?;
  let sync = reconcile(&mut entries, &outcome.health);
  if sync.touched() {
    journal.set_entries(&entries).await?;
  }

  tracing::info!(
    days = outcome.report.days_imported,
    created = sync.created,
    updated = sync.updated,
    "Health import stored"
  );

  Ok(ImportSummary {
    status: outcome.report.status_line(),
    auto_log_status: auto_log_status(&entries, Some(sync)),
    report: outcome.report,
    sync,
  })
}

pub async fn import_health_file<S: KeyValueStore>(
  journal: &Journal<S>,
  path: &Path,
) -> Result<ImportSummary, JournalError> {
  let xml = tokio::fs::read_to_string(path)
    .await
    .map_err(|source| JournalError::Io {
      path: path.to_path_buf(),
      source,
    })?;

  import_health_export(journal, &xml).await
}

/// ---------------------------------------------------------------------------
/// Health Insight
/// ---------------------------------------------------------------------------

/// Dashboard text for the imported day nearest the selected date
pub async fn health_insight<S: KeyValueStore>(
  journal: &Journal<S>,
  clock: &dyn Clock,
  selected: Option<NaiveDate>,
  window_days: u32,
) -> Result<String, JournalError> {
  let health = journal.health().await?;
  let selected = selected.unwrap_or_else(|| clock.today());
  let ctx = HealthContext::resolve(&health, selected, window_days);

  Ok(health_insight_line(ctx.anchor, ctx.today.as_ref(), ctx.window.as_ref()))
}
