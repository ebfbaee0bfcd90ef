//! Persistence: a key-value store holding three JSON documents
//!
//! `KeyValueStore` is the only thing the rest of the crate knows about the
//! storage medium. `Journal` layers typed access for entries, health days and
//! the profile on top of it.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Entry, HealthStore, Profile};

pub type DbPool = SqlitePool;

pub const ENTRIES_KEY: &str = "training_entries_v1";
pub const HEALTH_KEY: &str = "health_import_v1";
pub const PROFILE_KEY: &str = "training_profile_v1";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Stored value for '{key}' could not be decoded: {source}")]
  Undecodable {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}

/// ---------------------------------------------------------------------------
/// Store Abstraction
/// ---------------------------------------------------------------------------

/// Last-write-wins JSON storage, atomic per key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
  async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
  values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    Ok(self.values.lock().get(key).cloned())
  }

  async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
    self.values.lock().insert(key.to_string(), value);
    Ok(())
  }
}

/// SQLite-backed store; one row per key
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  /// Open (creating if needed) the database at `url` and run migrations.
  /// Accepts a `sqlite:` URL or a plain file path.
  pub async fn connect(url: &str) -> Result<Self, StoreError> {
    let options = if url.starts_with("sqlite:") {
      SqliteConnectOptions::from_str(url)?
    } else {
      SqliteConnectOptions::new().filename(Path::new(url))
    };
    let options = options.create_if_missing(true);

    tracing::info!(url, "Initializing database");

    let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .connect_with(options)
      .await?;

    Self::from_pool(pool).await
  }

  /// Wrap an existing pool; migrations are applied here
  pub async fn from_pool(pool: DbPool) -> Result<Self, StoreError> {
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(Self { pool })
  }

  pub async fn close(&self) {
    self.pool.close().await;
  }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
  async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM journal_store WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;

    match row {
      Some((raw,)) => Ok(Some(serde_json::from_str(&raw)?)),
      None => Ok(None),
    }
  }

  async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&value)?;

    sqlx::query(
      r#"
      INSERT INTO journal_store (key, value, updated_at)
      VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(raw)
    .bind(Utc::now())
    .execute(&self.pool)
    .await?;

    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Typed Journal Access
/// ---------------------------------------------------------------------------

/// Typed view over the three journal keys
pub struct Journal<S: KeyValueStore> {
  store: S,
}

impl<S: KeyValueStore> Journal<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Read and decode `key`. `None` only when the key was never written; a
  /// value that does not decode is an error and stays untouched in the store.
  async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
    let Some(value) = self.store.get(key).await? else {
      return Ok(None);
    };

    serde_json::from_value(value).map(Some).map_err(|source| {
      tracing::warn!(key, error = %source, "Stored value could not be decoded");
      StoreError::Undecodable {
        key: key.to_string(),
        source,
      }
    })
  }

  async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
    self.store.set(key, serde_json::to_value(value)?).await
  }

  pub async fn entries(&self) -> Result<Vec<Entry>, StoreError> {
    Ok(self.load(ENTRIES_KEY).await?.unwrap_or_default())
  }

  pub async fn set_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
    self.save(ENTRIES_KEY, &entries).await
  }

  pub async fn health(&self) -> Result<HealthStore, StoreError> {
    Ok(self.load(HEALTH_KEY).await?.unwrap_or_default())
  }

  /// Replaces the whole health map
  pub async fn set_health(&self, health: &HealthStore) -> Result<(), StoreError> {
    self.save(HEALTH_KEY, health).await
  }

  /// Profile, written with defaults on first read. An existing profile is
  /// never replaced here.
  pub async fn profile(&self) -> Result<Profile, StoreError> {
    match self.load(PROFILE_KEY).await? {
      Some(profile) => Ok(profile),
      None => {
        let profile = Profile::default();
        self.set_profile(&profile).await?;
        Ok(profile)
      }
    }
  }

  pub async fn set_profile(&self, profile: &Profile) -> Result<(), StoreError> {
    self.save(PROFILE_KEY, profile).await
  }
}
