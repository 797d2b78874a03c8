//! [`SqliteStore`] — the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::Utc;

use weatherlog_core::{
  observation::{NewObservation, WeatherObservation},
  store::ObservationStore,
};

use crate::{
  Result,
  encode::{RawObservation, decode_dt, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A weather observation log backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection thread, which serialises access.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and initialise the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.initialize().await?;
    Ok(store)
  }

  /// Ensure the `weather_data` table and its index exist.
  ///
  /// Idempotent: safe on every start and safe to call repeatedly.
  pub async fn initialize(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the underlying connection. Any clone still held fails its next
  /// call afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("observation store closed");
    Ok(())
  }
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = crate::Error;

  async fn record(&self, input: NewObservation) -> Result<WeatherObservation> {
    let NewObservation { location, temperature, conditions } = input;
    let (loc, cond) = (location.clone(), conditions.clone());

    // The clock is read on the connection thread, where writes are
    // serialised, so timestamp order follows id order.
    let (id, timestamp_str): (i64, String) = self
      .conn
      .call(move |conn| {
        let timestamp_str = encode_dt(Utc::now());
        conn.execute(
          "INSERT INTO weather_data (location, temperature, conditions, timestamp)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![loc, temperature, cond, timestamp_str],
        )?;
        Ok((conn.last_insert_rowid(), timestamp_str))
      })
      .await?;

    // Decode the stored text so the returned record is identical to what a
    // later read yields.
    let timestamp = decode_dt(&timestamp_str)?;
    Ok(WeatherObservation { id, location, temperature, conditions, timestamp })
  }

  async fn recent_by_location(
    &self,
    location: &str,
    limit: usize,
  ) -> Result<Vec<WeatherObservation>> {
    let location  = location.to_owned();
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawObservation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, location, temperature, conditions, timestamp
           FROM weather_data
           WHERE location = ?1
           ORDER BY timestamp DESC, id DESC
           LIMIT ?2",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![location, limit_val], RawObservation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObservation::into_observation).collect()
  }
}
