//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::OptionalExtension as _;
use tracker_core::{
  Record,
  store::{RecordOrder, RecordStore},
};

use crate::{
  Error, Result,
  encode::{RECORD_COLUMNS, contains_pattern, order_clause, record_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_state_iexact(&self, name: &str) -> Result<Option<Record>> {
    let name = name.to_owned();

    let record = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM c19 WHERE state = ?1 COLLATE NOCASE"),
            rusqlite::params![name],
            record_from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(record)
  }

  async fn search_states(&self, fragment: &str, limit: usize) -> Result<Vec<Record>> {
    let pattern   = contains_pattern(fragment);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let records = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM c19
           WHERE state LIKE ?1 ESCAPE '\\'
           {}
           LIMIT ?2",
          order_clause(RecordOrder::ConfirmedDesc),
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern, limit_val], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(records)
  }

  async fn list_records(&self, order: RecordOrder) -> Result<Vec<Record>> {
    let records = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM c19 {}",
          order_clause(order),
        ))?;
        let rows = stmt
          .query_map([], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(records)
  }

  async fn count_records(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM c19", [], |r| r.get(0))?))
      .await?;

    usize::try_from(count).map_err(|_| Error::RowCount(count))
  }

  // ── Admin writes ──────────────────────────────────────────────────────────

  async fn upsert_record(&self, record: Record) -> Result<Record> {
    let stored = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO c19 (state, confirmed, active, recovered, deaths)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(state) DO UPDATE SET
             confirmed = excluded.confirmed,
             active    = excluded.active,
             recovered = excluded.recovered,
             deaths    = excluded.deaths",
          rusqlite::params![
            record.state,
            record.confirmed,
            record.active,
            record.recovered,
            record.deaths,
          ],
        )?;
        // Re-read so the caller sees the stored spelling of the key.
        Ok(conn.query_row(
          &format!("SELECT {RECORD_COLUMNS} FROM c19 WHERE state = ?1 COLLATE NOCASE"),
          rusqlite::params![record.state],
          record_from_row,
        )?)
      })
      .await?;

    Ok(stored)
  }

  async fn delete_record(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM c19 WHERE state = ?1 COLLATE NOCASE",
          rusqlite::params![name],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn reset_active(&self, states: &[String]) -> Result<usize> {
    // A state listed twice (in any case) is updated and counted once.
    let names: BTreeMap<String, String> = states
      .iter()
      .map(|s| (s.to_ascii_lowercase(), s.clone()))
      .collect();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut updated = 0;
        {
          let mut stmt =
            tx.prepare("UPDATE c19 SET active = 0 WHERE state = ?1 COLLATE NOCASE")?;
          for name in names.values() {
            updated += stmt.execute(rusqlite::params![name])?;
          }
        }
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    tracing::debug!(requested = states.len(), updated, "reset active cases");
    Ok(updated)
  }
}
