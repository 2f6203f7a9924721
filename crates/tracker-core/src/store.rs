//! The `RecordStore` trait: the persistence seam for state records.
//!
//! The trait is implemented by storage backends (e.g. `tracker-store-sqlite`).
//! The reporting logic and the HTTP layers depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::record::Record;

/// Ordering for full scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
  /// Highest `confirmed` first; ties broken by state name.
  #[default]
  ConfirmedDesc,
  /// Alphabetical by state name.
  StateAsc,
}

/// Abstraction over a backend holding one [`Record`] per state.
///
/// State names are matched case-insensitively everywhere. The reporting side
/// only reads; writes come from the admin surface.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Case-insensitive exact match on the state name.
  fn get_state_iexact<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;

  /// Case-insensitive substring match on the state name, highest
  /// `confirmed` first, at most `limit` rows.
  fn search_states<'a>(
    &'a self,
    fragment: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Every record, in the requested order.
  fn list_records(
    &self,
    order: RecordOrder,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  fn count_records(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Admin writes ──────────────────────────────────────────────────────

  /// Insert a record, or replace the counters of the record whose state
  /// matches case-insensitively. Returns the stored record.
  fn upsert_record(
    &self,
    record: Record,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Delete by case-insensitive state name. Returns `false` if nothing
  /// matched.
  fn delete_record<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Set `active` to zero for every listed state in one atomic step.
  /// Returns the number of records updated.
  fn reset_active<'a>(
    &'a self,
    states: &'a [String],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
