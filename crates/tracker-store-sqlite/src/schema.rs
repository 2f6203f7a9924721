//! SQL schema for the tracker's SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `state` uses `NOCASE` collation so that equality, uniqueness and the
/// primary-key conflict in upserts are all case-insensitive.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS c19 (
    state     TEXT PRIMARY KEY COLLATE NOCASE,
    confirmed REAL NOT NULL DEFAULT 0,
    active    REAL NOT NULL DEFAULT 0,
    recovered REAL NOT NULL DEFAULT 0,
    deaths    REAL NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS c19_confirmed_idx ON c19(confirmed);

PRAGMA user_version = 1;
";
