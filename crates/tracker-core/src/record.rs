//! The per-state record and its derived rates.
//!
//! Counters are stored as `f64`: they are conceptually integral but the
//! backing table holds real numbers, so every computation tolerates
//! fractional values. Rates are never stored; they are recomputed from the
//! counters on every read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// COVID-19 counters for a single state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  /// Unique, case-insensitive key.
  pub state:     String,
  #[serde(default)]
  pub confirmed: f64,
  #[serde(default)]
  pub active:    f64,
  #[serde(default)]
  pub recovered: f64,
  #[serde(default)]
  pub deaths:    f64,
}

impl Record {
  pub fn new(
    state: impl Into<String>,
    confirmed: f64,
    active: f64,
    recovered: f64,
    deaths: f64,
  ) -> Self {
    Self { state: state.into(), confirmed, active, recovered, deaths }
  }

  /// The three derived percentages for this record.
  pub fn rates(&self) -> Rates { Rates::from_record(self) }

  pub fn recovery_rate(&self) -> f64 { rate(self.recovered, self.confirmed) }

  pub fn death_rate(&self) -> f64 { rate(self.deaths, self.confirmed) }

  pub fn active_rate(&self) -> f64 { rate(self.active, self.confirmed) }

  /// Reject records that cannot be stored: an empty key or a negative (or
  /// non-finite) counter.
  ///
  /// Consistency between counters (`active + recovered + deaths <=
  /// confirmed`) is intentionally not checked.
  pub fn validate(&self) -> Result<()> {
    if self.state.trim().is_empty() {
      return Err(Error::EmptyStateName);
    }
    for (field, value) in [
      ("confirmed", self.confirmed),
      ("active", self.active),
      ("recovered", self.recovered),
      ("deaths", self.deaths),
    ] {
      if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidCount { field, value });
      }
    }
    Ok(())
  }

  /// Bundle the record with its computed rates.
  pub fn into_view(self) -> RecordView {
    let rates = self.rates();
    RecordView { record: self, rates }
  }
}

impl fmt::Display for Record {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - Confirmed: {}", self.state, self.confirmed)
  }
}

// ─── Rates ───────────────────────────────────────────────────────────────────

/// Percentages of `confirmed`, rounded to two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
  pub recovery_rate: f64,
  pub death_rate:    f64,
  pub active_rate:   f64,
}

impl Rates {
  pub fn from_record(record: &Record) -> Self {
    Self {
      recovery_rate: record.recovery_rate(),
      death_rate:    record.death_rate(),
      active_rate:   record.active_rate(),
    }
  }
}

/// `part` as a percentage of `confirmed`, rounded to two decimals.
///
/// Returns `0` when `confirmed` is not positive.
pub fn rate(part: f64, confirmed: f64) -> f64 {
  if confirmed > 0.0 {
    round2(part / confirmed * 100.0)
  } else {
    0.0
  }
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

// ─── View ────────────────────────────────────────────────────────────────────

/// A record together with its derived rates, flattened into one object when
/// serialised:
///
/// `{state, confirmed, active, recovered, deaths, recovery_rate, death_rate, active_rate}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
  #[serde(flatten)]
  pub record: Record,
  #[serde(flatten)]
  pub rates:  Rates,
}

impl From<Record> for RecordView {
  fn from(record: Record) -> Self { record.into_view() }
}
