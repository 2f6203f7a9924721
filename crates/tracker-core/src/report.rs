//! Column totals and the all-states report.

use serde::Serialize;

use crate::record::{Record, RecordView};

// ─── Totals ──────────────────────────────────────────────────────────────────

/// Field-wise sum of counters across a set of records.
///
/// The totals row carries raw sums only; no rate is derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
  pub confirmed: f64,
  pub active:    f64,
  pub recovered: f64,
  pub deaths:    f64,
}

impl Totals {
  pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
    records.into_iter().collect()
  }

  fn add(&mut self, record: &Record) {
    self.confirmed += record.confirmed;
    self.active += record.active;
    self.recovered += record.recovered;
    self.deaths += record.deaths;
  }
}

impl<'a> FromIterator<&'a Record> for Totals {
  fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
    let mut totals = Totals::default();
    for record in iter {
      totals.add(record);
    }
    totals
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Rows plus totals, ready for the all-states table.
///
/// Rows keep the order they were supplied in.
#[derive(Debug, Clone, Serialize)]
pub struct StatesReport {
  pub rows:   Vec<RecordView>,
  pub totals: Totals,
}

impl StatesReport {
  pub fn new(records: Vec<Record>) -> Self {
    let totals = Totals::from_records(&records);
    let rows = records.into_iter().map(Record::into_view).collect();
    Self { rows, totals }
  }

  pub fn total_states(&self) -> usize { self.rows.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_gives_zero_totals() {
    assert_eq!(Totals::from_records(std::iter::empty()), Totals::default());
  }

  #[test]
  fn totals_are_field_wise_sums() {
    let records = vec![
      Record::new("A", 10.0, 2.0, 7.0, 1.0),
      Record::new("B", 20.0, 5.0, 14.0, 1.0),
    ];
    let totals = Totals::from_records(&records);
    assert_eq!(totals.confirmed, 30.0);
    assert_eq!(totals.active, 7.0);
    assert_eq!(totals.recovered, 21.0);
    assert_eq!(totals.deaths, 2.0);
  }

  #[test]
  fn totals_keep_fractions() {
    let records = [
      Record::new("A", 0.5, 0.0, 0.0, 0.0),
      Record::new("B", 1.25, 0.0, 0.0, 0.0),
    ];
    assert_eq!(Totals::from_records(&records).confirmed, 1.75);
  }

  #[test]
  fn report_keeps_row_order_and_rates() {
    let report = StatesReport::new(vec![
      Record::new("Big", 200.0, 20.0, 170.0, 10.0),
      Record::new("Small", 100.0, 10.0, 85.0, 5.0),
    ]);
    assert_eq!(report.total_states(), 2);
    assert_eq!(report.rows[0].record.state, "Big");
    assert_eq!(report.rows[1].rates.recovery_rate, 85.0);
    assert_eq!(report.totals.confirmed, 300.0);
  }
}
