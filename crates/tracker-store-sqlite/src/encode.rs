//! Conversions between domain types and SQLite rows and parameters.

use tracker_core::{Record, store::RecordOrder};

/// Columns selected by every record query, in [`record_from_row`] order.
pub const RECORD_COLUMNS: &str = "state, confirmed, active, recovered, deaths";

pub fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
  Ok(Record {
    state:     row.get(0)?,
    confirmed: row.get(1)?,
    active:    row.get(2)?,
    recovered: row.get(3)?,
    deaths:    row.get(4)?,
  })
}

pub fn order_clause(order: RecordOrder) -> &'static str {
  match order {
    RecordOrder::ConfirmedDesc => "ORDER BY confirmed DESC, state ASC",
    RecordOrder::StateAsc => "ORDER BY state ASC",
  }
}

/// Build a `LIKE … ESCAPE '\'` pattern matching `fragment` anywhere.
pub fn contains_pattern(fragment: &str) -> String {
  let mut pattern = String::with_capacity(fragment.len() + 2);
  pattern.push('%');
  for ch in fragment.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(ch);
  }
  pattern.push('%');
  pattern
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("keral"), "%keral%");
    assert_eq!(contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
  }
}
