//! Resolving a user-supplied state name to a record.
//!
//! Input is trimmed, then matched case-insensitively against the store. A
//! miss is not an error: it yields up to [`MAX_SUGGESTIONS`] substring
//! matches that the caller can offer back to the user.

use crate::{record::Record, store::RecordStore};

/// Upper bound on the number of suggestions offered after a miss.
pub const MAX_SUGGESTIONS: usize = 3;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a state name.";

/// Outcome of [`lookup_state`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
  /// The input was empty or whitespace only. The store was not queried.
  EmptyQuery,
  Found(Record),
  NotFound {
    /// The trimmed input.
    query:       String,
    /// Names of states whose name contains `query`, highest `confirmed`
    /// first.
    suggestions: Vec<String>,
  },
}

impl Lookup {
  pub fn record(&self) -> Option<&Record> {
    match self {
      Lookup::Found(record) => Some(record),
      _ => None,
    }
  }

  /// User-facing message for the non-found outcomes.
  pub fn message(&self) -> Option<String> {
    match self {
      Lookup::EmptyQuery => Some(EMPTY_QUERY_MESSAGE.to_owned()),
      Lookup::Found(_) => None,
      Lookup::NotFound { query, suggestions } => {
        Some(not_found_message(query, suggestions))
      }
    }
  }
}

/// Trim the input; `None` if nothing is left.
pub fn normalize(input: &str) -> Option<&str> {
  let trimmed = input.trim();
  (!trimmed.is_empty()).then_some(trimmed)
}

/// First character upper-cased, the rest lower-cased (`"tamil NADU"` becomes
/// `"Tamil nadu"`).
pub fn display_name(query: &str) -> String {
  let mut chars = query.chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

pub fn not_found_message(query: &str, suggestions: &[String]) -> String {
  let mut message = format!(
    "No data found for '{}'. Please check the state name and try again.",
    display_name(query)
  );
  if !suggestions.is_empty() {
    message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
  }
  message
}

/// Resolve `input` against `store`.
///
/// Only store failures are returned as errors.
pub async fn lookup_state<S: RecordStore>(
  store: &S,
  input: &str,
) -> Result<Lookup, S::Error> {
  let Some(query) = normalize(input) else {
    return Ok(Lookup::EmptyQuery);
  };

  if let Some(record) = store.get_state_iexact(query).await? {
    return Ok(Lookup::Found(record));
  }

  let suggestions = store
    .search_states(query, MAX_SUGGESTIONS)
    .await?
    .into_iter()
    .take(MAX_SUGGESTIONS)
    .map(|record| record.state)
    .collect();

  Ok(Lookup::NotFound { query: query.to_owned(), suggestions })
}
