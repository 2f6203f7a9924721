//! Error types for `tracker-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("state name must not be empty")]
  EmptyStateName,

  #[error("{field} must be a non-negative number, got {value}")]
  InvalidCount { field: &'static str, value: f64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
