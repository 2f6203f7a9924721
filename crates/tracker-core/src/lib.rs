//! Core types and reporting logic for the COVID-19 state tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`tracker-store-sqlite`) and the HTTP layers
//! (`tracker-api`, `tracker-web`) depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod chart;
pub mod error;
pub mod lookup;
pub mod record;
pub mod report;
pub mod store;

pub use error::{Error, Result};
pub use record::{Rates, Record, RecordView};
