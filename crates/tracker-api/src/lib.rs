//! JSON API for the COVID-19 state tracker.
//!
//! Exposes axum [`Router`]s backed by any [`tracker_core::store::RecordStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let api = tracker_api::api_router(store.clone())
//!   .merge(tracker_api::admin_router(store.clone()).layer(auth_layer));
//! router.nest("/api", api)
//! ```

pub mod admin;
pub mod error;
pub mod states;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tracker_core::store::RecordStore;

pub use error::ApiError;

/// Public, read-only endpoints.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/state/{name}/", get(states::get_one::<S>))
    .with_state(store)
}

/// Record management endpoints. Callers must put these behind auth.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/admin/records", get(admin::list::<S>).post(admin::create::<S>))
    .route(
      "/admin/records/{name}",
      put(admin::update::<S>).delete(admin::delete_one::<S>),
    )
    .route("/admin/reset-active", post(admin::reset_active::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
