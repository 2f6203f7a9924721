//! Handlers for the `/admin` record-management endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/records` | Optional `?search=` (case-insensitive substring) |
//! | `POST`   | `/admin/records` | Body: [`Record`]; creates or replaces, returns 201 |
//! | `PUT`    | `/admin/records/{name}` | Body: [`UpdateBody`]; 404 if missing |
//! | `DELETE` | `/admin/records/{name}` | 204, or 404 if missing |
//! | `POST`   | `/admin/reset-active` | Body: `{"states": [...]}` |
//!
//! Authentication is the caller's responsibility.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracker_core::{
  Record, RecordView,
  store::{RecordOrder, RecordStore},
};

use crate::error::{ApiError, Result};

/// Upper bound on rows returned by a filtered listing.
const SEARCH_LIMIT: usize = 1000;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
}

/// `GET /admin/records[?search=<fragment>]`: highest `confirmed` first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecordView>>>
where
  S: RecordStore,
{
  let records = match params.search.as_deref().map(str::trim) {
    Some(fragment) if !fragment.is_empty() => {
      store.search_states(fragment, SEARCH_LIMIT).await
    }
    _ => store.list_records(RecordOrder::ConfirmedDesc).await,
  }
  .map_err(ApiError::store)?;

  Ok(Json(records.into_iter().map(Record::into_view).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /admin/records`: returns 201 + the stored record.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(mut record): Json<Record>,
) -> Result<impl IntoResponse>
where
  S: RecordStore,
{
  record.state = record.state.trim().to_owned();
  record.validate()?;

  let stored = store.upsert_record(record).await.map_err(ApiError::store)?;
  tracing::info!(state = %stored.state, "record saved");
  Ok((StatusCode::CREATED, Json(stored.into_view())))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /admin/records/{name}`. Omitted counters keep
/// their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub confirmed: Option<f64>,
  pub active:    Option<f64>,
  pub recovered: Option<f64>,
  pub deaths:    Option<f64>,
}

impl UpdateBody {
  fn apply(self, record: &mut Record) {
    if let Some(v) = self.confirmed {
      record.confirmed = v;
    }
    if let Some(v) = self.active {
      record.active = v;
    }
    if let Some(v) = self.recovered {
      record.recovered = v;
    }
    if let Some(v) = self.deaths {
      record.deaths = v;
    }
  }
}

/// `PUT /admin/records/{name}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<RecordView>>
where
  S: RecordStore,
{
  let mut record = store
    .get_state_iexact(&name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("state '{name}' not found")))?;

  body.apply(&mut record);
  record.validate()?;

  let stored = store.upsert_record(record).await.map_err(ApiError::store)?;
  tracing::info!(state = %stored.state, "record updated");
  Ok(Json(stored.into_view()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /admin/records/{name}`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<StatusCode>
where
  S: RecordStore,
{
  if store.delete_record(&name).await.map_err(ApiError::store)? {
    tracing::info!(state = %name, "record deleted");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("state '{name}' not found")))
  }
}

// ─── Reset active ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResetActiveBody {
  pub states: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetActiveResponse {
  pub updated: usize,
  pub message: String,
}

/// `POST /admin/reset-active`: set `active` to zero for the listed states.
pub async fn reset_active<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ResetActiveBody>,
) -> Result<Json<ResetActiveResponse>>
where
  S: RecordStore,
{
  let updated = store
    .reset_active(&body.states)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(updated, "active cases reset");

  Ok(Json(ResetActiveResponse {
    updated,
    message: format!("{updated} states had their active cases reset to 0."),
  }))
}
