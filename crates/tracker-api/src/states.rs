//! Handler for `GET /state/{name}/`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use tracker_core::{RecordView, store::RecordStore};

use crate::error::{ApiError, Result};

/// `GET /state/{name}/`: the record and its rates; `404` when the name does
/// not resolve (case-insensitive exact match only).
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<RecordView>>
where
  S: RecordStore,
{
  let record = store
    .get_state_iexact(name.trim())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("No data found for state '{name}'")))?;
  Ok(Json(record.into_view()))
}
