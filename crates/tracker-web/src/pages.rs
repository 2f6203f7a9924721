//! HTML page handlers.
//!
//! | Method | Path | Template |
//! |--------|------|----------|
//! | `GET`  | `/` | `index.html` |
//! | `GET`  | `/search/` | `chart.html` (empty form) |
//! | `POST` | `/search/` | `chart.html` (form field `state`) |
//! | `GET`  | `/all-states/` | `all_states.html` |

use axum::{
  Form,
  extract::State,
  response::Html,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracker_core::{
  Record, RecordView,
  chart::{AxisTick, ChartSeries, SeriesColor},
  lookup::{Lookup, display_name, lookup_state, normalize},
  report::StatesReport,
  store::{RecordOrder, RecordStore},
};

use crate::{
  AppState, chart,
  error::{Error, Result},
};

/// A legend line paired with its swatch colour.
#[derive(Debug, Serialize)]
struct LegendItem<'a> {
  text:  &'a str,
  color: SeriesColor,
}

// ─── Index ────────────────────────────────────────────────────────────────────

/// `GET /`: every state, highest `confirmed` first.
pub async fn index<S>(State(state): State<AppState<S>>) -> Result<Html<String>>
where
  S: RecordStore + Clone + 'static,
{
  let records = state
    .store
    .list_records(RecordOrder::ConfirmedDesc)
    .await
    .map_err(Error::store)?;
  let total_states = state.store.count_records().await.map_err(Error::store)?;

  let mut ctx = Context::new();
  ctx.insert("states", &records);
  ctx.insert("total_states", &total_states);
  Ok(Html(state.templates.render("index.html", &ctx)?))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
  #[serde(default)]
  pub state: String,
}

/// `GET /search/`: the form with nothing looked up yet.
pub async fn search_form<S>(State(state): State<AppState<S>>) -> Result<Html<String>>
where
  S: RecordStore + Clone + 'static,
{
  render_search(&state, "", None).await
}

/// `POST /search/`: resolve the submitted state name.
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<SearchForm>,
) -> Result<Html<String>>
where
  S: RecordStore + Clone + 'static,
{
  let lookup = lookup_state(state.store.as_ref(), &form.state)
    .await
    .map_err(Error::store)?;
  tracing::debug!(query = %form.state, found = lookup.record().is_some(), "state lookup");

  let shown = normalize(&form.state).map(display_name).unwrap_or_default();
  render_search(&state, &shown, Some(lookup)).await
}

async fn render_search<S>(
  state: &AppState<S>,
  shown: &str,
  lookup: Option<Lookup>,
) -> Result<Html<String>>
where
  S: RecordStore + Clone + 'static,
{
  let all_states: Vec<Record> = state
    .store
    .list_records(RecordOrder::StateAsc)
    .await
    .map_err(Error::store)?;

  let error_message = lookup.as_ref().and_then(Lookup::message);
  let record = match lookup {
    Some(Lookup::Found(record)) => Some(record),
    _ => None,
  };

  let series = record.as_ref().map(ChartSeries::from_record);
  let chart_image = series
    .as_ref()
    .and_then(|s| chart::chart_image(s, &state.config.chart));
  let ticks: Vec<AxisTick> = series
    .as_ref()
    .map(|s| s.axis_ticks(chart::TICK_INTERVALS))
    .unwrap_or_default();
  let legend: Vec<LegendItem<'_>> = series
    .iter()
    .flat_map(|s| s.legend.iter().zip(&s.entries))
    .map(|(text, entry)| LegendItem { text, color: entry.color })
    .collect();
  let state_data: Option<RecordView> = record.map(Record::into_view);

  let mut ctx = Context::new();
  ctx.insert("state", shown);
  ctx.insert("state_data", &state_data);
  ctx.insert("series", &series);
  ctx.insert("legend", &legend);
  ctx.insert("ticks", &ticks);
  ctx.insert("chart_image", &chart_image);
  ctx.insert("error_message", &error_message);
  ctx.insert("all_states", &all_states);
  Ok(Html(state.templates.render("chart.html", &ctx)?))
}

// ─── All states ───────────────────────────────────────────────────────────────

/// `GET /all-states/`: full table with rates and a totals row.
pub async fn all_states<S>(State(state): State<AppState<S>>) -> Result<Html<String>>
where
  S: RecordStore + Clone + 'static,
{
  let records = state
    .store
    .list_records(RecordOrder::ConfirmedDesc)
    .await
    .map_err(Error::store)?;
  let report = StatesReport::new(records);

  let mut ctx = Context::new();
  ctx.insert("states", &report.rows);
  ctx.insert("totals", &report.totals);
  ctx.insert("total_states", &report.total_states());
  Ok(Html(state.templates.render("all_states.html", &ctx)?))
}
