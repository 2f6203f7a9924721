//! HTTP front end for the COVID-19 state tracker.
//!
//! Serves the HTML pages, renders per-state charts, and mounts the JSON API
//! from `tracker-api` under `/api`, with its admin endpoints behind Basic
//! auth.

pub mod auth;
pub mod chart;
pub mod error;
pub mod pages;
pub mod templates;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracker_core::store::RecordStore;

use auth::AuthConfig;
use chart::ChartConfig;
use templates::Templates;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRACKER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  /// argon2 PHC string; empty disables the admin endpoints.
  pub admin_password_hash: String,
  pub chart:               ChartConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                8000,
      store_path:          PathBuf::from("covid.sqlite3"),
      admin_username:      "admin".to_string(),
      admin_password_hash: String::new(),
      chart:               ChartConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
#[derive(Clone)]
pub struct AppState<S: RecordStore> {
  pub store:     Arc<S>,
  pub config:    Arc<ServerConfig>,
  pub auth:      Arc<AuthConfig>,
  pub templates: Arc<Templates>,
}

impl<S: RecordStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> tera::Result<Self> {
    let auth = AuthConfig {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    };
    Ok(Self {
      store:     Arc::new(store),
      config:    Arc::new(config),
      auth:      Arc::new(auth),
      templates: Arc::new(Templates::new()?),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + Clone + 'static,
{
  let admin = tracker_api::admin_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.auth.clone(), auth::require_admin),
  );
  let api = tracker_api::api_router(state.store.clone()).merge(admin);

  Router::new()
    .route("/",            get(pages::index::<S>))
    .route("/search/",     get(pages::search_form::<S>).post(pages::search::<S>))
    .route("/all-states/", get(pages::all_states::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use tower::ServiceExt as _;
  use tracker_core::Record;
  use tracker_store_sqlite::SqliteStore;

  async fn make_state(config: ServerConfig) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    for record in [
      Record::new("Kerala", 2_000_000.0, 50_000.0, 1_940_000.0, 10_000.0),
      Record::new("Delhi", 100.0, 10.0, 85.0, 5.0),
      Record::new("Keralam-test", 50.0, 5.0, 44.0, 1.0),
    ] {
      store.upsert_record(record).await.unwrap();
    }
    AppState::new(store, config).unwrap()
  }

  fn config_with_password(password: &str) -> ServerConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    ServerConfig { admin_password_hash: hash, ..ServerConfig::default() }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req  = builder.body(Body::from(body.to_string())).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
  }

  async fn post_search(state: AppState<SqliteStore>, form: &str) -> (StatusCode, String) {
    oneshot_raw(
      state,
      "POST",
      "/search/",
      vec![(header::CONTENT_TYPE, "application/x-www-form-urlencoded")],
      form,
    )
    .await
  }

  // ── Pages ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_lists_states_and_count() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = oneshot_raw(state, "GET", "/", vec![], "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Tracking 3 states."), "{html}");
    assert!(html.contains("2,000,000"), "{html}");
    let kerala = html.find("<td>Kerala</td>").unwrap();
    let delhi  = html.find("<td>Delhi</td>").unwrap();
    assert!(kerala < delhi, "rows not ordered by confirmed");
  }

  #[tokio::test]
  async fn search_form_renders_without_lookup() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = oneshot_raw(state, "GET", "/search/", vec![], "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<option value="Delhi">"#), "{html}");
    assert!(!html.contains("class=\"error\""), "{html}");
  }

  #[tokio::test]
  async fn search_found_renders_chart_and_legend() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = post_search(state, "state=+delhi+").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("COVID-19 Data for Delhi"), "{html}");
    assert!(html.contains("data:image/png;base64,iVBOR"), "{html}");
    for line in [
      "Confirmed: 100",
      "Active: 10 (10.0%)",
      "Recovered: 85 (85.0%)",
      "Deaths: 5 (5.0%)",
    ] {
      assert!(html.contains(line), "missing {line}: {html}");
    }
  }

  #[tokio::test]
  async fn search_empty_asks_for_a_name() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = post_search(state, "state=+++").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Please enter a state name."), "{html}");
    assert!(!html.contains("data:image/png"), "{html}");
  }

  #[tokio::test]
  async fn search_missing_field_is_treated_as_empty() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = post_search(state, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Please enter a state name."), "{html}");
  }

  #[tokio::test]
  async fn search_miss_offers_suggestions() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = post_search(state, "state=keral").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No data found for"), "{html}");
    assert!(html.contains("Did you mean: Kerala, Keralam-test?"), "{html}");
  }

  #[tokio::test]
  async fn chart_failure_still_renders_page() {
    let config = ServerConfig {
      chart: ChartConfig { width: 10, height: 10 },
      ..ServerConfig::default()
    };
    let state = make_state(config).await;
    let (status, html) = post_search(state, "state=Delhi").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No chart available."), "{html}");
    assert!(html.contains("Recovered: 85 (85.0%)"), "{html}");
  }

  #[tokio::test]
  async fn all_states_shows_totals() {
    let state = make_state(ServerConfig::default()).await;
    let (status, html) = oneshot_raw(state, "GET", "/all-states/", vec![], "").await;
    assert_eq!(status, StatusCode::OK);
    // 2,000,000 + 100 + 50
    assert!(html.contains("<td>2,000,150</td>"), "{html}");
    assert!(html.contains("<td>85.0</td>"), "{html}");
  }

  // ── API ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_state_is_mounted() {
    let state = make_state(ServerConfig::default()).await;
    let (status, body) = oneshot_raw(state, "GET", "/api/state/DELHI/", vec![], "").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["recovery_rate"], 85.0);
  }

  #[tokio::test]
  async fn api_unknown_state_is_404() {
    let state = make_state(ServerConfig::default()).await;
    let (status, body) = oneshot_raw(state, "GET", "/api/state/Atlantis/", vec![], "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].is_string());
  }

  // ── Admin ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_requires_credentials() {
    let state = make_state(config_with_password("secret")).await;
    let (status, _) = oneshot_raw(state.clone(), "GET", "/api/admin/records", vec![], "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = auth_header("admin", "nope");
    let (status, _) = oneshot_raw(
      state,
      "GET",
      "/api/admin/records",
      vec![(header::AUTHORIZATION, wrong.as_str())],
      "",
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn admin_reset_active_with_credentials() {
    let state = make_state(config_with_password("secret")).await;
    let auth  = auth_header("admin", "secret");
    let (status, body) = oneshot_raw(
      state.clone(),
      "POST",
      "/api/admin/reset-active",
      vec![
        (header::AUTHORIZATION, auth.as_str()),
        (header::CONTENT_TYPE, "application/json"),
      ],
      r#"{"states":["Delhi","Kerala"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body.contains("2 states had their active cases reset to 0."), "{body}");

    let delhi = state.store.get_state_iexact("delhi").await.unwrap().unwrap();
    assert_eq!(delhi.active, 0.0);
  }

  #[tokio::test]
  async fn admin_disabled_without_configured_hash() {
    let state = make_state(ServerConfig::default()).await;
    let auth  = auth_header("admin", "");
    let (status, _) = oneshot_raw(
      state,
      "GET",
      "/api/admin/records",
      vec![(header::AUTHORIZATION, auth.as_str())],
      "",
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn public_api_needs_no_credentials() {
    let state = make_state(config_with_password("secret")).await;
    let (status, _) = oneshot_raw(state, "GET", "/api/state/Kerala/", vec![], "").await;
    assert_eq!(status, StatusCode::OK);
  }
}
