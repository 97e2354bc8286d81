//! HTTP server wiring for the NGO record keeper.
//!
//! Configuration types and the layered application router. The binary in
//! `main.rs` picks a storage backend and serves [`app`].

use std::path::{Path, PathBuf};

use axum::Router;
use config::{ConfigError, Environment, File, Source};
use ngo_core::{Services, store::RecordStore};
use ngo_store_postgres::PgConfig;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`RecordStore`] implementation to serve from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Postgres,
  Sqlite,
}

/// Runtime server configuration, read from an optional TOML file and
/// `NGO_*` environment variables (which win).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub backend:     Backend,
  /// Database file for the SQLite backend. A leading `~/` is expanded.
  pub sqlite_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:        "0.0.0.0".to_string(),
      port:        3001,
      backend:     Backend::default(),
      sqlite_path: PathBuf::from("ngo.sqlite3"),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) overlaid with `NGO_*` variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_file(File::from(path).required(false))
  }

  fn from_file<F>(file: F) -> Result<Self, ConfigError>
  where
    F: Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .add_source(file)
      .add_source(Environment::with_prefix("NGO").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// PostgreSQL settings from `DB_USER`, `DB_HOST`, `DB_NAME`, `DB_PASSWORD`
/// and `DB_PORT`; unset variables keep their defaults.
pub fn load_pg_config() -> Result<PgConfig, ConfigError> {
  config::Config::builder()
    .add_source(Environment::with_prefix("DB").try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing and permissive CORS.
pub fn app<S>(services: Services<S>) -> Router
where
  S: RecordStore + 'static,
{
  ngo_api::router(services)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use config::FileFormat;
  use ngo_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn file_values_override_defaults() {
    let cfg = ServerConfig::from_file(File::from_str(
      "port = 8080\nbackend = \"sqlite\"\nsqlite_path = \"/tmp/ngo.db\"",
      FileFormat::Toml,
    ))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.backend, Backend::Sqlite);
    assert_eq!(cfg.sqlite_path, PathBuf::from("/tmp/ngo.db"));
    assert_eq!(cfg.host, "0.0.0.0");
  }

  #[test]
  fn missing_file_gives_defaults() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.address(), format!("{}:{}", cfg.host, cfg.port));
  }

  #[test]
  fn unknown_backend_is_rejected() {
    let err = ServerConfig::from_file(File::from_str(
      "backend = \"mysql\"",
      FileFormat::Toml,
    ));
    assert!(err.is_err());
  }

  #[test]
  fn tilde_expands_only_at_start() {
    assert_eq!(expand_tilde(Path::new("a/~/b")), PathBuf::from("a/~/b"));
  }

  #[tokio::test]
  async fn app_serves_health_with_cors() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(Services::new(Arc::new(store)));

    let req = Request::builder()
      .uri("/health")
      .header(header::ORIGIN, "http://localhost:3000")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
      resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "OK");
  }
}
