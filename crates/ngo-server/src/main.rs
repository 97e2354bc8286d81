//! ngo-server binary.
//!
//! Loads `config.env`/`.env`, reads `ngo.toml` (or the path given with
//! `--config`) overlaid with `NGO_*` variables, opens the selected store,
//! creates the schema and serves the REST API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use ngo_core::{Services, store::RecordStore};
use ngo_server::{Backend, ServerConfig, expand_tilde, load_pg_config};
use ngo_store_postgres::PgStore;
use ngo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "NGO records REST server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ngo.toml")]
  config: PathBuf,

  /// Override the configured storage backend.
  #[arg(long, value_enum)]
  backend: Option<Backend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Both files are optional; variables already set in the environment win.
  dotenvy::from_filename("config.env").ok();
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;
  if let Some(backend) = cli.backend {
    server_cfg.backend = backend;
  }

  match server_cfg.backend {
    Backend::Sqlite => {
      let path = expand_tilde(&server_cfg.sqlite_path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      info!(?path, "using sqlite store");
      serve(store, &server_cfg).await
    }
    Backend::Postgres => {
      let db = load_pg_config().context("failed to read DB_* settings")?;
      let store = PgStore::connect(&db).await.with_context(|| {
        format!("failed to connect to postgres at {}:{}/{}", db.host, db.port, db.name)
      })?;
      info!(host = %db.host, database = %db.name, "using postgres store");
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: RecordStore + 'static,
{
  let app = ngo_server::app(Services::new(Arc::new(store)));
  let address = server_cfg.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
