use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use serde::Deserialize;
use tokio_postgres::NoTls;

use crate::Result;

/// Connection settings. Field names match the `DB_*` environment variables
/// with the prefix stripped (`DB_USER` → `user`, `DB_NAME` → `name`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct PgConfig {
  pub user:     String,
  pub host:     String,
  pub name:     String,
  pub password: String,
  pub port:     u16,
}

impl Default for PgConfig {
  fn default() -> Self {
    Self {
      user:     "postgres".into(),
      host:     "localhost".into(),
      name:     "sistema_ong".into(),
      password: "password".into(),
      port:     5432,
    }
  }
}

impl std::fmt::Debug for PgConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PgConfig")
      .field("user", &self.user)
      .field("host", &self.host)
      .field("name", &self.name)
      .field("port", &self.port)
      .finish_non_exhaustive()
  }
}

impl PgConfig {
  /// Build the connection pool. No connection is opened until first use.
  pub fn create_pool(&self) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.user = Some(self.user.clone());
    cfg.password = Some(self.password.clone());
    cfg.host = Some(self.host.clone());
    cfg.port = Some(self.port);
    cfg.dbname = Some(self.name.clone());
    cfg.manager = Some(ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    });
    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
  }
}
