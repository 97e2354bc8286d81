//! Error type for `ngo-store-postgres`.

use ngo_core::{ErrorKind, StoreError};
use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_postgres::Error),

  #[error("pool error: {0}")]
  Pool(#[from] deadpool_postgres::PoolError),

  #[error("failed to create pool: {0}")]
  CreatePool(#[from] deadpool_postgres::CreatePoolError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    let Self::Database(e) = self else {
      return ErrorKind::Internal;
    };

    match e.code() {
      Some(code) if *code == SqlState::UNIQUE_VIOLATION => ErrorKind::Conflict,
      Some(code)
        if *code == SqlState::FOREIGN_KEY_VIOLATION
          || *code == SqlState::NOT_NULL_VIOLATION =>
      {
        ErrorKind::Validation
      }
      _ => ErrorKind::Internal,
    }
  }
}
