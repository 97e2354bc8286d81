//! Error types for `ngo-core`.

use std::fmt;

use thiserror::Error;

/// The record type an operation was addressing; used in `NotFound` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  Course,
  Volunteer,
  Student,
  Section,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Course => "course",
      Self::Volunteer => "volunteer",
      Self::Student => "student",
      Self::Section => "section",
    })
  }
}

/// Coarse classification shared by every layer. The HTTP layer maps these to
/// status codes; storage backends use them to describe constraint failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A required field is missing or a reference names a nonexistent row.
  Validation,
  /// A uniqueness constraint was violated.
  Conflict,
  NotFound,
  /// Anything else: connectivity, corrupt rows, driver failures.
  Internal,
}

/// Implemented by the error type of every [`RecordStore`] backend.
///
/// [`RecordStore`]: crate::store::RecordStore
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// Classify this failure. Unique/primary-key violations are `Conflict`,
  /// foreign-key and not-null violations are `Validation`.
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("storage error: {0}")]
  Store(Box<dyn StoreError>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Store(_) => ErrorKind::Internal,
    }
  }

  pub fn not_found(entity: Entity, id: i64) -> Self {
    Self::NotFound { entity, id }
  }

  /// Wrap a backend failure as an internal error.
  pub fn store<E: StoreError>(err: E) -> Self { Self::Store(Box::new(err)) }

  /// Translate a backend failure, replacing classified constraint violations
  /// with user-safe messages. Unclassified failures stay internal.
  pub fn from_store<E: StoreError>(
    err: E,
    conflict: &str,
    invalid: &str,
  ) -> Self {
    match err.kind() {
      ErrorKind::Conflict => Self::Conflict(conflict.to_owned()),
      ErrorKind::Validation => Self::Validation(invalid.to_owned()),
      ErrorKind::NotFound | ErrorKind::Internal => Self::store(err),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fail with a single `Validation` error naming every blank required field.
pub(crate) fn require(fields: &[(&str, bool)]) -> Result<()> {
  let missing: Vec<&str> = fields
    .iter()
    .filter(|(_, present)| !present)
    .map(|(name, _)| *name)
    .collect();

  if missing.is_empty() {
    Ok(())
  } else {
    Err(Error::Validation(format!(
      "missing required fields: {}",
      missing.join(", ")
    )))
  }
}

pub(crate) fn present(value: &str) -> bool { !value.trim().is_empty() }
