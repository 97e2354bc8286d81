//! PostgreSQL backend for the NGO record store.
//!
//! Connections come from a [`deadpool_postgres`] pool. Section writes hold
//! one pooled connection for the length of their transaction.

mod config;
mod rows;
mod schema;
mod store;

pub mod error;

pub use config::PgConfig;
pub use error::{Error, Result};
pub use store::PgStore;
