//! Core types, services and the storage trait for the NGO record keeper.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::RecordStore`]; the HTTP layer talks to
//! the [`service`] types.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod course;
pub mod error;
pub mod roster;
pub mod section;
pub mod service;
pub mod store;
pub mod student;
pub mod volunteer;

pub use error::{Entity, Error, ErrorKind, Result, StoreError};
pub use service::Services;
