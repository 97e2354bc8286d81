//! JSON REST API for the NGO record keeper.
//!
//! Exposes an axum [`Router`] backed by the [`ngo_core::Services`] over any
//! [`RecordStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ngo_api::api_router(services.clone()))
//! ```
//!
//! or use [`router`], which also adds `GET /health`.

pub mod body;
pub mod courses;
pub mod error;
pub mod sections;
pub mod students;
pub mod volunteers;

use axum::{Json, Router, routing::get};
use ngo_core::{Services, store::RecordStore};
use serde_json::{Value, json};

pub use error::ApiError;

/// Build the `/api` router for `services`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(services: Services<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Courses
    .route("/cursos", get(courses::list::<S>).post(courses::create::<S>))
    .route(
      "/cursos/{id}",
      get(courses::get_one::<S>)
        .put(courses::update::<S>)
        .delete(courses::delete::<S>),
    )
    .route("/cursos/{id}/alunos", get(courses::students::<S>))
    // Volunteers
    .route(
      "/voluntarios",
      get(volunteers::list::<S>).post(volunteers::create::<S>),
    )
    .route(
      "/voluntarios/{id}",
      get(volunteers::get_one::<S>)
        .put(volunteers::update::<S>)
        .delete(volunteers::delete::<S>),
    )
    // Students
    .route("/alunos", get(students::list::<S>).post(students::create::<S>))
    .route(
      "/alunos/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::delete::<S>),
    )
    // Sections
    .route("/turmas", get(sections::list::<S>).post(sections::create::<S>))
    .route(
      "/turmas/{id}",
      get(sections::get_one::<S>)
        .put(sections::update::<S>)
        .delete(sections::delete::<S>),
    )
    .with_state(services)
}

/// `GET /health` — liveness only; never touches storage.
pub async fn health() -> Json<Value> {
  Json(json!({ "status": "OK", "message": "server running" }))
}

/// The full application router: `/health` plus [`api_router`] under `/api`.
pub fn router<S>(services: Services<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(services))
}

#[cfg(test)]
mod tests;
