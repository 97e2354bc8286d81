//! Handlers for `/cursos` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/cursos` | Ordered by name |
//! | `POST`   | `/cursos` | Body: [`CourseBody`]; returns 201 |
//! | `GET`    | `/cursos/{id}` | 404 if not found |
//! | `PUT`    | `/cursos/{id}` | Full replacement |
//! | `DELETE` | `/cursos/{id}` | Cascades to sections |
//! | `GET`    | `/cursos/{id}/alunos` | Students enrolled in the course |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ngo_core::{
  Services,
  course::Course,
  store::RecordStore,
  student::StudentView,
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
  body::{Body, CourseBody, Id},
  error::ApiError,
};

/// `GET /cursos`
pub async fn list<S: RecordStore>(
  State(svc): State<Services<S>>,
) -> Result<Json<Vec<Course>>, ApiError> {
  Ok(Json(svc.courses.list().await?))
}

/// `POST /cursos`
#[instrument(skip_all)]
pub async fn create<S: RecordStore>(
  State(svc): State<Services<S>>,
  Body(body): Body<CourseBody>,
) -> Result<impl IntoResponse, ApiError> {
  let course = svc.courses.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /cursos/{id}`
#[instrument(skip_all, fields(id = id))]
pub async fn get_one<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Course>, ApiError> {
  Ok(Json(svc.courses.get(id).await?))
}

/// `PUT /cursos/{id}`
#[instrument(skip_all, fields(id = id))]
pub async fn update<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
  Body(body): Body<CourseBody>,
) -> Result<Json<Course>, ApiError> {
  Ok(Json(svc.courses.update(id, body.into()).await?))
}

/// `DELETE /cursos/{id}`
#[instrument(skip_all, fields(id = id))]
pub async fn delete<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Value>, ApiError> {
  svc.courses.delete(id).await?;
  Ok(Json(json!({ "message": "course deleted" })))
}

/// `GET /cursos/{id}/alunos`
#[instrument(skip_all, fields(course_id = id))]
pub async fn students<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Vec<StudentView>>, ApiError> {
  Ok(Json(svc.students.list_by_course(id).await?))
}
