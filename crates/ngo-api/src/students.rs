//! Handlers for `/alunos` endpoints.
//!
//! Reads include the enrolled course's name as `curso_nome`; writes return
//! the bare row.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ngo_core::{
  Services,
  store::RecordStore,
  student::{Student, StudentView},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
  body::{Body, Id, StudentBody},
  error::ApiError,
};

pub async fn list<S: RecordStore>(
  State(svc): State<Services<S>>,
) -> Result<Json<Vec<StudentView>>, ApiError> {
  Ok(Json(svc.students.list().await?))
}

#[instrument(skip_all)]
pub async fn create<S: RecordStore>(
  State(svc): State<Services<S>>,
  Body(body): Body<StudentBody>,
) -> Result<impl IntoResponse, ApiError> {
  let student = svc.students.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(student)))
}

#[instrument(skip_all, fields(id = id))]
pub async fn get_one<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<StudentView>, ApiError> {
  Ok(Json(svc.students.get(id).await?))
}

#[instrument(skip_all, fields(id = id))]
pub async fn update<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
  Body(body): Body<StudentBody>,
) -> Result<Json<Student>, ApiError> {
  Ok(Json(svc.students.update(id, body.into()).await?))
}

#[instrument(skip_all, fields(id = id))]
pub async fn delete<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Value>, ApiError> {
  svc.students.delete(id).await?;
  Ok(Json(json!({ "message": "student deleted" })))
}
