//! Handlers for `/turmas` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/turmas` | Newest first, each with `alunos_ids` |
//! | `POST`   | `/turmas` | Body: [`SectionBody`]; section and roster in one transaction |
//! | `GET`    | `/turmas/{id}` | Includes names and roster |
//! | `PUT`    | `/turmas/{id}` | Replaces fields and the whole roster |
//! | `DELETE` | `/turmas/{id}` | Roster rows cascade |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ngo_core::{
  Services,
  section::{Section, SectionView},
  store::RecordStore,
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
  body::{Body, Id, SectionBody},
  error::ApiError,
};

pub async fn list<S: RecordStore>(
  State(svc): State<Services<S>>,
) -> Result<Json<Vec<SectionView>>, ApiError> {
  Ok(Json(svc.sections.list().await?))
}

#[instrument(skip_all, fields(students = body.alunos_ids.len()))]
pub async fn create<S: RecordStore>(
  State(svc): State<Services<S>>,
  Body(body): Body<SectionBody>,
) -> Result<impl IntoResponse, ApiError> {
  let section: Section = svc.sections.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(section)))
}

#[instrument(skip_all, fields(id = id))]
pub async fn get_one<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<SectionView>, ApiError> {
  Ok(Json(svc.sections.get(id).await?))
}

#[instrument(skip_all, fields(id = id, students = body.alunos_ids.len()))]
pub async fn update<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
  Body(body): Body<SectionBody>,
) -> Result<Json<Section>, ApiError> {
  Ok(Json(svc.sections.update(id, body.into()).await?))
}

#[instrument(skip_all, fields(id = id))]
pub async fn delete<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Value>, ApiError> {
  svc.sections.delete(id).await?;
  Ok(Json(json!({ "message": "section deleted" })))
}
