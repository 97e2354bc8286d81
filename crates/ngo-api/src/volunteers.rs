//! Handlers for `/voluntarios` endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ngo_core::{Services, store::RecordStore, volunteer::Volunteer};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
  body::{Body, Id, VolunteerBody},
  error::ApiError,
};

pub async fn list<S: RecordStore>(
  State(svc): State<Services<S>>,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
  Ok(Json(svc.volunteers.list().await?))
}

#[instrument(skip_all)]
pub async fn create<S: RecordStore>(
  State(svc): State<Services<S>>,
  Body(body): Body<VolunteerBody>,
) -> Result<impl IntoResponse, ApiError> {
  let volunteer = svc.volunteers.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(volunteer)))
}

#[instrument(skip_all, fields(id = id))]
pub async fn get_one<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Volunteer>, ApiError> {
  Ok(Json(svc.volunteers.get(id).await?))
}

#[instrument(skip_all, fields(id = id))]
pub async fn update<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
  Body(body): Body<VolunteerBody>,
) -> Result<Json<Volunteer>, ApiError> {
  Ok(Json(svc.volunteers.update(id, body.into()).await?))
}

#[instrument(skip_all, fields(id = id))]
pub async fn delete<S: RecordStore>(
  State(svc): State<Services<S>>,
  Id(id): Id,
) -> Result<Json<Value>, ApiError> {
  svc.volunteers.delete(id).await?;
  Ok(Json(json!({ "message": "volunteer deleted" })))
}
