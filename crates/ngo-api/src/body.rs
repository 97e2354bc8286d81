//! Request extractors and lenient request bodies.
//!
//! Browser forms send empty strings for untouched optional inputs, dates as
//! full ISO timestamps and numbers as strings. Bodies here accept all of
//! those and normalise them before they reach the services:
//!
//! - blank text is absent;
//! - a date is `YYYY-MM-DD`, optionally followed by `T...`, or blank;
//! - numbers may be JSON numbers or numeric strings;
//! - reference ids `<= 0` are absent.
//!
//! Required fields default to empty so that service validation reports every
//! missing one at once.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
  http::request::Parts,
};
use chrono::NaiveDate;
use ngo_core::{
  course::NewCourse,
  section::NewSection,
  student::NewStudent,
  volunteer::NewVolunteer,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::Value;

use crate::error::ApiError;

// ─── Extractors ──────────────────────────────────────────────────────────────

/// An integer `{id}` path segment. Anything else is a 400.
pub struct Id(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Id {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Path(id) = Path::<i64>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(id))
  }
}

/// A JSON body whose rejections are reported as 400 with an `{"error"}` body.
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
    Ok(Self(value))
  }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
  let s: Option<String> = Option::deserialize(d)?;
  Ok(s.filter(|s| !s.trim().is_empty()))
}

fn date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
  let Some(s) = text(d)? else {
    return Ok(None);
  };
  let day = s.split('T').next().unwrap_or_default().trim();
  NaiveDate::parse_from_str(day, "%Y-%m-%d")
    .map(Some)
    .map_err(|e| D::Error::custom(format!("invalid date {s:?}: {e}")))
}

fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
  match Option::<Value>::deserialize(d)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => n
      .as_i64()
      .map(Some)
      .ok_or_else(|| D::Error::custom(format!("expected an integer, got {n}"))),
    Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
    Some(Value::String(s)) => s
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    Some(other) => Err(D::Error::custom(format!("expected an integer, got {other}"))),
  }
}

fn hours<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
  number(d)?
    .map(|n| i32::try_from(n).map_err(|_| D::Error::custom("carga_horaria out of range")))
    .transpose()
}

fn reference<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
  Ok(number(d)?.filter(|id| *id > 0))
}

fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CourseBody {
  #[serde(default, deserialize_with = "text")]
  pub nome:          Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub descricao:     Option<String>,
  #[serde(default, deserialize_with = "date")]
  pub data_inicio:   Option<NaiveDate>,
  #[serde(default, deserialize_with = "date")]
  pub data_fim:      Option<NaiveDate>,
  #[serde(default, deserialize_with = "hours")]
  pub carga_horaria: Option<i32>,
}

impl From<CourseBody> for NewCourse {
  fn from(b: CourseBody) -> Self {
    Self {
      name:           b.nome.unwrap_or_default(),
      description:    b.descricao,
      start_date:     b.data_inicio,
      end_date:       b.data_fim,
      workload_hours: b.carga_horaria,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct VolunteerBody {
  #[serde(default, deserialize_with = "text")]
  pub nome:            Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub email:           Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub telefone:        Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub endereco:        Option<String>,
  #[serde(default, deserialize_with = "list")]
  pub habilidades:     Vec<String>,
  #[serde(default, deserialize_with = "text")]
  pub disponibilidade: Option<String>,
}

impl From<VolunteerBody> for NewVolunteer {
  fn from(b: VolunteerBody) -> Self {
    Self {
      name:         b.nome.unwrap_or_default(),
      email:        b.email.unwrap_or_default(),
      phone:        b.telefone,
      address:      b.endereco,
      skills:       b.habilidades,
      availability: b.disponibilidade,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct StudentBody {
  #[serde(default, deserialize_with = "text")]
  pub nome:            Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub email:           Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub telefone:        Option<String>,
  #[serde(default, deserialize_with = "text")]
  pub endereco:        Option<String>,
  #[serde(default, deserialize_with = "date")]
  pub data_nascimento: Option<NaiveDate>,
  #[serde(default, deserialize_with = "reference")]
  pub curso_id:        Option<i64>,
}

impl From<StudentBody> for NewStudent {
  fn from(b: StudentBody) -> Self {
    Self {
      name:       b.nome.unwrap_or_default(),
      email:      b.email.unwrap_or_default(),
      phone:      b.telefone,
      address:    b.endereco,
      birth_date: b.data_nascimento,
      course_id:  b.curso_id,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct SectionBody {
  #[serde(default, deserialize_with = "text")]
  pub nome:          Option<String>,
  #[serde(default, deserialize_with = "reference")]
  pub curso_id:      Option<i64>,
  #[serde(default, deserialize_with = "reference")]
  pub voluntario_id: Option<i64>,
  #[serde(default, deserialize_with = "date")]
  pub data_inicio:   Option<NaiveDate>,
  #[serde(default, deserialize_with = "date")]
  pub data_fim:      Option<NaiveDate>,
  #[serde(default, deserialize_with = "list")]
  pub alunos_ids:    Vec<i64>,
}

impl From<SectionBody> for NewSection {
  fn from(b: SectionBody) -> Self {
    Self {
      name:         b.nome.unwrap_or_default(),
      // 0 fails validation as "course".
      course_id:    b.curso_id.unwrap_or_default(),
      volunteer_id: b.voluntario_id,
      start_date:   b.data_inicio,
      end_date:     b.data_fim,
      student_ids:  b.alunos_ids,
    }
  }
}
