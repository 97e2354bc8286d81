//! Courses — the programmes the NGO offers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, require},
};

/// A persisted course row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub id:             i64,
  #[serde(rename = "nome")]
  pub name:           String,
  #[serde(rename = "descricao")]
  pub description:    Option<String>,
  #[serde(rename = "data_inicio")]
  pub start_date:     Option<NaiveDate>,
  #[serde(rename = "data_fim")]
  pub end_date:       Option<NaiveDate>,
  /// Credit hours.
  #[serde(rename = "carga_horaria")]
  pub workload_hours: Option<i32>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// Input to course create and update. Updates replace every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
  #[serde(rename = "nome")]
  pub name:           String,
  #[serde(rename = "descricao")]
  pub description:    Option<String>,
  #[serde(rename = "data_inicio")]
  pub start_date:     Option<NaiveDate>,
  #[serde(rename = "data_fim")]
  pub end_date:       Option<NaiveDate>,
  #[serde(rename = "carga_horaria")]
  pub workload_hours: Option<i32>,
}

impl NewCourse {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }

  pub fn validate(&self) -> Result<()> {
    require(&[("name", present(&self.name))])
  }
}
