//! Volunteers — people who staff sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, require},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volunteer {
  pub id:           i64,
  #[serde(rename = "nome")]
  pub name:         String,
  /// Unique across all volunteers.
  pub email:        String,
  #[serde(rename = "telefone")]
  pub phone:        Option<String>,
  #[serde(rename = "endereco")]
  pub address:      Option<String>,
  /// Free-text skill tags.
  #[serde(rename = "habilidades", default)]
  pub skills:       Vec<String>,
  #[serde(rename = "disponibilidade")]
  pub availability: Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVolunteer {
  #[serde(rename = "nome")]
  pub name:         String,
  pub email:        String,
  #[serde(rename = "telefone")]
  pub phone:        Option<String>,
  #[serde(rename = "endereco")]
  pub address:      Option<String>,
  #[serde(rename = "habilidades", default)]
  pub skills:       Vec<String>,
  #[serde(rename = "disponibilidade")]
  pub availability: Option<String>,
}

impl NewVolunteer {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      ..Default::default()
    }
  }

  pub fn validate(&self) -> Result<()> {
    require(&[
      ("name", present(&self.name)),
      ("email", present(&self.email)),
    ])
  }
}
