//! Students and their optional course enrolment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, require},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:         i64,
  #[serde(rename = "nome")]
  pub name:       String,
  /// Unique across all students.
  pub email:      String,
  #[serde(rename = "telefone")]
  pub phone:      Option<String>,
  #[serde(rename = "endereco")]
  pub address:    Option<String>,
  #[serde(rename = "data_nascimento")]
  pub birth_date: Option<NaiveDate>,
  /// Cleared (not cascaded) when the course is deleted.
  #[serde(rename = "curso_id")]
  pub course_id:  Option<i64>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A student joined with the display name of its course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentView {
  #[serde(flatten)]
  pub student:     Student,
  #[serde(rename = "curso_nome")]
  pub course_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
  #[serde(rename = "nome")]
  pub name:       String,
  pub email:      String,
  #[serde(rename = "telefone")]
  pub phone:      Option<String>,
  #[serde(rename = "endereco")]
  pub address:    Option<String>,
  #[serde(rename = "data_nascimento")]
  pub birth_date: Option<NaiveDate>,
  #[serde(rename = "curso_id")]
  pub course_id:  Option<i64>,
}

impl NewStudent {
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn view_flattens_student_fields() {
    let now = Utc::now();
    let view = StudentView {
      student:     Student {
        id:         3,
        name:       "Bia".into(),
        email:      "bia@example.org".into(),
        phone:      None,
        address:    None,
        birth_date: NaiveDate::from_ymd_opt(2008, 5, 1),
        course_id:  Some(1),
        created_at: now,
        updated_at: now,
      },
      course_name: Some("Intro".into()),
    };

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["curso_id"], 1);
    assert_eq!(json["curso_nome"], "Intro");
    assert_eq!(json["data_nascimento"], "2008-05-01");

    let back: StudentView = serde_json::from_value(json).unwrap();
    assert_eq!(back, view);
  }
}
