//! Sections ("turmas") — scheduled offerings of a course, optionally staffed by
//! one volunteer, with a roster of enrolled students.
//!
//! The roster lives in a join table. It is never edited row by row: every
//! create or update carries the complete list of student ids and the store
//! replaces the previous roster with it inside one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, require},
};

/// A persisted section row, without its roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  pub id:           i64,
  #[serde(rename = "nome")]
  pub name:         String,
  /// Mandatory; deleting the course deletes the section.
  #[serde(rename = "curso_id")]
  pub course_id:    i64,
  /// Cleared (not cascaded) when the volunteer is deleted.
  #[serde(rename = "voluntario_id")]
  pub volunteer_id: Option<i64>,
  #[serde(rename = "data_inicio")]
  pub start_date:   Option<NaiveDate>,
  #[serde(rename = "data_fim")]
  pub end_date:     Option<NaiveDate>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// The read model for a section: its row, the joined display names and the
/// aggregated roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
  #[serde(flatten)]
  pub section:        Section,
  #[serde(rename = "curso_nome")]
  pub course_name:    String,
  #[serde(rename = "voluntario_nome")]
  pub volunteer_name: Option<String>,
  /// Ascending student ids; empty, never absent, when nobody is enrolled.
  #[serde(rename = "alunos_ids", default)]
  pub student_ids:    Vec<i64>,
}

/// Input to section create and update.
///
/// `student_ids` is the complete roster. Duplicates are passed through to the
/// store unchanged, where the join table's composite key rejects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSection {
  #[serde(rename = "nome")]
  pub name:         String,
  #[serde(rename = "curso_id")]
  pub course_id:    i64,
  #[serde(rename = "voluntario_id")]
  pub volunteer_id: Option<i64>,
  #[serde(rename = "data_inicio")]
  pub start_date:   Option<NaiveDate>,
  #[serde(rename = "data_fim")]
  pub end_date:     Option<NaiveDate>,
  #[serde(rename = "alunos_ids", default)]
  pub student_ids:  Vec<i64>,
}

impl NewSection {
  pub fn new(name: impl Into<String>, course_id: i64) -> Self {
    Self {
      name: name.into(),
      course_id,
      ..Default::default()
    }
  }

  /// Builder-style roster setter, handy in tests and clients.
  pub fn with_students(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
    self.student_ids = ids.into_iter().collect();
    self
  }

  pub fn validate(&self) -> Result<()> {
    require(&[
      ("name", present(&self.name)),
      ("course", self.course_id > 0),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn course_is_required() {
    let err = NewSection::new("A", 0).validate().unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m.contains("course")));
  }

  #[test]
  fn roster_defaults_to_empty_on_the_wire() {
    let s: NewSection =
      serde_json::from_str(r#"{"nome":"A","curso_id":1}"#).unwrap();
    assert!(s.student_ids.is_empty());
    assert!(s.validate().is_ok());
  }

  #[test]
  fn duplicates_are_kept() {
    let s = NewSection::new("A", 1).with_students([4, 4, 5]);
    assert_eq!(s.student_ids, vec![4, 4, 5]);
  }
}
