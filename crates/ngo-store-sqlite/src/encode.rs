//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond precision
//! so that lexical order matches chronological order. Calendar dates are
//! stored as `YYYY-MM-DD`. Volunteer skills are a compact JSON array.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use ngo_core::{
  course::Course,
  section::{Section, SectionView},
  student::{Student, StudentView},
  volunteer::Volunteer,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current instant at stored precision.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format(DATE_FORMAT).to_string())
}

pub fn decode_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(|s| {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
      .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
  })
  .transpose()
}

// ─── Skills ──────────────────────────────────────────────────────────────────

pub fn encode_skills(skills: &[String]) -> Result<String> {
  Ok(serde_json::to_string(skills)?)
}

pub fn decode_skills(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `cursos` row.
pub struct RawCourse {
  pub id:             i64,
  pub name:           String,
  pub description:    Option<String>,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
  pub workload_hours: Option<i32>,
  pub created_at:     String,
  pub updated_at:     String,
}

pub const COURSE_COLUMNS: &str = "id, nome, descricao, data_inicio, data_fim, carga_horaria, \
                                  created_at, updated_at";

impl RawCourse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      description:    row.get(2)?,
      start_date:     row.get(3)?,
      end_date:       row.get(4)?,
      workload_hours: row.get(5)?,
      created_at:     row.get(6)?,
      updated_at:     row.get(7)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      id:             self.id,
      name:           self.name,
      description:    self.description,
      start_date:     decode_date(self.start_date.as_deref())?,
      end_date:       decode_date(self.end_date.as_deref())?,
      workload_hours: self.workload_hours,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `voluntarios` row.
pub struct RawVolunteer {
  pub id:           i64,
  pub name:         String,
  pub email:        String,
  pub phone:        Option<String>,
  pub address:      Option<String>,
  pub skills:       String,
  pub availability: Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

pub const VOLUNTEER_COLUMNS: &str = "id, nome, email, telefone, endereco, habilidades, \
                                     disponibilidade, created_at, updated_at";

impl RawVolunteer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      name:         row.get(1)?,
      email:        row.get(2)?,
      phone:        row.get(3)?,
      address:      row.get(4)?,
      skills:       row.get(5)?,
      availability: row.get(6)?,
      created_at:   row.get(7)?,
      updated_at:   row.get(8)?,
    })
  }

  pub fn into_volunteer(self) -> Result<Volunteer> {
    Ok(Volunteer {
      id:           self.id,
      name:         self.name,
      email:        self.email,
      phone:        self.phone,
      address:      self.address,
      skills:       decode_skills(&self.skills)?,
      availability: self.availability,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `alunos` row.
pub struct RawStudentRow {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub birth_date: Option<String>,
  pub course_id:  Option<i64>,
  pub created_at: String,
  pub updated_at: String,
}

pub const STUDENT_ROW_COLUMNS: &str = "id, nome, email, telefone, endereco, data_nascimento, \
                                       curso_id, created_at, updated_at";

impl RawStudentRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      address:    row.get(4)?,
      birth_date: row.get(5)?,
      course_id:  row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:         self.id,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      address:    self.address,
      birth_date: decode_date(self.birth_date.as_deref())?,
      course_id:  self.course_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// An `alunos` row left-joined with its course name.
pub struct RawStudent {
  pub row:         RawStudentRow,
  pub course_name: Option<String>,
}

/// Select list for [`RawStudent`]; expects `alunos a LEFT JOIN cursos c`.
pub const STUDENT_COLUMNS: &str = "a.id, a.nome, a.email, a.telefone, a.endereco, \
                                   a.data_nascimento, a.curso_id, a.created_at, \
                                   a.updated_at, c.nome";

impl RawStudent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      row:         RawStudentRow::from_row(row)?,
      course_name: row.get(9)?,
    })
  }

  pub fn into_view(self) -> Result<StudentView> {
    Ok(StudentView {
      student:     self.row.into_student()?,
      course_name: self.course_name,
    })
  }
}

/// Raw values read directly from a `turmas` row.
pub struct RawSectionRow {
  pub id:           i64,
  pub name:         String,
  pub course_id:    i64,
  pub volunteer_id: Option<i64>,
  pub start_date:   Option<String>,
  pub end_date:     Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

pub const SECTION_ROW_COLUMNS: &str = "id, nome, curso_id, voluntario_id, data_inicio, \
                                       data_fim, created_at, updated_at";

impl RawSectionRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      name:         row.get(1)?,
      course_id:    row.get(2)?,
      volunteer_id: row.get(3)?,
      start_date:   row.get(4)?,
      end_date:     row.get(5)?,
      created_at:   row.get(6)?,
      updated_at:   row.get(7)?,
    })
  }

  pub fn into_section(self) -> Result<Section> {
    Ok(Section {
      id:           self.id,
      name:         self.name,
      course_id:    self.course_id,
      volunteer_id: self.volunteer_id,
      start_date:   decode_date(self.start_date.as_deref())?,
      end_date:     decode_date(self.end_date.as_deref())?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// A `turmas` row with joined names and the roster aggregated into a JSON
/// array.
pub struct RawSection {
  pub row:            RawSectionRow,
  pub course_name:    String,
  pub volunteer_name: Option<String>,
  pub student_ids:    String,
}

/// Select list for [`RawSection`]; expects `turmas t JOIN cursos c LEFT JOIN
/// voluntarios v`. The subquery orders roster ids before aggregating them.
pub const SECTION_COLUMNS: &str = "t.id, t.nome, t.curso_id, t.voluntario_id, t.data_inicio, \
   t.data_fim, t.created_at, t.updated_at, c.nome, v.nome,
   (SELECT json_group_array(aluno_id)
      FROM (SELECT aluno_id FROM turma_alunos WHERE turma_id = t.id ORDER BY aluno_id))";

impl RawSection {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      row:            RawSectionRow::from_row(row)?,
      course_name:    row.get(8)?,
      volunteer_name: row.get(9)?,
      student_ids:    row.get(10)?,
    })
  }

  pub fn into_view(self) -> Result<SectionView> {
    Ok(SectionView {
      section:        self.row.into_section()?,
      course_name:    self.course_name,
      volunteer_name: self.volunteer_name,
      student_ids:    serde_json::from_str(&self.student_ids)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
      .unwrap()
      .with_timezone(&Utc);
    let b = DateTime::parse_from_rfc3339("2024-01-01T10:00:00.5Z")
      .unwrap()
      .with_timezone(&Utc);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn bad_date_is_reported() {
    assert!(decode_date(Some("31/12/2024")).is_err());
    assert_eq!(decode_date(None).unwrap(), None);
  }
}
