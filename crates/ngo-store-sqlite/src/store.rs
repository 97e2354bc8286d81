//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use ngo_core::{
  course::{Course, NewCourse},
  section::{NewSection, Section, SectionView},
  store::RecordStore,
  student::{NewStudent, Student, StudentView},
  volunteer::{NewVolunteer, Volunteer},
};

use crate::{
  Result,
  encode::{
    COURSE_COLUMNS, RawCourse, RawSection, RawSectionRow, RawStudent,
    RawStudentRow, RawVolunteer, SECTION_COLUMNS, SECTION_ROW_COLUMNS,
    STUDENT_COLUMNS, STUDENT_ROW_COLUMNS, VOLUNTEER_COLUMNS, encode_date,
    encode_dt, encode_skills, now,
  },
  schema::SCHEMA,
};

const STUDENT_FROM: &str = "FROM alunos a LEFT JOIN cursos c ON c.id = a.curso_id";

const SECTION_FROM: &str = "FROM turmas t
   JOIN cursos c ON c.id = t.curso_id
   LEFT JOIN voluntarios v ON v.id = t.voluntario_id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An NGO record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Number of sections, regardless of roster. Used to observe rollbacks.
  pub async fn count_sections(&self) -> Result<i64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM turmas", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }
}

/// Insert one roster row per id. Runs on the caller's transaction.
fn insert_roster(
  conn: &rusqlite::Connection,
  section_id: i64,
  student_ids: &[i64],
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare_cached(
    "INSERT INTO turma_alunos (turma_id, aluno_id) VALUES (?1, ?2)",
  )?;
  for student_id in student_ids {
    stmt.execute(rusqlite::params![section_id, student_id])?;
  }
  Ok(())
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let raws: Vec<RawCourse> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COURSE_COLUMNS} FROM cursos ORDER BY nome, id"
        ))?;
        let rows = stmt
          .query_map([], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCourse::into_course).collect()
  }

  async fn get_course(&self, id: i64) -> Result<Option<Course>> {
    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COURSE_COLUMNS} FROM cursos WHERE id = ?1"),
              rusqlite::params![id],
              RawCourse::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn insert_course(&self, input: NewCourse) -> Result<Course> {
    let at_str = encode_dt(now());
    let start  = encode_date(input.start_date);
    let end    = encode_date(input.end_date);

    let raw: RawCourse = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO cursos (
               nome, descricao, data_inicio, data_fim, carga_horaria,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {COURSE_COLUMNS}"
          ),
          rusqlite::params![
            input.name,
            input.description,
            start,
            end,
            input.workload_hours,
            at_str,
          ],
          RawCourse::from_row,
        )?)
      })
      .await?;

    raw.into_course()
  }

  async fn update_course(&self, id: i64, input: NewCourse) -> Result<Option<Course>> {
    let at_str = encode_dt(now());
    let start  = encode_date(input.start_date);
    let end    = encode_date(input.end_date);

    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE cursos
                 SET nome = ?1, descricao = ?2, data_inicio = ?3, data_fim = ?4,
                     carga_horaria = ?5, updated_at = ?6
                 WHERE id = ?7
                 RETURNING {COURSE_COLUMNS}"
              ),
              rusqlite::params![
                input.name,
                input.description,
                start,
                end,
                input.workload_hours,
                at_str,
                id,
              ],
              RawCourse::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn delete_course(&self, id: i64) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM cursos WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Volunteers ────────────────────────────────────────────────────────────

  async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
    let raws: Vec<RawVolunteer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VOLUNTEER_COLUMNS} FROM voluntarios ORDER BY nome, id"
        ))?;
        let rows = stmt
          .query_map([], RawVolunteer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVolunteer::into_volunteer).collect()
  }

  async fn get_volunteer(&self, id: i64) -> Result<Option<Volunteer>> {
    let raw: Option<RawVolunteer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {VOLUNTEER_COLUMNS} FROM voluntarios WHERE id = ?1"),
              rusqlite::params![id],
              RawVolunteer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVolunteer::into_volunteer).transpose()
  }

  async fn insert_volunteer(&self, input: NewVolunteer) -> Result<Volunteer> {
    let at_str     = encode_dt(now());
    let skills_str = encode_skills(&input.skills)?;

    let raw: RawVolunteer = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO voluntarios (
               nome, email, telefone, endereco, habilidades, disponibilidade,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {VOLUNTEER_COLUMNS}"
          ),
          rusqlite::params![
            input.name,
            input.email,
            input.phone,
            input.address,
            skills_str,
            input.availability,
            at_str,
          ],
          RawVolunteer::from_row,
        )?)
      })
      .await?;

    raw.into_volunteer()
  }

  async fn update_volunteer(
    &self,
    id: i64,
    input: NewVolunteer,
  ) -> Result<Option<Volunteer>> {
    let at_str     = encode_dt(now());
    let skills_str = encode_skills(&input.skills)?;

    let raw: Option<RawVolunteer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE voluntarios
                 SET nome = ?1, email = ?2, telefone = ?3, endereco = ?4,
                     habilidades = ?5, disponibilidade = ?6, updated_at = ?7
                 WHERE id = ?8
                 RETURNING {VOLUNTEER_COLUMNS}"
              ),
              rusqlite::params![
                input.name,
                input.email,
                input.phone,
                input.address,
                skills_str,
                input.availability,
                at_str,
                id,
              ],
              RawVolunteer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVolunteer::into_volunteer).transpose()
  }

  async fn delete_volunteer(&self, id: i64) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM voluntarios WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn list_students(&self) -> Result<Vec<StudentView>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} {STUDENT_FROM} ORDER BY a.nome, a.id"
        ))?;
        let rows = stmt
          .query_map([], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_view).collect()
  }

  async fn list_students_by_course(&self, course_id: i64) -> Result<Vec<StudentView>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} {STUDENT_FROM}
           WHERE a.curso_id = ?1
           ORDER BY a.nome, a.id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![course_id], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_view).collect()
  }

  async fn get_student(&self, id: i64) -> Result<Option<StudentView>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} {STUDENT_FROM} WHERE a.id = ?1"),
              rusqlite::params![id],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_view).transpose()
  }

  async fn insert_student(&self, input: NewStudent) -> Result<Student> {
    let at_str = encode_dt(now());
    let birth  = encode_date(input.birth_date);

    let raw: RawStudentRow = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO alunos (
               nome, email, telefone, endereco, data_nascimento, curso_id,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {STUDENT_ROW_COLUMNS}"
          ),
          rusqlite::params![
            input.name,
            input.email,
            input.phone,
            input.address,
            birth,
            input.course_id,
            at_str,
          ],
          RawStudentRow::from_row,
        )?)
      })
      .await?;

    raw.into_student()
  }

  async fn update_student(&self, id: i64, input: NewStudent) -> Result<Option<Student>> {
    let at_str = encode_dt(now());
    let birth  = encode_date(input.birth_date);

    let raw: Option<RawStudentRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE alunos
                 SET nome = ?1, email = ?2, telefone = ?3, endereco = ?4,
                     data_nascimento = ?5, curso_id = ?6, updated_at = ?7
                 WHERE id = ?8
                 RETURNING {STUDENT_ROW_COLUMNS}"
              ),
              rusqlite::params![
                input.name,
                input.email,
                input.phone,
                input.address,
                birth,
                input.course_id,
                at_str,
                id,
              ],
              RawStudentRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudentRow::into_student).transpose()
  }

  async fn delete_student(&self, id: i64) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM alunos WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(n > 0)
  }

  // ── Sections ──────────────────────────────────────────────────────────────

  async fn list_sections(&self) -> Result<Vec<SectionView>> {
    let raws: Vec<RawSection> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SECTION_COLUMNS} {SECTION_FROM}
           ORDER BY t.created_at DESC, t.id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawSection::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSection::into_view).collect()
  }

  async fn get_section(&self, id: i64) -> Result<Option<SectionView>> {
    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SECTION_COLUMNS} {SECTION_FROM} WHERE t.id = ?1"),
              rusqlite::params![id],
              RawSection::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSection::into_view).transpose()
  }

  async fn insert_section(&self, input: NewSection) -> Result<Section> {
    let at_str = encode_dt(now());
    let start  = encode_date(input.start_date);
    let end    = encode_date(input.end_date);

    let raw: RawSectionRow = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls back the section row too.
        let tx = conn.transaction()?;

        let raw = tx.query_row(
          &format!(
            "INSERT INTO turmas (
               nome, curso_id, voluntario_id, data_inicio, data_fim,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {SECTION_ROW_COLUMNS}"
          ),
          rusqlite::params![
            input.name,
            input.course_id,
            input.volunteer_id,
            start,
            end,
            at_str,
          ],
          RawSectionRow::from_row,
        )?;

        insert_roster(&tx, raw.id, &input.student_ids)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_section()
  }

  async fn update_section(&self, id: i64, input: NewSection) -> Result<Option<Section>> {
    let at_str = encode_dt(now());
    let start  = encode_date(input.start_date);
    let end    = encode_date(input.end_date);

    let raw: Option<RawSectionRow> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!(
              "UPDATE turmas
               SET nome = ?1, curso_id = ?2, voluntario_id = ?3,
                   data_inicio = ?4, data_fim = ?5, updated_at = ?6
               WHERE id = ?7
               RETURNING {SECTION_ROW_COLUMNS}"
            ),
            rusqlite::params![
              input.name,
              input.course_id,
              input.volunteer_id,
              start,
              end,
              at_str,
              id,
            ],
            RawSectionRow::from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(None);
        };

        tx.execute(
          "DELETE FROM turma_alunos WHERE turma_id = ?1",
          rusqlite::params![id],
        )?;
        insert_roster(&tx, id, &input.student_ids)?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawSectionRow::into_section).transpose()
  }

  async fn delete_section(&self, id: i64) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM turmas WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(n > 0)
  }
}
