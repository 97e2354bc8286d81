//! [`PgStore`] — the PostgreSQL implementation of [`RecordStore`].

use deadpool_postgres::{Pool, Transaction};
use tracing::debug;

use ngo_core::{
  course::{Course, NewCourse},
  section::{NewSection, Section, SectionView},
  store::RecordStore,
  student::{NewStudent, Student, StudentView},
  volunteer::{NewVolunteer, Volunteer},
};

use crate::{
  PgConfig, Result,
  rows::{
    self, COURSE_COLUMNS, SECTION_COLUMNS, SECTION_VIEW_GROUP, SECTION_VIEW_SELECT,
    STUDENT_COLUMNS, STUDENT_VIEW_COLUMNS, VOLUNTEER_COLUMNS,
  },
  schema::SCHEMA,
};

const STUDENT_FROM: &str = "FROM alunos a LEFT JOIN cursos c ON c.id = a.curso_id";

/// Decode every row with `f`, failing on the first bad row.
fn decode_all<T>(
  rows: &[tokio_postgres::Row],
  f: fn(&tokio_postgres::Row) -> Result<T, tokio_postgres::Error>,
) -> Result<Vec<T>> {
  Ok(rows.iter().map(f).collect::<Result<Vec<_>, _>>()?)
}

/// Insert the roster in one statement. Runs on the caller's transaction.
async fn insert_roster(
  tx: &Transaction<'_>,
  section_id: i64,
  student_ids: &[i64],
) -> Result<()> {
  if student_ids.is_empty() {
    return Ok(());
  }
  tx.execute(
    "INSERT INTO turma_alunos (turma_id, aluno_id)
     SELECT $1, unnest($2::bigint[])",
    &[&section_id, &student_ids],
  )
  .await?;
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An NGO record store backed by a PostgreSQL connection pool.
///
/// Cloning is cheap; the pool is reference-counted.
#[derive(Clone)]
pub struct PgStore {
  pub(crate) pool: Pool,
}

impl PgStore {
  /// Create the pool and run schema initialisation.
  pub async fn connect(config: &PgConfig) -> Result<Self> {
    debug!(?config, "creating postgres pool");
    let store = Self { pool: config.create_pool()? };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn from_pool(pool: Pool) -> Self { Self { pool } }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for PgStore {
  type Error = crate::Error;

  async fn init_schema(&self) -> Result<()> {
    let client = self.pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    Ok(())
  }

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let client = self.pool.get().await?;
    let found = client
      .query(
        &format!("SELECT {COURSE_COLUMNS} FROM cursos ORDER BY nome, id"),
        &[],
      )
      .await?;
    decode_all(&found, rows::course)
  }

  async fn get_course(&self, id: i64) -> Result<Option<Course>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!("SELECT {COURSE_COLUMNS} FROM cursos WHERE id = $1"),
        &[&id],
      )
      .await?;
    Ok(row.as_ref().map(rows::course).transpose()?)
  }

  async fn insert_course(&self, input: NewCourse) -> Result<Course> {
    let client = self.pool.get().await?;
    let row = client
      .query_one(
        &format!(
          "INSERT INTO cursos (nome, descricao, data_inicio, data_fim, carga_horaria)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {COURSE_COLUMNS}"
        ),
        &[
          &input.name,
          &input.description,
          &input.start_date,
          &input.end_date,
          &input.workload_hours,
        ],
      )
      .await?;
    Ok(rows::course(&row)?)
  }

  async fn update_course(&self, id: i64, input: NewCourse) -> Result<Option<Course>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!(
          "UPDATE cursos
           SET nome = $1, descricao = $2, data_inicio = $3, data_fim = $4,
               carga_horaria = $5, updated_at = now()
           WHERE id = $6
           RETURNING {COURSE_COLUMNS}"
        ),
        &[
          &input.name,
          &input.description,
          &input.start_date,
          &input.end_date,
          &input.workload_hours,
          &id,
        ],
      )
      .await?;
    Ok(row.as_ref().map(rows::course).transpose()?)
  }

  async fn delete_course(&self, id: i64) -> Result<bool> {
    let client = self.pool.get().await?;
    let n = client
      .execute("DELETE FROM cursos WHERE id = $1", &[&id])
      .await?;
    Ok(n > 0)
  }

  // ── Volunteers ────────────────────────────────────────────────────────────

  async fn list_volunteers(&self) -> Result<Vec<Volunteer>> {
    let client = self.pool.get().await?;
    let found = client
      .query(
        &format!("SELECT {VOLUNTEER_COLUMNS} FROM voluntarios ORDER BY nome, id"),
        &[],
      )
      .await?;
    decode_all(&found, rows::volunteer)
  }

  async fn get_volunteer(&self, id: i64) -> Result<Option<Volunteer>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!("SELECT {VOLUNTEER_COLUMNS} FROM voluntarios WHERE id = $1"),
        &[&id],
      )
      .await?;
    Ok(row.as_ref().map(rows::volunteer).transpose()?)
  }

  async fn insert_volunteer(&self, input: NewVolunteer) -> Result<Volunteer> {
    let client = self.pool.get().await?;
    let row = client
      .query_one(
        &format!(
          "INSERT INTO voluntarios (
             nome, email, telefone, endereco, habilidades, disponibilidade
           ) VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING {VOLUNTEER_COLUMNS}"
        ),
        &[
          &input.name,
          &input.email,
          &input.phone,
          &input.address,
          &input.skills,
          &input.availability,
        ],
      )
      .await?;
    Ok(rows::volunteer(&row)?)
  }

  async fn update_volunteer(
    &self,
    id: i64,
    input: NewVolunteer,
  ) -> Result<Option<Volunteer>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!(
          "UPDATE voluntarios
           SET nome = $1, email = $2, telefone = $3, endereco = $4,
               habilidades = $5, disponibilidade = $6, updated_at = now()
           WHERE id = $7
           RETURNING {VOLUNTEER_COLUMNS}"
        ),
        &[
          &input.name,
          &input.email,
          &input.phone,
          &input.address,
          &input.skills,
          &input.availability,
          &id,
        ],
      )
      .await?;
    Ok(row.as_ref().map(rows::volunteer).transpose()?)
  }

  async fn delete_volunteer(&self, id: i64) -> Result<bool> {
    let client = self.pool.get().await?;
    let n = client
      .execute("DELETE FROM voluntarios WHERE id = $1", &[&id])
      .await?;
    Ok(n > 0)
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn list_students(&self) -> Result<Vec<StudentView>> {
    let client = self.pool.get().await?;
    let found = client
      .query(
        &format!("SELECT {STUDENT_VIEW_COLUMNS} {STUDENT_FROM} ORDER BY a.nome, a.id"),
        &[],
      )
      .await?;
    decode_all(&found, rows::student_view)
  }

  async fn list_students_by_course(&self, course_id: i64) -> Result<Vec<StudentView>> {
    let client = self.pool.get().await?;
    let found = client
      .query(
        &format!(
          "SELECT {STUDENT_VIEW_COLUMNS} {STUDENT_FROM}
           WHERE a.curso_id = $1
           ORDER BY a.nome, a.id"
        ),
        &[&course_id],
      )
      .await?;
    decode_all(&found, rows::student_view)
  }

  async fn get_student(&self, id: i64) -> Result<Option<StudentView>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!("SELECT {STUDENT_VIEW_COLUMNS} {STUDENT_FROM} WHERE a.id = $1"),
        &[&id],
      )
      .await?;
    Ok(row.as_ref().map(rows::student_view).transpose()?)
  }

  async fn insert_student(&self, input: NewStudent) -> Result<Student> {
    let client = self.pool.get().await?;
    let row = client
      .query_one(
        &format!(
          "INSERT INTO alunos (
             nome, email, telefone, endereco, data_nascimento, curso_id
           ) VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING {STUDENT_COLUMNS}"
        ),
        &[
          &input.name,
          &input.email,
          &input.phone,
          &input.address,
          &input.birth_date,
          &input.course_id,
        ],
      )
      .await?;
    Ok(rows::student(&row)?)
  }

  async fn update_student(&self, id: i64, input: NewStudent) -> Result<Option<Student>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!(
          "UPDATE alunos
           SET nome = $1, email = $2, telefone = $3, endereco = $4,
               data_nascimento = $5, curso_id = $6, updated_at = now()
           WHERE id = $7
           RETURNING {STUDENT_COLUMNS}"
        ),
        &[
          &input.name,
          &input.email,
          &input.phone,
          &input.address,
          &input.birth_date,
          &input.course_id,
          &id,
        ],
      )
      .await?;
    Ok(row.as_ref().map(rows::student).transpose()?)
  }

  async fn delete_student(&self, id: i64) -> Result<bool> {
    let client = self.pool.get().await?;
    let n = client
      .execute("DELETE FROM alunos WHERE id = $1", &[&id])
      .await?;
    Ok(n > 0)
  }

  // ── Sections ──────────────────────────────────────────────────────────────

  async fn list_sections(&self) -> Result<Vec<SectionView>> {
    let client = self.pool.get().await?;
    let found = client
      .query(
        &format!(
          "{SECTION_VIEW_SELECT}
           {SECTION_VIEW_GROUP}
           ORDER BY t.created_at DESC, t.id DESC"
        ),
        &[],
      )
      .await?;
    decode_all(&found, rows::section_view)
  }

  async fn get_section(&self, id: i64) -> Result<Option<SectionView>> {
    let client = self.pool.get().await?;
    let row = client
      .query_opt(
        &format!(
          "{SECTION_VIEW_SELECT}
           WHERE t.id = $1
           {SECTION_VIEW_GROUP}"
        ),
        &[&id],
      )
      .await?;
    Ok(row.as_ref().map(rows::section_view).transpose()?)
  }

  async fn insert_section(&self, input: NewSection) -> Result<Section> {
    let mut client = self.pool.get().await?;
    // Dropping `tx` without committing rolls back; the pooled connection
    // returns to the pool when `client` drops.
    let tx = client.transaction().await?;

    let row = tx
      .query_one(
        &format!(
          "INSERT INTO turmas (nome, curso_id, voluntario_id, data_inicio, data_fim)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {SECTION_COLUMNS}"
        ),
        &[
          &input.name,
          &input.course_id,
          &input.volunteer_id,
          &input.start_date,
          &input.end_date,
        ],
      )
      .await?;
    let section = rows::section(&row)?;

    insert_roster(&tx, section.id, &input.student_ids).await?;
    tx.commit().await?;
    Ok(section)
  }

  async fn update_section(&self, id: i64, input: NewSection) -> Result<Option<Section>> {
    let mut client = self.pool.get().await?;
    let tx = client.transaction().await?;

    let row = tx
      .query_opt(
        &format!(
          "UPDATE turmas
           SET nome = $1, curso_id = $2, voluntario_id = $3,
               data_inicio = $4, data_fim = $5, updated_at = now()
           WHERE id = $6
           RETURNING {SECTION_COLUMNS}"
        ),
        &[
          &input.name,
          &input.course_id,
          &input.volunteer_id,
          &input.start_date,
          &input.end_date,
          &id,
        ],
      )
      .await?;

    let Some(row) = row else {
      tx.rollback().await?;
      return Ok(None);
    };
    let section = rows::section(&row)?;

    tx.execute("DELETE FROM turma_alunos WHERE turma_id = $1", &[&id])
      .await?;
    insert_roster(&tx, id, &input.student_ids).await?;
    tx.commit().await?;
    Ok(Some(section))
  }

  async fn delete_section(&self, id: i64) -> Result<bool> {
    let client = self.pool.get().await?;
    let n = client
      .execute("DELETE FROM turmas WHERE id = $1", &[&id])
      .await?;
    Ok(n > 0)
  }
}
