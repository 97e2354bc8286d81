//! Row decoding from `tokio_postgres::Row` into domain types.
//!
//! Column lists live next to their decoders so that every query selecting a
//! type uses the same names.

use ngo_core::{
  course::Course,
  section::{Section, SectionView},
  student::{Student, StudentView},
  volunteer::Volunteer,
};
use tokio_postgres::Row;

pub const COURSE_COLUMNS: &str = "id, nome, descricao, data_inicio, data_fim, carga_horaria, \
                                  created_at, updated_at";

pub fn course(row: &Row) -> Result<Course, tokio_postgres::Error> {
  Ok(Course {
    id:             row.try_get("id")?,
    name:           row.try_get("nome")?,
    description:    row.try_get("descricao")?,
    start_date:     row.try_get("data_inicio")?,
    end_date:       row.try_get("data_fim")?,
    workload_hours: row.try_get("carga_horaria")?,
    created_at:     row.try_get("created_at")?,
    updated_at:     row.try_get("updated_at")?,
  })
}

pub const VOLUNTEER_COLUMNS: &str = "id, nome, email, telefone, endereco, habilidades, \
                                     disponibilidade, created_at, updated_at";

pub fn volunteer(row: &Row) -> Result<Volunteer, tokio_postgres::Error> {
  Ok(Volunteer {
    id:           row.try_get("id")?,
    name:         row.try_get("nome")?,
    email:        row.try_get("email")?,
    phone:        row.try_get("telefone")?,
    address:      row.try_get("endereco")?,
    skills:       row.try_get("habilidades")?,
    availability: row.try_get("disponibilidade")?,
    created_at:   row.try_get("created_at")?,
    updated_at:   row.try_get("updated_at")?,
  })
}

pub const STUDENT_COLUMNS: &str = "id, nome, email, telefone, endereco, data_nascimento, \
                                   curso_id, created_at, updated_at";

/// Select list for [`student_view`]; expects `alunos a LEFT JOIN cursos c`.
pub const STUDENT_VIEW_COLUMNS: &str = "a.id, a.nome, a.email, a.telefone, a.endereco, \
                                        a.data_nascimento, a.curso_id, a.created_at, \
                                        a.updated_at, c.nome AS curso_nome";

pub fn student(row: &Row) -> Result<Student, tokio_postgres::Error> {
  Ok(Student {
    id:         row.try_get("id")?,
    name:       row.try_get("nome")?,
    email:      row.try_get("email")?,
    phone:      row.try_get("telefone")?,
    address:    row.try_get("endereco")?,
    birth_date: row.try_get("data_nascimento")?,
    course_id:  row.try_get("curso_id")?,
    created_at: row.try_get("created_at")?,
    updated_at: row.try_get("updated_at")?,
  })
}

pub fn student_view(row: &Row) -> Result<StudentView, tokio_postgres::Error> {
  Ok(StudentView {
    student:     student(row)?,
    course_name: row.try_get("curso_nome")?,
  })
}

pub const SECTION_COLUMNS: &str = "id, nome, curso_id, voluntario_id, data_inicio, data_fim, \
                                   created_at, updated_at";

/// Sections with joined names and the roster aggregated in ascending order.
/// Sections with no students aggregate to an empty array, not NULL.
pub const SECTION_VIEW_SELECT: &str = "
  SELECT t.id, t.nome, t.curso_id, t.voluntario_id, t.data_inicio, t.data_fim,
         t.created_at, t.updated_at,
         c.nome AS curso_nome,
         v.nome AS voluntario_nome,
         COALESCE(
           array_agg(ta.aluno_id ORDER BY ta.aluno_id)
             FILTER (WHERE ta.aluno_id IS NOT NULL),
           '{}'::bigint[]
         ) AS alunos_ids
  FROM turmas t
  JOIN cursos c ON c.id = t.curso_id
  LEFT JOIN voluntarios v ON v.id = t.voluntario_id
  LEFT JOIN turma_alunos ta ON ta.turma_id = t.id";

pub const SECTION_VIEW_GROUP: &str = "GROUP BY t.id, c.nome, v.nome";

pub fn section(row: &Row) -> Result<Section, tokio_postgres::Error> {
  Ok(Section {
    id:           row.try_get("id")?,
    name:         row.try_get("nome")?,
    course_id:    row.try_get("curso_id")?,
    volunteer_id: row.try_get("voluntario_id")?,
    start_date:   row.try_get("data_inicio")?,
    end_date:     row.try_get("data_fim")?,
    created_at:   row.try_get("created_at")?,
    updated_at:   row.try_get("updated_at")?,
  })
}

pub fn section_view(row: &Row) -> Result<SectionView, tokio_postgres::Error> {
  Ok(SectionView {
    section:        section(row)?,
    course_name:    row.try_get("curso_nome")?,
    volunteer_name: row.try_get("voluntario_nome")?,
    student_ids:    row.try_get("alunos_ids")?,
  })
}
