//! The `RecordStore` trait.
//!
//! Implemented by storage backends (`ngo-store-sqlite`, `ngo-store-postgres`).
//! Higher layers reach the store only through the services in
//! [`crate::service`], which own validation and error translation. The store
//! methods are plain persistence: they report "no such row" as `None`/`false`
//! and leave the wording of errors to the caller.

use std::future::Future;

use crate::{
  course::{Course, NewCourse},
  error::StoreError,
  section::{NewSection, Section, SectionView},
  student::{NewStudent, Student, StudentView},
  volunteer::{NewVolunteer, Volunteer},
};

/// Abstraction over a relational record store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  /// Create the schema if it does not exist yet. Idempotent.
  fn init_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Courses ───────────────────────────────────────────────────────────

  /// All courses ordered by name.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  fn get_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  fn insert_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Replace every field of course `id`. `None` if it does not exist.
  fn update_course(
    &self,
    id: i64,
    input: NewCourse,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Delete course `id`, cascading to its sections and clearing students'
  /// course reference. Returns `false` if no row was deleted.
  fn delete_course(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Volunteers ────────────────────────────────────────────────────────

  /// All volunteers ordered by name.
  fn list_volunteers(
    &self,
  ) -> impl Future<Output = Result<Vec<Volunteer>, Self::Error>> + Send + '_;

  fn get_volunteer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Volunteer>, Self::Error>> + Send + '_;

  fn insert_volunteer(
    &self,
    input: NewVolunteer,
  ) -> impl Future<Output = Result<Volunteer, Self::Error>> + Send + '_;

  fn update_volunteer(
    &self,
    id: i64,
    input: NewVolunteer,
  ) -> impl Future<Output = Result<Option<Volunteer>, Self::Error>> + Send + '_;

  /// Delete volunteer `id`, clearing the volunteer reference of any section
  /// it staffed.
  fn delete_volunteer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  /// All students ordered by name, joined with their course name.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<StudentView>, Self::Error>> + Send + '_;

  /// Students enrolled in `course_id`, ordered by name.
  fn list_students_by_course(
    &self,
    course_id: i64,
  ) -> impl Future<Output = Result<Vec<StudentView>, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<StudentView>, Self::Error>> + Send + '_;

  fn insert_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn update_student(
    &self,
    id: i64,
    input: NewStudent,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn delete_student(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Sections ──────────────────────────────────────────────────────────

  /// All sections, newest first, with joined names and aggregated rosters.
  fn list_sections(
    &self,
  ) -> impl Future<Output = Result<Vec<SectionView>, Self::Error>> + Send + '_;

  fn get_section(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SectionView>, Self::Error>> + Send + '_;

  /// Insert the section row and one roster row per entry of
  /// `input.student_ids`, atomically. On any failure nothing is persisted.
  fn insert_section(
    &self,
    input: NewSection,
  ) -> impl Future<Output = Result<Section, Self::Error>> + Send + '_;

  /// Update the scalar fields of section `id`, delete its whole roster and
  /// insert `input.student_ids` in its place, atomically.
  ///
  /// Returns `None`, with the transaction rolled back and the roster
  /// untouched, if the section does not exist.
  fn update_section(
    &self,
    id: i64,
    input: NewSection,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + '_;

  /// Delete section `id`; its roster rows cascade.
  fn delete_section(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
