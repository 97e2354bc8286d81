//! Entity services: validation, existence checks and error translation on top
//! of a [`RecordStore`].
//!
//! Each service holds a shared handle to the store; build them once at
//! startup with [`Services::new`] and clone freely.

use std::sync::Arc;

use crate::{
  Error, Result,
  course::{Course, NewCourse},
  error::Entity,
  roster::SectionService,
  store::RecordStore,
  student::{NewStudent, Student, StudentView},
  volunteer::{NewVolunteer, Volunteer},
};

const EMAIL_TAKEN: &str = "email already registered";

// ─── Bundle ──────────────────────────────────────────────────────────────────

/// All four services sharing one store.
pub struct Services<S> {
  pub courses:    CourseService<S>,
  pub volunteers: VolunteerService<S>,
  pub students:   StudentService<S>,
  pub sections:   SectionService<S>,
}

impl<S> Services<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      courses:    CourseService::new(store.clone()),
      volunteers: VolunteerService::new(store.clone()),
      students:   StudentService::new(store.clone()),
      sections:   SectionService::new(store),
    }
  }
}

impl<S> Clone for Services<S> {
  fn clone(&self) -> Self {
    Self {
      courses:    self.courses.clone(),
      volunteers: self.volunteers.clone(),
      students:   self.students.clone(),
      sections:   self.sections.clone(),
    }
  }
}

// ─── Courses ─────────────────────────────────────────────────────────────────

pub struct CourseService<S> {
  store: Arc<S>,
}

impl<S> CourseService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S> Clone for CourseService<S> {
  fn clone(&self) -> Self { Self::new(self.store.clone()) }
}

impl<S: RecordStore> CourseService<S> {
  pub async fn list(&self) -> Result<Vec<Course>> {
    self.store.list_courses().await.map_err(Error::store)
  }

  pub async fn get(&self, id: i64) -> Result<Course> {
    self
      .store
      .get_course(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::not_found(Entity::Course, id))
  }

  pub async fn create(&self, input: NewCourse) -> Result<Course> {
    input.validate()?;
    self
      .store
      .insert_course(input)
      .await
      .map_err(|e| Error::from_store(e, "course conflicts with an existing one", "invalid course"))
  }

  pub async fn update(&self, id: i64, input: NewCourse) -> Result<Course> {
    input.validate()?;
    self
      .store
      .update_course(id, input)
      .await
      .map_err(|e| Error::from_store(e, "course conflicts with an existing one", "invalid course"))?
      .ok_or(Error::not_found(Entity::Course, id))
  }

  /// Deleting a course also deletes its sections and un-enrols its students.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let deleted = self.store.delete_course(id).await.map_err(Error::store)?;
    if deleted { Ok(()) } else { Err(Error::not_found(Entity::Course, id)) }
  }
}

// ─── Volunteers ──────────────────────────────────────────────────────────────

pub struct VolunteerService<S> {
  store: Arc<S>,
}

impl<S> VolunteerService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S> Clone for VolunteerService<S> {
  fn clone(&self) -> Self { Self::new(self.store.clone()) }
}

impl<S: RecordStore> VolunteerService<S> {
  pub async fn list(&self) -> Result<Vec<Volunteer>> {
    self.store.list_volunteers().await.map_err(Error::store)
  }

  pub async fn get(&self, id: i64) -> Result<Volunteer> {
    self
      .store
      .get_volunteer(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::not_found(Entity::Volunteer, id))
  }

  pub async fn create(&self, input: NewVolunteer) -> Result<Volunteer> {
    input.validate()?;
    self
      .store
      .insert_volunteer(input)
      .await
      .map_err(|e| Error::from_store(e, EMAIL_TAKEN, "invalid volunteer"))
  }

  pub async fn update(&self, id: i64, input: NewVolunteer) -> Result<Volunteer> {
    input.validate()?;
    self
      .store
      .update_volunteer(id, input)
      .await
      .map_err(|e| Error::from_store(e, EMAIL_TAKEN, "invalid volunteer"))?
      .ok_or(Error::not_found(Entity::Volunteer, id))
  }

  /// Sections staffed by the volunteer survive with no volunteer.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let deleted = self.store.delete_volunteer(id).await.map_err(Error::store)?;
    if deleted { Ok(()) } else { Err(Error::not_found(Entity::Volunteer, id)) }
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

pub struct StudentService<S> {
  store: Arc<S>,
}

impl<S> StudentService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S> Clone for StudentService<S> {
  fn clone(&self) -> Self { Self::new(self.store.clone()) }
}

impl<S: RecordStore> StudentService<S> {
  pub async fn list(&self) -> Result<Vec<StudentView>> {
    self.store.list_students().await.map_err(Error::store)
  }

  /// Students enrolled in `course_id`. An unknown course yields an empty list.
  pub async fn list_by_course(&self, course_id: i64) -> Result<Vec<StudentView>> {
    self
      .store
      .list_students_by_course(course_id)
      .await
      .map_err(Error::store)
  }

  pub async fn get(&self, id: i64) -> Result<StudentView> {
    self
      .store
      .get_student(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::not_found(Entity::Student, id))
  }

  pub async fn create(&self, input: NewStudent) -> Result<Student> {
    input.validate()?;
    self.check_course(input.course_id).await?;
    self
      .store
      .insert_student(input)
      .await
      .map_err(|e| Error::from_store(e, EMAIL_TAKEN, "course not found"))
  }

  pub async fn update(&self, id: i64, input: NewStudent) -> Result<Student> {
    input.validate()?;
    self.check_course(input.course_id).await?;
    self
      .store
      .update_student(id, input)
      .await
      .map_err(|e| Error::from_store(e, EMAIL_TAKEN, "course not found"))?
      .ok_or(Error::not_found(Entity::Student, id))
  }

  pub async fn delete(&self, id: i64) -> Result<()> {
    let deleted = self.store.delete_student(id).await.map_err(Error::store)?;
    if deleted { Ok(()) } else { Err(Error::not_found(Entity::Student, id)) }
  }

  /// A supplied course reference must name an existing course. The foreign
  /// key remains the backstop if the course disappears in between.
  async fn check_course(&self, course_id: Option<i64>) -> Result<()> {
    let Some(course_id) = course_id else {
      return Ok(());
    };
    let exists = self
      .store
      .get_course(course_id)
      .await
      .map_err(Error::store)?
      .is_some();
    if exists {
      Ok(())
    } else {
      Err(Error::Validation("course not found".into()))
    }
  }
}
