//! Integration tests for `SqliteStore` and the core services against an
//! in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;
use ngo_core::{
  Error, Services,
  course::NewCourse,
  section::NewSection,
  store::RecordStore,
  student::NewStudent,
  volunteer::NewVolunteer,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn services() -> (Arc<SqliteStore>, Services<SqliteStore>) {
  let store = Arc::new(store().await);
  (store.clone(), Services::new(store))
}

fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

async fn seed_students(svc: &Services<SqliteStore>, n: usize) -> Vec<i64> {
  let mut ids = Vec::with_capacity(n);
  for i in 0..n {
    let s = svc
      .students
      .create(NewStudent::new(format!("Student {i}"), format!("s{i}@example.org")))
      .await
      .unwrap();
    ids.push(s.id);
  }
  ids
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_course() {
  let (_, svc) = services().await;

  let input = NewCourse {
    description: Some("Basics".into()),
    start_date: Some(date("2024-03-01")),
    end_date: Some(date("2024-06-30")),
    workload_hours: Some(40),
    ..NewCourse::new("Intro")
  };
  let created = svc.courses.create(input).await.unwrap();
  assert_eq!(created.name, "Intro");
  assert_eq!(created.workload_hours, Some(40));

  let fetched = svc.courses.get(created.id).await.unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.start_date, Some(date("2024-03-01")));
}

#[tokio::test]
async fn get_missing_course_is_not_found() {
  let (_, svc) = services().await;
  let err = svc.courses.get(99).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 99, .. }));
}

#[tokio::test]
async fn blank_course_name_persists_nothing() {
  let (_, svc) = services().await;
  let err = svc.courses.create(NewCourse::new("  ")).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert!(svc.courses.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn courses_list_by_name() {
  let (_, svc) = services().await;
  svc.courses.create(NewCourse::new("Zeta")).await.unwrap();
  svc.courses.create(NewCourse::new("Alpha")).await.unwrap();

  let names: Vec<_> = svc
    .courses
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["Alpha", "Zeta"]);
}

#[tokio::test]
async fn update_course_replaces_fields() {
  let (_, svc) = services().await;
  let c = svc
    .courses
    .create(NewCourse {
      description: Some("old".into()),
      ..NewCourse::new("Intro")
    })
    .await
    .unwrap();

  let updated = svc
    .courses
    .update(c.id, NewCourse::new("Intro II"))
    .await
    .unwrap();
  assert_eq!(updated.name, "Intro II");
  assert_eq!(updated.description, None);
  assert_eq!(updated.created_at, c.created_at);
  assert!(updated.updated_at >= c.updated_at);
}

#[tokio::test]
async fn update_and_delete_missing_course() {
  let (_, svc) = services().await;
  let err = svc.courses.update(7, NewCourse::new("X")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));
  let err = svc.courses.delete(7).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));
}

// ─── Volunteers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn volunteer_skills_roundtrip() {
  let (_, svc) = services().await;
  let v = svc
    .volunteers
    .create(NewVolunteer {
      skills: vec!["math".into(), "music".into()],
      availability: Some("weekends".into()),
      ..NewVolunteer::new("Ana", "ana@example.org")
    })
    .await
    .unwrap();

  let fetched = svc.volunteers.get(v.id).await.unwrap();
  assert_eq!(fetched.skills, ["math", "music"]);
  assert_eq!(fetched.availability.as_deref(), Some("weekends"));
}

#[tokio::test]
async fn duplicate_volunteer_email_conflicts() {
  let (_, svc) = services().await;
  svc
    .volunteers
    .create(NewVolunteer::new("Ana", "ana@example.org"))
    .await
    .unwrap();

  let err = svc
    .volunteers
    .create(NewVolunteer::new("Other Ana", "ana@example.org"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert_eq!(svc.volunteers.list().await.unwrap().len(), 1);
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn student_joins_course_name() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let s = svc
    .students
    .create(NewStudent {
      course_id: Some(c.id),
      birth_date: Some(date("2010-05-04")),
      ..NewStudent::new("Bia", "bia@example.org")
    })
    .await
    .unwrap();

  let view = svc.students.get(s.id).await.unwrap();
  assert_eq!(view.student, s);
  assert_eq!(view.course_name.as_deref(), Some("Intro"));
}

#[tokio::test]
async fn student_with_unknown_course_is_rejected() {
  let (_, svc) = services().await;
  let err = svc
    .students
    .create(NewStudent {
      course_id: Some(42),
      ..NewStudent::new("Bia", "bia@example.org")
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(ref m) if m == "course not found"));
  assert!(svc.students.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_key_violation_is_validation_at_store_level() {
  use ngo_core::{ErrorKind, StoreError as _};

  let s = store().await;
  let err = s
    .insert_student(NewStudent {
      course_id: Some(42),
      ..NewStudent::new("Bia", "bia@example.org")
    })
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn duplicate_student_email_conflicts() {
  let (_, svc) = services().await;
  svc
    .students
    .create(NewStudent::new("Bia", "bia@example.org"))
    .await
    .unwrap();
  let err = svc
    .students
    .create(NewStudent::new("Bia 2", "bia@example.org"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert_eq!(svc.students.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn students_by_course() {
  let (_, svc) = services().await;
  let a = svc.courses.create(NewCourse::new("A")).await.unwrap();
  let b = svc.courses.create(NewCourse::new("B")).await.unwrap();
  for (name, course) in [("Caio", a.id), ("Duda", b.id), ("Eva", a.id)] {
    svc
      .students
      .create(NewStudent {
        course_id: Some(course),
        ..NewStudent::new(name, format!("{name}@example.org"))
      })
      .await
      .unwrap();
  }

  let in_a: Vec<_> = svc
    .students
    .list_by_course(a.id)
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.student.name)
    .collect();
  assert_eq!(in_a, ["Caio", "Eva"]);
  assert!(svc.students.list_by_course(999).await.unwrap().is_empty());
}

// ─── Cascades ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_course_cascades_sections_and_clears_students() {
  let (store, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let s = svc
    .students
    .create(NewStudent {
      course_id: Some(c.id),
      ..NewStudent::new("Bia", "bia@example.org")
    })
    .await
    .unwrap();
  svc
    .sections
    .create(NewSection::new("A", c.id).with_students([s.id]))
    .await
    .unwrap();

  svc.courses.delete(c.id).await.unwrap();

  assert_eq!(store.count_sections().await.unwrap(), 0);
  let view = svc.students.get(s.id).await.unwrap();
  assert_eq!(view.student.course_id, None);
  assert_eq!(view.course_name, None);
}

#[tokio::test]
async fn deleting_volunteer_clears_section_reference() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let v = svc
    .volunteers
    .create(NewVolunteer::new("Ana", "ana@example.org"))
    .await
    .unwrap();
  let t = svc
    .sections
    .create(NewSection {
      volunteer_id: Some(v.id),
      ..NewSection::new("A", c.id)
    })
    .await
    .unwrap();
  assert_eq!(
    svc.sections.get(t.id).await.unwrap().volunteer_name.as_deref(),
    Some("Ana")
  );

  svc.volunteers.delete(v.id).await.unwrap();

  let view = svc.sections.get(t.id).await.unwrap();
  assert_eq!(view.section.volunteer_id, None);
  assert_eq!(view.volunteer_name, None);
}

#[tokio::test]
async fn deleting_student_leaves_roster() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 2).await;
  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students(ids.clone()))
    .await
    .unwrap();

  svc.students.delete(ids[0]).await.unwrap();

  let view = svc.sections.get(t.id).await.unwrap();
  assert_eq!(view.student_ids, [ids[1]]);
}

// ─── Sections and rosters ────────────────────────────────────────────────────

#[tokio::test]
async fn section_create_returns_row_and_get_includes_roster() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 3).await;

  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students([ids[2], ids[0]]))
    .await
    .unwrap();
  assert_eq!(t.name, "A");
  assert_eq!(t.course_id, c.id);

  let view = svc.sections.get(t.id).await.unwrap();
  assert_eq!(view.section, t);
  assert_eq!(view.course_name, "Intro");
  assert_eq!(view.student_ids, [ids[0], ids[2]]);
}

#[tokio::test]
async fn empty_roster_is_an_empty_list() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let t = svc.sections.create(NewSection::new("A", c.id)).await.unwrap();

  let view = svc.sections.get(t.id).await.unwrap();
  assert!(view.student_ids.is_empty());
}

#[tokio::test]
async fn update_with_empty_roster_clears_it() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 3).await;
  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students(ids))
    .await
    .unwrap();

  svc
    .sections
    .update(t.id, NewSection::new("A", c.id))
    .await
    .unwrap();

  assert!(svc.sections.get(t.id).await.unwrap().student_ids.is_empty());
}

#[tokio::test]
async fn roster_update_is_full_replacement() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 3).await;
  let (s1, s2, s3) = (ids[0], ids[1], ids[2]);

  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students([s1, s2]))
    .await
    .unwrap();
  let updated = svc
    .sections
    .update(t.id, NewSection::new("A", c.id).with_students([s2, s3]))
    .await
    .unwrap();
  assert_eq!(updated.id, t.id);

  assert_eq!(svc.sections.get(t.id).await.unwrap().student_ids, [s2, s3]);
}

#[tokio::test]
async fn unknown_student_rolls_back_create() {
  let (store, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 1).await;

  let err = svc
    .sections
    .create(NewSection::new("A", c.id).with_students([ids[0], 9999]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert_eq!(store.count_sections().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_student_rolls_back_update() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 2).await;
  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students([ids[0]]))
    .await
    .unwrap();

  let err = svc
    .sections
    .update(t.id, NewSection::new("Renamed", c.id).with_students([ids[1], 9999]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let view = svc.sections.get(t.id).await.unwrap();
  assert_eq!(view.section.name, "A");
  assert_eq!(view.student_ids, [ids[0]]);
}

#[tokio::test]
async fn duplicate_roster_ids_fail_whole_operation() {
  let (store, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 1).await;

  let err = svc
    .sections
    .create(NewSection::new("A", c.id).with_students([ids[0], ids[0]]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert_eq!(store.count_sections().await.unwrap(), 0);
}

#[tokio::test]
async fn updating_missing_section_is_not_found() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let err = svc
    .sections
    .update(123, NewSection::new("A", c.id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { id: 123, .. }));
}

#[tokio::test]
async fn section_with_unknown_course_is_validation() {
  let (_, svc) = services().await;
  let err = svc
    .sections
    .create(NewSection::new("A", 55))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn sections_list_newest_first() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let first = svc.sections.create(NewSection::new("First", c.id)).await.unwrap();
  let second = svc.sections.create(NewSection::new("Second", c.id)).await.unwrap();

  let ids: Vec<_> = svc
    .sections
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|v| v.section.id)
    .collect();
  assert_eq!(ids, [second.id, first.id]);
}

#[tokio::test]
async fn deleting_section_removes_it() {
  let (_, svc) = services().await;
  let c = svc.courses.create(NewCourse::new("Intro")).await.unwrap();
  let ids = seed_students(&svc, 1).await;
  let t = svc
    .sections
    .create(NewSection::new("A", c.id).with_students(ids.clone()))
    .await
    .unwrap();

  svc.sections.delete(t.id).await.unwrap();
  assert!(matches!(
    svc.sections.get(t.id).await.unwrap_err(),
    Error::NotFound { .. }
  ));
  // The student itself survives.
  svc.students.get(ids[0]).await.unwrap();
}
