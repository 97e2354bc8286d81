//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use ngo_core::Services;
use ngo_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::router;

async fn services() -> Services<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  Services::new(Arc::new(store))
}

async fn call(
  svc:    &Services<SqliteStore>,
  method: &str,
  uri:    &str,
  body:   Option<&str>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if body.is_some() {
    builder = builder.header(header::CONTENT_TYPE, "application/json");
  }
  let req = builder
    .body(Body::from(body.unwrap_or_default().to_string()))
    .unwrap();

  let resp = router(svc.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn post(svc: &Services<SqliteStore>, uri: &str, body: Value) -> Value {
  let (status, value) = call(svc, "POST", uri, Some(&body.to_string())).await;
  assert_eq!(status, StatusCode::CREATED, "{value}");
  value
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_ok() {
  let svc = services().await;
  let (status, body) = call(&svc, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "OK");
}

// ── Courses ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn course_crud() {
  let svc = services().await;
  let created = post(
    &svc,
    "/api/cursos",
    json!({ "nome": "Intro", "descricao": "", "data_inicio": "2024-03-01", "carga_horaria": 40 }),
  )
  .await;
  let id = created["id"].as_i64().unwrap();
  assert_eq!(created["descricao"], Value::Null);
  assert_eq!(created["data_inicio"], "2024-03-01");

  let (status, fetched) = call(&svc, "GET", &format!("/api/cursos/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, created);

  let (status, updated) = call(
    &svc,
    "PUT",
    &format!("/api/cursos/{id}"),
    Some(r#"{"nome":"Intro II"}"#),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["nome"], "Intro II");
  assert_eq!(updated["carga_horaria"], Value::Null);

  let (status, body) = call(&svc, "DELETE", &format!("/api/cursos/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["message"].is_string());

  let (status, body) = call(&svc, "GET", &format!("/api/cursos/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_name_is_400() {
  let svc = services().await;
  let (status, body) = call(&svc, "POST", "/api/cursos", Some(r#"{"nome":""}"#)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn malformed_json_is_400() {
  let svc = services().await;
  let (status, body) = call(&svc, "POST", "/api/cursos", Some("{not json")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_integer_id_is_400() {
  let svc = services().await;
  let (status, body) = call(&svc, "GET", "/api/cursos/abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_id_is_404_for_every_resource() {
  let svc = services().await;
  for resource in ["cursos", "voluntarios", "alunos", "turmas"] {
    let (status, _) = call(&svc, "GET", &format!("/api/{resource}/999"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{resource}");
    let (status, _) = call(&svc, "DELETE", &format!("/api/{resource}/999"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{resource}");
  }
}

// ── Volunteers and students ─────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_400() {
  let svc = services().await;
  let body = json!({ "nome": "Ana", "email": "ana@example.org", "habilidades": ["art"] });
  let created = post(&svc, "/api/voluntarios", body.clone()).await;
  assert_eq!(created["habilidades"], json!(["art"]));

  let (status, err) = call(&svc, "POST", "/api/voluntarios", Some(&body.to_string())).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(err["error"], "email already registered");

  let (_, list) = call(&svc, "GET", "/api/voluntarios", None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn student_with_unknown_course_is_400() {
  let svc = services().await;
  let (status, err) = call(
    &svc,
    "POST",
    "/api/alunos",
    Some(r#"{"nome":"Bia","email":"bia@example.org","curso_id":77}"#),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(err["error"], "course not found");
}

#[tokio::test]
async fn students_of_a_course() {
  let svc = services().await;
  let course = post(&svc, "/api/cursos", json!({ "nome": "Intro" })).await;
  let course_id = course["id"].as_i64().unwrap();
  post(
    &svc,
    "/api/alunos",
    json!({ "nome": "Bia", "email": "bia@example.org", "curso_id": course_id }),
  )
  .await;
  post(&svc, "/api/alunos", json!({ "nome": "Caio", "email": "caio@example.org" })).await;

  let (status, list) =
    call(&svc, "GET", &format!("/api/cursos/{course_id}/alunos"), None).await;
  assert_eq!(status, StatusCode::OK);
  let list = list.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["nome"], "Bia");
  assert_eq!(list[0]["curso_nome"], "Intro");
}

// ── Sections ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn section_roster_roundtrip() {
  let svc = services().await;
  let course = post(&svc, "/api/cursos", json!({ "nome": "Intro" })).await;
  let mut ids = Vec::new();
  for name in ["Ana", "Bia", "Caio"] {
    let s = post(
      &svc,
      "/api/alunos",
      json!({ "nome": name, "email": format!("{name}@example.org") }),
    )
    .await;
    ids.push(s["id"].as_i64().unwrap());
  }

  let section = post(
    &svc,
    "/api/turmas",
    json!({ "nome": "A", "curso_id": course["id"], "voluntario_id": "", "alunos_ids": [ids[0], ids[1]] }),
  )
  .await;
  let id = section["id"].as_i64().unwrap();
  assert!(section.get("alunos_ids").is_none());

  let (status, _) = call(
    &svc,
    "PUT",
    &format!("/api/turmas/{id}"),
    Some(&json!({ "nome": "A", "curso_id": course["id"], "alunos_ids": [ids[1], ids[2]] }).to_string()),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, fetched) = call(&svc, "GET", &format!("/api/turmas/{id}"), None).await;
  assert_eq!(fetched["alunos_ids"], json!([ids[1], ids[2]]));
  assert_eq!(fetched["curso_nome"], "Intro");
  assert_eq!(fetched["voluntario_nome"], Value::Null);

  let (_, list) = call(&svc, "GET", "/api/turmas", None).await;
  assert_eq!(list[0]["alunos_ids"], json!([ids[1], ids[2]]));
}

#[tokio::test]
async fn section_without_course_is_400() {
  let svc = services().await;
  let (status, body) =
    call(&svc, "POST", "/api/turmas", Some(r#"{"nome":"A","curso_id":0}"#)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("course"));
}

#[tokio::test]
async fn failed_roster_leaves_no_section() {
  let svc = services().await;
  let course = post(&svc, "/api/cursos", json!({ "nome": "Intro" })).await;

  let (status, _) = call(
    &svc,
    "POST",
    "/api/turmas",
    Some(&json!({ "nome": "A", "curso_id": course["id"], "alunos_ids": [12345] }).to_string()),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, list) = call(&svc, "GET", "/api/turmas", None).await;
  assert!(list.as_array().unwrap().is_empty());
}
