//! Async HTTP client wrapping the NGO JSON API.

use std::{fmt, time::Duration};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

// ─── Resources ────────────────────────────────────────────────────────────────

/// The four record collections, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Courses,
  Volunteers,
  Students,
  Sections,
}

impl Resource {
  pub const ALL: [Resource; 4] = [
    Resource::Courses,
    Resource::Volunteers,
    Resource::Students,
    Resource::Sections,
  ];

  /// Collection path under `/api`.
  pub fn path(self) -> &'static str {
    match self {
      Self::Courses => "/cursos",
      Self::Volunteers => "/voluntarios",
      Self::Students => "/alunos",
      Self::Sections => "/turmas",
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Self::Courses => "Courses",
      Self::Volunteers => "Volunteers",
      Self::Students => "Students",
      Self::Sections => "Sections",
    }
  }

  pub fn singular(self) -> &'static str {
    match self {
      Self::Courses => "course",
      Self::Volunteers => "volunteer",
      Self::Students => "student",
      Self::Sections => "section",
    }
  }

  pub fn index(self) -> usize {
    match self {
      Self::Courses => 0,
      Self::Volunteers => 1,
      Self::Students => 2,
      Self::Sections => 3,
    }
  }
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.title()) }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Shape of every error body the server returns.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the NGO REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    debug!(%method, path, "request");
    self.client.request(method, self.url(path))
  }

  /// `GET /api/<resource>`
  pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
    let resp = self
      .request(Method::GET, resource.path())
      .send()
      .await
      .with_context(|| format!("GET {} failed", resource.path()))?;
    read_json(resp).await
  }

  /// `POST /api/<resource>` when `id` is `None`, otherwise
  /// `PUT /api/<resource>/<id>`. Returns the stored record.
  pub async fn save<B, T>(&self, resource: Resource, id: Option<i64>, body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let (method, path) = match id {
      None => (Method::POST, resource.path().to_string()),
      Some(id) => (Method::PUT, format!("{}/{id}", resource.path())),
    };
    let resp = self
      .request(method.clone(), &path)
      .json(body)
      .send()
      .await
      .with_context(|| format!("{method} {path} failed"))?;
    read_json(resp).await
  }

  /// `DELETE /api/<resource>/<id>`
  pub async fn delete(&self, resource: Resource, id: i64) -> Result<()> {
    let path = format!("{}/{id}", resource.path());
    let resp = self
      .request(Method::DELETE, &path)
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;
    check(resp).await.map(drop)
  }
}

/// Turn a non-success response into an error carrying the server's
/// `{"error": ...}` message when there is one.
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let text = resp.text().await.unwrap_or_default();
  Err(error_message(status.as_u16(), &text))
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
  check(resp)
    .await?
    .json()
    .await
    .context("unexpected response body")
}

fn error_message(status: u16, body: &str) -> anyhow::Error {
  match serde_json::from_str::<ErrorBody>(body) {
    Ok(ErrorBody { error }) => anyhow!(error),
    Err(_) => anyhow!("server responded with status {status}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn server_message_is_surfaced() {
    let err = error_message(400, r#"{"error":"email already registered"}"#);
    assert_eq!(err.to_string(), "email already registered");
  }

  #[test]
  fn opaque_body_reports_status() {
    let err = error_message(502, "<html>bad gateway</html>");
    assert_eq!(err.to_string(), "server responded with status 502");
  }

  #[test]
  fn urls_join_cleanly() {
    let client = ApiClient::new("http://localhost:3001/").unwrap();
    assert_eq!(
      client.url(Resource::Sections.path()),
      "http://localhost:3001/api/turmas"
    );
  }
}
