//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ngo_core::{
  course::Course,
  section::SectionView,
  student::StudentView,
  volunteer::Volunteer,
};
use serde_json::Value;
use tracing::warn;

use crate::{
  client::{ApiClient, Resource},
  form::{Form, FormAction},
};

// ─── Mode ─────────────────────────────────────────────────────────────────────

pub enum Mode {
  /// Browsing the table of the current tab.
  List,
  /// Editing a new or existing record.
  Edit(Form),
  /// Waiting for y/n before deleting `id`.
  Confirm { resource: Resource, id: i64, label: String },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub mode: Mode,

  /// Tab whose table is shown.
  pub tab: Resource,

  pub courses:    Vec<Course>,
  pub volunteers: Vec<Volunteer>,
  pub students:   Vec<StudentView>,
  pub sections:   Vec<SectionView>,

  /// Cursor row per tab, indexed by [`Resource::index`].
  pub cursors: [usize; 4],

  /// Last list failure. Previously loaded rows stay visible underneath.
  pub banner: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      mode: Mode::List,
      tab: Resource::Courses,
      courses: Vec::new(),
      volunteers: Vec::new(),
      students: Vec::new(),
      sections: Vec::new(),
      cursors: [0; 4],
      banner: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  async fn fetch(&mut self, resource: Resource) -> anyhow::Result<()> {
    let client = self.client.clone();
    match resource {
      Resource::Courses => self.courses = client.list(resource).await?,
      Resource::Volunteers => self.volunteers = client.list(resource).await?,
      Resource::Students => self.students = client.list(resource).await?,
      Resource::Sections => self.sections = client.list(resource).await?,
    }
    let len = self.len(resource);
    let cursor = &mut self.cursors[resource.index()];
    *cursor = (*cursor).min(len.saturating_sub(1));
    Ok(())
  }

  /// Reload `resource`, reporting failure in the banner.
  pub async fn load(&mut self, resource: Resource) {
    match self.fetch(resource).await {
      Ok(()) => self.banner = None,
      Err(e) => {
        warn!(%resource, error = %e, "failed to load");
        self.banner = Some(format!("Could not load {}: {e}", resource.title().to_lowercase()));
      }
    }
  }

  /// Reload every collection a form for `resource` draws choices from.
  async fn load_references(&mut self, resource: Resource) -> anyhow::Result<()> {
    let needed: &[Resource] = match resource {
      Resource::Courses | Resource::Volunteers => &[],
      Resource::Students => &[Resource::Courses],
      Resource::Sections => &[Resource::Courses, Resource::Volunteers, Resource::Students],
    };
    for r in needed {
      self.fetch(*r).await?;
    }
    Ok(())
  }

  // ── Rows ──────────────────────────────────────────────────────────────────

  pub fn len(&self, resource: Resource) -> usize {
    match resource {
      Resource::Courses => self.courses.len(),
      Resource::Volunteers => self.volunteers.len(),
      Resource::Students => self.students.len(),
      Resource::Sections => self.sections.len(),
    }
  }

  pub fn cursor(&self) -> usize { self.cursors[self.tab.index()] }

  /// Id and display name of the row under the cursor.
  fn selected(&self) -> Option<(i64, String)> {
    let i = self.cursor();
    match self.tab {
      Resource::Courses => self.courses.get(i).map(|c| (c.id, c.name.clone())),
      Resource::Volunteers => self.volunteers.get(i).map(|v| (v.id, v.name.clone())),
      Resource::Students => self
        .students
        .get(i)
        .map(|s| (s.student.id, s.student.name.clone())),
      Resource::Sections => self
        .sections
        .get(i)
        .map(|s| (s.section.id, s.section.name.clone())),
    }
  }

  /// A blank form, or one filled from the row under the cursor.
  fn build_form(&self, editing: bool) -> Form {
    let row = editing.then(|| self.cursor());
    match self.tab {
      Resource::Courses => Form::course(row.and_then(|i| self.courses.get(i))),
      Resource::Volunteers => Form::volunteer(row.and_then(|i| self.volunteers.get(i))),
      Resource::Students => {
        Form::student(row.and_then(|i| self.students.get(i)), &self.courses)
      }
      Resource::Sections => Form::section(
        row.and_then(|i| self.sections.get(i)),
        &self.courses,
        &self.volunteers,
        &self.students,
      ),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode {
      Mode::List => return self.handle_list_key(key).await,
      Mode::Edit(_) => self.handle_form_key(key).await,
      Mode::Confirm { .. } => self.handle_confirm_key(key).await,
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let len = self.len(self.tab);
    let tab = self.tab.index();
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Tabs
      KeyCode::Tab => self.switch_tab((tab + 1) % 4).await,
      KeyCode::BackTab => self.switch_tab((tab + 3) % 4).await,
      KeyCode::Char(c @ '1'..='4') => {
        self.switch_tab(c as usize - '1' as usize).await;
      }
      KeyCode::Char('r') => self.load(self.tab).await,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursors[tab] + 1 < len {
          self.cursors[tab] += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursors[tab] = self.cursors[tab].saturating_sub(1);
      }

      // Records
      KeyCode::Char('n') => self.open_form(false).await,
      KeyCode::Char('e') | KeyCode::Enter => {
        if len > 0 {
          self.open_form(true).await;
        }
      }
      KeyCode::Char('d') => {
        if let Some((id, label)) = self.selected() {
          self.mode = Mode::Confirm { resource: self.tab, id, label };
        }
      }

      _ => {}
    }
    Ok(true)
  }

  async fn switch_tab(&mut self, index: usize) {
    self.tab = Resource::ALL[index];
    self.status_msg.clear();
    self.load(self.tab).await;
  }

  async fn open_form(&mut self, editing: bool) {
    if let Err(e) = self.load_references(self.tab).await {
      self.banner = Some(format!("Could not load form data: {e}"));
      return;
    }
    self.banner = None;
    self.mode = Mode::Edit(self.build_form(editing));
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let Mode::Edit(form) = &mut self.mode else {
      return;
    };
    match form.handle_key(key) {
      FormAction::None => {}
      FormAction::Cancel => self.mode = Mode::List,
      FormAction::Save => self.save().await,
    }
  }

  async fn save(&mut self) {
    let Mode::Edit(form) = &mut self.mode else {
      return;
    };
    let resource = form.resource;
    let result = self
      .client
      .save::<_, Value>(resource, form.id, &form.payload())
      .await;
    match result {
      Ok(_) => {
        self.status_msg = format!("Saved {}.", resource.singular());
        self.mode = Mode::List;
        self.load(resource).await;
      }
      Err(e) => form.error = Some(e.to_string()),
    }
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    let Mode::Confirm { resource, id, .. } = self.mode else {
      return;
    };
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => {
        self.mode = Mode::List;
        match self.client.delete(resource, id).await {
          Ok(()) => {
            self.status_msg = format!("Deleted {} #{id}.", resource.singular());
            self.load(resource).await;
          }
          Err(e) => self.banner = Some(format!("Could not delete: {e}")),
        }
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::List,
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  /// An app pointed at a port nothing listens on.
  fn offline_app() -> App {
    let mut app = App::new(ApiClient::new("http://127.0.0.1:9").unwrap());
    let now = Utc::now();
    app.courses = vec![Course {
      id:             1,
      name:           "Intro".into(),
      description:    None,
      start_date:     None,
      end_date:       None,
      workload_hours: Some(40),
      created_at:     now,
      updated_at:     now,
    }];
    app
  }

  #[tokio::test]
  async fn failed_load_keeps_rows_and_sets_banner() {
    let mut app = offline_app();
    app.load(Resource::Courses).await;
    assert!(app.banner.as_deref().unwrap().starts_with("Could not load courses"));
    assert_eq!(app.courses.len(), 1);
  }

  #[tokio::test]
  async fn delete_asks_first_and_n_backs_out() {
    let mut app = offline_app();
    assert!(app.handle_key(key(KeyCode::Char('d'))).await.unwrap());
    assert!(matches!(app.mode, Mode::Confirm { id: 1, ref label, .. } if label == "Intro"));

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert!(matches!(app.mode, Mode::List));
    assert_eq!(app.courses.len(), 1);
  }

  #[tokio::test]
  async fn edit_prefills_and_failed_save_stays_in_form() {
    let mut app = offline_app();
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    let Mode::Edit(form) = &app.mode else { panic!("expected a form") };
    assert_eq!(form.id, Some(1));
    assert_eq!(form.fields[0].display(), "Intro");

    app
      .handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
      .await
      .unwrap();
    let Mode::Edit(form) = &app.mode else { panic!("form was closed") };
    assert!(form.error.is_some());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert!(matches!(app.mode, Mode::List));
  }

  #[tokio::test]
  async fn q_and_ctrl_c_quit() {
    let mut app = offline_app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
    app.mode = Mode::Edit(Form::course(None));
    assert!(
      !app
        .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .await
        .unwrap()
    );
  }
}
