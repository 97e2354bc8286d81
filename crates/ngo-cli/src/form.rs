//! Record forms: text fields, reference pickers and the section roster.
//!
//! Everything here is pure state; the app decides when to load data and
//! submit, and `ui::form` renders it. Field values are sent to the server
//! as typed, and the server's validation message is shown back in the form.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ngo_core::{
  course::Course,
  section::SectionView,
  student::StudentView,
  volunteer::Volunteer,
};
use serde_json::{Map, Value};

use crate::client::Resource;

/// Case-insensitive substring match of a trimmed query against a student's
/// name or email. An empty query matches everyone.
pub fn matches(query: &str, name: &str, email: &str) -> bool {
  let query = query.trim().to_lowercase();
  query.is_empty()
    || name.to_lowercase().contains(&query)
    || email.to_lowercase().contains(&query)
}

// ─── Fields ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub id:    i64,
  pub label: String,
}

#[derive(Debug, Clone)]
pub enum Input {
  Text(String),
  /// Comma-separated values, submitted as a JSON array of strings.
  List(String),
  /// One of `options`, cycled with Left/Right. Optional pickers can also be
  /// cleared.
  Pick {
    options:  Vec<Choice>,
    selected: Option<usize>,
    optional: bool,
  },
}

#[derive(Debug, Clone)]
pub struct Field {
  /// JSON key on the wire.
  pub key:   &'static str,
  pub label: &'static str,
  pub input: Input,
}

impl Field {
  fn text(key: &'static str, label: &'static str, value: Option<String>) -> Self {
    Self { key, label, input: Input::Text(value.unwrap_or_default()) }
  }

  fn pick(
    key: &'static str,
    label: &'static str,
    options: Vec<Choice>,
    current: Option<i64>,
    optional: bool,
  ) -> Self {
    let selected = current.and_then(|id| options.iter().position(|c| c.id == id));
    Self { key, label, input: Input::Pick { options, selected, optional } }
  }

  /// The value as shown in the form.
  pub fn display(&self) -> String {
    match &self.input {
      Input::Text(s) | Input::List(s) => s.clone(),
      Input::Pick { options, selected, optional } => match selected {
        Some(i) => options[*i].label.clone(),
        None if options.is_empty() => "(nothing to choose)".into(),
        None if *optional => "(none)".into(),
        None => "(choose)".into(),
      },
    }
  }

  fn to_json(&self) -> Value {
    match &self.input {
      Input::Text(s) if s.trim().is_empty() => Value::Null,
      Input::Text(s) => Value::String(s.trim().to_string()),
      Input::List(s) => s
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| Value::String(v.to_string()))
        .collect(),
      Input::Pick { options, selected, .. } => selected
        .map(|i| Value::from(options[i].id))
        .unwrap_or(Value::Null),
    }
  }

  fn type_char(&mut self, c: char) {
    if let Input::Text(s) | Input::List(s) = &mut self.input {
      s.push(c);
    }
  }

  fn backspace(&mut self) {
    match &mut self.input {
      Input::Text(s) | Input::List(s) => {
        s.pop();
      }
      Input::Pick { selected, optional: true, .. } => *selected = None,
      Input::Pick { .. } => {}
    }
  }

  fn cycle(&mut self, forward: bool) {
    let Input::Pick { options, selected, optional } = &mut self.input else {
      return;
    };
    if options.is_empty() {
      return;
    }
    // Slot 0 is "nothing selected"; required pickers only pass through it
    // while still unset.
    let slots = options.len() + 1;
    let mut pos = selected.map_or(0, |i| i + 1);
    loop {
      pos = if forward { (pos + 1) % slots } else { (pos + slots - 1) % slots };
      if pos != 0 || *optional {
        break;
      }
    }
    *selected = pos.checked_sub(1);
  }
}

// ─── Roster ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub id:    i64,
  pub name:  String,
  pub email: String,
}

/// The section roster picker: every known student, a filter over them and
/// the set of ids that will be submitted.
#[derive(Debug, Clone)]
pub struct Roster {
  pub students: Vec<Entry>,
  pub selected: BTreeSet<i64>,
  pub filter:   String,
  /// Position within [`Roster::visible`].
  pub cursor:   usize,
}

impl Roster {
  pub fn new(students: &[StudentView], selected: impl IntoIterator<Item = i64>) -> Self {
    Self {
      students: students
        .iter()
        .map(|s| Entry {
          id:    s.student.id,
          name:  s.student.name.clone(),
          email: s.student.email.clone(),
        })
        .collect(),
      selected: selected.into_iter().collect(),
      filter:   String::new(),
      cursor:   0,
    }
  }

  /// Students matching the current filter. Selection is unaffected by the
  /// filter; hidden students stay selected.
  pub fn visible(&self) -> Vec<&Entry> {
    self
      .students
      .iter()
      .filter(|e| matches(&self.filter, &e.name, &e.email))
      .collect()
  }

  pub fn is_selected(&self, id: i64) -> bool { self.selected.contains(&id) }

  /// Add `id` if absent, remove it if present.
  pub fn toggle(&mut self, id: i64) {
    if !self.selected.remove(&id) {
      self.selected.insert(id);
    }
  }

  pub fn toggle_cursor(&mut self) {
    let id = self.visible().get(self.cursor).map(|e| e.id);
    if let Some(id) = id {
      self.toggle(id);
    }
  }

  fn move_cursor(&mut self, down: bool) {
    let len = self.visible().len();
    if down && self.cursor + 1 < len {
      self.cursor += 1;
    } else if !down && self.cursor > 0 {
      self.cursor -= 1;
    }
  }

  fn set_filter(&mut self, f: impl FnOnce(&mut String)) {
    f(&mut self.filter);
    self.cursor = 0;
  }

  /// Selected ids, ascending.
  pub fn ids(&self) -> Vec<i64> { self.selected.iter().copied().collect() }
}

// ─── Form ─────────────────────────────────────────────────────────────────────

/// What the app should do after a key was handled by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
  None,
  Save,
  Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
  pub resource: Resource,
  /// `None` for a record that does not exist yet.
  pub id:       Option<i64>,
  pub fields:   Vec<Field>,
  pub roster:   Option<Roster>,
  /// Index into `fields`; `fields.len()` focuses the roster.
  pub focus:    usize,
  /// Last save failure, shown inline.
  pub error:    Option<String>,
}

fn date_text(d: Option<chrono::NaiveDate>) -> Option<String> { d.map(|d| d.to_string()) }

fn course_choices(courses: &[Course]) -> Vec<Choice> {
  courses
    .iter()
    .map(|c| Choice { id: c.id, label: c.name.clone() })
    .collect()
}

impl Form {
  fn new(resource: Resource, id: Option<i64>, fields: Vec<Field>) -> Self {
    Self { resource, id, fields, roster: None, focus: 0, error: None }
  }

  pub fn course(existing: Option<&Course>) -> Self {
    let c = existing;
    Self::new(Resource::Courses, c.map(|c| c.id), vec![
      Field::text("nome", "Name", c.map(|c| c.name.clone())),
      Field::text("descricao", "Description", c.and_then(|c| c.description.clone())),
      Field::text("data_inicio", "Start date", date_text(c.and_then(|c| c.start_date))),
      Field::text("data_fim", "End date", date_text(c.and_then(|c| c.end_date))),
      Field::text(
        "carga_horaria",
        "Hours",
        c.and_then(|c| c.workload_hours).map(|h| h.to_string()),
      ),
    ])
  }

  pub fn volunteer(existing: Option<&Volunteer>) -> Self {
    let v = existing;
    Self::new(Resource::Volunteers, v.map(|v| v.id), vec![
      Field::text("nome", "Name", v.map(|v| v.name.clone())),
      Field::text("email", "Email", v.map(|v| v.email.clone())),
      Field::text("telefone", "Phone", v.and_then(|v| v.phone.clone())),
      Field::text("endereco", "Address", v.and_then(|v| v.address.clone())),
      Field {
        key:   "habilidades",
        label: "Skills",
        input: Input::List(v.map(|v| v.skills.join(", ")).unwrap_or_default()),
      },
      Field::text("disponibilidade", "Availability", v.and_then(|v| v.availability.clone())),
    ])
  }

  pub fn student(existing: Option<&StudentView>, courses: &[Course]) -> Self {
    let s = existing.map(|v| &v.student);
    Self::new(Resource::Students, s.map(|s| s.id), vec![
      Field::text("nome", "Name", s.map(|s| s.name.clone())),
      Field::text("email", "Email", s.map(|s| s.email.clone())),
      Field::text("telefone", "Phone", s.and_then(|s| s.phone.clone())),
      Field::text("endereco", "Address", s.and_then(|s| s.address.clone())),
      Field::text("data_nascimento", "Birth date", date_text(s.and_then(|s| s.birth_date))),
      Field::pick(
        "curso_id",
        "Course",
        course_choices(courses),
        s.and_then(|s| s.course_id),
        true,
      ),
    ])
  }

  pub fn section(
    existing: Option<&SectionView>,
    courses: &[Course],
    volunteers: &[Volunteer],
    students: &[StudentView],
  ) -> Self {
    let s = existing.map(|v| &v.section);
    let volunteers = volunteers
      .iter()
      .map(|v| Choice { id: v.id, label: v.name.clone() })
      .collect();
    let mut form = Self::new(Resource::Sections, s.map(|s| s.id), vec![
      Field::text("nome", "Name", s.map(|s| s.name.clone())),
      Field::pick("curso_id", "Course", course_choices(courses), s.map(|s| s.course_id), false),
      Field::pick("voluntario_id", "Volunteer", volunteers, s.and_then(|s| s.volunteer_id), true),
      Field::text("data_inicio", "Start date", date_text(s.and_then(|s| s.start_date))),
      Field::text("data_fim", "End date", date_text(s.and_then(|s| s.end_date))),
    ]);
    let enrolled = existing.map(|v| v.student_ids.clone()).unwrap_or_default();
    form.roster = Some(Roster::new(students, enrolled));
    form
  }

  pub fn title(&self) -> String {
    match self.id {
      None => format!("New {}", self.resource.singular()),
      Some(id) => format!("Edit {} #{id}", self.resource.singular()),
    }
  }

  fn slots(&self) -> usize { self.fields.len() + usize::from(self.roster.is_some()) }

  pub fn roster_focused(&self) -> bool {
    self.roster.is_some() && self.focus == self.fields.len()
  }

  /// The request body for create or update.
  pub fn payload(&self) -> Value {
    let mut body: Map<String, Value> = self
      .fields
      .iter()
      .map(|f| (f.key.to_string(), f.to_json()))
      .collect();
    if let Some(roster) = &self.roster {
      body.insert("alunos_ids".into(), roster.ids().into());
    }
    Value::Object(body)
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('s') if ctrl => return FormAction::Save,
      KeyCode::Esc => return FormAction::Cancel,
      KeyCode::Tab => self.focus = (self.focus + 1) % self.slots(),
      KeyCode::BackTab => self.focus = (self.focus + self.slots() - 1) % self.slots(),
      _ if ctrl => {}
      code if self.roster_focused() => self.roster_key(code),
      KeyCode::Down | KeyCode::Enter => self.focus = (self.focus + 1) % self.slots(),
      KeyCode::Up => self.focus = (self.focus + self.slots() - 1) % self.slots(),
      KeyCode::Left => self.fields[self.focus].cycle(false),
      KeyCode::Right => self.fields[self.focus].cycle(true),
      KeyCode::Backspace => self.fields[self.focus].backspace(),
      KeyCode::Char(c) => self.fields[self.focus].type_char(c),
      _ => {}
    }
    FormAction::None
  }

  fn roster_key(&mut self, code: KeyCode) {
    let Some(roster) = self.roster.as_mut() else {
      return;
    };
    match code {
      KeyCode::Down => roster.move_cursor(true),
      KeyCode::Up => roster.move_cursor(false),
      KeyCode::Enter => roster.toggle_cursor(),
      KeyCode::Backspace => roster.set_filter(|f| {
        f.pop();
      }),
      KeyCode::Char(c) => roster.set_filter(|f| f.push(c)),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use ngo_core::{section::Section, student::Student};
  use serde_json::json;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn student(id: i64, name: &str, email: &str) -> StudentView {
    let now = Utc::now();
    StudentView {
      student:     Student {
        id,
        name: name.into(),
        email: email.into(),
        phone: None,
        address: None,
        birth_date: None,
        course_id: None,
        created_at: now,
        updated_at: now,
      },
      course_name: None,
    }
  }

  fn course(id: i64, name: &str) -> Course {
    let now = Utc::now();
    Course {
      id,
      name: name.into(),
      description: None,
      start_date: None,
      end_date: None,
      workload_hours: None,
      created_at: now,
      updated_at: now,
    }
  }

  fn students() -> Vec<StudentView> {
    vec![
      student(1, "Ana Souza", "ana@example.org"),
      student(2, "Bruno Lima", "bl@example.org"),
      student(3, "Carla", "carla.souza@example.org"),
    ]
  }

  // ── Filter ────────────────────────────────────────────────────────────────

  #[test]
  fn filter_is_case_insensitive_over_name_and_email() {
    assert!(matches("SOUZA", "Ana Souza", "ana@example.org"));
    assert!(matches("carla.s", "Carla", "carla.souza@example.org"));
    assert!(!matches("bruno", "Ana Souza", "ana@example.org"));
  }

  #[test]
  fn blank_filter_matches_everyone() {
    assert!(matches("", "x", "y"));
    assert!(matches("   ", "x", "y"));
    assert!(matches("  ana ", "Ana", "a@b"));
  }

  #[test]
  fn roster_filter_keeps_hidden_selection() {
    let mut roster = Roster::new(&students(), [2]);
    roster.filter = "souza".into();
    let visible: Vec<i64> = roster.visible().iter().map(|e| e.id).collect();
    assert_eq!(visible, [1, 3]);

    roster.toggle_cursor();
    assert_eq!(roster.ids(), [1, 2]);
  }

  #[test]
  fn toggle_adds_then_removes() {
    let mut roster = Roster::new(&students(), []);
    roster.toggle(3);
    roster.toggle(1);
    assert_eq!(roster.ids(), [1, 3]);
    roster.toggle(3);
    assert_eq!(roster.ids(), [1]);
    assert!(!roster.is_selected(3));
  }

  // ── Form ──────────────────────────────────────────────────────────────────

  #[test]
  fn section_payload_carries_the_full_roster() {
    let now = Utc::now();
    let existing = SectionView {
      section:        Section {
        id:           9,
        name:         "A".into(),
        course_id:    7,
        volunteer_id: None,
        start_date:   NaiveDate::from_ymd_opt(2024, 3, 1),
        end_date:     None,
        created_at:   now,
        updated_at:   now,
      },
      course_name:    "Intro".into(),
      volunteer_name: None,
      student_ids:    vec![3],
    };
    let mut form =
      Form::section(Some(&existing), &[course(7, "Intro")], &[], &students());
    assert_eq!(form.title(), "Edit section #9");

    form.focus = form.fields.len();
    for c in "ana".chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
    form.handle_key(key(KeyCode::Enter));

    assert_eq!(
      form.payload(),
      json!({
        "nome": "A",
        "curso_id": 7,
        "voluntario_id": null,
        "data_inicio": "2024-03-01",
        "data_fim": null,
        "alunos_ids": [1, 3],
      })
    );
  }

  #[test]
  fn required_picker_never_returns_to_empty() {
    let courses = [course(1, "A"), course(2, "B")];
    let mut form = Form::section(None, &courses, &[], &[]);
    form.focus = 1;
    assert_eq!(form.fields[1].display(), "(choose)");

    form.handle_key(key(KeyCode::Right));
    form.handle_key(key(KeyCode::Right));
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.fields[1].display(), "A");
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.fields[1].display(), "B");
  }

  #[test]
  fn optional_picker_can_be_cleared() {
    let mut form = Form::student(None, &[course(4, "Intro")]);
    form.focus = 5;
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.payload()["curso_id"], 4);
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.payload()["curso_id"], Value::Null);
  }

  #[test]
  fn skills_are_split_on_commas() {
    let mut form = Form::volunteer(None);
    form.focus = 4;
    for c in "art, music,,".chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(form.payload()["habilidades"], json!(["art", "music"]));
    assert_eq!(form.payload()["nome"], Value::Null);
  }

  #[test]
  fn ctrl_s_saves_and_esc_cancels() {
    let mut form = Form::course(None);
    assert_eq!(form.title(), "New course");
    assert_eq!(
      form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
      FormAction::Save
    );
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    assert!(form.fields[0].display().is_empty());
  }

  #[test]
  fn tab_wraps_through_roster() {
    let mut form = Form::section(None, &[], &[], &students());
    for _ in 0..form.fields.len() {
      form.handle_key(key(KeyCode::Tab));
    }
    assert!(form.roster_focused());
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus, 0);
  }
}
