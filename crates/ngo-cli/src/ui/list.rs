//! Table pane for the current tab.

use chrono::NaiveDate;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{app::App, client::Resource};

fn date(d: Option<NaiveDate>) -> String { d.map(|d| d.to_string()).unwrap_or_default() }

fn text(s: &Option<String>) -> String { s.clone().unwrap_or_default() }

/// Column headings, widths and cell text for `resource`.
fn columns(app: &App, resource: Resource) -> (Vec<&'static str>, Vec<Constraint>, Vec<Vec<String>>) {
  use Constraint::{Length, Min};

  match resource {
    Resource::Courses => (
      vec!["ID", "Name", "Start", "End", "Hours"],
      vec![Length(6), Min(20), Length(12), Length(12), Length(6)],
      app
        .courses
        .iter()
        .map(|c| {
          vec![
            c.id.to_string(),
            c.name.clone(),
            date(c.start_date),
            date(c.end_date),
            c.workload_hours.map(|h| h.to_string()).unwrap_or_default(),
          ]
        })
        .collect(),
    ),
    Resource::Volunteers => (
      vec!["ID", "Name", "Email", "Phone", "Skills"],
      vec![Length(6), Min(16), Min(20), Length(16), Min(16)],
      app
        .volunteers
        .iter()
        .map(|v| {
          vec![
            v.id.to_string(),
            v.name.clone(),
            v.email.clone(),
            text(&v.phone),
            v.skills.join(", "),
          ]
        })
        .collect(),
    ),
    Resource::Students => (
      vec!["ID", "Name", "Email", "Course", "Born"],
      vec![Length(6), Min(16), Min(20), Min(16), Length(12)],
      app
        .students
        .iter()
        .map(|s| {
          vec![
            s.student.id.to_string(),
            s.student.name.clone(),
            s.student.email.clone(),
            text(&s.course_name),
            date(s.student.birth_date),
          ]
        })
        .collect(),
    ),
    Resource::Sections => (
      vec!["ID", "Name", "Course", "Volunteer", "Start", "Students"],
      vec![Length(6), Min(16), Min(16), Min(16), Length(12), Length(9)],
      app
        .sections
        .iter()
        .map(|s| {
          vec![
            s.section.id.to_string(),
            s.section.name.clone(),
            s.course_name.clone(),
            text(&s.volunteer_name),
            date(s.section.start_date),
            s.student_ids.len().to_string(),
          ]
        })
        .collect(),
    ),
  }
}

/// Render the table for `app.tab` into `area`, with the error banner on top.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let total = app.len(app.tab);
  let block = Block::default()
    .title(format!(" {} ({total}) ", app.tab.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if let Some(banner) = &app.banner
    && inner.height > 1
  {
    let line = Rect { height: 1, ..inner };
    f.render_widget(
      Paragraph::new(format!(" {banner}"))
        .style(Style::default().fg(Color::White).bg(Color::Red)),
      line,
    );
    inner.y += 1;
    inner.height -= 1;
  }

  if total == 0 {
    f.render_widget(
      Paragraph::new("Nothing here yet. Press n to add one.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let (headings, widths, cells) = columns(app, app.tab);
  let header = Row::new(headings.into_iter().map(Cell::from))
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
  let rows = cells.into_iter().map(Row::new);

  let mut state = TableState::default();
  state.select(Some(app.cursor()));

  f.render_stateful_widget(
    Table::new(rows, widths).header(header).row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}
