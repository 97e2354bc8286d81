//! TUI rendering — orchestrates all panes.

pub mod confirm;
pub mod form;
pub mod list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::{
  app::{App, Mode},
  client::Resource,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  list::draw(f, rows[1], app);
  match &app.mode {
    Mode::List => {}
    Mode::Edit(form) => form::draw(f, rows[1], form),
    Mode::Confirm { resource, id, label } => {
      confirm::draw(f, rows[1], *resource, *id, label);
    }
  }
  draw_status(f, rows[2], app);
}

/// A rectangle of `width` x `height` centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(date.len() as u16 + 1)])
    .split(area);

  let titles = Resource::ALL
    .iter()
    .enumerate()
    .map(|(i, r)| format!("{} {}", i + 1, r.title()));
  let tabs = Tabs::new(titles)
    .select(app.tab.index())
    .style(Style::default().fg(Color::White))
    .highlight_style(
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
    .divider("│");

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  f.render_widget(block, area);
  f.render_widget(tabs, cols[0]);
  f.render_widget(
    Paragraph::new(Span::styled(format!("{date} "), Style::default().fg(Color::Gray))),
    cols[1],
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.mode {
    Mode::List => (
      "LIST",
      "Tab/1-4 switch  ↑↓/jk move  n new  e edit  d delete  r reload  q quit",
    ),
    Mode::Edit(form) if form.roster_focused() => (
      "ROSTER",
      "Type to filter  ↑↓ move  Enter toggle  Tab fields  Ctrl-S save  Esc cancel",
    ),
    Mode::Edit(_) => (
      "EDIT",
      "Tab/↑↓ field  ←→ choose  Ctrl-S save  Esc cancel",
    ),
    Mode::Confirm { .. } => ("CONFIRM", "y delete  n keep"),
  };

  let status = match app.mode {
    Mode::List if !app.status_msg.is_empty() => app.status_msg.as_str(),
    _ => hints,
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
