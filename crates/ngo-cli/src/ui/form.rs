//! Record form popup.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::centered;
use crate::form::{Form, Input, Roster};

const LABEL_WIDTH: usize = 14;

pub fn draw(f: &mut Frame, area: Rect, form: &Form) {
  let height = if form.roster.is_some() { area.height } else { form.fields.len() as u16 + 6 };
  let popup = centered(area, 72, height);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(format!(" {} ", form.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(form.fields.len() as u16 + 1), // fields
      Constraint::Length(2),                            // error
      Constraint::Min(0),                               // roster
    ])
    .split(inner);

  let lines: Vec<Line> = form
    .fields
    .iter()
    .enumerate()
    .map(|(i, field)| {
      let focused = i == form.focus;
      let label = Span::styled(
        format!("{:>width$}  ", field.label, width = LABEL_WIDTH),
        Style::default().fg(if focused { Color::Cyan } else { Color::Gray }),
      );
      let value = match &field.input {
        Input::Pick { .. } if focused => format!("◀ {} ▶", field.display()),
        Input::Pick { .. } => field.display(),
        _ if focused => format!("{}_", field.display()),
        _ => field.display(),
      };
      let style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Line::from(vec![label, Span::styled(value, style)])
    })
    .collect();
  f.render_widget(Paragraph::new(lines), rows[0]);

  if let Some(error) = &form.error {
    f.render_widget(
      Paragraph::new(error.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true }),
      rows[1],
    );
  }

  if let Some(roster) = &form.roster {
    draw_roster(f, rows[2], roster, form.roster_focused());
  }
}

fn draw_roster(f: &mut Frame, area: Rect, roster: &Roster, focused: bool) {
  let visible = roster.visible();
  let block = Block::default()
    .title(format!(
      " Students ({} selected, {} shown) ",
      roster.selected.len(),
      visible.len()
    ))
    .borders(Borders::TOP)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));
  let inner = block.inner(area);
  f.render_widget(block, area);
  if inner.height < 2 {
    return;
  }

  let filter = Rect { height: 1, ..inner };
  let list_area = Rect { y: inner.y + 1, height: inner.height - 1, ..inner };

  let cursor = if focused { "_" } else { "" };
  f.render_widget(
    Paragraph::new(format!("/{}{cursor}", roster.filter)).style(Style::default().fg(Color::Yellow)),
    filter,
  );

  let items: Vec<ListItem> = visible
    .iter()
    .map(|e| {
      let mark = if roster.is_selected(e.id) { "[x]" } else { "[ ]" };
      ListItem::new(Line::from(vec![
        Span::raw(format!("{mark} {}", e.name)),
        Span::styled(format!("  {}", e.email), Style::default().fg(Color::DarkGray)),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((focused && !visible.is_empty()).then_some(roster.cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    list_area,
    &mut state,
  );
}
