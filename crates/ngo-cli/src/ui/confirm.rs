//! Delete confirmation popup.

use ratatui::{
  Frame,
  layout::{Alignment, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered;
use crate::client::Resource;

pub fn draw(f: &mut Frame, area: Rect, resource: Resource, id: i64, label: &str) {
  let popup = centered(area, 52, 6);
  f.render_widget(Clear, popup);

  let mut lines = vec![Line::from(format!("Delete {} #{id}?", resource.singular()))];
  lines.push(Line::from(label.to_string()).style(Style::default().add_modifier(Modifier::BOLD)));
  if resource == Resource::Courses {
    lines.push(
      Line::from("Its sections are deleted too.").style(Style::default().fg(Color::Yellow)),
    );
  }
  lines.push(Line::from("[y] delete   [n] keep").style(Style::default().fg(Color::DarkGray)));

  f.render_widget(
    Paragraph::new(lines).alignment(Alignment::Center).block(
      Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red)),
    ),
    popup,
  );
}
