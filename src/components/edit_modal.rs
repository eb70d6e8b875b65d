use crate::state::edit_form::{EditField, EditForm};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

/// Rows: one per field, a blank line, and the key hint.
pub const MODAL_HEIGHT: u16 = EditField::ALL.len() as u16 + 4;
pub const MODAL_WIDTH: u16 = 56;

pub struct EditModal<'a> {
    pub form: &'a EditForm,
}

impl Widget for EditModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(" Edit: {} ", self.form.team_name);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title);

        let mut lines: Vec<Line> = EditField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| self.field_line(i, *field))
            .collect();

        lines.push(Line::default());
        let hint = if self.form.submitting {
            "saving..."
        } else {
            "Tab/↑↓ field  Enter save  Esc cancel"
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

impl EditModal<'_> {
    fn field_line(&self, index: usize, field: EditField) -> Line<'static> {
        let focused = index == self.form.focus;
        let marker = if focused { ">" } else { " " };
        let value_style = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(format!("{marker} {:<20}", field.label())),
            Span::styled(format!("{:>6}", self.form.values[index]), value_style),
        ];
        if let Some(err) = self.form.error_for(field) {
            spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
        }
        Line::from(spans)
    }
}
