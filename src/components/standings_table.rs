use crate::state::standings::TableRow;
use backoffice_api::Status;
use tui::buffer::Buffer;
use tui::layout::{Constraint, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Span;
use tui::widgets::{Cell, Row, StatefulWidget, Table, TableState, Widget};

const HEADERS: [&str; 13] = [
    "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Move", "Status", "",
];

/// Editable standings table: one line per projected row, cursor highlighted.
/// Scrolls so the cursor row is always drawn.
pub struct StandingsTable<'a> {
    pub rows: &'a [TableRow<'a>],
    pub cursor: usize,
    pub focused: bool,
}

impl Widget for StandingsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(HEADERS.map(Cell::from))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let lines = self.rows.iter().enumerate().map(|(i, r)| {
            let selected = self.focused && i == self.cursor;
            let style = if selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            table_line(r).style(style)
        });

        let widths = [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(6),
        ];

        let table = Table::new(lines, widths).header(header).column_spacing(1);
        let mut state = TableState::default().with_selected(Some(self.cursor));
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

fn table_line<'a>(r: &TableRow<'a>) -> Row<'a> {
    let s = r.row;
    let stat = |v: u32| Cell::from(v.to_string());
    Row::new(vec![
        Cell::from(r.display_rank.to_string()),
        Cell::from(s.display_name()),
        stat(s.matches_played),
        stat(s.wins),
        stat(s.draws),
        stat(s.losses),
        stat(s.goals_for),
        stat(s.goals_against),
        Cell::from(s.goal_difference.to_string()),
        stat(s.points),
        Cell::from(move_arrows(r.can_move_up, r.can_move_down)),
        Cell::from(status_span(s.status)),
        Cell::from(Span::styled("[e]", Style::default().fg(Color::DarkGray))),
    ])
}

/// Disabled directions render as a dot.
pub fn move_arrows(up: bool, down: bool) -> String {
    let up = if up { '▲' } else { '·' };
    let down = if down { '▼' } else { '·' };
    format!("{up}{down}")
}

fn status_span(status: Status) -> Span<'static> {
    let color = match status {
        Status::On => Color::Green,
        Status::Off => Color::Red,
    };
    Span::styled(status.label(), Style::default().fg(color))
}
