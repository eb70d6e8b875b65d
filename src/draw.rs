use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::edit_modal::{EditModal, MODAL_HEIGHT, MODAL_WIDTH};
use crate::components::standings_table::StandingsTable;
use crate::state::app_state::{Focus, LeagueEntry};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, centered};

const HELP_TEXT: &str = "\
Global      q quit   Tab switch pane   r refresh   S scrape   \" logs   ? help
Leagues     j/k move   Enter select
Standings   j/k cursor   K/J move row up/down   h/l stage
            s save order   t toggle status   e/Enter edit
Edit        Tab/↑↓ field   Enter save   Esc cancel
Popups      Enter/Esc dismiss";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(
            f.area(),
            app.state.page.table.has_stage_selector(),
            app.state.show_logs,
        );

        draw_header(f, layout.header, app);
        draw_leagues(f, layout.leagues, app);
        if app.state.page.table.has_stage_selector() {
            draw_stage_bar(f, layout.stages, app);
        }
        draw_standings(f, layout.table, app);
        draw_footer(f, layout.footer, app);
        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        if let Some(form) = app.state.page.edit.as_ref() {
            f.render_widget(EditModal { form }, centered(f.area(), MODAL_WIDTH, MODAL_HEIGHT));
        }
        if app.state.show_help {
            draw_help(f, f.area());
        }
        if app.state.notification.is_some() {
            draw_notification(f, f.area(), app);
        }

        draw_loading_spinner(f, f.area(), loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn focus_color(focused: bool) -> Color {
    if focused { Color::Cyan } else { Color::White }
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let league = app.state.leagues.selected_name().unwrap_or("no league selected");
    let title = Paragraph::new(format!(" Standings | {league} | {}", app.settings.api_url))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(title, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_leagues(f: &mut Frame, area: Rect, app: &App) {
    let leagues = &app.state.leagues;
    let focused = app.state.focus == Focus::Leagues;
    let block = default_border(focus_color(focused)).title(" Leagues ");

    if !leagues.loaded {
        f.render_widget(
            Paragraph::new("loading...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = leagues
        .entries()
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let (text, mut style) = match entry {
                LeagueEntry::None => ("-- none --".to_string(), Style::default().fg(Color::Gray)),
                LeagueEntry::League(l) => {
                    let style = if leagues.selected == Some(l.id) {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    (l.name.clone(), style)
                }
                LeagueEntry::Placeholder => (
                    "(no leagues available)".to_string(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ),
            };
            if focused && i == leagues.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(text).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_stage_bar(f: &mut Frame, area: Rect, app: &App) {
    let table = &app.state.page.table;
    let titles: Vec<Line> = table
        .stage_keys
        .iter()
        .map(|key| Line::from(table.stage_label(key)))
        .collect();
    let index = table
        .selected_stage
        .as_ref()
        .and_then(|key| table.stage_keys.iter().position(|k| k == key))
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(default_border(Color::White).title(" Stage (h/l) "))
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED).fg(Color::Yellow))
        .select(index);
    f.render_widget(tabs, area);
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let table = &app.state.page.table;
    let focused = app.state.focus == Focus::Standings;
    let title = if table.is_dirty() {
        " Standings (unsaved order, s to save) "
    } else {
        " Standings "
    };
    let block = default_border(focus_color(focused)).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !table.is_loaded() {
        draw_placeholder(f, inner, "Select a league to view its standings");
        return;
    }

    let rows = table.visible_rows();
    if rows.is_empty() {
        draw_placeholder(f, inner, "No standings for this league");
        return;
    }

    f.render_widget(
        StandingsTable { rows: &rows, cursor: table.cursor, focused },
        inner,
    );
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.state.status_line.as_deref() {
        Some(line) => Span::styled(line.to_string(), Style::default().fg(Color::Green)),
        None => Span::styled(
            "Tab pane  j/k move  Enter select  K/J reorder  s save  t status  e edit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Log "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 80, 10);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(HELP_TEXT).block(default_border(Color::Cyan).title(" Help (Esc) ")),
        popup,
    );
}

fn draw_notification(f: &mut Frame, area: Rect, app: &App) {
    let Some(notification) = app.state.notification.as_ref() else {
        return;
    };
    let popup = centered(area, 60, 7);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(notification.message.as_str()),
        Line::default(),
        Line::from(Span::styled("Enter to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(default_border(Color::Red).title(format!(" {} ", notification.title))),
        popup,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    f.render_widget(spinner, Rect::new(area.width.saturating_sub(11), 1, 1, 1));
}
