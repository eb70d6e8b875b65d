use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 3;
pub const STAGE_BAR_HEIGHT: u16 = 3;
pub const LEAGUE_PANE_WIDTH: u16 = 28;
const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub leagues: Rect,
    /// `Rect::ZERO` when the stage selector is hidden.
    pub stages: Rect,
    pub table: Rect,
    pub footer: Rect,
    /// `Rect::ZERO` when the log pane is hidden.
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, show_stages: bool, show_logs: bool) {
        *self = Self::from_rect(area, show_stages, show_logs);
    }

    fn from_rect(area: Rect, show_stages: bool, show_logs: bool) -> Self {
        let log_height = if show_logs { LOG_PANE_HEIGHT } else { 0 };
        let [header, body, logs, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(log_height),
            Constraint::Length(1),
        ])
        .areas(area);

        let [leagues, right] =
            Layout::horizontal([Constraint::Length(LEAGUE_PANE_WIDTH), Constraint::Fill(1)])
                .areas(body);

        let stage_height = if show_stages { STAGE_BAR_HEIGHT } else { 0 };
        let [stages, table] =
            Layout::vertical([Constraint::Length(stage_height), Constraint::Fill(1)]).areas(right);

        LayoutAreas {
            header: Self::split_header(header),
            leagues,
            stages: if show_stages { stages } else { Rect::ZERO },
            table,
            footer,
            logs: if show_logs { logs } else { Rect::ZERO },
        }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(80), Constraint::Percentage(20)]).areas(area)
    }
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
