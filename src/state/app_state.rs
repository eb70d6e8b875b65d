use crate::state::edit_form::EditForm;
use crate::state::standings::StandingsTable;
use backoffice_api::{League, LeagueId, Stage, StandingId};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// League selector state
// ---------------------------------------------------------------------------

/// One line of the league list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueEntry<'a> {
    /// Clears the standings pane.
    None,
    League(&'a League),
    /// Shown alone when the list is empty or failed; cannot be selected.
    Placeholder,
}

#[derive(Debug, Default)]
pub struct LeagueSelectorState {
    pub leagues: Vec<League>,
    pub loaded: bool,
    pub cursor: usize,
    pub selected: Option<LeagueId>,
}

impl LeagueSelectorState {
    pub fn load(&mut self, leagues: Vec<League>) {
        self.leagues = leagues;
        self.loaded = true;
        self.cursor = match self.selected {
            Some(id) => self
                .leagues
                .iter()
                .position(|l| l.id == id)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        };
    }

    pub fn entries(&self) -> Vec<LeagueEntry<'_>> {
        let mut entries = vec![LeagueEntry::None];
        if self.leagues.is_empty() {
            entries.push(LeagueEntry::Placeholder);
        } else {
            entries.extend(self.leagues.iter().map(LeagueEntry::League));
        }
        entries
    }

    pub fn cursor_down(&mut self) {
        let max = self.entries().len().saturating_sub(1);
        if self.cursor < max {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn entry_under_cursor(&self) -> LeagueEntry<'_> {
        self.entries()
            .get(self.cursor)
            .copied()
            .unwrap_or(LeagueEntry::None)
    }

    pub fn selected_name(&self) -> Option<&str> {
        let id = self.selected?;
        self.leagues
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Standings page controller state
// ---------------------------------------------------------------------------

/// Everything the standings page keeps between events. Constructed once per
/// page; nothing here outlives it.
#[derive(Debug, Default)]
pub struct StandingsPage {
    /// Stage reference data, filled by the first successful fetch.
    pub stage_cache: Option<Vec<Stage>>,
    /// Bumped for every standings request; only the latest is applied.
    pub generation: u64,
    pub table: StandingsTable,
    pub edit: Option<EditForm>,
    /// Rows with a status PUT in flight.
    pub pending_toggles: HashSet<StandingId>,
}

impl StandingsPage {
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn stages(&self) -> &[Stage] {
        self.stage_cache.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A blocking popup; input is swallowed until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Leagues,
    Standings,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub focus: Focus,
    pub show_help: bool,
    pub show_logs: bool,
    pub leagues: LeagueSelectorState,
    pub page: StandingsPage,
    pub notification: Option<Notification>,
    /// Transient confirmation line shown in the footer. Cleared by the next
    /// request, failure or league change.
    pub status_line: Option<String>,
    pub scrape_pending: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
