use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Focus, LeagueEntry, Notification};
use crate::state::edit_form::EditForm;
use crate::state::messages::{NetworkRequest, RequestKind};
use backoffice_api::{League, LeagueId, Stage, StandingId, StandingRow, Status};
use chrono::Local;
use log::debug;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self {
            state: AppState::new(),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // League selector
    // -----------------------------------------------------------------------

    pub fn on_leagues_loaded(&mut self, leagues: Vec<League>) {
        debug!("{} leagues loaded", leagues.len());
        self.state.leagues.load(leagues);
    }

    /// The list degrades to the disabled placeholder; no popup.
    pub fn on_leagues_unavailable(&mut self, message: &str) {
        debug!("league list unavailable: {message}");
        self.state.leagues.load(Vec::new());
    }

    pub fn league_cursor_down(&mut self) {
        self.state.leagues.cursor_down();
    }

    pub fn league_cursor_up(&mut self) {
        self.state.leagues.cursor_up();
    }

    pub fn select_league_under_cursor(&mut self) -> Option<NetworkRequest> {
        let league_id = match self.state.leagues.entry_under_cursor() {
            LeagueEntry::Placeholder => return None,
            LeagueEntry::None => None,
            LeagueEntry::League(league) => Some(league.id),
        };
        self.select_league(league_id)
    }

    /// `None` clears the standings pane so no stale rows remain visible.
    pub fn select_league(&mut self, league_id: Option<LeagueId>) -> Option<NetworkRequest> {
        self.state.leagues.selected = league_id;
        self.state.page.edit = None;
        self.state.status_line = None;
        let Some(league_id) = league_id else {
            // Invalidate anything still in flight for the old league.
            self.state.page.next_generation();
            self.state.page.table.clear();
            return None;
        };
        self.state.focus = Focus::Standings;
        Some(self.request_standings(league_id))
    }

    /// Explicit refresh: standings when a league is selected, otherwise the
    /// league list itself.
    pub fn refresh(&mut self) -> Option<NetworkRequest> {
        match self.state.leagues.selected {
            Some(league_id) => Some(self.request_standings(league_id)),
            None => Some(NetworkRequest::LoadLeagues),
        }
    }

    // -----------------------------------------------------------------------
    // Standings loader / renderer
    // -----------------------------------------------------------------------

    fn request_standings(&mut self, league_id: LeagueId) -> NetworkRequest {
        let generation = self.state.page.next_generation();
        NetworkRequest::LoadStandings {
            league_id,
            generation,
            fetch_stages: self.state.page.stage_cache.is_none(),
        }
    }

    /// Returns false when the response was stale and dropped.
    pub fn on_standings_loaded(
        &mut self,
        league_id: LeagueId,
        generation: u64,
        standings: Vec<StandingRow>,
        stages: Option<Vec<Stage>>,
    ) -> bool {
        let page = &mut self.state.page;
        if page.stage_cache.is_none()
            && let Some(stages) = stages
        {
            page.stage_cache = Some(stages);
        }

        if generation != page.generation || self.state.leagues.selected != Some(league_id) {
            debug!(
                "dropping stale standings for league {league_id} (generation {generation}, latest {})",
                page.generation
            );
            return false;
        }

        page.table
            .load(league_id, standings, page.stage_cache.as_deref().unwrap_or(&[]));
        true
    }

    // -----------------------------------------------------------------------
    // Standings navigation / reorder
    // -----------------------------------------------------------------------

    pub fn row_cursor_down(&mut self) {
        self.state.page.table.cursor_down();
    }

    pub fn row_cursor_up(&mut self) {
        self.state.page.table.cursor_up();
    }

    pub fn next_stage(&mut self) {
        self.state.page.table.next_stage();
    }

    pub fn prev_stage(&mut self) {
        self.state.page.table.prev_stage();
    }

    pub fn move_selected_up(&mut self) -> bool {
        let table = &mut self.state.page.table;
        let cursor = table.cursor;
        table.move_up(cursor)
    }

    pub fn move_selected_down(&mut self) -> bool {
        let table = &mut self.state.page.table;
        let cursor = table.cursor;
        table.move_down(cursor)
    }

    pub fn save_order(&mut self) -> Option<NetworkRequest> {
        let update = self.state.page.table.order_update()?;
        self.state.status_line = None;
        Some(NetworkRequest::SaveOrder { update })
    }

    /// Reload so the server's authoritative order is shown.
    pub fn on_order_saved(&mut self, league_id: LeagueId) -> Option<NetworkRequest> {
        self.confirm("Order saved");
        if self.state.leagues.selected != Some(league_id) {
            return None;
        }
        Some(self.request_standings(league_id))
    }

    // -----------------------------------------------------------------------
    // Status toggle
    // -----------------------------------------------------------------------

    /// Ignored while a toggle for the same row is in flight, since the new
    /// value is derived from the cached status.
    pub fn toggle_selected_status(&mut self) -> Option<NetworkRequest> {
        let page = &mut self.state.page;
        let row = page.table.find(page.table.selected_id()?)?;
        let (standing_id, status) = (row.id, row.status.toggled());
        if !page.pending_toggles.insert(standing_id) {
            debug!("toggle for standing {standing_id} already in flight");
            return None;
        }
        self.state.status_line = None;
        Some(NetworkRequest::ToggleStatus { standing_id, status })
    }

    /// Patch the one row in place; no reload.
    pub fn on_status_updated(&mut self, standing_id: StandingId, status: Status) {
        self.state.page.pending_toggles.remove(&standing_id);
        if !self.state.page.table.set_status(standing_id, status) {
            debug!("status update for standing {standing_id} no longer on screen");
        }
    }

    // -----------------------------------------------------------------------
    // Edit modal
    // -----------------------------------------------------------------------

    pub fn open_edit(&mut self) {
        let table = &self.state.page.table;
        let Some(view) = table.visible_rows().get(table.cursor).copied() else {
            return;
        };
        self.state.page.edit = Some(EditForm::from_row(view.row, view.display_rank));
    }

    pub fn close_edit(&mut self) {
        self.state.page.edit = None;
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.state.page.edit.as_mut()
    }

    pub fn submit_edit(&mut self) -> Option<NetworkRequest> {
        let form = self.state.page.edit.as_mut()?;
        if form.submitting {
            return None;
        }
        let update = form.validate()?;
        form.submitting = true;
        self.state.status_line = None;
        Some(NetworkRequest::SubmitEdit { standing_id: form.standing_id, update })
    }

    pub fn on_edit_saved(&mut self, standing_id: StandingId) -> Option<NetworkRequest> {
        if self
            .state
            .page
            .edit
            .as_ref()
            .is_some_and(|f| f.standing_id == standing_id)
        {
            self.state.page.edit = None;
        }
        self.confirm("Standing saved");
        let league_id = self.state.leagues.selected?;
        Some(self.request_standings(league_id))
    }

    // -----------------------------------------------------------------------
    // Upstream scrape
    // -----------------------------------------------------------------------

    pub fn trigger_scrape(&mut self) -> Option<NetworkRequest> {
        if self.state.scrape_pending {
            return None;
        }
        self.state.scrape_pending = true;
        self.state.status_line = Some("Scraping standings...".to_string());
        Some(NetworkRequest::ScrapeStandings)
    }

    /// The scrape rewrites stored standings, so the open league is reloaded.
    pub fn on_scrape_completed(&mut self, message: &str) -> Option<NetworkRequest> {
        debug!("scrape response: {message}");
        self.state.scrape_pending = false;
        self.confirm("Standings scraped");
        let league_id = self.state.leagues.selected?;
        Some(self.request_standings(league_id))
    }

    // -----------------------------------------------------------------------
    // Failures and notifications
    // -----------------------------------------------------------------------

    /// Prior state is left as it was; for a failed save the local order is
    /// kept exactly as the user arranged it.
    pub fn on_request_failed(&mut self, kind: RequestKind, message: String) {
        self.state.status_line = None;
        let title = match kind {
            RequestKind::LoadLeagues => {
                self.on_leagues_unavailable(&message);
                return;
            }
            RequestKind::SaveOrder => "Saving order failed",
            RequestKind::ToggleStatus { standing_id } => {
                self.state.page.pending_toggles.remove(&standing_id);
                "Changing status failed"
            }
            RequestKind::ScrapeStandings => {
                self.state.scrape_pending = false;
                "Standings scrape failed"
            }
            RequestKind::SubmitEdit => {
                if let Some(form) = self.state.page.edit.as_mut() {
                    form.submitting = false;
                }
                "Saving standing failed"
            }
        };
        self.state.notification = Some(Notification {
            title: title.to_string(),
            message,
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    fn confirm(&mut self, what: &str) {
        let at = Local::now().format("%H:%M:%S");
        self.state.status_line = Some(format!("{what} at {at}"));
    }

    // -----------------------------------------------------------------------
    // Chrome
    // -----------------------------------------------------------------------

    pub fn switch_focus(&mut self) {
        self.state.focus = match self.state.focus {
            Focus::Leagues => Focus::Standings,
            Focus::Standings => Focus::Leagues,
        };
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_api::{RankAssignment, StageRef, StandingUpdate};

    fn app() -> App {
        App {
            settings: AppSettings::default(),
            state: AppState::new(),
        }
    }

    fn row(id: StandingId, rank: u32, name: &str) -> StandingRow {
        StandingRow {
            id,
            team_name: Some(name.into()),
            current_rank: Some(rank),
            ..StandingRow::default()
        }
    }

    /// Select `league_id` and apply `rows` as the response to that request.
    fn loaded(rows: Vec<StandingRow>) -> App {
        let mut app = app();
        app.on_leagues_loaded(vec![League { id: 1, name: "T1".into() }]);
        let Some(NetworkRequest::LoadStandings { league_id, generation, .. }) = app.select_league(Some(1)) else {
            panic!("selecting a league should request standings");
        };
        assert!(app.on_standings_loaded(league_id, generation, rows, Some(vec![])));
        app
    }

    fn visible_ids(app: &App) -> Vec<StandingId> {
        app.state.page.table.visible_rows().iter().map(|r| r.row.id).collect()
    }

    #[test]
    fn first_load_fetches_stages_then_uses_cache() {
        let mut app = app();
        app.on_leagues_loaded(vec![League { id: 1, name: "T1".into() }]);
        let first = app.select_league(Some(1)).unwrap();
        assert!(matches!(first, NetworkRequest::LoadStandings { fetch_stages: true, .. }));
        let NetworkRequest::LoadStandings { generation, .. } = first else { unreachable!() };
        app.on_standings_loaded(1, generation, vec![], Some(vec![Stage { id: 1, name: "Group A".into() }]));

        let second = app.refresh().unwrap();
        assert!(matches!(second, NetworkRequest::LoadStandings { fetch_stages: false, .. }));
        assert_eq!(app.state.page.stages().len(), 1);
    }

    #[test]
    fn failed_stage_fetch_is_not_cached() {
        let mut app = app();
        let Some(NetworkRequest::LoadStandings { generation, .. }) = app.select_league(Some(1)) else {
            panic!();
        };
        app.on_standings_loaded(1, generation, vec![], None);
        assert!(matches!(
            app.refresh(),
            Some(NetworkRequest::LoadStandings { fetch_stages: true, .. })
        ));
    }

    #[test]
    fn stale_standings_response_is_discarded() {
        let mut app = app();
        let Some(NetworkRequest::LoadStandings { generation: old, .. }) = app.select_league(Some(1)) else {
            panic!();
        };
        let Some(NetworkRequest::LoadStandings { generation: new, .. }) = app.select_league(Some(2)) else {
            panic!();
        };

        assert!(app.on_standings_loaded(2, new, vec![row(20, 1, "New")], None));
        assert!(!app.on_standings_loaded(1, old, vec![row(10, 1, "Old")], None));
        assert_eq!(app.state.page.table.league_id, Some(2));
        assert_eq!(visible_ids(&app), [20]);
    }

    #[test]
    fn selecting_none_clears_and_invalidates_in_flight_load() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        let pending = app.refresh();
        assert!(app.select_league(None).is_none());
        assert!(!app.state.page.table.is_loaded());
        assert!(app.state.page.table.visible_rows().is_empty());

        let Some(NetworkRequest::LoadStandings { league_id, generation, .. }) = pending else {
            panic!();
        };
        assert!(!app.on_standings_loaded(league_id, generation, vec![row(1, 1, "A")], None));
        assert!(!app.state.page.table.is_loaded());
    }

    #[test]
    fn placeholder_entry_cannot_be_selected() {
        let mut app = app();
        app.on_leagues_unavailable("boom");
        app.league_cursor_down();
        assert!(app.select_league_under_cursor().is_none());
        assert_eq!(app.state.leagues.selected, None);
    }

    #[test]
    fn refresh_without_league_reloads_league_list() {
        let mut app = app();
        assert_eq!(app.refresh(), Some(NetworkRequest::LoadLeagues));
    }

    #[test]
    fn toggling_null_status_submits_off() {
        let mut app = loaded(vec![StandingRow { status: Status::default(), ..row(5, 1, "A") }]);
        let request = app.toggle_selected_status().unwrap();
        assert_eq!(
            request,
            NetworkRequest::ToggleStatus { standing_id: 5, status: Status::Off }
        );
        let NetworkRequest::ToggleStatus { status, .. } = request else { unreachable!() };
        let body = serde_json::to_value(StandingUpdate::status_only(status)).unwrap();
        assert_eq!(body, serde_json::json!({"status": 1}));
    }

    #[test]
    fn toggle_twice_restores_status_with_one_request_each() {
        let mut app = loaded(vec![row(5, 1, "A")]);
        let original = app.state.page.table.find(5).unwrap().status;

        let mut requests = Vec::new();
        for _ in 0..2 {
            let request = app.toggle_selected_status().unwrap();
            if let NetworkRequest::ToggleStatus { standing_id, status } = request.clone() {
                app.on_status_updated(standing_id, status);
            }
            requests.push(request);
        }

        assert_eq!(requests.len(), 2);
        assert_eq!(app.state.page.table.find(5).unwrap().status, original);
    }

    #[test]
    fn failed_toggle_leaves_status_and_notifies() {
        let mut app = loaded(vec![row(5, 1, "A")]);
        app.toggle_selected_status().unwrap();
        app.on_request_failed(RequestKind::ToggleStatus { standing_id: 5 }, "server responded with 500".into());
        assert_eq!(app.state.page.table.find(5).unwrap().status, Status::On);
        assert!(app.state.notification.is_some());
    }

    #[test]
    fn toggle_is_ignored_while_its_request_is_in_flight() {
        let mut app = loaded(vec![row(5, 1, "A")]);
        let first = app.toggle_selected_status();
        assert_eq!(
            first,
            Some(NetworkRequest::ToggleStatus { standing_id: 5, status: Status::Off })
        );
        assert!(app.toggle_selected_status().is_none());

        app.on_status_updated(5, Status::Off);
        assert_eq!(
            app.toggle_selected_status(),
            Some(NetworkRequest::ToggleStatus { standing_id: 5, status: Status::On })
        );
        app.on_status_updated(5, Status::On);
        assert_eq!(app.state.page.table.find(5).unwrap().status, Status::On);
    }

    #[test]
    fn failed_toggle_allows_retry() {
        let mut app = loaded(vec![row(5, 1, "A")]);
        app.toggle_selected_status().unwrap();
        app.on_request_failed(RequestKind::ToggleStatus { standing_id: 5 }, "boom".into());
        app.dismiss_notification();
        assert_eq!(
            app.toggle_selected_status(),
            Some(NetworkRequest::ToggleStatus { standing_id: 5, status: Status::Off })
        );
    }

    #[test]
    fn edit_of_unranked_row_prefills_display_rank() {
        let unranked = StandingRow { current_rank: None, ..row(2, 1, "B") };
        let mut app = loaded(vec![row(1, 1, "A"), unranked]);
        app.row_cursor_down();
        app.open_edit();
        let form = app.state.page.edit.as_ref().unwrap();
        assert_eq!(form.standing_id, 1);
        app.row_cursor_up();
        app.close_edit();
        app.open_edit();
        let form = app.state.page.edit.as_ref().unwrap();
        assert_eq!(form.standing_id, 2);
        assert_eq!(form.values[8], "1");
        assert!(matches!(app.submit_edit(), Some(NetworkRequest::SubmitEdit { .. })));
    }

    #[test]
    fn confirmation_clears_on_league_change_and_failure() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        app.on_order_saved(1);
        assert!(app.state.status_line.is_some());
        app.select_league(None);
        assert!(app.state.status_line.is_none());

        app.on_order_saved(1);
        app.on_request_failed(RequestKind::SaveOrder, "league is locked".into());
        assert!(app.state.status_line.is_none());
    }

    #[test]
    fn scrape_runs_once_and_reloads_open_league() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        assert_eq!(app.trigger_scrape(), Some(NetworkRequest::ScrapeStandings));
        assert!(app.trigger_scrape().is_none());

        let reload = app.on_scrape_completed("Scrape standings completed successfully");
        assert!(matches!(reload, Some(NetworkRequest::LoadStandings { league_id: 1, .. })));
        assert!(app.trigger_scrape().is_some());
    }

    #[test]
    fn failed_scrape_notifies_and_can_be_retried() {
        let mut app = app();
        app.trigger_scrape().unwrap();
        app.on_request_failed(RequestKind::ScrapeStandings, "server responded with 500".into());
        assert_eq!(
            app.state.notification.as_ref().map(|n| n.title.as_str()),
            Some("Standings scrape failed")
        );
        assert!(app.trigger_scrape().is_some());
    }

    #[test]
    fn status_update_is_visible_to_next_edit() {
        let mut app = loaded(vec![row(5, 1, "A")]);
        app.on_status_updated(5, Status::Off);
        app.open_edit();
        assert_eq!(app.state.page.edit.as_ref().unwrap().values[9], "1");
    }

    #[test]
    fn save_order_submits_displayed_permutation() {
        let mut app = loaded(vec![row(1, 1, "A"), row(2, 2, "B"), row(3, 3, "C")]);
        app.row_cursor_down();
        app.row_cursor_down();
        assert!(app.move_selected_up());
        assert!(app.move_selected_up());
        assert!(!app.move_selected_up());

        let Some(NetworkRequest::SaveOrder { update }) = app.save_order() else {
            panic!("expected a save request");
        };
        assert_eq!(update.league_id, 1);
        assert_eq!(
            update.order,
            vec![
                RankAssignment { id: 3, current_rank: 1 },
                RankAssignment { id: 1, current_rank: 2 },
                RankAssignment { id: 2, current_rank: 3 },
            ]
        );
    }

    #[test]
    fn failed_save_keeps_local_order_and_shows_one_notification() {
        let mut app = loaded(vec![row(1, 1, "A"), row(2, 2, "B")]);
        app.move_selected_down();
        let before = visible_ids(&app);
        app.save_order().unwrap();

        app.on_request_failed(RequestKind::SaveOrder, "league is locked".into());

        assert_eq!(visible_ids(&app), before);
        assert!(app.state.page.table.is_dirty());
        assert_eq!(
            app.state.notification,
            Some(Notification {
                title: "Saving order failed".into(),
                message: "league is locked".into()
            })
        );
    }

    #[test]
    fn successful_save_reloads_standings() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        let generation = app.state.page.generation;
        let reload = app.on_order_saved(1);
        assert!(matches!(
            reload,
            Some(NetworkRequest::LoadStandings { league_id: 1, generation: g, .. }) if g == generation + 1
        ));
        assert!(app.state.status_line.is_some());
    }

    #[test]
    fn edit_opens_from_cache_and_submits_full_record() {
        let mut app = loaded(vec![row(1, 1, "A"), row(2, 2, "B")]);
        app.row_cursor_down();
        app.open_edit();
        let form = app.edit_form_mut().unwrap();
        assert_eq!(form.standing_id, 2);
        form.values[7] = "33".into();

        let Some(NetworkRequest::SubmitEdit { standing_id, update }) = app.submit_edit() else {
            panic!("expected submit");
        };
        assert_eq!(standing_id, 2);
        assert_eq!(update.points, Some(33));
        assert_eq!(update.current_rank, Some(2));
        // A second submit while in flight is ignored.
        assert!(app.submit_edit().is_none());
    }

    #[test]
    fn invalid_edit_makes_no_request() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        app.open_edit();
        app.edit_form_mut().unwrap().values[0] = "-3".into();
        assert!(app.submit_edit().is_none());
        assert!(!app.state.page.edit.as_ref().unwrap().errors.is_empty());
    }

    #[test]
    fn failed_edit_keeps_modal_open_with_values() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        app.open_edit();
        app.edit_form_mut().unwrap().values[1] = "9".into();
        app.submit_edit().unwrap();
        app.on_request_failed(RequestKind::SubmitEdit, "failed to update standing".into());

        let form = app.state.page.edit.as_ref().unwrap();
        assert_eq!(form.values[1], "9");
        assert!(!form.submitting);
        assert!(app.state.notification.is_some());
    }

    #[test]
    fn saved_edit_closes_modal_and_reloads() {
        let mut app = loaded(vec![row(1, 1, "A")]);
        app.open_edit();
        app.submit_edit().unwrap();
        let reload = app.on_edit_saved(1);
        assert!(app.state.page.edit.is_none());
        assert!(matches!(reload, Some(NetworkRequest::LoadStandings { league_id: 1, .. })));
    }

    #[test]
    fn stage_selection_survives_reload_after_save() {
        let staged = |id, stage: &str| StandingRow {
            stage: Some(StageRef { key: stage.into(), name: None }),
            ..row(id, 1, "X")
        };
        let mut app = loaded(vec![staged(1, "a"), staged(2, "b")]);
        app.next_stage();
        let Some(NetworkRequest::LoadStandings { generation, .. }) = app.on_order_saved(1) else {
            panic!();
        };
        app.on_standings_loaded(1, generation, vec![staged(1, "a"), staged(2, "b")], None);
        assert_eq!(app.state.page.table.selected_stage.as_deref(), Some("b"));
        assert_eq!(visible_ids(&app), [2]);
    }

    #[test]
    fn league_failure_degrades_to_placeholder_without_popup() {
        let mut app = app();
        app.on_request_failed(RequestKind::LoadLeagues, "could not reach the server".into());
        assert!(app.state.notification.is_none());
        assert!(app.state.leagues.loaded);
    }
}
