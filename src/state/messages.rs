use crate::state::network::LoadingState;
use backoffice_api::{
    League, LeagueId, OrderUpdate, Stage, StandingId, StandingRow, StandingUpdate, Status,
};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadLeagues,
    /// `fetch_stages` is false once the page has stage metadata cached.
    LoadStandings {
        league_id: LeagueId,
        generation: u64,
        fetch_stages: bool,
    },
    SaveOrder { update: OrderUpdate },
    ToggleStatus { standing_id: StandingId, status: Status },
    SubmitEdit { standing_id: StandingId, update: StandingUpdate },
    /// Ask the server to refresh every league's standings from upstream.
    ScrapeStandings,
}

/// Which user action a failed request belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    LoadLeagues,
    SaveOrder,
    ToggleStatus { standing_id: StandingId },
    SubmitEdit,
    ScrapeStandings,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LeaguesLoaded { leagues: Vec<League> },
    /// Always sent for a standings load; failures arrive as an empty collection.
    StandingsLoaded {
        league_id: LeagueId,
        generation: u64,
        standings: Vec<StandingRow>,
        stages: Option<Vec<Stage>>,
    },
    OrderSaved { league_id: LeagueId },
    StatusUpdated { standing_id: StandingId, status: Status },
    EditSaved { standing_id: StandingId },
    ScrapeCompleted { message: String },
    Error { kind: RequestKind, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
