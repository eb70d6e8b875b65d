use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, RequestKind};
use backoffice_api::client::{ApiError, BackofficeApi};
use backoffice_api::{LeagueId, OrderUpdate, StandingId, StandingUpdate, Status};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: BackofficeApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        settings: &AppSettings,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        let client = BackofficeApi::new(settings.api_url.clone())
            .with_timeout(settings.timeout)
            .with_token(settings.token.clone());
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadLeagues => self.handle_load_leagues().await,
                NetworkRequest::LoadStandings { league_id, generation, fetch_stages } => {
                    Ok(self.handle_load_standings(league_id, generation, fetch_stages).await)
                }
                NetworkRequest::SaveOrder { update } => self.handle_save_order(update).await,
                NetworkRequest::ToggleStatus { standing_id, status } => {
                    self.handle_toggle_status(standing_id, status).await
                }
                NetworkRequest::SubmitEdit { standing_id, update } => {
                    self.handle_submit_edit(standing_id, update).await
                }
                NetworkRequest::ScrapeStandings => self.handle_scrape_standings().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|(kind, err)| {
                let class = if err.is_application() { "application" } else { "network" };
                error!("{kind:?} failed ({class} failure): {err}");
                NetworkResponse::Error { kind, message: err.user_message() }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_leagues(&self) -> Result<NetworkResponse, (RequestKind, ApiError)> {
        debug!("loading leagues");
        let leagues = self
            .client
            .fetch_leagues()
            .await
            .map_err(|e| (RequestKind::LoadLeagues, e))?;
        Ok(NetworkResponse::LeaguesLoaded { leagues })
    }

    /// Fail-soft: any failure becomes an empty collection, and stage metadata
    /// is only reported when the fetch succeeded so the caller never caches
    /// a failure.
    async fn handle_load_standings(
        &self,
        league_id: LeagueId,
        generation: u64,
        fetch_stages: bool,
    ) -> NetworkResponse {
        debug!("loading standings for league {league_id} (generation {generation})");
        let standings = match self.client.fetch_standings(league_id).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("standings load for league {league_id} failed: {e}");
                Vec::new()
            }
        };

        let stages = if fetch_stages {
            match self.client.fetch_stages().await {
                Ok(stages) => Some(stages),
                Err(e) => {
                    error!("stage metadata load failed: {e}");
                    None
                }
            }
        } else {
            None
        };

        NetworkResponse::StandingsLoaded { league_id, generation, standings, stages }
    }

    async fn handle_save_order(
        &self,
        update: OrderUpdate,
    ) -> Result<NetworkResponse, (RequestKind, ApiError)> {
        debug!("saving order of {} rows for league {}", update.order.len(), update.league_id);
        self.client
            .save_order(&update)
            .await
            .map_err(|e| (RequestKind::SaveOrder, e))?;
        Ok(NetworkResponse::OrderSaved { league_id: update.league_id })
    }

    async fn handle_toggle_status(
        &self,
        standing_id: StandingId,
        status: Status,
    ) -> Result<NetworkResponse, (RequestKind, ApiError)> {
        debug!("setting standing {standing_id} status to {}", status.label());
        self.client
            .update_standing(standing_id, &StandingUpdate::status_only(status))
            .await
            .map_err(|e| (RequestKind::ToggleStatus { standing_id }, e))?;
        Ok(NetworkResponse::StatusUpdated { standing_id, status })
    }

    async fn handle_submit_edit(
        &self,
        standing_id: StandingId,
        update: StandingUpdate,
    ) -> Result<NetworkResponse, (RequestKind, ApiError)> {
        debug!("submitting edit for standing {standing_id}");
        self.client
            .update_standing(standing_id, &update)
            .await
            .map_err(|e| (RequestKind::SubmitEdit, e))?;
        Ok(NetworkResponse::EditSaved { standing_id })
    }

    async fn handle_scrape_standings(&self) -> Result<NetworkResponse, (RequestKind, ApiError)> {
        debug!("triggering standings scrape");
        let message = self
            .client
            .trigger_standings_scrape()
            .await
            .map_err(|e| (RequestKind::ScrapeStandings, e))?;
        info!("standings scrape finished: {message}");
        Ok(NetworkResponse::ScrapeCompleted { message })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
