use crate::wire::{Envelope, WireLeague, WireStage, WireStanding};
use crate::{League, LeagueId, OrderUpdate, Stage, StandingId, StandingRow, StandingUpdate};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// The scrape walks every league upstream before answering.
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the back-office REST API.
#[derive(Debug, Clone)]
pub struct BackofficeApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    /// Non-success status; carries the envelope `error` when the body had one.
    Api(reqwest::Error, String, Option<String>),
    Parsing(reqwest::Error, String),
    Decoding(serde_json::Error, String),
    /// `data` was present but not the collection the endpoint promises.
    Shape(String),
    /// Well-formed body with `success: false`.
    Application { url: String, message: String },
}

impl ApiError {
    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application { .. })
    }

    /// Short message suitable for a notification popup.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(..) => "could not reach the server".to_string(),
            ApiError::Api(_, _, Some(message)) => message.clone(),
            ApiError::Api(e, _, None) => match e.status() {
                Some(status) => format!("server responded with {status}"),
                None => "server rejected the request".to_string(),
            },
            ApiError::Parsing(..) | ApiError::Decoding(..) | ApiError::Shape(_) => {
                "server sent an unexpected response".to_string()
            }
            ApiError::Application { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url, None) => write!(f, "API error for {url}: {e}"),
            ApiError::Api(e, url, Some(message)) => write!(f, "API error for {url}: {e} ({message})"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Decoding(e, url) => write!(f, "Decode error for {url}: {e}"),
            ApiError::Shape(url) => write!(f, "Unexpected payload shape for {url}"),
            ApiError::Application { url, message } => {
                write!(f, "Request to {url} was not successful: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _, _) | ApiError::Parsing(e, _) => Some(e),
            ApiError::Decoding(e, _) => Some(e),
            ApiError::Shape(_) | ApiError::Application { .. } => None,
        }
    }
}

impl BackofficeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("standings-tui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_leagues(&self) -> ApiResult<Vec<League>> {
        let leagues: Vec<WireLeague> = self.get_collection("/api/leagues").await?;
        Ok(leagues.into_iter().map(League::from).collect())
    }

    pub async fn fetch_stages(&self) -> ApiResult<Vec<Stage>> {
        let stages: Vec<WireStage> = self.get_collection("/api/stages").await?;
        Ok(stages.into_iter().map(Stage::from).collect())
    }

    pub async fn fetch_standings(&self, league_id: LeagueId) -> ApiResult<Vec<StandingRow>> {
        let path = format!("/api/standings?league_id={league_id}");
        let rows: Vec<WireStanding> = self.get_collection(&path).await?;
        Ok(rows.into_iter().map(StandingRow::from).collect())
    }

    /// Persist a manual rank order for one league in a single request.
    pub async fn save_order(&self, update: &OrderUpdate) -> ApiResult<()> {
        self.send_json(Method::POST, "/api/standings/order", update)
            .await
            .map(|_| ())
    }

    pub async fn update_standing(&self, id: StandingId, update: &StandingUpdate) -> ApiResult<()> {
        let path = format!("/api/standings/{id}");
        self.send_json(Method::PUT, &path, update).await.map(|_| ())
    }

    /// Run the upstream standings scrape for every league. The server answers
    /// with plain text rather than the JSON envelope.
    pub async fn trigger_standings_scrape(&self) -> ApiResult<String> {
        let url = format!("{}/scraper/standing", self.base_url);
        let builder = self.request(Method::GET, &url).timeout(SCRAPE_TIMEOUT);
        let response = self.send(builder, &url).await?;
        response
            .text()
            .await
            .map(|body| body.trim().to_string())
            .map_err(|e| ApiError::Parsing(e, url))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url).timeout(self.timeout);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let url = format!("{}{path}", self.base_url);
        let envelope = self.execute(self.request(Method::GET, &url), &url).await?;
        match envelope.data {
            // The server encodes an empty result set as null.
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(data @ serde_json::Value::Array(_)) => {
                serde_json::from_value(data).map_err(|e| ApiError::Decoding(e, url))
            }
            Some(_) => Err(ApiError::Shape(url)),
        }
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<Envelope> {
        let url = format!("{}{path}", self.base_url);
        self.execute(self.request(method, &url).json(body), &url).await
    }

    /// Send and reject non-success statuses, keeping the server's error text.
    async fn send(&self, builder: RequestBuilder, url: &str) -> ApiResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let failure = response.error_for_status_ref().err();
        match failure {
            None => Ok(response),
            Some(e) => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|body| serde_json::from_str::<Envelope>(&body).ok())
                    .and_then(|envelope| envelope.error)
                    .filter(|m| !m.trim().is_empty());
                Err(ApiError::Api(e, url.to_owned(), message))
            }
        }
    }

    async fn execute(&self, builder: RequestBuilder, url: &str) -> ApiResult<Envelope> {
        let envelope = self
            .send(builder, url)
            .await?
            .json::<Envelope>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))?;

        if !envelope.success {
            return Err(ApiError::Application {
                url: url.to_owned(),
                message: envelope
                    .error
                    .clone()
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        Ok(envelope)
    }
}
