use log::LevelFilter;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: None,
        }
    }
}

impl AppSettings {
    /// Read settings from the environment. `.env` is loaded by `main` first.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            api_url: get("STADMIN_API_URL").unwrap_or(defaults.api_url),
            token: get("STADMIN_TOKEN"),
            timeout: get("STADMIN_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            log_level: get("STADMIN_LOG").and_then(|v| v.parse::<LevelFilter>().ok()),
        }
    }
}
