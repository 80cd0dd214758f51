use std::time::Duration;

use reqwest::Url;

use crate::error::{Result, TempoError};

pub const DEFAULT_API_BASE: &str = "https://api.tempo.io/4";
pub const DEFAULT_USER_AGENT: &str = concat!("tempo-mcp-server/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_COOLDOWN_MS: u64 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct TempoConfig {
    pub base_url: String,
    pub token: String,
    pub user_agent: String,
    pub cooldown: Duration,
    pub timeout: Duration,
}

impl std::fmt::Debug for TempoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempoConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("cooldown", &self.cooldown)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TempoConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = duration;
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Base endpoint with exactly one trailing slash, so relative paths append instead of replacing the last segment.
    pub fn api_root(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    /// Joins a relative endpoint path onto the configured base, preserving the base path.
    pub fn endpoint(&self, path: &str) -> String {
        let mut url = self.api_root();
        url.push_str(path.trim_start_matches('/'));
        url
    }

    /// Checks that the token is present and the base endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(TempoError::Configuration("API token is empty".to_string()));
        }
        let parsed = Url::parse(&self.api_root())
            .map_err(|err| TempoError::Configuration(format!("invalid base URL: {err}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(TempoError::Configuration(format!(
                "unsupported base URL scheme: {other}"
            ))),
        }
    }
}
