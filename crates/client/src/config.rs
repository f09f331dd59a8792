use std::env;

use eyre::{Result, eyre};

pub const DEFAULT_URL: &str = "http://localhost:3000";

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root, without the `/api` suffix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(eyre!("KIDDYTIME_URL must start with http:// or https://"));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            ..Self::default()
        })
    }

    /// Load configuration from `KIDDYTIME_URL` and
    /// `KIDDYTIME_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("KIDDYTIME_URL") {
            Ok(url) => Self::new(&url)?,
            Err(_) => Self::default(),
        };
        if let Some(timeout) = env::var("KIDDYTIME_TIMEOUT_SECONDS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout_seconds = timeout;
        }
        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}
