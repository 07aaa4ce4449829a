use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Backend
    pub api_url: Url,
    pub request_timeout_seconds: u64,

    // Local session persistence
    pub token_file: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));

        // Backend
        let api_url = env::var("TASKDESK_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api/".to_string());
        let api_url = parse_api_url(&api_url)?;
        let request_timeout_seconds = env::var("TASKDESK_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        // Local session persistence
        let token_file = match env::var("TASKDESK_TOKEN_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_file()?,
        };

        Ok(Settings {
            env,
            api_url,
            request_timeout_seconds,
            token_file,
        })
    }

    /// Scheme, host and port of the backend, without a trailing slash.
    ///
    /// Root-relative attachment paths are resolved against this.
    pub fn origin(&self) -> String {
        self.api_url.origin().ascii_serialization()
    }
}

/// Parse the API base URL, ensuring a trailing slash so relative joins
/// keep the last path segment.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("TASKDESK_API_URL is not a valid URL: {raw}"))
}

fn default_token_file() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine a data directory for the token file")?;
    Ok(data_dir.join("taskdesk").join("tokens.json"))
}
