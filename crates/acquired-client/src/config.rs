//! Client configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ClientError;

/// Processor environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test endpoint; no money moves.
    #[default]
    Staging,
    /// Live endpoint.
    Production,
}

impl Environment {
    /// Base URL of the API for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Staging => "https://test-api.acquired.com/v1",
            Self::Production => "https://api.acquired.com/v1",
        }
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staging" | "test" => Ok(Self::Staging),
            "production" | "live" => Ok(Self::Production),
            other => Err(ClientError::Configuration(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging => f.write_str("staging"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Client configuration loaded from a secrets file or environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Environment selecting the default base URL (default: staging).
    pub environment: Environment,

    /// Application id used to log in.
    pub app_id: Option<String>,

    /// Application key used to log in.
    pub app_key: Option<String>,

    /// Sent as the `Company-Id` header when set.
    pub company_id: Option<String>,

    /// Explicit base URL, overriding the environment's.
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key.as_ref().map(|_| "<redacted>"))
            .field("company_id", &self.company_id)
            .field("api_url", &self.api_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Acquired secrets file structure.
#[derive(Debug, Deserialize)]
struct AcquiredSecrets {
    app_id: String,
    app_key: String,
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    environment: Option<Environment>,
    #[serde(default)]
    api_url: Option<String>,
}

impl ClientConfig {
    /// Load configuration from the secrets file or environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_sources(load_acquired_secrets(), |name| std::env::var(name).ok())
    }

    /// Build configuration from already-loaded secrets and a variable lookup.
    ///
    /// Credentials come from the secrets when present, otherwise from
    /// `ACQUIRED_APP_ID`, `ACQUIRED_APP_KEY` and `ACQUIRED_COMPANY_ID`.
    fn from_sources(
        secrets: Option<AcquiredSecrets>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env_environment = var("ACQUIRED_ENVIRONMENT").and_then(|value| {
            value
                .parse()
                .map_err(|e: ClientError| {
                    tracing::warn!(error = %e, "Ignoring ACQUIRED_ENVIRONMENT");
                })
                .ok()
        });

        let timeout_seconds = var("ACQUIRED_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        match secrets {
            Some(secrets) => Self {
                environment: secrets
                    .environment
                    .or(env_environment)
                    .unwrap_or_default(),
                app_id: Some(secrets.app_id),
                app_key: Some(secrets.app_key),
                company_id: secrets
                    .company_id
                    .or_else(|| var("ACQUIRED_COMPANY_ID")),
                api_url: secrets.api_url.or_else(|| var("ACQUIRED_API_URL")),
                timeout_seconds,
            },
            None => Self {
                environment: env_environment.unwrap_or_default(),
                app_id: var("ACQUIRED_APP_ID"),
                app_key: var("ACQUIRED_APP_KEY"),
                company_id: var("ACQUIRED_COMPANY_ID"),
                api_url: var("ACQUIRED_API_URL"),
                timeout_seconds,
            },
        }
    }

    /// The base URL requests go to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// Returns `true` when both credentials are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.app_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.app_key.as_deref().is_some_and(|s| !s.is_empty())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Staging,
            app_id: None,
            app_key: None,
            company_id: None,
            api_url: None,
            timeout_seconds: 30,
        }
    }
}

/// Load Acquired secrets from the first secrets file found.
fn load_acquired_secrets() -> Option<AcquiredSecrets> {
    let secret_paths = [
        ".secrets/acquired.json",
        "acquired-sync/.secrets/acquired.json",
        "../.secrets/acquired.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<AcquiredSecrets>(path) {
            tracing::info!(path = %path, "Loaded Acquired secrets from file");
            return Some(secrets);
        }
    }

    tracing::debug!("Acquired secrets file not found, using environment variables");
    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
