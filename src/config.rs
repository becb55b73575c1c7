//! Client configuration parsed from environment variables.
//!
//! The API base URL is resolved once at startup and handed to the HTTP
//! client; nothing recomputes it per request.

use std::time::Duration;

pub const PRODUCTION_BASE_URL: &str = "https://express-prisma-versel.vercel.app";
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_MESSAGE_TTL_MS: u64 = 3000;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Build mode; selects the default API base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    Production,
    #[default]
    Development,
}

impl Mode {
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Development => DEVELOPMENT_BASE_URL,
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(ConfigError::Parse(format!(
                "unknown REGFORM_MODE '{other}' (expected 'production' or 'development')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    /// `None` leaves requests unbounded.
    pub request: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: Mode,
    pub base_url: String,
    pub message_ttl: Duration,
    pub timeouts: HttpTimeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `REGFORM_MODE`: `development` (default) or `production`
    /// - `REGFORM_API_BASE_URL`: overrides the mode's default base URL
    /// - `REGFORM_MESSAGE_TTL_MS`: status message lifetime, default 3000
    /// - `REGFORM_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REGFORM_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if any set variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if any present value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("REGFORM_MODE") {
            Some(raw) => raw.parse::<Mode>()?,
            None => Mode::default(),
        };
        let base_url = lookup("REGFORM_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| mode.default_base_url().to_owned());
        let message_ttl_ms = parse_u64(&lookup, "REGFORM_MESSAGE_TTL_MS")?.unwrap_or(DEFAULT_MESSAGE_TTL_MS);
        let connect_secs = parse_u64(&lookup, "REGFORM_CONNECT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let request_secs = parse_u64(&lookup, "REGFORM_REQUEST_TIMEOUT_SECS")?;

        Ok(Self {
            mode,
            base_url: normalize_base_url(&base_url),
            message_ttl: Duration::from_millis(message_ttl_ms),
            timeouts: HttpTimeouts {
                connect: Duration::from_secs(connect_secs),
                request: request_secs.map(Duration::from_secs),
            },
        })
    }

    /// Apply command-line overrides. An explicit base URL wins over the mode default.
    #[must_use]
    pub fn with_overrides(mut self, mode: Option<Mode>, base_url: Option<String>) -> Self {
        if let Some(mode) = mode {
            if self.base_url == self.mode.default_base_url() {
                self.base_url = mode.default_base_url().to_owned();
            }
            self.mode = mode;
        }
        if let Some(url) = base_url {
            self.base_url = normalize_base_url(&url);
        }
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mode = Mode::default();
        Self {
            mode,
            base_url: mode.default_base_url().to_owned(),
            message_ttl: Duration::from_millis(DEFAULT_MESSAGE_TTL_MS),
            timeouts: HttpTimeouts { connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS), request: None },
        }
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{key}='{raw}': {e}"))),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
