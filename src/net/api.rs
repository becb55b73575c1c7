//! REST client for the users backend.
//!
//! Thin reqwest wrapper over `POST/GET/DELETE {base}/users`. Body parsing
//! lives in free functions so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Every failure comes back as an [`ApiError`]. Callers are expected to log
//! [`ApiError::detail`] and show a fixed message; no variant is retried.

use super::types::User;
use crate::config::ClientConfig;
use crate::state::form::FormData;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

const USERS_PATH: &str = "/users";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by users API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Diagnostic detail for logs: the server's body when it sent one,
    /// otherwise the error description.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// The three calls the form component makes against the backend.
#[async_trait::async_trait]
pub trait UsersApi: Send + Sync {
    /// `POST /users` with `{username, password}`.
    ///
    /// Any 2xx status is a success. The created record is returned when the
    /// body parses as one; other body shapes yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    async fn create_user(&self, form: &FormData) -> Result<Option<User>, ApiError>;

    /// `GET /users`; returns records in server order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status, or a malformed body.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// `DELETE /users`; the response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-2xx status.
    async fn delete_users(&self) -> Result<(), ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpUsersApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpUsersApi {
    /// Build a client bound to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if reqwest rejects the settings.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.timeouts.connect);
        if let Some(request) = config.timeouts.request {
            builder = builder.timeout(request);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        users_url(&self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl UsersApi for HttpUsersApi {
    async fn create_user(&self, form: &FormData) -> Result<Option<User>, ApiError> {
        let text = self.send(self.http.post(self.users_url()).json(form)).await?;
        Ok(parse_created(&text))
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let text = self.send(self.http.get(self.users_url())).await?;
        parse_users(&text)
    }

    async fn delete_users(&self) -> Result<(), ApiError> {
        self.send(self.http.delete(self.users_url())).await?;
        Ok(())
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn users_url(base_url: &str) -> String {
    format!("{}{USERS_PATH}", base_url.trim_end_matches('/'))
}

/// Best-effort read of a create response; the status already decided success.
fn parse_created(json: &str) -> Option<User> {
    match serde_json::from_str(json) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, body = json, "create response is not a user record");
            None
        }
    }
}

fn parse_users(json: &str) -> Result<Vec<User>, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}
