//! # Backend Delivery
//!
//! This module hands finished embed payloads to the bot backend over HTTP.
//! The backend owns the actual posting to chat; this client only delivers
//! the composed `{embed}` or `{embeds}` payload and reports what happened.
//!
//! ## Features
//!
//! - **Single or bulk delivery**: one embed or the whole composed list
//! - **Bearer authentication**: optional per-request operator token
//! - **Error surfacing**: backend failures come back verbatim and can be
//!   retried by re-invoking the send
//! - **Optional integration**: composing works even when no backend is
//!   configured; only delivery is refused
//!
//! ## Environment Configuration
//!
//! Set `BACKEND_URL` to the backend's base URL. The payload is POSTed to
//! `<BACKEND_URL>/message`. If the variable is not set, sends fail with a
//! transport error while the rest of the composer keeps working.

use reqwest::Client;
use tracing::{info, warn};

use crate::error::ComposeError;
use crate::models::EmbedRequest;

/// HTTP client for delivering composed embeds to the backend.
///
/// Encapsulates the reusable `reqwest::Client` and the optional backend
/// base URL loaded from the environment. The instance is usable whether or
/// not a backend is configured; an unconfigured backend turns every send
/// into a recoverable transport error.
pub struct BackendClient {
    /// Reusable HTTP client; connection pooling comes for free
    client: Client,

    /// Base URL from `BACKEND_URL`, `None` when delivery is disabled
    backend_url: Option<String>,
}

impl BackendClient {
    /// Creates a new backend client from the environment.
    ///
    /// Reads `BACKEND_URL` once at construction. A missing value is logged
    /// as a warning rather than treated as an error, so an operator can
    /// compose and preview embeds without any backend at all.
    pub fn new() -> Self {
        let client = Client::new();
        let backend_url = std::env::var("BACKEND_URL").ok();

        if backend_url.is_none() {
            warn!("BACKEND_URL not set - embeds can be composed but not delivered");
        }

        Self {
            client,
            backend_url,
        }
    }

    /// Delivers an outbound payload to `<BACKEND_URL>/message`.
    ///
    /// A non-blank `token` is attached as a `Bearer` authorization header.
    /// Failures are all recoverable: a missing backend URL and a
    /// non-success status surface as [`ComposeError::Transport`] with the
    /// backend's own message, network errors as [`ComposeError::Http`].
    /// The caller retries by simply sending again.
    pub async fn send_embed(
        &self,
        request: &EmbedRequest,
        token: &str,
    ) -> Result<(), ComposeError> {
        let Some(backend_url) = &self.backend_url else {
            return Err(ComposeError::Transport(
                "BACKEND_URL is not configured".to_string(),
            ));
        };

        let mut http_request = self
            .client
            .post(format!("{backend_url}/message"))
            .json(request);
        if !token.trim().is_empty() {
            http_request = http_request.bearer_auth(token.trim());
        }

        let response = http_request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ComposeError::Transport(format!(
                "backend returned {status}: {body}"
            )));
        }

        info!("Embed payload delivered to the backend");
        Ok(())
    }
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Manual `Clone` so one client can be shared between the composer and any
/// retry path; the underlying `reqwest::Client` clones cheaply.
impl Clone for BackendClient {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            backend_url: self.backend_url.clone(),
        }
    }
}
