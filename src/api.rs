//! HTTP/JSON fetch primitive used by every extractor.
//!
//! # Architecture
//!
//! - [`FetchJson`]: the seam extractors are generic over, "fetch this URL and
//!   give me parsed JSON or a descriptive error"
//! - [`HttpFetcher`]: the reqwest-backed implementation
//!
//! Requests are never retried: a failed request fails the unit of
//! work that issued it.

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Fetch a URL and parse the response body as JSON.
///
/// Implemented for references too, so one fetcher can back several
/// extractors.
pub trait FetchJson {
    /// Fetch `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL, queried with a plain GET
    ///
    /// # Returns
    ///
    /// The parsed body. Its shape is not checked here.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Fetch`] on transport failures and timeouts
    /// - [`ExtractError::Status`] on non-2xx responses
    /// - [`ExtractError::MalformedBody`] when the body is not JSON
    async fn fetch_json(&self, url: &str) -> Result<Value, ExtractError>;
}

impl<T: FetchJson> FetchJson for &T {
    async fn fetch_json(&self, url: &str) -> Result<Value, ExtractError> {
        (**self).fetch_json(url).await
    }
}

/// [`FetchJson`] over a shared [`reqwest::Client`].
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and user agent.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies `timeout` and `user_agent`
    ///
    /// # Errors
    ///
    /// [`ExtractError::Fetch`] if the TLS backend cannot be initialized.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|source| ExtractError::Fetch {
                url: config.api_base.clone(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl FetchJson for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_json(&self, url: &str) -> Result<Value, ExtractError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExtractError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Non-success response");
            return Err(ExtractError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ExtractError::Fetch {
            url: url.to_string(),
            source,
        })?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                debug!(
                    bytes = body.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Fetched JSON"
                );
                Ok(value)
            }
            Err(source) => {
                warn!(
                    error = %source,
                    body_preview = %truncate_for_log(&body, 300),
                    "Response body is not valid JSON"
                );
                Err(ExtractError::MalformedBody {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}
