//! Code::Stats API client
//!
//! [`Client`] implements [`CodeStatsClient`] for both anonymous and
//! authenticated use. What a client may do depends only on whether its
//! configured token is empty: anonymous clients can read public profiles
//! but are refused before sending a pulse.
//!
//! # Example
//!
//! ```rust,no_run
//! use codestats_client::{Client, CodeStatsClient, Pulse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("your-api-token")?;
//!
//!     let profile = client.get_user_profile("Nicd").await?;
//!     println!("{} has {} XP", profile.user, profile.total_xp);
//!
//!     client.send_pulse(&Pulse::now().with_xp("Rust", 12)).await?;
//!     Ok(())
//! }
//! ```

use crate::error::{ApiError, Error};
use crate::transport::{ApiRequest, ApiResponse, ClientConfig, Transport};
use crate::types::{Pulse, UserProfile};
use crate::{Result, API_PREFIX, AUTH_HEADER, DEFAULT_BASE_URL};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Url;

/// Oldest pulse the service accepts, in days
const MAX_PULSE_AGE_DAYS: i64 = 7;

/// Operations offered by the Code::Stats API
#[async_trait]
pub trait CodeStatsClient: Send + Sync {
    /// Retrieve the public profile of `username`
    ///
    /// Fails with [`Error::UserNotFound`] when the user does not exist or
    /// the profile is private.
    async fn get_user_profile(&self, username: &str) -> Result<UserProfile>;

    /// Submit a pulse for the authenticated machine
    ///
    /// The pulse must have been coded within the last week.
    async fn send_pulse(&self, pulse: &Pulse) -> Result<()>;
}

/// HTTP client for the Code::Stats API
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    /// HTTP transport
    transport: Transport,
    /// Configuration
    config: ClientConfig,
    /// Parsed base URL
    base_url: Url,
}

impl Client {
    /// Create an authenticated client against the public service
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, DEFAULT_BASE_URL)
    }

    /// Create a read-only client against the public service
    ///
    /// # Example
    ///
    /// ```rust
    /// use codestats_client::Client;
    ///
    /// let client = Client::anonymous().unwrap();
    /// assert!(client.is_anonymous());
    /// ```
    pub fn anonymous() -> Result<Self> {
        Self::with_base_url("", DEFAULT_BASE_URL)
    }

    /// Create a client against a custom deployment or test server
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_token).with_base_url(base_url))
    }

    /// Create a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let transport = Transport::new(&config)?;

        Ok(Self {
            transport,
            config,
            base_url,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Whether the client has no API token
    pub fn is_anonymous(&self) -> bool {
        self.config.is_anonymous()
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl {
                url: self.config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }
}

/// Turn an unexpected response into an [`ApiError`]
fn unexpected_status(response: &ApiResponse, endpoint: &Url) -> Error {
    tracing::warn!(
        "Unexpected status {} from {}: {}",
        response.status,
        endpoint,
        response.body
    );
    Error::Api(ApiError::new(
        response.status,
        response.error_message(),
        endpoint.as_str(),
    ))
}

/// Log the server's backoff hint and return [`Error::RateLimited`]
fn rate_limited(response: &ApiResponse, endpoint: &Url) -> Error {
    match response.header("Retry-After") {
        Some(retry_after) => tracing::warn!(
            "Rate limited by {}, retry after {}",
            endpoint,
            retry_after
        ),
        None => tracing::warn!("Rate limited by {}", endpoint),
    }
    Error::RateLimited
}

#[async_trait]
impl CodeStatsClient for Client {
    async fn get_user_profile(&self, username: &str) -> Result<UserProfile> {
        if username.is_empty() {
            return Err(Error::EmptyUsername);
        }
        // URL parsing would resolve these against the parent path
        if username == "." || username == ".." {
            return Err(Error::InvalidUsername(username.to_string()));
        }

        let endpoint = self.endpoint(&["users", username])?;
        let response = self
            .transport
            .execute(ApiRequest::get(endpoint.clone()))
            .await?;

        match response.status {
            200 => response.json().map_err(Error::InvalidResponse),
            404 => Err(Error::UserNotFound),
            401 => Err(Error::Unauthorized),
            429 => Err(rate_limited(&response, &endpoint)),
            _ => Err(unexpected_status(&response, &endpoint)),
        }
    }

    async fn send_pulse(&self, pulse: &Pulse) -> Result<()> {
        if self.is_anonymous() {
            return Err(Error::Unauthorized);
        }

        let oldest_accepted = Utc::now() - Duration::days(MAX_PULSE_AGE_DAYS);
        if pulse.coded_at < oldest_accepted {
            tracing::debug!(
                "Rejecting pulse coded at {} (older than {})",
                pulse.coded_at,
                oldest_accepted
            );
            return Err(Error::PulseTimestampTooOld);
        }

        let endpoint = self.endpoint(&["my", "pulses"])?;
        let request = ApiRequest::post(endpoint.clone())
            .header(AUTH_HEADER, self.config.api_token.as_str())
            .json_body(pulse)
            .map_err(Error::Encode)?;

        let response = self.transport.execute(request).await?;

        match response.status {
            201 => Ok(()),
            401 => Err(Error::Unauthorized),
            429 => Err(rate_limited(&response, &endpoint)),
            _ => Err(unexpected_status(&response, &endpoint)),
        }
    }
}
