//! HTTP transport for the Code::Stats API
//!
//! This module holds the client configuration, request/response types, and
//! a thin executor over `reqwest`. It knows nothing about individual
//! endpoints: it sends one request, and hands back the status, headers and
//! body, or a [`NetworkError`] when no response arrived.

use crate::error::{Error, NetworkError};
use crate::{Result, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use reqwest::{Client as ReqwestClient, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the Code::Stats client
///
/// # Examples
/// ```
/// use codestats_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("my-token")
///     .with_base_url("http://localhost:4000")
///     .with_timeout(Duration::from_secs(5));
/// assert!(!config.is_anonymous());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base service URL (e.g., "https://codestats.net")
    pub base_url: String,
    /// Machine API token, empty for anonymous access
    pub api_token: String,
    /// Overall timeout of a single request
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with an API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API token
    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = api_token.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether requests are made without a token
    pub fn is_anonymous(&self) -> bool {
        self.api_token.is_empty()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &if self.is_anonymous() { "" } else { "<redacted>" })
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A request to a single API endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute endpoint URL
    pub url: Url,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (for POST)
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::with_method(HttpMethod::Get, url)
    }

    /// Create a POST request
    pub fn post(url: Url) -> Self {
        Self::with_method(HttpMethod::Post, url)
    }

    fn with_method(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
        .header("Accept", "application/json")
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON request body
    pub fn json_body<T: Serialize>(
        mut self,
        value: &T,
    ) -> std::result::Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Operation name used when reporting transport failures
    pub fn operation(&self) -> String {
        format!("{} request", self.method.as_str())
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Error body convention of the API: `{"error": "<message>"}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Error message
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw response from an API endpoint
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: String,
}

impl ApiResponse {
    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(&key.to_ascii_lowercase())
    }

    /// Decode the body as JSON
    pub fn json<T>(&self) -> std::result::Result<T, serde_json::Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        serde_json::from_str(&self.body)
    }

    /// Human-readable error message carried by the body
    ///
    /// Uses the `error` field of a JSON body when present and non-empty,
    /// otherwise the raw body text.
    pub fn error_message(&self) -> String {
        match serde_json::from_str::<ErrorBody>(&self.body) {
            Ok(ErrorBody { error: Some(message) }) if !message.is_empty() => message,
            _ => self.body.clone(),
        }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Executes API requests over a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct Transport {
    client: ReqwestClient,
}

impl Transport {
    /// Build a transport with the timeout and user agent of `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Build)?;

        Ok(Self { client })
    }

    /// Send a request and collect the whole response
    ///
    /// Any status counts as a response; only failures to obtain one are
    /// errors.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let operation = request.operation();
        let url = request.url.to_string();

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        tracing::debug!("{} {}", request.method.as_str(), url);

        let response = req.send().await.map_err(|e| {
            if e.is_builder() {
                return Error::Request(e);
            }
            tracing::warn!("{} to {} failed: {}", operation, url, e);
            Error::Network(NetworkError::new(operation.as_str(), url.as_str(), e))
        })?;

        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!("Reading response from {} failed: {}", url, e);
            NetworkError::new(operation.as_str(), url.as_str(), e)
        })?;

        tracing::debug!("{} {} -> {}", request.method.as_str(), url, status);

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
