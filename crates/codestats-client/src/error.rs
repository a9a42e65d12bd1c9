//! Error taxonomy for Code::Stats API operations
//!
//! Failures fall into a few groups:
//!
//! - validation errors raised before any request is sent
//!   ([`Error::EmptyUsername`], [`Error::InvalidUsername`],
//!   [`Error::PulseTimestampTooOld`], and [`Error::Unauthorized`] for
//!   anonymous clients)
//! - transport failures, wrapped in [`NetworkError`]
//! - the well-known statuses 404/401/429, mapped to sentinel variants
//! - any other unexpected status, kept as an [`ApiError`] with its code
//! - undecodable success bodies, reported as [`Error::InvalidResponse`]
//!
//! The `is_*` predicates let callers branch on a category instead of a message.

use std::error::Error as StdError;
use std::fmt;

/// Substrings of a transport failure message that mark it as transient
const TEMPORARY_MARKERS: [&str; 5] = [
    "timeout",
    "connection refused",
    "no such host",
    "network is unreachable",
    "connection reset",
];

/// Errors returned by the Code::Stats client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user does not exist or their profile is private
    #[error("user not found or profile is private")]
    UserNotFound,

    /// The API token is missing or was rejected
    #[error("unauthorized: API token is missing or invalid")]
    Unauthorized,

    /// The pulse was coded more than a week ago
    #[error("pulse timestamp is older than a week and will be rejected")]
    PulseTimestampTooOld,

    /// An empty username was given
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The username cannot be addressed as a path segment
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    /// The API rate limit was exceeded
    #[error("API rate limit exceeded")]
    RateLimited,

    /// Generic network connectivity failure
    #[error("network error")]
    NetworkUnavailable,

    /// A success response body could not be decoded
    #[error("invalid response from API: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// Unexpected HTTP status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Transport failure with request context
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The pulse could not be serialized
    #[error("failed to serialize pulse: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request could not be constructed
    #[error("failed to create request: {0}")]
    Request(#[source] reqwest::Error),

    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The configured base URL cannot be used to build endpoints
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Identity-comparable category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::UserNotFound`]
    UserNotFound,
    /// See [`Error::Unauthorized`]
    Unauthorized,
    /// See [`Error::PulseTimestampTooOld`]
    PulseTimestampTooOld,
    /// See [`Error::EmptyUsername`]
    EmptyUsername,
    /// See [`Error::InvalidUsername`]
    InvalidUsername,
    /// See [`Error::RateLimited`]
    RateLimited,
    /// [`Error::NetworkUnavailable`] or [`Error::Network`]
    Network,
    /// See [`Error::InvalidResponse`]
    InvalidResponse,
    /// See [`Error::Api`]
    Api,
    /// Client construction and request encoding failures
    Other,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserNotFound => ErrorKind::UserNotFound,
            Error::Unauthorized => ErrorKind::Unauthorized,
            Error::PulseTimestampTooOld => ErrorKind::PulseTimestampTooOld,
            Error::EmptyUsername => ErrorKind::EmptyUsername,
            Error::InvalidUsername(_) => ErrorKind::InvalidUsername,
            Error::RateLimited => ErrorKind::RateLimited,
            Error::NetworkUnavailable | Error::Network(_) => ErrorKind::Network,
            Error::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Error::Api(_) => ErrorKind::Api,
            Error::Encode(_)
            | Error::Request(_)
            | Error::Build(_)
            | Error::InvalidBaseUrl { .. } => ErrorKind::Other,
        }
    }

    /// The user was not found, either as the sentinel or a 404 API error
    pub fn is_user_not_found(&self) -> bool {
        match self {
            Error::UserNotFound => true,
            Error::Api(e) => e.status_code() == 404,
            _ => false,
        }
    }

    /// Access was refused, either as the sentinel or a 401 API error
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::Unauthorized => true,
            Error::Api(e) => e.status_code() == 401,
            _ => false,
        }
    }

    /// The rate limit was hit, either as the sentinel or a 429 API error
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::RateLimited => true,
            Error::Api(e) => e.status_code() == 429,
            _ => false,
        }
    }

    /// The failure happened at the transport level
    pub fn is_network_error(&self) -> bool {
        matches!(self, Error::NetworkUnavailable | Error::Network(_))
    }

    /// Retrying the same operation later might succeed
    ///
    /// Structured errors answer for themselves. Of the sentinels only
    /// [`Error::RateLimited`] is temporary, matching a 429 [`ApiError`].
    pub fn is_temporary(&self) -> bool {
        match self {
            Error::Api(e) => e.is_temporary(),
            Error::Network(e) => e.is_temporary(),
            Error::RateLimited => true,
            _ => false,
        }
    }
}

// =============================================================================
// Structured Errors
// =============================================================================

/// Unexpected status returned by the API
///
/// # Examples
/// ```
/// use codestats_client::ApiError;
///
/// let error = ApiError::new(503, "maintenance", "/api/users/alice");
/// assert_eq!(error.to_string(), "API error 503 at /api/users/alice: maintenance");
/// assert!(error.is_temporary());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status_code: u16,
    message: String,
    endpoint: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status_code: u16, message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            endpoint: endpoint.into(),
        }
    }

    /// HTTP status code
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Error message from the response body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Endpoint the request was sent to, empty if unknown
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Server errors and rate limiting may clear up on retry
    pub fn is_temporary(&self) -> bool {
        self.status_code >= 500 || self.status_code == 429
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.endpoint.is_empty() {
            write!(f, "API error {}: {}", self.status_code, self.message)
        } else {
            write!(
                f,
                "API error {} at {}: {}",
                self.status_code, self.endpoint, self.message
            )
        }
    }
}

impl StdError for ApiError {}

/// Transport failure with the operation and URL that were attempted
///
/// # Examples
/// ```
/// use codestats_client::NetworkError;
///
/// let error = NetworkError::new("GET request", "https://codestats.net", "connection refused");
/// assert!(error.is_temporary());
/// ```
#[derive(Debug)]
pub struct NetworkError {
    operation: String,
    url: String,
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl NetworkError {
    /// Create a new network error
    pub fn new(
        operation: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            operation: operation.into(),
            url: url.into(),
            source: source.into(),
        }
    }

    /// Operation that failed, e.g. `"GET request"`
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Target URL, empty if unknown
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check the cause for well-known transient conditions
    ///
    /// A `reqwest` timeout or connect failure anywhere in the cause chain
    /// counts. Other causes are matched on their message text.
    pub fn is_temporary(&self) -> bool {
        let cause: &(dyn StdError + 'static) = self.source.as_ref();
        std::iter::successors(Some(cause), |&e| e.source()).any(|e| {
            if let Some(http) = e.downcast_ref::<reqwest::Error>() {
                if http.is_timeout() || http.is_connect() {
                    return true;
                }
            }
            let message = e.to_string();
            TEMPORARY_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
        })
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            write!(f, "network error during {}: {}", self.operation, self.source)
        } else {
            write!(
                f,
                "network error during {} to {}: {}",
                self.operation, self.url, self.source
            )
        }
    }
}

impl StdError for NetworkError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = self.source.as_ref();
        Some(cause)
    }
}

// =============================================================================
// Classification over arbitrary errors
// =============================================================================

/// Walk an error and its sources
fn chain<'a>(
    err: Option<&'a (dyn StdError + 'static)>,
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(err, |&e| e.source())
}

/// Whether `err` or anything it wraps means the user was not found
///
/// # Examples
/// ```
/// use codestats_client::{error, Error};
///
/// assert!(error::is_user_not_found(Some(&Error::UserNotFound)));
/// assert!(!error::is_user_not_found(None));
/// ```
pub fn is_user_not_found(err: Option<&(dyn StdError + 'static)>) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(Error::is_user_not_found)
            || e.downcast_ref::<ApiError>().is_some_and(|api| api.status_code() == 404)
    })
}

/// Whether `err` or anything it wraps means access was refused
pub fn is_unauthorized(err: Option<&(dyn StdError + 'static)>) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(Error::is_unauthorized)
            || e.downcast_ref::<ApiError>().is_some_and(|api| api.status_code() == 401)
    })
}

/// Whether `err` or anything it wraps means the rate limit was hit
pub fn is_rate_limited(err: Option<&(dyn StdError + 'static)>) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(Error::is_rate_limited)
            || e.downcast_ref::<ApiError>().is_some_and(|api| api.status_code() == 429)
    })
}

/// Whether `err` or anything it wraps is a transport failure
pub fn is_network_error(err: Option<&(dyn StdError + 'static)>) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(Error::is_network_error)
            || e.is::<NetworkError>()
    })
}

/// Whether `err` or anything it wraps may succeed when retried
pub fn is_temporary(err: Option<&(dyn StdError + 'static)>) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<Error>().is_some_and(Error::is_temporary)
            || e.downcast_ref::<ApiError>().is_some_and(ApiError::is_temporary)
            || e.downcast_ref::<NetworkError>().is_some_and(NetworkError::is_temporary)
    })
}
