//! Code::Stats API Client Library
//!
//! This crate provides an async Rust client for the Code::Stats API: reading
//! public user profiles and submitting pulses of per-language XP, with a
//! typed error taxonomy for classifying failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{Client, CodeStatsClient};
pub use error::{ApiError, Error, ErrorKind, NetworkError};
pub use transport::ClientConfig;
pub use types::{LanguageInfo, LanguageXp, MachineInfo, Pulse, UserProfile};

/// Canonical Code::Stats service URL
pub const DEFAULT_BASE_URL: &str = "https://codestats.net";

/// First path segment of every API endpoint
pub const API_PREFIX: &str = "api";

/// Header carrying the machine API token
pub const AUTH_HEADER: &str = "X-API-Token";

/// Default user agent string for requests
pub const DEFAULT_USER_AGENT: &str = concat!("codestats-rs/", env!("CARGO_PKG_VERSION"));

/// Result type for Code::Stats operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://codestats.net");
        assert_eq!(AUTH_HEADER, "X-API-Token");
        assert!(DEFAULT_USER_AGENT.starts_with("codestats-rs/"));
    }
}
