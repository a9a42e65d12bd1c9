//! Code::Stats for Rust
//!
//! Facade over the workspace crates: the async API client and the XP level
//! calculator. The two are independent; a typical caller fetches a profile
//! and feeds its XP totals to the calculator.
//!
//! # Example
//!
//! ```rust,no_run
//! use codestats::client::{Client, CodeStatsClient};
//! use codestats::xp::{Calculator, XpCalculator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::anonymous()?;
//!     let profile = client.get_user_profile("Nicd").await?;
//!
//!     let calc = Calculator::new();
//!     println!(
//!         "User {} is at level {} ({:.2}% progress)",
//!         profile.user,
//!         calc.get_level(profile.total_xp),
//!         calc.get_level_percentage(profile.total_xp) * 100.0
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Code::Stats API client
pub use codestats_client as client;

/// XP level calculator
pub use xp_calculator as xp;
