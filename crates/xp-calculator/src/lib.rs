//! Level arithmetic for Code::Stats experience points
//!
//! Code::Stats derives a level from the total XP with
//! `level = floor(0.025 * sqrt(xp))`. This crate provides that formula, its
//! inverse, and the progress fraction within the current level.
//!
//! # Example
//!
//! ```
//! use xp_calculator::{Calculator, XpCalculator};
//!
//! let calc = Calculator::new();
//! assert_eq!(calc.get_level(4000), 1);
//! assert_eq!(calc.get_xp_for_next_level(4000), 6400);
//! assert!((calc.get_level_percentage(4000) - 0.5).abs() < 0.01);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calculator;

pub use calculator::{Calculator, XpCalculator, LEVEL_FACTOR};
