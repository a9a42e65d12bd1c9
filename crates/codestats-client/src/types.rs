//! Code::Stats API data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Public profile of a Code::Stats user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Username
    pub user: String,
    /// Total XP across all languages
    pub total_xp: i64,
    /// XP gained since the last pulse was processed
    pub new_xp: i64,
    /// XP per machine
    #[serde(default)]
    pub machines: HashMap<String, MachineInfo>,
    /// XP per language
    #[serde(default)]
    pub languages: HashMap<String, LanguageInfo>,
    /// XP per calendar day, keyed by ISO 8601 date
    #[serde(default)]
    pub dates: HashMap<String, i64>,
}

impl UserProfile {
    /// XP totals for a machine
    pub fn machine(&self, name: &str) -> Option<&MachineInfo> {
        self.machines.get(name)
    }

    /// XP totals for a language
    pub fn language(&self, name: &str) -> Option<&LanguageInfo> {
        self.languages.get(name)
    }
}

/// XP totals of one machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    /// Total XP
    pub xps: i64,
    /// Recently gained XP
    pub new_xps: i64,
}

/// XP totals of one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Total XP
    pub xps: i64,
    /// Recently gained XP
    pub new_xps: i64,
}

/// XP gained in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageXp {
    /// Language name as Code::Stats displays it
    pub language: String,
    /// Amount of XP
    pub xp: i64,
}

impl LanguageXp {
    /// Create a new language XP entry
    pub fn new(language: impl Into<String>, xp: i64) -> Self {
        Self {
            language: language.into(),
            xp,
        }
    }
}

/// A batch of XP gains coded at a given instant
///
/// Entries keep their insertion order; repeated languages are sent as-is.
///
/// # Examples
/// ```
/// use codestats_client::Pulse;
///
/// let pulse = Pulse::now().with_xp("Rust", 42).with_xp("Markdown", 3);
/// assert_eq!(pulse.xps.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    /// When the XP was gained
    pub coded_at: DateTime<Utc>,
    /// XP per language
    pub xps: Vec<LanguageXp>,
}

impl Pulse {
    /// Create an empty pulse coded at `coded_at`
    pub fn new(coded_at: DateTime<Utc>) -> Self {
        Self {
            coded_at,
            xps: Vec::new(),
        }
    }

    /// Create an empty pulse coded now
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Add an entry, builder style
    pub fn with_xp(mut self, language: impl Into<String>, xp: i64) -> Self {
        self.push(LanguageXp::new(language, xp));
        self
    }

    /// Add an entry
    pub fn push(&mut self, entry: LanguageXp) {
        self.xps.push(entry);
    }

    /// Whether the pulse carries no entries
    pub fn is_empty(&self) -> bool {
        self.xps.is_empty()
    }
}
