//! Content filtering entry points
//!
//! This module provides the word filter used before every content
//! submission: its error type, typed options, the serde-friendly config
//! mirror, and the `WordFilter` that runs a scan.

use crate::allowlist::{AllowlistRule, Context};
use crate::lexicon::Term;
use crate::scanner;
use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur while configuring the filter
///
/// Scanning itself never fails; only caller-supplied configuration can.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Custom allowlist pattern does not compile
    #[error("Invalid allowlist pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying regex error
        source: regex::Error,
    },

    /// Custom allowlist too large
    #[error("Custom allowlist too large: {count} exceeds maximum {max}")]
    TooManyWords {
        /// Actual count
        count: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Invalid filter configuration
    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Maximum number of custom allowlist entries
pub const MAX_CUSTOM_ALLOWLIST: usize = 500;

/// Which tiers run once an earlier tier has already found something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TierPolicy {
    /// Run every tier and union the results
    #[default]
    RunAll,
    /// Stop after the first tier that accepts a match
    ShortCircuit,
}

/// Options for a scan
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Declared context of the text
    pub context: Context,
    /// Exact words (lowercase) that are always allowed
    pub custom_allowlist: HashSet<String>,
    /// Extra allowlist rules
    pub custom_patterns: Vec<AllowlistRule>,
    /// Tier short-circuit behavior
    pub tier_policy: TierPolicy,
    /// Emit a trace event for every candidate decision
    pub diagnostics: bool,
}

impl FilterOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared context
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Add an extra allowlist rule
    pub fn with_pattern(mut self, rule: AllowlistRule) -> Self {
        self.custom_patterns.push(rule);
        self
    }

    /// Set the tier policy
    pub fn with_tier_policy(mut self, policy: TierPolicy) -> Self {
        self.tier_policy = policy;
        self
    }

    /// Enable or disable diagnostic trace events
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Add several words to the custom allowlist
    pub fn with_allowlist<I, S>(mut self, words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            self.allow_word(word)?;
        }
        Ok(self)
    }

    /// Add a word to the custom allowlist
    pub fn allow_word(&mut self, word: impl Into<String>) -> Result<()> {
        let word = word.into().trim().to_lowercase();
        if word.is_empty() || self.custom_allowlist.contains(&word) {
            return Ok(());
        }
        if self.custom_allowlist.len() >= MAX_CUSTOM_ALLOWLIST {
            return Err(FilterError::TooManyWords {
                count: self.custom_allowlist.len() + 1,
                max: MAX_CUSTOM_ALLOWLIST,
            });
        }
        self.custom_allowlist.insert(word);
        Ok(())
    }

    /// Remove a word from the custom allowlist
    pub fn disallow_word(&mut self, word: &str) {
        self.custom_allowlist.remove(&word.trim().to_lowercase());
    }
}

/// A custom allowlist pattern as it appears in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternConfig {
    /// Regular expression source
    pub pattern: String,
    /// Context the pattern belongs to
    #[serde(default)]
    pub context: Context,
}

/// Serializable filter configuration
///
/// Loaded from JSON and turned into [`FilterOptions`] with `try_into`,
/// which compiles the custom patterns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Declared context
    #[serde(default)]
    pub context: Context,
    /// Exact words that are always allowed
    #[serde(default)]
    pub custom_allowlist: Vec<String>,
    /// Extra allowlist rules
    #[serde(default)]
    pub custom_patterns: Vec<PatternConfig>,
    /// Tier short-circuit behavior
    #[serde(default)]
    pub tier_policy: TierPolicy,
    /// Emit diagnostic trace events
    #[serde(default)]
    pub diagnostics: bool,
}

impl FilterConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| FilterError::InvalidConfig(e.to_string()))
    }
}

impl TryFrom<FilterConfig> for FilterOptions {
    type Error = FilterError;

    fn try_from(config: FilterConfig) -> Result<Self> {
        let mut options = FilterOptions::new()
            .with_context(config.context)
            .with_tier_policy(config.tier_policy)
            .with_diagnostics(config.diagnostics)
            .with_allowlist(config.custom_allowlist)?;

        for entry in config.custom_patterns {
            if entry.pattern.trim().is_empty() {
                return Err(FilterError::InvalidConfig(
                    "custom allowlist pattern is empty".to_string(),
                ));
            }
            options = options.with_pattern(AllowlistRule::new(&entry.pattern, entry.context)?);
        }

        Ok(options)
    }
}

/// Banned-word filter with fixed options
///
/// Cheap to construct; the lexicon patterns are compiled once per process
/// and shared by every filter.
///
/// # Example
///
/// ```
/// use moderation::filtering::{FilterOptions, WordFilter};
///
/// let filter = WordFilter::new(FilterOptions::new());
/// assert!(filter.contains_banned_words("f.u.c.k"));
/// assert!(!filter.contains_banned_words("The cockpit of the airplane"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WordFilter {
    options: FilterOptions,
}

impl WordFilter {
    /// Create a filter
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// Scan text and return the full verdict
    ///
    /// `None` is treated as clean text.
    pub fn detect<'a>(&self, text: impl Into<Option<&'a str>>) -> Verdict {
        scanner::scan(text.into(), &self.options)
    }

    /// Banned terms in `text`, in lexicon order
    pub fn detect_terms<'a>(&self, text: impl Into<Option<&'a str>>) -> Vec<Term> {
        self.detect(text).into_terms()
    }

    /// Check whether `text` contains any banned term
    pub fn contains_banned_words<'a>(&self, text: impl Into<Option<&'a str>>) -> bool {
        self.detect(text).is_flagged()
    }

    /// Current options
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Replace the options
    pub fn set_options(&mut self, options: FilterOptions) {
        self.options = options;
    }
}
