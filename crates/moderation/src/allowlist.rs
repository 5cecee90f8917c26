//! Allowlist resolution
//!
//! Legitimate words that happen to contain a banned term ("assignment",
//! "cockpit", "Nigeria"), clinical vocabulary and common greetings. Rules
//! here only ever suppress a match; they never cause one.

use crate::filtering::{FilterError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Language or domain context of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    /// No declared context; only unscoped and multilingual rules apply
    #[default]
    Unscoped,
    /// English prose
    English,
    /// Mixed-language text, including greetings
    Multilingual,
    /// Clinical or anatomical writing
    Medical,
}

/// A suppression pattern scoped to a context
#[derive(Debug, Clone)]
pub struct AllowlistRule {
    pattern: Regex,
    context: Context,
}

impl AllowlistRule {
    /// Compile a case-insensitive allowlist rule
    pub fn new(pattern: &str, context: Context) -> Result<Self> {
        let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|source| {
            FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self { pattern: regex, context })
    }

    /// The rule's pattern source
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The context the rule belongs to
    pub fn context(&self) -> Context {
        self.context
    }

    /// Whether the rule is consulted for a scan declared as `call`
    pub fn applies_to(&self, call: Context) -> bool {
        matches!(self.context, Context::Unscoped | Context::Multilingual) || self.context == call
    }

    /// The first match of this rule in `word` is the whole word
    fn matches_word(&self, word: &str) -> bool {
        self.pattern
            .find(word)
            .is_some_and(|m| m.as_str().to_lowercase() == word)
    }

    /// Some match of this rule in `text` is exactly `word`
    fn matches_in_text(&self, word: &str, text: &str) -> bool {
        self.pattern
            .find_iter(text)
            .any(|m| m.as_str().to_lowercase() == word)
    }
}

const DEFAULT_RULES: &[(&str, Context)] = &[
    (
        r"\b\w*ass(?:ess|ign|ume|ociat|embl|ist|umpt|et|ur|imil|on|ag|iv|ion|ay|av|pass|bass|class|glass|grass)\w*\b",
        Context::English,
    ),
    (r"\b\w*cum(?:ber|ulat|stan|docu|in)\w*\b", Context::English),
    (r"\bbase(?:ment|line)\b", Context::English),
    (
        r"\b\w*cock(?:pit|tail|atoo|peac|shuttl|hay|wood|game)\w*\b",
        Context::English,
    ),
    (r"\b\w*anal(?:ysi|ytic|og)\w*\b", Context::English),
    (r"\b\w*rape(?:fruit|utic|s)\w*\b", Context::English),
    (
        r"\b\w*nig(?:ht|eria|erian|htmare|hty|gard|gardly)\w*\b",
        Context::English,
    ),
    (
        r"\b(?:assalomu\s+aleykum|salam\s+alaikum|salaam|shalom)\b",
        Context::Multilingual,
    ),
    (
        r"\b(?:penis|vagina|anus|rectum|semen|sperm|testicle|scrotum|foreskin)\b",
        Context::Medical,
    ),
];

/// The built-in allowlist rules, compiled once per process
pub fn default_rules() -> &'static [AllowlistRule] {
    static RULES: OnceLock<Vec<AllowlistRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        DEFAULT_RULES
            .iter()
            .map(|(pattern, context)| {
                AllowlistRule::new(pattern, *context)
                    .unwrap_or_else(|e| panic!("built-in allowlist rule is invalid: {}", e))
            })
            .collect()
    })
}

/// Decide whether `word` is a legitimate word rather than a disguised term
///
/// `word` is suppressed when it is in the caller's custom allowlist, when
/// an applicable rule matches it exactly, or when an applicable rule
/// matches a phrase in `source_text` that is exactly `word`.
pub fn is_allowed(
    word: &str,
    context: Context,
    source_text: &str,
    custom_allowlist: &HashSet<String>,
    custom_rules: &[AllowlistRule],
) -> bool {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return false;
    }
    if custom_allowlist.contains(&word) {
        return true;
    }

    let text = source_text.trim().to_lowercase();
    default_rules()
        .iter()
        .chain(custom_rules.iter())
        .filter(|rule| rule.applies_to(context))
        .any(|rule| rule.matches_word(&word) || rule.matches_in_text(&word, &text))
}
