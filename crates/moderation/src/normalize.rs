//! Text normalization
//!
//! Produces canonicalized rewrites ("variants") of user text, each one
//! undoing a specific obfuscation style: markup, punctuation noise,
//! asterisk masking, separators between letters, digit/symbol homoglyphs,
//! letter spacing and stretched letters.
//!
//! Every function here is pure and total; empty input yields an empty
//! string.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The canonicalization that produced a text variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKind {
    /// Input exactly as submitted
    Raw,
    /// HTML stripped, whitespace collapsed and trimmed
    Cleaned,
    /// Cleaned, keeping only ASCII letters, digits and whitespace
    Alphanumeric,
    /// Cleaned, asterisks removed
    AsteriskStripped,
    /// Cleaned, whitespace and separator punctuation removed
    SeparatorStripped,
    /// Cleaned, digit and symbol look-alikes folded to letters
    HomoglyphFolded,
    /// Spaced letters joined, separators removed, repeated letters collapsed
    Preprocessed,
    /// Cleaned, keeping only ASCII letters and digits
    FullyStripped,
    /// Cleaned, asterisks removed, then reduced to ASCII letters and digits
    AsteriskFullyStripped,
}

impl VariantKind {
    /// Short name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Raw => "raw",
            VariantKind::Cleaned => "cleaned",
            VariantKind::Alphanumeric => "alphanumeric",
            VariantKind::AsteriskStripped => "asterisk-stripped",
            VariantKind::SeparatorStripped => "separator-stripped",
            VariantKind::HomoglyphFolded => "homoglyph-folded",
            VariantKind::Preprocessed => "preprocessed",
            VariantKind::FullyStripped => "fully-stripped",
            VariantKind::AsteriskFullyStripped => "asterisk-fully-stripped",
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonicalized rewrite of the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextVariant {
    /// How the text was derived
    pub kind: VariantKind,
    /// The derived text
    pub text: String,
}

impl TextVariant {
    /// Create a new variant
    pub fn new(kind: VariantKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Whether `c` counts as a separator between obfuscated letters
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '_' | '-' | '*')
}

/// Strip HTML tags, collapse newlines, tabs and runs of whitespace to a
/// single space, and trim
pub fn clean_text(text: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());

    let without_tags = re.replace_all(text, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove everything except ASCII letters, digits and whitespace
pub fn strip_non_alphanumeric(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Remove every ASCII letter-and-digit outsider, whitespace included
pub fn strip_to_alphanumeric(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Remove asterisks
pub fn strip_asterisks(text: &str) -> String {
    text.chars().filter(|&c| c != '*').collect()
}

/// Remove whitespace and separator punctuation
pub fn strip_separators(text: &str) -> String {
    text.chars().filter(|&c| !is_separator(c)).collect()
}

/// Fold common digit and symbol look-alikes to the letters they imitate
pub fn fold_homoglyphs(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'i',
            '3' => 'e',
            '4' => 'a',
            '5' | '$' => 's',
            '@' => 'a',
            '(' => 'c',
            ')' => 'o',
            other => other,
        })
        .collect()
}

/// Join runs of spaced-out single letters into one token
///
/// "n i g g e r" becomes "nigger". A run is one letter followed by one to
/// five more single letters, each separated by whitespace.
pub fn join_spaced_letters(text: &str) -> String {
    static SPACED_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = SPACED_REGEX
        .get_or_init(|| Regex::new(r"\b[a-zA-Z](?:\s+[a-zA-Z]){1,5}\b").unwrap());

    re.replace_all(text, |caps: &Captures| {
        caps[0].chars().filter(|c| !c.is_whitespace()).collect::<String>()
    })
    .into_owned()
}

/// Collapse runs of the same ASCII letter (ignoring case) to one occurrence
pub fn collapse_repeated_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for c in text.chars() {
        let repeated = c.is_ascii_alphabetic()
            && prev.is_some_and(|p| p.eq_ignore_ascii_case(&c));
        if !repeated {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// The aggressive rewrite: spaced letters joined, separators removed,
/// repeated letters collapsed
pub fn preprocess(cleaned: &str) -> String {
    let joined = join_spaced_letters(cleaned);
    collapse_repeated_letters(&strip_separators(&joined))
}

/// All scan variants of already-cleaned text, in scan precedence order
pub fn variants(cleaned: &str) -> Vec<TextVariant> {
    vec![
        TextVariant::new(VariantKind::Cleaned, cleaned),
        TextVariant::new(VariantKind::Alphanumeric, strip_non_alphanumeric(cleaned)),
        TextVariant::new(VariantKind::AsteriskStripped, strip_asterisks(cleaned)),
        TextVariant::new(VariantKind::SeparatorStripped, strip_separators(cleaned)),
        TextVariant::new(VariantKind::HomoglyphFolded, fold_homoglyphs(cleaned)),
        TextVariant::new(VariantKind::Preprocessed, preprocess(cleaned)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("<p>Hello</p>\n\tworld  "), "Hello world");
        assert_eq!(clean_text("a\r\n\r\nb"), "a b");
        assert_eq!(clean_text("   "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_clean_text_separates_adjacent_tags() {
        assert_eq!(clean_text("<b>one</b><i>two</i>"), "one two");
    }

    #[test]
    fn test_strip_non_alphanumeric_keeps_spaces() {
        assert_eq!(strip_non_alphanumeric("f.u.c.k you!"), "fuck you");
        assert_eq!(strip_non_alphanumeric("s_h_i_t"), "shit");
    }

    #[test]
    fn test_strip_separators() {
        assert_eq!(strip_separators("p o r n"), "porn");
        assert_eq!(strip_separators("n-e-g-r"), "negr");
        assert_eq!(strip_separators("c*u*m"), "cum");
        assert_eq!(strip_separators("@ss"), "@ss");
    }

    #[test]
    fn test_strip_to_alphanumeric() {
        assert_eq!(strip_to_alphanumeric("@ss, really?"), "ssreally");
    }

    #[test]
    fn test_fold_homoglyphs() {
        assert_eq!(fold_homoglyphs("p0rn"), "porn");
        assert_eq!(fold_homoglyphs("@$$"), "ass");
        assert_eq!(fold_homoglyphs("n1gg3r"), "nigger");
        assert_eq!(fold_homoglyphs("(0)"), "coo");
    }

    #[test]
    fn test_join_spaced_letters() {
        assert_eq!(join_spaced_letters("n i g g e r with spaces"), "nigger with spaces");
        assert_eq!(join_spaced_letters("p o r n"), "porn");
        assert_eq!(join_spaced_letters("This is a test"), "This is a test");
    }

    #[test]
    fn test_collapse_repeated_letters() {
        assert_eq!(collapse_repeated_letters("niiiggerrr"), "niger");
        assert_eq!(collapse_repeated_letters("FuUuck"), "Fuck");
        assert_eq!(collapse_repeated_letters("1100"), "1100");
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess("s h i t storm"), "shitstorm");
        assert_eq!(preprocess("f.u.u.c.k"), "fuck");
    }

    #[test]
    fn test_variants_order() {
        let kinds: Vec<VariantKind> = variants("x").iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                VariantKind::Cleaned,
                VariantKind::Alphanumeric,
                VariantKind::AsteriskStripped,
                VariantKind::SeparatorStripped,
                VariantKind::HomoglyphFolded,
                VariantKind::Preprocessed,
            ]
        );
    }

    #[test]
    fn test_variants_of_empty_text_are_empty() {
        assert!(variants("").iter().all(|v| v.text.is_empty()));
    }
}
