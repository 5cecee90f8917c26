//! Scan results

use crate::lexicon::{self, Term};
use crate::normalize::VariantKind;
use serde::Serialize;

/// Stage of the scanner that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Compiled lexicon patterns over every text variant
    CompiledPattern,
    /// Stricter hand-tuned patterns for the highest-risk terms
    Fallback,
    /// Asterisk-masked tokens compared against same-length terms
    AsteriskMask,
    /// Runs of spaced-out single letters
    SpacedLetters,
}

impl Tier {
    /// Short name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::CompiledPattern => "compiled-pattern",
            Tier::Fallback => "fallback",
            Tier::AsteriskMask => "asterisk-mask",
            Tier::SpacedLetters => "spaced-letters",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted match of a lexicon term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    /// The banned term
    pub term: Term,
    /// The text that matched, lowercased and trimmed
    pub matched_text: String,
    /// The variant the match was found in
    pub variant: VariantKind,
    /// The tier that found it
    pub tier: Tier,
}

/// Outcome of scanning a piece of text
///
/// Terms are deduplicated and kept in lexicon order, so `first_term` is
/// stable regardless of which tier found what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    terms: Vec<Term>,
    matches: Vec<MatchCandidate>,
}

impl Verdict {
    /// A verdict with no matches
    pub fn clean() -> Self {
        Self::default()
    }

    pub(crate) fn accept(&mut self, candidate: MatchCandidate) {
        if !self.terms.contains(&candidate.term) {
            let rank = lexicon::rank(candidate.term);
            let at = self
                .terms
                .iter()
                .position(|t| lexicon::rank(t) > rank)
                .unwrap_or(self.terms.len());
            self.terms.insert(at, candidate.term);
        }
        self.matches.push(candidate);
    }

    /// True when no banned term was found
    pub fn is_clean(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when at least one banned term was found
    pub fn is_flagged(&self) -> bool {
        !self.is_clean()
    }

    /// Whether `term` was found
    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| *t == term)
    }

    /// Banned terms found, in lexicon order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// The first offending term in lexicon order
    pub fn first_term(&self) -> Option<Term> {
        self.terms.first().copied()
    }

    /// Every accepted match, in the order it was found
    pub fn matches(&self) -> &[MatchCandidate] {
        &self.matches
    }

    /// Consume the verdict, keeping only the terms
    pub fn into_terms(self) -> Vec<Term> {
        self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(term: Term, tier: Tier) -> MatchCandidate {
        MatchCandidate {
            term,
            matched_text: term.to_string(),
            variant: VariantKind::Cleaned,
            tier,
        }
    }

    #[test]
    fn test_clean_verdict() {
        let verdict = Verdict::clean();
        assert!(verdict.is_clean());
        assert!(!verdict.is_flagged());
        assert!(verdict.first_term().is_none());
    }

    #[test]
    fn test_terms_are_deduplicated_in_lexicon_order() {
        let mut verdict = Verdict::clean();
        verdict.accept(candidate("shit", Tier::CompiledPattern));
        verdict.accept(candidate("sex", Tier::Fallback));
        verdict.accept(candidate("shit", Tier::AsteriskMask));

        assert_eq!(verdict.terms(), &["sex", "shit"]);
        assert_eq!(verdict.first_term(), Some("sex"));
        assert_eq!(verdict.matches().len(), 3);
        assert!(verdict.contains("shit"));
        assert!(!verdict.contains("porn"));
    }

    #[test]
    fn test_serialization() {
        let mut verdict = Verdict::clean();
        verdict.accept(candidate("porn", Tier::SpacedLetters));

        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("\"porn\""));
        assert!(json.contains("spacedLetters"));
        assert!(json.contains("matchedText"));
    }
}
