//! Tiered detection
//!
//! Runs the detection tiers in a fixed order over the text variants and
//! collects accepted matches into a [`Verdict`]:
//!
//! 1. compiled lexicon patterns over every variant
//! 2. stricter fallback patterns for the highest-risk terms
//! 3. asterisk-masked tokens of the raw input
//! 4. runs of spaced-out single letters
//!
//! A per-word pre-pass over the cleaned text records legitimate words
//! first, so later tiers can reject matches that only exist inside one.

use crate::allowlist;
use crate::compiler;
use crate::filtering::{FilterOptions, TierPolicy};
use crate::lexicon::{self, Term};
use crate::normalize::{self, TextVariant, VariantKind};
use crate::verdict::{MatchCandidate, Tier, Verdict};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const TIERS: [Tier; 4] = [
    Tier::CompiledPattern,
    Tier::Fallback,
    Tier::AsteriskMask,
    Tier::SpacedLetters,
];

const FALLBACK_PATTERNS: &[(Term, &str)] = &[
    ("fuck", r"\b[f][\s._\-*]*[uüûU][\s._\-*]*[c(][\s._\-*]*[k]\b"),
    ("porn", r"\b[p][\s._\-*]*[o0][\s._\-*]*[r][\s._\-*]*[n]\b"),
    ("negr", r"\b[n][\s._\-*]*[e3][\s._\-*]*[g9][\s._\-*]*[r]\b"),
    ("shit", r"\b[s][\s._\-*]*[h][\s._\-*]*[i1!|][\s._\-*]*[t7]\b"),
    ("dick", r"\b[d][\s._\-*]*[i1!|][\s._\-*]*[c(][\s._\-*]*[k]\b"),
    ("boobs", r"\b[b][\s._\-*]*[o0][\s._\-*]*[o0][\s._\-*]*b[\s._\-*]*[s5]\b"),
    ("cum", r"\b[c][\s._\-*]*[uüûU][\s._\-*]*[m]\b"),
    ("ass", r"\b[a@4][\s._\-*]*[s$5][\s._\-*]*[s$5]\b"),
    ("pussy", r"\b[p][\s._\-*]*[uü][\s._\-*]*[s$5][\s._\-*]*[s$5][\s._\-*]*[y]\b"),
    (
        "nigger",
        r"\b[n][\s._\-*]*[i1!|][\s._\-*]*[g9][\s._\-*]*[g9][\s._\-*]*[e3][\s._\-*]*[r]\b",
    ),
    ("nigga", r"\b[n][\s._\-*]*[i1!|][\s._\-*]*[g9][\s._\-*]*[g9][\s._\-*]*[a]\b"),
    ("sex", r"\b[s][\s._\-*]*[e3][\s._\-*]*[x]\b"),
    ("nig", r"\b[n][\s._\-*]*[i1!|][\s._\-*]*[g9]\b"),
];

fn fallback_regexes() -> &'static [(Term, Regex)] {
    static PATTERNS: OnceLock<Vec<(Term, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FALLBACK_PATTERNS
            .iter()
            .map(|(term, pattern)| (*term, Regex::new(&format!("(?i){}", pattern)).unwrap()))
            .collect()
    })
}

fn spaced_run_regex() -> &'static Regex {
    static SPACED_RUN: OnceLock<Regex> = OnceLock::new();
    SPACED_RUN.get_or_init(|| Regex::new(r"\b[a-zA-Z](?:\s+[a-zA-Z])+\b").unwrap())
}

/// Scan `text` and return every banned term it contains
///
/// `None` and text that is empty after cleaning are clean.
pub fn scan(text: Option<&str>, options: &FilterOptions) -> Verdict {
    let Some(raw) = text else {
        return Verdict::clean();
    };

    let cleaned = normalize::clean_text(raw);
    if cleaned.is_empty() {
        return Verdict::clean();
    }

    let scan = Scan::new(raw, &cleaned, options);
    let mut verdict = Verdict::clean();

    for tier in TIERS {
        match tier {
            Tier::CompiledPattern => scan.compiled_patterns(&mut verdict),
            Tier::Fallback => scan.fallback_patterns(&mut verdict),
            Tier::AsteriskMask => scan.asterisk_masks(&mut verdict),
            Tier::SpacedLetters => scan.spaced_letters(&mut verdict),
        }

        if options.tier_policy == TierPolicy::ShortCircuit && verdict.is_flagged() {
            break;
        }
    }

    verdict
}

/// Words of the cleaned text that are known to be legitimate
#[derive(Debug, Default)]
struct FalsePositiveGuard {
    safe_tokens: HashSet<String>,
    plain_tokens: HashSet<String>,
}

impl FalsePositiveGuard {
    fn new(cleaned: &str, options: &FilterOptions) -> Self {
        let mut guard = Self::default();

        for token in cleaned.split_whitespace() {
            let lower = token.to_lowercase();
            let word = word_chars(&lower);
            if !word.is_empty()
                && allowlist::is_allowed(
                    &word,
                    options.context,
                    cleaned,
                    &options.custom_allowlist,
                    &options.custom_patterns,
                )
            {
                guard.safe_tokens.insert(word);
            }

            let plain = normalize::strip_to_alphanumeric(&normalize::fold_homoglyphs(&lower));
            if !plain.is_empty() {
                guard.plain_tokens.insert(plain);
            }
        }

        guard
    }

    /// The match only exists as part of a longer legitimate word
    ///
    /// A match that also appears as a standalone token is never vetoed, so
    /// "assess ass" still flags the second word.
    fn vetoes(&self, matched: &str) -> bool {
        let lower = matched.to_lowercase();
        let plain = normalize::strip_to_alphanumeric(&normalize::fold_homoglyphs(&lower));
        if !plain.is_empty() && self.plain_tokens.contains(&plain) {
            return false;
        }

        let stripped = word_chars(&lower);
        self.safe_tokens
            .iter()
            .any(|safe| safe.contains(stripped.as_str()) && *safe != stripped)
    }
}

/// ASCII letters, digits and underscores of `text`
fn word_chars(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

struct Scan<'a> {
    raw: &'a str,
    cleaned: &'a str,
    options: &'a FilterOptions,
    variants: Vec<TextVariant>,
    guard: FalsePositiveGuard,
}

impl<'a> Scan<'a> {
    fn new(raw: &'a str, cleaned: &'a str, options: &'a FilterOptions) -> Self {
        Self {
            raw,
            cleaned,
            options,
            variants: normalize::variants(cleaned),
            guard: FalsePositiveGuard::new(cleaned, options),
        }
    }

    fn is_allowed(&self, word: &str, source_text: &str) -> bool {
        allowlist::is_allowed(
            word,
            self.options.context,
            source_text,
            &self.options.custom_allowlist,
            &self.options.custom_patterns,
        )
    }

    fn trace(&self, term: &str, tier: Tier, variant: VariantKind, matched: &str, accepted: bool) {
        if self.options.diagnostics {
            tracing::debug!(
                term,
                tier = tier.as_str(),
                variant = variant.as_str(),
                matched,
                accepted,
                "banned word candidate"
            );
        }
    }

    /// Accept the first match of `regex` in `text` that survives the
    /// allowlist and the false-positive guard
    #[allow(clippy::too_many_arguments)]
    fn try_regex(
        &self,
        verdict: &mut Verdict,
        term: Term,
        regex: &Regex,
        tier: Tier,
        variant: VariantKind,
        text: &str,
        source_text: &str,
    ) {
        for m in regex.find_iter(text) {
            let matched = m.as_str().trim().to_lowercase();
            if mostly_masked(&matched, term) {
                self.trace(term, tier, variant, &matched, false);
                continue;
            }
            let suppressed = self.is_allowed(&matched, source_text) || self.guard.vetoes(&matched);
            self.trace(term, tier, variant, &matched, !suppressed);

            if !suppressed {
                verdict.accept(MatchCandidate {
                    term,
                    matched_text: matched,
                    variant,
                    tier,
                });
                return;
            }
        }
    }

    fn compiled_patterns(&self, verdict: &mut Verdict) {
        let lexicon = compiler::compiled_lexicon();

        for variant in &self.variants {
            if variant.text.is_empty() {
                continue;
            }
            for pattern in lexicon.patterns() {
                if verdict.contains(pattern.term()) {
                    continue;
                }
                self.try_regex(
                    verdict,
                    pattern.term(),
                    pattern.regex(),
                    Tier::CompiledPattern,
                    variant.kind,
                    &variant.text,
                    &variant.text,
                );
            }
        }
    }

    fn fallback_patterns(&self, verdict: &mut Verdict) {
        let fully_stripped = TextVariant::new(
            VariantKind::FullyStripped,
            normalize::strip_to_alphanumeric(self.cleaned),
        );
        let asterisk_stripped = TextVariant::new(
            VariantKind::AsteriskFullyStripped,
            normalize::strip_to_alphanumeric(&normalize::strip_asterisks(self.raw)),
        );

        // Stripped forms glue every word together; skip them when the whole
        // text is just part of a legitimate word
        let mut targets: Vec<(&TextVariant, &str)> = [
            (&fully_stripped, self.cleaned),
            (&asterisk_stripped, self.raw),
        ]
        .into_iter()
        .filter(|(variant, _)| !variant.text.is_empty() && !self.guard.vetoes(&variant.text))
        .collect();
        targets.extend(self.variants.iter().map(|v| (v, v.text.as_str())));

        for &(term, ref regex) in fallback_regexes() {
            for (variant, source_text) in &targets {
                if verdict.contains(term) {
                    break;
                }
                self.try_regex(
                    verdict,
                    term,
                    regex,
                    Tier::Fallback,
                    variant.kind,
                    &variant.text,
                    source_text,
                );
            }
        }
    }

    fn asterisk_masks(&self, verdict: &mut Verdict) {
        for token in self.raw.split_whitespace().filter(|t| t.contains('*')) {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '*');
            if !token.chars().any(char::is_alphanumeric) {
                continue;
            }

            let unmasked = normalize::strip_asterisks(token).to_lowercase();
            if self.is_allowed(&unmasked, self.raw) {
                self.trace(unmasked.as_str(), Tier::AsteriskMask, VariantKind::Raw, token, false);
                continue;
            }

            let mask: Vec<char> = token.chars().collect();
            for &term in lexicon::all_terms() {
                if verdict.contains(term) || !mask_matches(&mask, term) {
                    continue;
                }
                self.trace(term, Tier::AsteriskMask, VariantKind::Raw, token, true);
                verdict.accept(MatchCandidate {
                    term,
                    matched_text: token.to_lowercase(),
                    variant: VariantKind::Raw,
                    tier: Tier::AsteriskMask,
                });
            }
        }
    }

    fn spaced_letters(&self, verdict: &mut Verdict) {
        for run in spaced_run_regex().find_iter(self.cleaned) {
            let letters: Vec<char> = run
                .as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_lowercase())
                .collect();

            for window in run_windows(&letters, lexicon::max_term_len()) {
                let Some(term) = lexicon::lookup(&window) else {
                    continue;
                };
                if verdict.contains(term) {
                    continue;
                }
                self.trace(term, Tier::SpacedLetters, VariantKind::Cleaned, run.as_str(), true);
                verdict.accept(MatchCandidate {
                    term,
                    matched_text: run.as_str().to_lowercase(),
                    variant: VariantKind::Cleaned,
                    tier: Tier::SpacedLetters,
                });
            }
        }
    }
}

/// Every window of two to `max_len` consecutive letters of a spaced run
fn run_windows(letters: &[char], max_len: usize) -> impl Iterator<Item = String> + '_ {
    (0..letters.len()).flat_map(move |start| {
        let end = letters.len().min(start + max_len);
        (start + 2..=end).map(move |stop| letters[start..stop].iter().collect())
    })
}

/// Fewer than two visible characters once separators and asterisks go
fn mostly_masked(matched: &str, term: &str) -> bool {
    let visible = matched.chars().filter(|&c| !normalize::is_separator(c)).count();
    visible < term.chars().count().min(2)
}

/// Same length, and every unmasked position equals the term's character
fn mask_matches(mask: &[char], term: &str) -> bool {
    term.chars().count() == mask.len()
        && mask
            .iter()
            .zip(term.chars())
            .all(|(&m, t)| m == '*' || m.to_lowercase().eq(t.to_lowercase()))
}
