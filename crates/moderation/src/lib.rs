//! Content moderation for Stellar Press
//!
//! This crate holds the local banned-word engine: the term lexicon, the
//! pattern compiler, text normalization, allowlist resolution and the
//! tiered scanner that turns user text into a [`Verdict`].
//!
//! The engine is pure and synchronous. Compiled patterns are built once per
//! process and shared, so every entry point is safe to call from any
//! thread.
//!
//! ```
//! assert!(moderation::contains_banned_words("p0rn"));
//! assert!(!moderation::contains_banned_words("Let's assess the situation"));
//! assert!(!moderation::contains_banned_words(None));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allowlist;
pub mod compiler;
pub mod filtering;
pub mod lexicon;
pub mod normalize;
mod scanner;
pub mod verdict;

pub use allowlist::{AllowlistRule, Context};
pub use compiler::{compiled_lexicon, pattern_for, CompiledPattern};
pub use filtering::{
    FilterConfig, FilterError, FilterOptions, PatternConfig, TierPolicy, WordFilter,
    MAX_CUSTOM_ALLOWLIST,
};
pub use lexicon::Term;
pub use normalize::{clean_text, VariantKind};
pub use verdict::{MatchCandidate, Tier, Verdict};

/// Check text against the banned-word lexicon with default options
pub fn contains_banned_words<'a>(text: impl Into<Option<&'a str>>) -> bool {
    detect_banned_words(text).is_flagged()
}

/// Scan text with default options
pub fn detect_banned_words<'a>(text: impl Into<Option<&'a str>>) -> Verdict {
    scanner::scan(text.into(), &FilterOptions::default())
}

/// Check text against the banned-word lexicon
pub fn contains_banned_words_with<'a>(
    text: impl Into<Option<&'a str>>,
    options: &FilterOptions,
) -> bool {
    detect_banned_words_with(text, options).is_flagged()
}

/// Scan text with explicit options
pub fn detect_banned_words_with<'a>(
    text: impl Into<Option<&'a str>>,
    options: &FilterOptions,
) -> Verdict {
    scanner::scan(text.into(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_entry_points_agree() {
        let options = FilterOptions::default();
        for text in ["hello there", "s_h_i_t", "The cockpit"] {
            assert_eq!(
                contains_banned_words(text),
                contains_banned_words_with(text, &options)
            );
            assert_eq!(detect_banned_words(text), detect_banned_words_with(text, &options));
        }
    }

    #[test]
    fn test_owned_strings_and_options() {
        let body = String::from("This has f.u.c.k with dots");
        let title: Option<String> = None;

        assert!(contains_banned_words(body.as_str()));
        assert!(!contains_banned_words(title.as_deref()));
    }

    #[test]
    fn test_diagnostics_do_not_change_results() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("moderation=debug")
            .with_test_writer()
            .try_init();

        let quiet = FilterOptions::default();
        let verbose = FilterOptions::default().with_diagnostics(true);
        for text in ["n i g g e r", "f**k", "assess ass", "clean text"] {
            assert_eq!(
                detect_banned_words_with(text, &quiet),
                detect_banned_words_with(text, &verbose)
            );
        }
    }

    #[test]
    fn test_concurrent_scans() {
        let filter = Arc::new(WordFilter::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let filter = Arc::clone(&filter);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        filter.contains_banned_words("p o r n")
                    } else {
                        !filter.contains_banned_words("The basement needs cleaning")
                    }
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
