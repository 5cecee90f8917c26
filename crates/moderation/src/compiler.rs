//! Pattern compiler
//!
//! Turns lexicon terms into case-insensitive regular expressions that
//! tolerate character substitution ("p0rn"), separators between letters
//! ("f.u.c.k"), asterisk masking ("f**k") and stretched letters ("fuuuck").

use crate::lexicon::{self, Term};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Zero or more separator characters tolerated between and after letters
pub const SEPARATOR_RUN: &str = r"[\s._\-*]*";

/// How a compiled pattern was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Synthesized from per-character substitution classes
    Generic,
    /// Hand-authored override from the lexicon
    SpecialCase,
}

/// The matcher for a single lexicon term
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    term: Term,
    kind: PatternKind,
    regex: Regex,
}

impl CompiledPattern {
    /// The term this pattern detects
    pub fn term(&self) -> Term {
        self.term
    }

    /// Whether the pattern is generic or a special case
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The regular expression source
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// The compiled regular expression
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Substitution class for a single lowercase character
///
/// Letters without an explicit class fall back to the letter itself, its
/// uppercase form and the asterisk mask.
pub fn substitution_class(c: char) -> String {
    let class = match c {
        'a' => "[aA@4áàâ*]",
        'b' => "[bB8ßḃ*]",
        'c' => "[cC(çḉ*]",
        'd' => "[dD*]",
        'e' => "[eE3éèêë*]",
        'f' => "[fF*]",
        'g' => "[gG9ġ*]",
        'h' => "[hH*]",
        'i' => "[iI1!|íìîï*]",
        'j' => "[jJ*]",
        'k' => "[kK*]",
        'l' => "[lL1|*]",
        'm' => "[mM*]",
        'n' => "[nN*]",
        'o' => "[oO0óòôö*]",
        'p' => "[pP*]",
        'q' => "[qQ*]",
        'r' => "[rR*]",
        's' => "[sS$5*]",
        't' => "[tT7*]",
        'u' => "[uUüûù*]",
        'v' => "[vV*]",
        'w' => "[wW*]",
        'x' => "[xX*]",
        'y' => "[yY*]",
        'z' => "[zZ2*]",
        _ => return fallback_class(c),
    };
    class.to_string()
}

fn fallback_class(c: char) -> String {
    let mut members: Vec<char> = vec![c];
    for upper in c.to_uppercase() {
        if !members.contains(&upper) {
            members.push(upper);
        }
    }
    if !members.contains(&'*') {
        members.push('*');
    }

    // Terms are not audited for regex metacharacters, so escape every member
    let escaped: String = members
        .iter()
        .map(|m| regex::escape(&m.to_string()))
        .collect();
    format!("[{}]", escaped)
}

/// Build the pattern source for `term`
///
/// Deterministic: the same term always yields byte-identical source.
pub fn pattern_source(term: &str) -> (PatternKind, String) {
    let term = term.to_lowercase();

    if let Some(classes) = lexicon::special_case(&term) {
        let body: String = classes
            .iter()
            .map(|class| format!("{}{}", class, SEPARATOR_RUN))
            .collect();
        return (
            PatternKind::SpecialCase,
            format!(r"(?i)\b({}){}\b", body, SEPARATOR_RUN),
        );
    }

    let mut body = String::new();
    for c in term.chars() {
        body.push_str(&substitution_class(c));
        body.push('+');
        body.push_str(SEPARATOR_RUN);
    }

    (PatternKind::Generic, format!(r"(?i)\b({}){}\b", body, SEPARATOR_RUN))
}

/// Compile the pattern for a lexicon term
///
/// # Panics
///
/// Panics if the generated source is not a valid regular expression. The
/// lexicon is static data, so this is a build defect rather than a runtime
/// condition.
pub fn compile(term: Term) -> CompiledPattern {
    let (kind, source) = pattern_source(term);
    let regex = Regex::new(&source)
        .unwrap_or_else(|e| panic!("banned term {:?} produced an invalid pattern: {}", term, e));

    CompiledPattern { term, kind, regex }
}

/// Every lexicon pattern, compiled once per process
#[derive(Debug)]
pub struct CompiledLexicon {
    patterns: Vec<CompiledPattern>,
    index: HashMap<Term, usize>,
}

impl CompiledLexicon {
    fn build() -> Self {
        let patterns: Vec<CompiledPattern> =
            lexicon::all_terms().iter().map(|&term| compile(term)).collect();
        let index = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (p.term(), i))
            .collect();

        Self { patterns, index }
    }

    /// Patterns in lexicon order
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Pattern for a specific term
    pub fn get(&self, term: &str) -> Option<&CompiledPattern> {
        self.index.get(term).map(|&i| &self.patterns[i])
    }
}

/// The process-wide compiled lexicon
///
/// Built on first use behind a `OnceLock`; concurrent first callers block
/// on the same initialization rather than compiling twice.
pub fn compiled_lexicon() -> &'static CompiledLexicon {
    static LEXICON: OnceLock<CompiledLexicon> = OnceLock::new();
    LEXICON.get_or_init(CompiledLexicon::build)
}

/// Memoized pattern lookup for a lexicon term
pub fn pattern_for(term: &str) -> Option<&'static CompiledPattern> {
    compiled_lexicon().get(&term.to_lowercase())
}
