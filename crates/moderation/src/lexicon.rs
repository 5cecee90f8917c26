//! Banned-term lexicon
//!
//! The canonical list of banned terms and the hand-authored patterns for the
//! terms that the generic substitution scheme handles badly. Both tables are
//! compiled into the binary; changing them requires a new build.

use std::collections::HashSet;
use std::sync::OnceLock;

/// A canonical, lowercase banned word
pub type Term = &'static str;

/// Banned terms in lexicon order
///
/// Order matters: when a caller needs a single offending term for a
/// user-facing message, the first term in this order wins.
const BANNED_TERMS: &[Term] = &[
    "sex",
    "fuck",
    "nigger",
    "nigga",
    "ass",
    "shit",
    "cum",
    "lox",
    "loximtir",
    "o'le",
    "yiban",
    "blat",
    "bla",
    "dalbayob",
    "dalban",
    "po'q",
    "bo'q",
    "puq",
    "buq",
    "skay",
    "seks",
    "seksual",
    "seksualniy",
    "negir",
    "negirsan",
    "negirsila",
    "qo'toq",
    "qotoq",
    "qotoqbosh",
    "qo'toqbosh",
    "qo'tobosh",
    "qotobosh",
    "bich",
    "bichsan",
    "cho'choq",
    "cho'choqbosh",
    "cho'choqcha",
    "yobnuti",
    "sassiq",
    "qasd",
    "qast",
    "o'ldir",
    "o'ldirish",
    "porn",
    "dick",
    "pussy",
    "cock",
    "slut",
    "whore",
    "fag",
    "retard",
    "cunt",
    "penis",
    "vagina",
    "tits",
    "boobs",
    "anal",
    "rape",
    "incest",
    "molest",
    "kill",
    "murder",
    "suicide",
    "terrorist",
    "isis",
    "jihad",
    "blowjob",
    "handjob",
    "orgy",
    "gangbang",
    "paedophile",
    "pedophile",
    "childabuse",
    "zoophilia",
    "beastiality",
    "necrophilia",
    "bestiality",
    "queer",
    "slur",
    "lynch",
    "genocide",
    "holocaust",
    "shoot",
    "stab",
    "gun",
    "weapon",
    "explosive",
    "bomb",
    "execute",
    "hang",
    "poison",
    "selfharm",
    "cutting",
    "selfmutilation",
    "addict",
    "drug",
    "heroin",
    "cocaine",
    "crack",
    "meth",
    "weed",
    "marijuana",
    "opium",
    "hash",
    "thc",
    "mdma",
    "ecstasy",
    "shrooms",
    "psychedelic",
    "trippy",
    "ped0",
    "pedo",
    "paedo",
    "paed0",
    "molester",
    "childporn",
    "cp",
    "zoophile",
    "beastial",
    "necrophile",
    "inc3st",
    "terror",
    "extremist",
    "whitepower",
    "kkk",
    "klan",
    "whitepride",
    "whitesupremacy",
    "blacksupremacy",
    "antisemitic",
    "zionist",
    "zionism",
    "nazi",
    "hitler",
    "semen",
    "sp3rm",
    "sperm",
    "testicle",
    "scrotum",
    "foreskin",
    "anus",
    "rectum",
    "prostitute",
    "escort",
    "stripper",
    "stripclub",
    "wh0re",
    "wh0r3",
    "biatch",
    "bitch",
    "hoe",
    "ho",
    "tranny",
    "transsexual",
    "transgender",
    "dyke",
    "spic",
    "kike",
    "chink",
    "gook",
    "jap",
    "wetback",
    "beaner",
    "coon",
    "spook",
    "porchmonkey",
    "towelhead",
    "sandnigger",
    "raghead",
    "cameljockey",
    "gypsy",
    "retarded",
    "cripple",
    "spaz",
    "spastic",
    "autist",
    "autistic",
    "midget",
    "dwarf",
    "hermaphrodite",
    "intersex",
    "downsyndrome",
    "spina",
    "bastard",
    "slant",
    "crip",
    "crips",
    "bloods",
    "gang",
    "mafia",
    "cartel",
    "syndicate",
    "extort",
    "blackmail",
    "bribe",
    "corrupt",
    "scam",
    "fraud",
    "cheat",
    "embezzle",
    "forgery",
    "plagiarize",
    "plagiarism",
    "negr",
    "nig",
];

/// Hand-authored patterns for terms with a known false-positive or
/// false-negative history under the generic scheme
///
/// Each entry is the sequence of per-letter classes. Every class carries a
/// `+` so stretched spellings ("fuuuck") still line up; the compiler puts
/// the separator run between them.
const SPECIAL_CASES: &[(Term, &[&str])] = &[
    ("porn", &["p+", "[o0*]+", "[r*]+", "[n*]+"]),
    ("negr", &["n+", "[e3*]+", "[g9*]+", "[r*]+"]),
    ("dick", &["d+", "[i1!|*]+", "[c(*]+", "[k*]+"]),
    ("boobs", &["b+", "[o0*]+", "[o0*]+", "b+", "[s5*]+"]),
    ("fuck", &["f+", "[uüûU*]+", "[c(*]+", "[k*]+"]),
    ("cum", &["c+", "[uüûU*]+", "[m*]+"]),
    ("sex", &["s+", "[e3*]+", "[x*]+"]),
    ("nigger", &["n+", "[i1!|*]+", "[g9*]+", "[g9*]+", "[e3*]+", "[r*]+"]),
    ("nigga", &["n+", "[i1!|*]+", "[g9*]+", "[g9*]+", "[a*]+"]),
    ("ass", &["[a@4*]+", "[s$5*]+", "[s$5*]+"]),
    ("shit", &["[s$5*]+", "[h*]+", "[i1!|*]+", "[t7*]+"]),
];

/// All banned terms, in lexicon order
pub fn all_terms() -> &'static [Term] {
    BANNED_TERMS
}

/// The hand-authored letter classes for `term`, if it has any
pub fn special_case(term: &str) -> Option<&'static [&'static str]> {
    let term = term.to_lowercase();
    SPECIAL_CASES
        .iter()
        .find(|(t, _)| *t == term)
        .map(|(_, classes)| *classes)
}

/// Check whether `word` is exactly a lexicon term (case-insensitive)
pub fn is_term(word: &str) -> bool {
    lookup(word).is_some()
}

fn term_index() -> &'static HashSet<Term> {
    static INDEX: OnceLock<HashSet<Term>> = OnceLock::new();
    INDEX.get_or_init(|| BANNED_TERMS.iter().copied().collect())
}

/// Resolve `word` to its static lexicon entry
pub fn lookup(word: &str) -> Option<Term> {
    let word = word.to_lowercase();
    term_index().get(word.as_str()).copied()
}

/// Length in characters of the longest term
pub fn max_term_len() -> usize {
    static MAX_LEN: OnceLock<usize> = OnceLock::new();
    *MAX_LEN.get_or_init(|| {
        BANNED_TERMS
            .iter()
            .map(|t| t.chars().count())
            .max()
            .unwrap_or(0)
    })
}

/// Position of `term` in lexicon order
pub(crate) fn rank(term: &str) -> usize {
    BANNED_TERMS
        .iter()
        .position(|t| *t == term)
        .unwrap_or(usize::MAX)
}
