//! Fallback vocabulary of place-like words taken from property names.
//!
//! When the geocoder cannot place a raw query, the query is fuzzy-matched
//! against this vocabulary and the closest word is geocoded instead. Property
//! names usually embed the town they are in ("Moustache Udaipur Luxuria"), so
//! after removing brand and amenity words the remaining tokens are good
//! geocoding candidates.

use ahash::AHashSet;
use itertools::Itertools;
use once_cell::sync::Lazy;
use rapidfuzz::fuzz;
use regex::Regex;
use staypoint_catalog::Catalog;
use tracing::{debug, instrument, trace};

/// Brand and amenity words that never identify a place on their own.
pub const DEFAULT_STOPWORDS: [&str; 9] = [
    "moustache",
    "luxuria",
    "hostel",
    "resort",
    "retreat",
    "the",
    "riverside",
    "camp",
    "verandah",
];

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));

/// Canonical form used on both sides of a fuzzy comparison: non-word characters
/// become spaces, then the text is lowercased and trimmed.
pub fn normalize(text: &str) -> String {
    NON_WORD
        .replace_all(text, " ")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Indel-normalised similarity of two strings, rounded to an integer in `0..=100`.
///
/// Symmetric; identical non-empty strings score 100 and an empty side scores 0.
pub fn similarity(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    // rapidfuzz reports a normalised similarity in 0.0..=1.0
    (fuzz::ratio(a.chars(), b.chars()) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Best vocabulary entry for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub token: String,
    pub score: u8,
}

/// Source of fuzzy matches for the resolver.
pub trait Matcher: Send + Sync {
    fn best_match(&self, query: &str) -> Option<TokenMatch>;
}

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    normalized: String,
}

/// Deduplicated, lowercase tokens from property names, minus stopwords.
///
/// Tokens are kept in lexicographic order, which is also the tie-break order
/// for equal fuzzy scores.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<Entry>,
}

impl Vocabulary {
    #[instrument(name = "Build token vocabulary", level = "debug", skip_all, fields(properties = catalog.len()))]
    pub fn build(catalog: &Catalog, stopwords: &AHashSet<String>) -> Self {
        let entries = catalog
            .iter()
            .flat_map(|property| property.name.split_whitespace())
            .map(str::to_lowercase)
            .filter(|token| !stopwords.contains(token))
            .sorted_unstable()
            .dedup()
            .map(|token| Entry {
                normalized: normalize(&token),
                token,
            })
            .collect::<Vec<_>>();

        debug!(tokens = entries.len(), "Token vocabulary built");
        Self { entries }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.token.as_str())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries
            .binary_search_by(|e| e.token.as_str().cmp(token))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Highest-scoring vocabulary token for `query`.
///
/// Returns `None` for an empty vocabulary or a query with no word characters.
/// On equal scores the first token in vocabulary order wins.
pub fn best_match(query: &str, vocabulary: &Vocabulary) -> Option<TokenMatch> {
    let query = normalize(query);
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(&Entry, u8)> = None;
    for entry in &vocabulary.entries {
        let score = similarity(&query, &entry.normalized);
        trace!(token = %entry.token, score, "Scored token");
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((entry, score));
        }
    }

    best.map(|(entry, score)| TokenMatch {
        token: entry.token.clone(),
        score,
    })
}

impl Matcher for Vocabulary {
    fn best_match(&self, query: &str) -> Option<TokenMatch> {
        best_match(query, self)
    }
}
