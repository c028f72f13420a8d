//! Observed texts
//!
//! Turns one tick of raw OCR strings into the token sets consumed by the
//! model and company searches.

use std::collections::BTreeSet;

use super::search_name::{search_company_name, search_model_name};

/// Characters that split a raw OCR string into word pieces.
const WORD_DELIMITERS: &[char] = &[' ', '-', '/', '&', '.', ',', ';', ':'];

/// Garbage OCR tends to leave at either end of a real token.
const EDGE_GARBAGE: &[char] = &['0', '*', '/', '-', '?'];

/// Digraphs that almost never occur in real model or company names.
const NONSENSE_DIGRAPHS: &[&str] = &["ii", "jj", "nn", "bb"];

/// Letters OCR hallucinates from vertical strokes.
const STROKE_LETTERS: &[char] = &['i', 'j'];

/// Occurrences of a stroke letter that mark a token as noise.
const MAX_STROKE_LETTERS: usize = 3;

/// Search tokens derived from a single tick of OCR output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedTokens {
    /// Tokens matched against model search names
    pub models: BTreeSet<String>,
    /// Tokens matched against company search words
    pub companies: BTreeSet<String>,
}

impl ObservedTokens {
    /// True when neither search has anything to look at.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.companies.is_empty()
    }
}

/// Expand a batch of raw OCR strings into deduplicated search tokens.
///
/// Strings are expected to be pre-filtered by confidence and length; this
/// only deals with their content.
pub fn expand<S: AsRef<str>>(raw_batch: &[S]) -> ObservedTokens {
    let words = split_into_words(raw_batch);

    let models = finish(words.iter().map(|w| search_model_name(w)).collect());
    let companies = finish(words.iter().map(|w| search_company_name(w)).collect());

    ObservedTokens { models, companies }
}

fn finish(tokens: Vec<String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for token in tokens {
        if token.is_empty() || is_nonsense(&token) {
            continue;
        }
        let stripped = token.trim_matches(EDGE_GARBAGE);
        if !stripped.is_empty() && stripped != token {
            out.insert(stripped.to_string());
        }
        out.insert(token);
    }
    out
}

fn split_into_words<S: AsRef<str>>(raw_batch: &[S]) -> Vec<String> {
    raw_batch
        .iter()
        .flat_map(|raw| raw.as_ref().split(WORD_DELIMITERS))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// OCR noise heuristic: letter triples, rare digraphs or too many i/j.
pub fn is_nonsense(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    let has_triple = chars
        .windows(3)
        .any(|w| w[0].is_ascii_lowercase() && w[0] == w[1] && w[1] == w[2]);
    if has_triple {
        return true;
    }

    if NONSENSE_DIGRAPHS.iter().any(|d| token.contains(d)) {
        return true;
    }

    STROKE_LETTERS
        .iter()
        .any(|&letter| chars.iter().filter(|&&c| c == letter).count() >= MAX_STROKE_LETTERS)
}
