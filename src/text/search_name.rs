//! Search names
//!
//! Canonical lowercase tokens for model and company names. The same rules
//! run once over the catalog at load time and over every OCR word per tick,
//! so both sides of a comparison always share one vocabulary.

use regex::Regex;
use std::sync::LazyLock;

/// Punctuation that separates words inside a name.
static RE_BAD_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,./();:]").expect("Invalid regex"));

/// Everything a model search name may not contain.
static RE_NOT_MODEL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z -]").expect("Invalid regex"));

/// Everything a company search name may not contain.
static RE_NOT_COMPANY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z ]").expect("Invalid regex"));

/// Words that carry no identifying information: company suffixes,
/// generic product vocabulary and short function words.
pub const TRIVIAL_WORDS: &[&str] = &[
    "in",
    "of",
    "and",
    "with",
    "but",
    "out",
    "it",
    "from",
    "when",
    "co",
    "ltd",
    "ltda",
    "limited",
    "coltd",
    "inc",
    "intl",
    "llc",
    "corp",
    "ag",
    "kgaa",
    "part",
    "number",
    "surgical",
    "face",
    "mask",
    "model",
    "facemask",
    "masks",
    "models",
    "professional",
    "tm",
    "safety",
    "non-sterile",
    "medical",
    "surgical-disposable",
    "protection",
    "kit",
    "personal",
    "disposable",
    "to",
    "do",
    "yes",
    "no",
];

/// Model names too generic to tell catalog entries apart.
pub const TOO_SIMPLE_MODEL_NAMES: &[&str] = &[
    "surgical",
    "surgical mask",
    "mask surgical",
    "mask",
    "facemask",
    "respirator",
    "face-mask",
    "surgical-mask",
    "protective-mask",
    "protective mask",
];

/// Minimum length of a model name that mentions "n95".
const MIN_N95_MODEL_LEN: usize = 5;

/// Minimum length of a word kept in a search name.
const MIN_WORD_LEN: usize = 2;

/// Search name for a model, or an empty string if nothing useful remains.
pub fn search_model_name(model_name: &str) -> String {
    let name = clean(model_name, &RE_NOT_MODEL_CHARS);
    if is_too_simple_model_name(&name) {
        return String::new();
    }
    name
}

/// Search name for a company, or an empty string if nothing useful remains.
pub fn search_company_name(company_name: &str) -> String {
    clean(company_name, &RE_NOT_COMPANY_CHARS)
}

/// Split a search name into its words.
pub fn search_name_words(search_name: &str) -> Vec<String> {
    search_name.split_whitespace().map(str::to_string).collect()
}

fn is_too_simple_model_name(name: &str) -> bool {
    TOO_SIMPLE_MODEL_NAMES.contains(&name)
        || (name.chars().count() < MIN_N95_MODEL_LEN && name.contains("n95"))
}

fn clean(raw: &str, not_allowed: &Regex) -> String {
    let lowered = raw.to_lowercase();
    let spaced = RE_BAD_CHARS.replace_all(&lowered, " ");
    let filtered = not_allowed.replace_all(&spaced, "");

    filtered
        .split_whitespace()
        .filter(|word| !TRIVIAL_WORDS.contains(word))
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_suffix_and_punctuation_removed() {
        assert_eq!(search_company_name("3M Corp."), "3m");
        assert_eq!(search_company_name("Honeywell Safety Products, Inc."), "honeywell products");
        assert_eq!(search_company_name("Moldex-Metric"), "moldexmetric");
    }

    #[test]
    fn test_model_keeps_hyphen() {
        assert_eq!(search_model_name("N95-8210"), "n95-8210");
        assert_eq!(search_model_name("Model 8210 Plus"), "8210 plus");
    }

    #[test]
    fn test_parentheses_and_colons_split_words() {
        assert_eq!(search_model_name("VFlex(9105):S"), "vflex 9105");
    }

    #[test]
    fn test_too_simple_model_names_rejected() {
        assert_eq!(search_model_name("mask"), "");
        assert_eq!(search_model_name("surgical mask"), "");
        assert_eq!(search_model_name("Respirator"), "");
        assert_eq!(search_model_name("Face-Mask"), "");
    }

    #[test]
    fn test_short_n95_rejected() {
        assert_eq!(search_model_name("N95"), "");
        assert_eq!(search_model_name("KN95"), "");
        assert!(!search_model_name("N95 ProSeal").is_empty());
        assert_eq!(search_model_name("N95 ProSeal"), "n95 proseal");
    }

    #[test]
    fn test_short_words_dropped() {
        assert_eq!(search_model_name("a 9 H910 v"), "h910");
        assert_eq!(search_company_name("X"), "");
    }

    #[test]
    fn test_non_ascii_stripped() {
        assert_eq!(search_company_name("Dräger"), "drger");
        assert_eq!(search_model_name("X-plore® 1750"), "x-plore 1750");
    }

    #[test]
    fn test_company_names_are_not_too_simple_filtered() {
        // Company tokens skip the model-only rejection
        assert_eq!(search_company_name("N95"), "n95");
    }

    #[test]
    fn test_search_name_words() {
        assert_eq!(search_name_words("guangzhou powecom labor"), vec!["guangzhou", "powecom", "labor"]);
        assert!(search_name_words("").is_empty());
    }
}
