//! Free-text query intent parsing.
//!
//! One tokenizer plus fixed keyword-set membership tests, shared by the
//! search endpoint, the chat responder, and the CLI. The tables below are
//! the canonical vocabulary; no caller keeps a private copy.

use serde::{Deserialize, Serialize};

/// Phrases that put an upper bound on price.
pub const UNDER_SYNONYMS: &[&str] = &["below", "under", "<", "less than", "cheaper", "low price"];

/// Phrases that put a lower bound on price.
pub const OVER_SYNONYMS: &[&str] =
    &["above", "over", ">", "more than", "higher than", "at least"];

/// Qualitative "show me expensive things" phrases. Equivalent to an over
/// bound for filtering, but they also trigger a price-descending sort even
/// when no amount was given, and select a different reply title.
pub const HIGH_PRICE_SYNONYMS: &[&str] =
    &["higher price", "high price", "expensive", "premium", "costly", "most expensive"];

/// The fixed category vocabulary. First substring match wins.
pub const CATEGORY_VOCABULARY: &[&str] = &["electronics", "fashion", "home", "office", "sports"];

/// Tokens excluded from keyword extraction: direction words, category
/// connectors, and generic commerce filler.
pub const STOP_WORDS: &[&str] = &[
    "suggest", "recommend", "show", "me", "please", "gift", "product", "products", "below",
    "under", "less", "than", "above", "over", "more", "higher", "least", "price", "prices",
    "cheap", "cheaper", "expensive", "premium", "costly", "most", "low", "high", "dollar",
    "dollars",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceDirection {
    Under,
    Over,
}

/// Structured result of parsing one free-text query. Transient, never
/// persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryIntent {
    /// First integer-looking token in the text, if any.
    pub amount: Option<u32>,
    /// Resolved by priority: an under synonym beats an over synonym.
    pub direction: Option<PriceDirection>,
    /// A bare qualitative high-price signal, independent of `direction`.
    pub wants_high: bool,
    pub category: Option<String>,
    /// Remaining alphabetic tokens in source order, multiplicity kept.
    pub keywords: Vec<String>,
}

impl QueryIntent {
    /// True when filtering should keep `price >= amount`: an explicit over
    /// bound or the qualitative high-price signal.
    pub fn price_floor_requested(&self) -> bool {
        matches!(self.direction, Some(PriceDirection::Over)) || self.wants_high
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IntentParser;

impl IntentParser {
    pub fn new() -> Self {
        Self
    }

    /// Pure and deterministic: the same text always yields the same intent.
    pub fn parse(&self, text: &str) -> QueryIntent {
        let normalized = text.to_ascii_lowercase();

        let amount = first_amount(&normalized);
        let direction = if contains_any(&normalized, UNDER_SYNONYMS) {
            Some(PriceDirection::Under)
        } else if contains_any(&normalized, OVER_SYNONYMS) {
            Some(PriceDirection::Over)
        } else {
            None
        };
        let wants_high = contains_any(&normalized, HIGH_PRICE_SYNONYMS);
        let category = CATEGORY_VOCABULARY
            .iter()
            .find(|candidate| normalized.contains(*candidate))
            .map(|candidate| (*candidate).to_string());
        let keywords = extract_keywords(&normalized);

        QueryIntent { amount, direction, wants_high, category, keywords }
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

/// First maximal run of ASCII digits, e.g. the `60` in "above $60" or
/// "above $ 60". Values that overflow `u32` are treated as absent.
fn first_amount(text: &str) -> Option<u32> {
    let mut digits = String::new();
    for character in text.chars() {
        if character.is_ascii_digit() {
            digits.push(character);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut current = String::new();
    for character in text.chars() {
        if character.is_ascii_alphabetic() {
            current.push(character);
        } else if !current.is_empty() {
            keep_keyword(&mut keywords, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        keep_keyword(&mut keywords, current);
    }
    keywords
}

fn keep_keyword(keywords: &mut Vec<String>, token: String) {
    if token.len() > 2 && !STOP_WORDS.contains(&token.as_str()) {
        keywords.push(token);
    }
}
