//! Deterministic catalog retrieval: filter, order, limit.
//!
//! Works on a catalog snapshot so the result is stable for a given intent
//! and snapshot. Never fabricates results; an empty return means the
//! caller decides the fallback text.

use rust_decimal::Decimal;

use crate::domain::product::Product;
use crate::intent::{PriceDirection, QueryIntent};

pub const SEARCH_RESULT_LIMIT: usize = 20;
pub const CHAT_RESULT_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Plain search endpoint: up to 20 results, ascending id when no
    /// price ordering applies.
    Search,
    /// Chat responder: up to 5 results, most-recently-added first when no
    /// price ordering applies.
    Chat,
}

impl RetrievalMode {
    pub fn limit(&self) -> usize {
        match self {
            Self::Search => SEARCH_RESULT_LIMIT,
            Self::Chat => CHAT_RESULT_LIMIT,
        }
    }
}

/// Applies a parsed intent to a catalog snapshot and returns the ranked
/// candidates, at most `mode.limit()` of them.
pub fn retrieve(intent: &QueryIntent, catalog: &[Product], mode: RetrievalMode) -> Vec<Product> {
    let mut matched: Vec<Product> =
        catalog.iter().filter(|product| matches_intent(intent, product)).cloned().collect();
    order(intent, mode, &mut matched);
    matched.truncate(mode.limit());
    matched
}

fn matches_intent(intent: &QueryIntent, product: &Product) -> bool {
    if let Some(category) = &intent.category {
        let in_category = product.category.to_ascii_lowercase().contains(category.as_str())
            || product.tags.to_ascii_lowercase().contains(category.as_str());
        if !in_category {
            return false;
        }
    }

    if let Some(amount) = intent.amount {
        let bound = Decimal::from(amount);
        if matches!(intent.direction, Some(PriceDirection::Under)) {
            if product.price > bound {
                return false;
            }
        } else if intent.price_floor_requested() && product.price < bound {
            return false;
        }
    }

    if !intent.keywords.is_empty() {
        let haystacks = [
            product.name.to_ascii_lowercase(),
            product.category.to_ascii_lowercase(),
            product.tags.to_ascii_lowercase(),
            product.short_description.to_ascii_lowercase(),
        ];
        let any_keyword = intent
            .keywords
            .iter()
            .any(|keyword| haystacks.iter().any(|haystack| haystack.contains(keyword.as_str())));
        if !any_keyword {
            return false;
        }
    }

    true
}

/// Ordering policy. The secondary key is always ascending id, so repeated
/// retrieval over the same snapshot is stable.
fn order(intent: &QueryIntent, mode: RetrievalMode, products: &mut [Product]) {
    let price_descending = (intent.wants_high && intent.amount.is_none())
        || (intent.amount.is_some() && intent.price_floor_requested());
    let price_ascending =
        intent.amount.is_some() && matches!(intent.direction, Some(PriceDirection::Under));

    if price_descending {
        products.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.0.cmp(&b.id.0)));
    } else if price_ascending {
        products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.0.cmp(&b.id.0)));
    } else {
        match mode {
            RetrievalMode::Chat => products.sort_by(|a, b| b.id.0.cmp(&a.id.0)),
            RetrievalMode::Search => products.sort_by(|a, b| a.id.0.cmp(&b.id.0)),
        }
    }
}
