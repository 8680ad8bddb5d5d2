use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry. `ai_description` and `ai_review_summary` are the only
/// mutable fields; both are overwritten (not appended) whenever the
/// corresponding generation succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Non-negative price in catalog currency.
    pub price: Decimal,
    /// Comma-joined lowercase tags, as stored.
    pub tags: String,
    pub short_description: String,
    pub ai_description: String,
    pub ai_review_summary: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        tags: impl Into<String>,
        short_description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
            tags: tags.into(),
            short_description: short_description.into(),
            ai_description: String::new(),
            ai_review_summary: String::new(),
        }
    }
}
