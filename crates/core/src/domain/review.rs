use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub i64);

/// A customer review. Immutable once created; there is no update or
/// delete path for reviews in this system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    /// Star rating in `[1, 5]`.
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A review about to be stored; id and timestamp are assigned by the
/// store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReview {
    pub product_id: ProductId,
    pub rating: u8,
    pub text: String,
}

impl NewReview {
    pub fn new(product_id: ProductId, rating: u8, text: impl Into<String>) -> Self {
        Self { product_id, rating, text: text.into() }
    }
}
