use thiserror::Error;

use crate::domain::product::ProductId;

/// Caller-visible rejections. These are the only paths allowed to surface
/// as errors to the end user; AI failure everywhere else is absorbed into
/// a deterministic fallback with a visible notice.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("product {0} has no reviews to summarize")]
    NoReviews(ProductId),
    #[error("product {0} was not found")]
    ProductNotFound(ProductId),
    /// Only description generation reports this: it has no deterministic
    /// fallback, so an empty AI response must be surfaced explicitly.
    #[error("AI backend returned no text for {operation}")]
    AiUnavailable { operation: &'static str },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Fixed user-facing message for each rejection.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "Please type a question first.",
            Self::NoReviews(_) => "No reviews to summarize",
            Self::ProductNotFound(_) => "Product not found",
            Self::AiUnavailable { .. } => "AI backend returned empty text",
        }
    }
}
