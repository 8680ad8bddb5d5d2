//! Review summarization: AI prose when available, the keyword heuristic
//! from `shopmind_core::summary` when not. Either way the result is
//! persisted on the product so later reads are cheap.

use std::sync::Arc;

use tracing::info;

use shopmind_core::{basic_review_summary, ApplicationError, DomainError, ProductId, Review};
use shopmind_db::repositories::{CatalogRepository, ReviewRepository};

use crate::llm::TextGenerator;

/// Appended to the heuristic summary when the AI backend produced no
/// usable output.
pub const AI_QUOTA_NOTICE: &str = "(Note: AI quota reached, showing basic summary.)";

/// Most recent reviews fed into one summary.
const REVIEW_WINDOW: u32 = 20;

pub struct ReviewSummarizer {
    catalog: Arc<dyn CatalogRepository>,
    reviews: Arc<dyn ReviewRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl ReviewSummarizer {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        reviews: Arc<dyn ReviewRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self { catalog, reviews, generator }
    }

    /// Fails only for an unknown product or a product with no reviews.
    /// AI silence is not a failure: the heuristic summary plus a notice
    /// is returned and persisted instead.
    pub async fn summarize_reviews(&self, id: ProductId) -> Result<String, ApplicationError> {
        if self.catalog.find_by_id(id).await?.is_none() {
            return Err(DomainError::ProductNotFound(id).into());
        }

        let reviews = self.reviews.recent_for_product(id, REVIEW_WINDOW).await?;
        if reviews.is_empty() {
            return Err(DomainError::NoReviews(id).into());
        }

        let raw = self.generator.generate_text(&summary_prompt(&reviews)).await;
        let summary = if raw.trim().is_empty() {
            info!(event_name = "summary.fallback", product_id = id.0, reviews = reviews.len());
            format!("{}\n\n{AI_QUOTA_NOTICE}", basic_review_summary(&reviews))
        } else {
            raw.trim().to_string()
        };

        self.catalog.update_ai_review_summary(id, &summary).await?;
        Ok(summary)
    }
}

fn summary_prompt(reviews: &[Review]) -> String {
    let review_lines = reviews
        .iter()
        .map(|review| format!("- ({}/5) {}", review.rating, review.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Summarize these customer reviews into:\n\
         1) overall sentiment (one line)\n\
         2) top pros (3 bullets)\n\
         3) top cons (3 bullets)\n\
         Keep it concise.\n\n\
         Reviews:\n{review_lines}"
    )
}
