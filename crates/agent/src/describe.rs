//! AI product descriptions. Unlike chat and summaries there is no
//! deterministic stand-in worth persisting, so an empty AI response is a
//! hard error and nothing is written.

use std::sync::Arc;

use shopmind_core::{ApplicationError, DomainError, Product, ProductId};
use shopmind_db::repositories::CatalogRepository;

use crate::llm::TextGenerator;

pub struct DescriptionGenerator {
    catalog: Arc<dyn CatalogRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl DescriptionGenerator {
    pub fn new(catalog: Arc<dyn CatalogRepository>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { catalog, generator }
    }

    pub async fn generate_description(&self, id: ProductId) -> Result<String, ApplicationError> {
        let product = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ProductNotFound(id))?;

        let text = self.generator.generate_text(&description_prompt(&product)).await;
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::AiUnavailable { operation: "description generation" }.into());
        }

        self.catalog.update_ai_description(id, text).await?;
        Ok(text.to_string())
    }
}

fn description_prompt(product: &Product) -> String {
    format!(
        "Write a compelling 80-120 word e-commerce product description.\n\
         Focus on benefits, not just features. Plain text, no markdown.\n\n\
         Product: {}\n\
         Category: {}\n\
         Price: ${}\n\
         Tags: {}\n\
         Current description: {}",
        product.name, product.category, product.price, product.tags, product.short_description
    )
}
