//! Grounded chat replies and deterministic search.
//!
//! The reply is fully computed from the catalog before the AI backend is
//! consulted; the backend may only restyle the already-selected products.

use std::sync::Arc;

use shopmind_core::{
    retrieve, ApplicationError, DomainError, IntentParser, NewInteraction, PriceDirection,
    Product, QueryIntent, RetrievalMode,
};
use shopmind_db::repositories::{CatalogRepository, InteractionRepository};

use crate::llm::TextGenerator;

pub const NO_MATCH_REPLY: &str = "I couldn't find matching products. Try: 'most expensive \
                                  products', 'over $50 electronics', or 'under $30 sports'.";

/// Appended to the deterministic reply when the AI backend produced no
/// usable output.
pub const AI_BUSY_NOTICE: &str = "(Note: AI service busy, showing catalog-based suggestions.)";

pub struct ChatResponder {
    catalog: Arc<dyn CatalogRepository>,
    interactions: Arc<dyn InteractionRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl ChatResponder {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        interactions: Arc<dyn InteractionRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self { catalog, interactions, generator }
    }

    /// Always returns non-empty text for a non-empty message. Empty or
    /// whitespace input is the only rejection, and it happens before any
    /// catalog or AI call.
    pub async fn respond(&self, message: &str) -> Result<String, ApplicationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }

        let intent = IntentParser::new().parse(message);
        let catalog = self.catalog.list_all().await?;
        let products = retrieve(&intent, &catalog, RetrievalMode::Chat);

        if products.is_empty() {
            return Ok(NO_MATCH_REPLY.to_string());
        }

        let deterministic = render_reply(&intent, &products);
        let restyled = self.generator.generate_text(&restyle_prompt(message, &products)).await;
        let restyled = restyled.trim();
        if restyled.is_empty() {
            Ok(format!("{deterministic}\n\n{AI_BUSY_NOTICE}"))
        } else {
            // Trusted to restyle, not to add products: the deterministic
            // set was already computed and is the only data it saw.
            Ok(restyled.to_string())
        }
    }

    /// Plain search: deterministic ranked results as structured data, no
    /// AI involved. Records a SEARCH interaction first when the caller is
    /// identified.
    pub async fn search(
        &self,
        query: &str,
        user: Option<&str>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(user) = user {
            self.interactions.append(NewInteraction::search(user, query)).await?;
        }

        let intent = IntentParser::new().parse(query);
        let catalog = self.catalog.list_all().await?;
        Ok(retrieve(&intent, &catalog, RetrievalMode::Search))
    }
}

/// Four title variants: bare-high, priced-over, priced-under, unfiltered.
/// The threshold is named whenever an amount was parsed.
fn title_for(intent: &QueryIntent) -> String {
    if intent.wants_high && intent.amount.is_none() {
        return "Here are some higher-priced products from our catalog:".to_string();
    }
    if let Some(amount) = intent.amount {
        if intent.price_floor_requested() {
            return format!("Here are some products from our catalog priced above ${amount}:");
        }
        if matches!(intent.direction, Some(PriceDirection::Under)) {
            return format!("Here are some products from our catalog under ${amount}:");
        }
    }
    "Here are some products from our catalog:".to_string()
}

fn render_reply(intent: &QueryIntent, products: &[Product]) -> String {
    let mut lines = vec![title_for(intent)];
    for product in products {
        lines.push(format!(
            "- {} (${}) — {} (View: /products/{}/)",
            product.name, product.price, product.category, product.id
        ));
    }
    lines.join("\n")
}

fn restyle_prompt(message: &str, products: &[Product]) -> String {
    let catalog_text = products
        .iter()
        .map(|product| {
            format!(
                "- {} (${}) [{}] Tags: {}",
                product.name, product.price, product.category, product.tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are Shopmind's assistant. ONLY use products from the list below.\n\
         Do NOT invent new products. Do NOT add items not in the list.\n\n\
         User request: {message}\n\n\
         Products:\n{catalog_text}\n\n\
         Reply with a short friendly list. Include prices."
    )
}
