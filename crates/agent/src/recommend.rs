//! Per-user recommendations: behavioral signals in, AI ranking out, with
//! a popularity fallback chain that keeps the operation total.

use std::collections::HashMap;
use std::sync::Arc;

use shopmind_core::{ApplicationError, EventType, Interaction, Product, ProductId};
use shopmind_db::repositories::{CatalogRepository, InteractionRepository};

use crate::llm::{generate_json, TextGenerator};

pub const RECOMMENDATION_LIMIT: usize = 10;

/// How far back into the interaction log one recommendation looks.
const INTERACTION_WINDOW: u32 = 50;
/// Most recent entries per signal list embedded in the prompt.
const SIGNAL_WINDOW: usize = 10;
/// Candidate products offered to the AI, capped for prompt size.
const CANDIDATE_LIMIT: usize = 50;

pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogRepository>,
    interactions: Arc<dyn InteractionRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        interactions: Arc<dyn InteractionRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self { catalog, interactions, generator }
    }

    /// Fallback chain: AI ranking over behavioral signals, then purchase
    /// popularity (no history), then the first catalog products by id.
    /// AI failure only ever surfaces as an empty response upstream, so
    /// this never errors on the AI's account.
    pub async fn recommend(&self, user: &str) -> Result<Vec<Product>, ApplicationError> {
        let recent =
            self.interactions.recent_for_user(user, INTERACTION_WINDOW).await?;
        let all = self.catalog.list_all().await?;

        if recent.is_empty() {
            return self.popular_products(&all).await;
        }

        let names: HashMap<ProductId, &str> =
            all.iter().map(|product| (product.id, product.name.as_str())).collect();
        let viewed = product_signal(&recent, EventType::View, &names);
        let purchased = product_signal(&recent, EventType::Purchase, &names);
        let searched = search_signal(&recent);

        let candidates: Vec<&Product> = all.iter().take(CANDIDATE_LIMIT).collect();
        let prompt = ranking_prompt(&viewed, &purchased, &searched, &candidates);
        let data = generate_json(self.generator.as_ref(), &prompt).await;

        let ranked_ids: Vec<ProductId> = match data.get("recommended_product_ids") {
            Some(serde_json::Value::Array(values)) => {
                values.iter().filter_map(|value| value.as_i64()).map(ProductId).collect()
            }
            _ => Vec::new(),
        };

        // The AI's order is authoritative; ids it invented are dropped,
        // and a repeated id counts once.
        let by_id: HashMap<ProductId, &Product> =
            candidates.iter().map(|product| (product.id, *product)).collect();
        let mut seen = Vec::new();
        let mut ordered = Vec::new();
        for id in ranked_ids {
            if seen.contains(&id) {
                continue;
            }
            if let Some(product) = by_id.get(&id) {
                seen.push(id);
                ordered.push((*product).clone());
            }
        }
        ordered.truncate(RECOMMENDATION_LIMIT);

        if ordered.is_empty() {
            return Ok(all.into_iter().take(RECOMMENDATION_LIMIT).collect());
        }
        Ok(ordered)
    }

    /// No-history branch: rank by purchase count across all users; when
    /// nobody has purchased anything yet, the first catalog products.
    async fn popular_products(&self, all: &[Product]) -> Result<Vec<Product>, ApplicationError> {
        let counts = self.interactions.purchase_counts().await?;
        let top_ids: Vec<ProductId> =
            counts.iter().take(RECOMMENDATION_LIMIT).map(|(id, _)| *id).collect();
        if top_ids.is_empty() {
            return Ok(all.iter().take(RECOMMENDATION_LIMIT).cloned().collect());
        }

        let found = self.catalog.find_by_ids(&top_ids).await?;
        let by_id: HashMap<ProductId, Product> =
            found.into_iter().map(|product| (product.id, product)).collect();
        Ok(top_ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
    }
}

/// Names of products the user touched with `event`, most recent
/// `SIGNAL_WINDOW` entries, presented oldest first. The log hands us
/// newest-first, so the kept window is reversed; the AI only needs the
/// signal, but the prompt must be deterministic for a given history.
fn product_signal(
    recent: &[Interaction],
    event: EventType,
    names: &HashMap<ProductId, &str>,
) -> Vec<String> {
    let mut signal: Vec<String> = recent
        .iter()
        .filter(|interaction| interaction.event_type == event)
        .filter_map(|interaction| interaction.product_id)
        .filter_map(|id| names.get(&id).map(|name| (*name).to_string()))
        .take(SIGNAL_WINDOW)
        .collect();
    signal.reverse();
    signal
}

fn search_signal(recent: &[Interaction]) -> Vec<String> {
    let mut signal: Vec<String> = recent
        .iter()
        .filter(|interaction| interaction.event_type == EventType::Search)
        .filter_map(|interaction| interaction.query_text.clone())
        .take(SIGNAL_WINDOW)
        .collect();
    signal.reverse();
    signal
}

fn ranking_prompt(
    viewed: &[String],
    purchased: &[String],
    searched: &[String],
    candidates: &[&Product],
) -> String {
    let catalog_lines = candidates
        .iter()
        .map(|product| {
            format!(
                "{}. {} | category={} | price={} | tags={}",
                product.id, product.name, product.category, product.price, product.tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an e-commerce recommendation engine.\n\
         Return ONLY valid JSON (no markdown, no explanation).\n\n\
         User behavior:\n\
         - viewed: {viewed:?}\n\
         - purchased: {purchased:?}\n\
         - searched: {searched:?}\n\n\
         Task:\n\
         Rank the best product IDs from this catalog for the user.\n\n\
         Catalog:\n{catalog_lines}\n\n\
         Return JSON in this format:\n\
         {{\n  \"recommended_product_ids\": [1,2,3,4,5,6,7,8]\n}}"
    )
}
