//! In-memory repository implementations for tests and offline tooling.

use chrono::Utc;
use tokio::sync::RwLock;

use shopmind_core::{Interaction, NewInteraction, NewReview, Product, ProductId, Review, ReviewId};

use super::{CatalogRepository, InteractionRepository, RepositoryError, ReviewRepository};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.products.read().await.clone();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|product| product.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut found: Vec<Product> =
            products.iter().filter(|product| ids.contains(&product.id)).cloned().collect();
        found.sort_by_key(|product| product.id);
        Ok(found)
    }

    async fn add(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if !products.iter().any(|existing| existing.id == product.id) {
            products.push(product.clone());
        }
        Ok(())
    }

    async fn update_ai_description(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if let Some(product) = products.iter_mut().find(|product| product.id == id) {
            product.ai_description = text.to_string();
        }
        Ok(())
    }

    async fn update_ai_review_summary(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if let Some(product) = products.iter_mut().find(|product| product.id == id) {
            product.ai_review_summary = text.to_string();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryInteractionRepository {
    entries: RwLock<Vec<Interaction>>,
}

#[async_trait::async_trait]
impl InteractionRepository for InMemoryInteractionRepository {
    async fn append(&self, interaction: NewInteraction) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().await;
        let id = entries.len() as i64 + 1;
        entries.push(Interaction {
            id,
            user: interaction.user,
            product_id: interaction.product_id,
            event_type: interaction.event_type,
            query_text: interaction.query_text,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent_for_user(
        &self,
        user: &str,
        limit: u32,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let entries = self.entries.read().await;
        let mut recent: Vec<Interaction> =
            entries.iter().filter(|entry| entry.user == user).cloned().collect();
        // id is monotonic, so it breaks ties between equal timestamps
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recent.truncate(limit as usize);
        Ok(recent)
    }

    async fn purchase_counts(&self) -> Result<Vec<(ProductId, i64)>, RepositoryError> {
        use std::collections::BTreeMap;

        let entries = self.entries.read().await;
        let mut counts: BTreeMap<ProductId, i64> = BTreeMap::new();
        for entry in entries.iter() {
            if entry.event_type == shopmind_core::EventType::Purchase {
                if let Some(product_id) = entry.product_id {
                    *counts.entry(product_id).or_insert(0) += 1;
                }
            }
        }
        let mut ranked: Vec<(ProductId, i64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked)
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<Vec<Review>>,
}

#[async_trait::async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn add(&self, review: NewReview) -> Result<(), RepositoryError> {
        let mut reviews = self.reviews.write().await;
        let id = reviews.len() as i64 + 1;
        reviews.push(Review {
            id: ReviewId(id),
            product_id: review.product_id,
            rating: review.rating,
            text: review.text,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn recent_for_product(
        &self,
        product_id: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = self.reviews.read().await;
        let mut recent: Vec<Review> =
            reviews.iter().filter(|review| review.product_id == product_id).cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        recent.truncate(limit as usize);
        Ok(recent)
    }
}
