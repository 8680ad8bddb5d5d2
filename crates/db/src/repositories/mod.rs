use async_trait::async_trait;
use thiserror::Error;

use shopmind_core::{
    ApplicationError, Interaction, NewInteraction, NewReview, Product, ProductId, Review,
};

pub mod catalog;
pub mod interaction;
pub mod memory;
pub mod review;

pub use catalog::SqlCatalogRepository;
pub use interaction::SqlInteractionRepository;
pub use memory::{InMemoryCatalogRepository, InMemoryInteractionRepository, InMemoryReviewRepository};
pub use review::SqlReviewRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Persistence(value.to_string())
    }
}

/// Addressable product catalog. The only write paths are product insert
/// (seeding) and last-write-wins updates of the two AI-derived fields.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Full catalog, ascending id.
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products whose id is in `ids`, ascending id. Unknown ids are
    /// silently skipped.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Inserts a product with its given id; no-op when the id already
    /// exists, so seeding stays idempotent.
    async fn add(&self, product: &Product) -> Result<(), RepositoryError>;

    async fn update_ai_description(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError>;

    async fn update_ai_review_summary(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError>;
}

/// Append-only log of user actions.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn append(&self, interaction: NewInteraction) -> Result<(), RepositoryError>;

    /// Most recent `limit` interactions for one user, newest first.
    async fn recent_for_user(
        &self,
        user: &str,
        limit: u32,
    ) -> Result<Vec<Interaction>, RepositoryError>;

    /// Purchase totals per product across all users, most purchased
    /// first.
    async fn purchase_counts(&self) -> Result<Vec<(ProductId, i64)>, RepositoryError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn add(&self, review: NewReview) -> Result<(), RepositoryError>;

    /// Most recent `limit` reviews for a product, newest first.
    async fn recent_for_product(
        &self,
        product_id: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, RepositoryError>;
}
