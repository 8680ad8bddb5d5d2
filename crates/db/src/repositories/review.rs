use chrono::{DateTime, Utc};
use sqlx::Row;

use shopmind_core::{NewReview, ProductId, Review, ReviewId};

use super::{RepositoryError, ReviewRepository};
use crate::DbPool;

pub struct SqlReviewRepository {
    pool: DbPool,
}

impl SqlReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_review(row: &sqlx::sqlite::SqliteRow) -> Result<Review, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let product_id: i64 =
        row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let rating: i64 = row.try_get("rating").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let text: String = row.try_get("text").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let rating = u8::try_from(rating)
        .map_err(|_| RepositoryError::Decode(format!("rating {rating} out of range")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid created_at: {e}")))?;

    Ok(Review { id: ReviewId(id), product_id: ProductId(product_id), rating, text, created_at })
}

#[async_trait::async_trait]
impl ReviewRepository for SqlReviewRepository {
    async fn add(&self, review: NewReview) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO review (product_id, rating, text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(review.product_id.0)
        .bind(i64::from(review.rating))
        .bind(&review.text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_for_product(
        &self,
        product_id: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, product_id, rating, text, created_at
             FROM review WHERE product_id = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(product_id.0)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_review).collect()
    }
}
