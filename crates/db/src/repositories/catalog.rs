use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use shopmind_core::{Product, ProductId};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, category, price, tags, short_description, \
                               ai_description, ai_review_summary";

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tags: String = row.try_get("tags").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let short_description: String =
        row.try_get("short_description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let ai_description: String =
        row.try_get("ai_description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let ai_review_summary: String =
        row.try_get("ai_review_summary").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(&price_str).map_err(|e| {
        RepositoryError::Decode(format!("invalid price `{price_str}` for product {id}: {e}"))
    })?;

    Ok(Product {
        id: ProductId(id),
        name,
        category,
        price,
        tags,
        short_description,
        ai_description,
        ai_review_summary,
    })
}

#[async_trait::async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows =
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(ref r) => Ok(Some(row_to_product(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id IN ({placeholders}) ORDER BY id"
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.0);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn add(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO product (id, name, category, price, tags, short_description,
                                  ai_description, ai_review_summary)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price.to_string())
        .bind(&product.tags)
        .bind(&product.short_description)
        .bind(&product.ai_description)
        .bind(&product.ai_review_summary)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_ai_description(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE product SET ai_description = ? WHERE id = ?")
            .bind(text)
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_ai_review_summary(
        &self,
        id: ProductId,
        text: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE product SET ai_review_summary = ? WHERE id = ?")
            .bind(text)
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
