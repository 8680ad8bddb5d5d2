use chrono::{DateTime, Utc};
use sqlx::Row;

use shopmind_core::{EventType, Interaction, NewInteraction, ProductId};

use super::{InteractionRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInteractionRepository {
    pool: DbPool,
}

impl SqlInteractionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_interaction(row: &sqlx::sqlite::SqliteRow) -> Result<Interaction, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let user: String =
        row.try_get("user_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let product_id: Option<i64> =
        row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let event_str: String =
        row.try_get("event_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let query_text: Option<String> =
        row.try_get("query_text").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let event_type = EventType::parse(&event_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown event type `{event_str}`")))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("invalid created_at: {e}")))?;

    Ok(Interaction {
        id,
        user,
        product_id: product_id.map(ProductId),
        event_type,
        query_text,
        created_at,
    })
}

#[async_trait::async_trait]
impl InteractionRepository for SqlInteractionRepository {
    async fn append(&self, interaction: NewInteraction) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO interaction (user_name, product_id, event_type, query_text, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&interaction.user)
        .bind(interaction.product_id.map(|id| id.0))
        .bind(interaction.event_type.as_str())
        .bind(&interaction.query_text)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn recent_for_user(
        &self,
        user: &str,
        limit: u32,
    ) -> Result<Vec<Interaction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, user_name, product_id, event_type, query_text, created_at
             FROM interaction WHERE user_name = ?
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_interaction).collect()
    }

    async fn purchase_counts(&self) -> Result<Vec<(ProductId, i64)>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT product_id, COUNT(*) AS purchases
             FROM interaction
             WHERE event_type = 'PURCHASE' AND product_id IS NOT NULL
             GROUP BY product_id
             ORDER BY purchases DESC, product_id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let product_id: i64 =
                    row.try_get("product_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let purchases: i64 =
                    row.try_get("purchases").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                Ok((ProductId(product_id), purchases))
            })
            .collect()
    }
}
