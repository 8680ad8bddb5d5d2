use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "product",
        "review",
        "interaction",
        "idx_review_product_id",
        "idx_review_created_at",
        "idx_interaction_user_name",
        "idx_interaction_event_type",
        "idx_interaction_created_at",
    ];

    // max_connections = 1: every connection to `sqlite::memory:` opens a
    // fresh database, so the pool must never hand out a second one.
    #[tokio::test]
    async fn migrations_create_all_managed_schema_objects() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5)
            .await
            .expect("connect in-memory sqlite");
        run_pending(&pool).await.expect("apply migrations");

        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%'",
        )
        .fetch_all(&pool)
        .await
        .expect("query sqlite_master");

        let names: Vec<String> =
            rows.iter().map(|row| row.get::<String, _>("name")).collect();
        for object in MANAGED_SCHEMA_OBJECTS {
            assert!(names.iter().any(|name| name == object), "missing schema object {object}");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 5)
            .await
            .expect("connect in-memory sqlite");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");
    }
}
