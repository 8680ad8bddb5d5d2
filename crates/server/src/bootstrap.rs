use thiserror::Error;
use tracing::info;

use shopmind_core::config::{AppConfig, ConfigError, LoadOptions};
use shopmind_db::{connect_from_config, migrations, DbPool};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Connects, migrates, and hands back the pieces the router needs. The
/// database is fully migrated before any request can be served.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool =
        connect_from_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    Ok(Application { config, db_pool })
}

#[cfg(test)]
mod tests {
    use shopmind_core::config::AppConfig;

    use super::bootstrap_with_config;

    #[tokio::test]
    async fn bootstrap_creates_catalog_tables() {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        // one connection so the in-memory database is shared
        config.database.max_connections = 1;

        let app = bootstrap_with_config(config).await.expect("bootstrap");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('product', 'review', 'interaction')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("count tables");
        assert_eq!(table_count, 3);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_fails_for_unreachable_database() {
        let mut config = AppConfig::default();
        config.database.url = "sqlite:///nonexistent-dir/shopmind.db".to_string();

        let result = bootstrap_with_config(config).await;
        assert!(result.is_err());
    }
}
