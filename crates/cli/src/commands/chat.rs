use std::sync::Arc;

use crate::commands::CommandResult;
use shopmind_agent::{ChatResponder, GeminiClient, NoopGenerator, TextGenerator};
use shopmind_core::config::{AppConfig, LoadOptions};
use shopmind_core::ApplicationError;
use shopmind_db::repositories::{SqlCatalogRepository, SqlInteractionRepository};
use shopmind_db::{connect_from_config, migrations, DbPool};

pub fn run(message: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_from_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let reply = responder(&pool, &config).respond(message).await;
        pool.close().await;

        reply.map_err(|error| match error {
            ApplicationError::Domain(domain) => {
                ("invalid_request", domain.user_message().to_string(), 2u8)
            }
            ApplicationError::Persistence(detail) => ("persistence", detail, 6u8),
        })
    });

    match result {
        Ok(reply) => CommandResult::success("chat", reply),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("chat", error_class, message, exit_code)
        }
    }
}

/// Offline mode (no API key) still works: the responder then always uses
/// its deterministic catalog reply.
pub(crate) fn responder(pool: &DbPool, config: &AppConfig) -> ChatResponder {
    let generator: Arc<dyn TextGenerator> = match GeminiClient::from_config(&config.ai) {
        Some(client) => Arc::new(client),
        None => Arc::new(NoopGenerator),
    };
    ChatResponder::new(
        Arc::new(SqlCatalogRepository::new(pool.clone())),
        Arc::new(SqlInteractionRepository::new(pool.clone())),
        generator,
    )
}
