use crate::commands::{chat, CommandResult};
use shopmind_core::config::{AppConfig, LoadOptions};
use shopmind_core::ApplicationError;
use shopmind_db::{connect_from_config, migrations};

pub fn run(query: &str, user: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "search",
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
                "search",
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

        let results = chat::responder(&pool, &config).search(query, user).await;
        pool.close().await;

        results.map_err(|error| match error {
            ApplicationError::Domain(domain) => {
                ("invalid_request", domain.user_message().to_string(), 2u8)
            }
            ApplicationError::Persistence(detail) => ("persistence", detail, 6u8),
        })
    });

    match result {
        Ok(results) if results.is_empty() => {
            CommandResult::success("search", format!("no matching products for '{query}'"))
        }
        Ok(results) => {
            let lines: Vec<String> = results
                .iter()
                .map(|product| {
                    format!(
                        "  - {}. {} (${}) [{}]",
                        product.id, product.name, product.price, product.category
                    )
                })
                .collect();
            let message =
                format!("{} result(s) for '{}':\n{}", results.len(), query, lines.join("\n"));
            CommandResult::success("search", message)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("search", error_class, message, exit_code)
        }
    }
}
