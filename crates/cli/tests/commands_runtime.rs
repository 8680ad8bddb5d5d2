use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use shopmind_cli::commands::{chat, migrate, search, seed};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("SHOPMIND_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_reports_db_connectivity_failure() {
    with_env(&[("SHOPMIND_DATABASE_URL", "sqlite:///nonexistent-dir/shopmind.db")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 4, "expected db connectivity failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "db_connectivity");
    });
}

#[test]
fn seed_populates_once_then_reports_noop() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}/shopmind.db?mode=rwc", dir.path().display());

    with_env(&[("SHOPMIND_DATABASE_URL", &url)], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");
        let message = first_payload["message"].as_str().unwrap_or("");
        assert!(message.contains("10 products"), "unexpected seed message: {message}");
        assert!(message.contains("30 reviews"), "unexpected seed message: {message}");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["message"], "catalog already seeded, nothing to do");
    });
}

#[test]
fn chat_rejects_an_empty_message() {
    with_env(&[("SHOPMIND_DATABASE_URL", "sqlite::memory:?cache=shared")], || {
        let result = chat::run("   ");
        assert_eq!(result.exit_code, 2, "expected invalid request exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "chat");
        assert_eq!(payload["error_class"], "invalid_request");
        assert_eq!(payload["message"], "Please type a question first.");
    });
}

#[test]
fn chat_on_an_empty_catalog_returns_guidance() {
    with_env(&[("SHOPMIND_DATABASE_URL", "sqlite::memory:?cache=shared")], || {
        let result = chat::run("under $30 sports");
        assert_eq!(result.exit_code, 0, "expected chat success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("I couldn't find matching products"));
    });
}

#[test]
fn search_lists_ranked_results_from_a_seeded_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}/shopmind.db?mode=rwc", dir.path().display());

    with_env(&[("SHOPMIND_DATABASE_URL", &url)], || {
        assert_eq!(seed::run().exit_code, 0, "expected seed success");

        let result = search::run("under $30", Some("alice"));
        assert_eq!(result.exit_code, 0, "expected search success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("Yoga Mat"), "unexpected search message: {message}");
        // cheapest first for an under-bound query
        let yoga = message.find("Yoga Mat").expect("yoga mat listed");
        let sunglasses = message.find("Sunglasses").expect("sunglasses listed");
        assert!(yoga < sunglasses);
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHOPMIND_DATABASE_URL",
        "GEMINI_API_KEY",
        "SHOPMIND_GEMINI_MODEL",
        "SHOPMIND_LOG_LEVEL",
        "SHOPMIND_LOG_FORMAT",
        "SHOPMIND_BIND_ADDRESS",
        "SHOPMIND_PORT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
