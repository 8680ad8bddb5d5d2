//! SQL repository contract tests against an in-memory SQLite database.

use shopmind_db::repositories::{
    CatalogRepository, InteractionRepository, ReviewRepository, SqlCatalogRepository,
    SqlInteractionRepository, SqlReviewRepository,
};
use shopmind_db::{connect_with_settings, migrations, seed_demo_catalog, DbPool};

use shopmind_core::{NewInteraction, NewReview, ProductId};

async fn test_pool() -> DbPool {
    // One connection only: every connection to `sqlite::memory:` is a
    // distinct database.
    let pool =
        connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect in-memory sqlite");
    migrations::run_pending(&pool).await.expect("apply migrations");
    pool
}

#[tokio::test]
async fn seeded_catalog_lists_all_products_ascending() {
    let pool = test_pool().await;
    let summary = seed_demo_catalog(&pool).await.expect("seed");
    assert_eq!(summary.products, 10);

    let catalog = SqlCatalogRepository::new(pool.clone());
    let all = catalog.list_all().await.expect("list");
    assert_eq!(all.len(), 10);
    assert_eq!(all[0].name, "Wireless Earbuds");
    assert_eq!(all[9].name, "Yoga Mat");
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test]
async fn find_by_ids_skips_unknown_ids() {
    let pool = test_pool().await;
    seed_demo_catalog(&pool).await.expect("seed");

    let catalog = SqlCatalogRepository::new(pool.clone());
    let found = catalog
        .find_by_ids(&[ProductId(6), ProductId(999), ProductId(10)])
        .await
        .expect("find by ids");
    let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Smart Watch", "Yoga Mat"]);
}

#[tokio::test]
async fn ai_field_updates_are_last_write_wins() {
    let pool = test_pool().await;
    seed_demo_catalog(&pool).await.expect("seed");

    let catalog = SqlCatalogRepository::new(pool.clone());
    catalog.update_ai_description(ProductId(1), "first").await.expect("update");
    catalog.update_ai_description(ProductId(1), "second").await.expect("update");
    catalog.update_ai_review_summary(ProductId(1), "summary").await.expect("update");

    let product = catalog.find_by_id(ProductId(1)).await.expect("find").expect("present");
    assert_eq!(product.ai_description, "second");
    assert_eq!(product.ai_review_summary, "summary");
}

#[tokio::test]
async fn interaction_log_round_trips_and_ranks_purchases() {
    let pool = test_pool().await;
    seed_demo_catalog(&pool).await.expect("seed");

    let interactions = SqlInteractionRepository::new(pool.clone());
    interactions.append(NewInteraction::search("dana", "yoga gear")).await.expect("append");
    interactions.append(NewInteraction::purchase("dana", ProductId(10))).await.expect("append");

    let recent = interactions.recent_for_user("dana", 50).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].product_id, Some(ProductId(10)));
    assert_eq!(recent[1].query_text.as_deref(), Some("yoga gear"));

    let counts = interactions.purchase_counts().await.expect("counts");
    assert!(counts.iter().any(|(id, count)| *id == ProductId(10) && *count >= 1));
    assert!(counts.windows(2).all(|pair| pair[0].1 >= pair[1].1));
}

#[tokio::test]
async fn reviews_come_back_newest_first_with_limit() {
    let pool = test_pool().await;
    seed_demo_catalog(&pool).await.expect("seed");

    let reviews = SqlReviewRepository::new(pool.clone());
    reviews.add(NewReview::new(ProductId(1), 5, "Latest review.")).await.expect("add");

    let recent = reviews.recent_for_product(ProductId(1), 2).await.expect("recent");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].text, "Latest review.");

    let empty = reviews.recent_for_product(ProductId(999), 20).await.expect("recent");
    assert!(empty.is_empty());
}
