//! Deterministic demo dataset: ten products, three users with behavior
//! history, and a few reviews per product. Safe to run repeatedly; a
//! non-empty catalog is left untouched.

use std::str::FromStr;

use rust_decimal::Decimal;

use shopmind_core::{NewInteraction, NewReview, Product, ProductId};

use crate::repositories::{
    CatalogRepository, InteractionRepository, RepositoryError, ReviewRepository,
    SqlCatalogRepository, SqlInteractionRepository, SqlReviewRepository,
};
use crate::DbPool;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub reviews: usize,
    pub interactions: usize,
}

const DEMO_PRODUCTS: &[(i64, &str, &str, &str, &str, &str)] = &[
    (1, "Wireless Earbuds", "Electronics", "49.90", "audio,wireless,gym", "Compact wireless earbuds for music and calls."),
    (2, "Gaming Mouse", "Electronics", "29.90", "gaming,pc,accessory", "Ergonomic mouse with precise tracking."),
    (3, "Running Shoes", "Fashion", "89.00", "sports,fitness,comfort", "Lightweight shoes designed for daily runs."),
    (4, "Coffee Maker", "Home", "79.00", "kitchen,coffee,morning", "Brew fresh coffee quickly and easily."),
    (5, "Backpack", "Fashion", "39.00", "travel,school,bag", "Durable backpack for work, school, or travel."),
    (6, "Smart Watch", "Electronics", "119.00", "health,fitness,wearable", "Track fitness, sleep, and notifications."),
    (7, "Blender", "Home", "55.00", "kitchen,smoothie,healthy", "Blend smoothies, shakes, and sauces fast."),
    (8, "Sunglasses", "Fashion", "25.00", "summer,style,uv", "UV protection with a modern style."),
    (9, "Laptop Stand", "Office", "19.90", "desk,ergonomic,work", "Improve posture with an adjustable stand."),
    (10, "Yoga Mat", "Sports", "18.00", "fitness,yoga,home-workout", "Non-slip mat for yoga and stretching."),
];

const DEMO_REVIEWS: &[(u8, &str)] = &[
    (5, "Great quality and works perfectly."),
    (4, "Good value for money. I like it."),
    (3, "It's okay, but could be better."),
    (2, "Not very durable. Disappointed."),
];

const DEMO_SEARCHES: &[&str] =
    &["wireless audio", "cheap fitness gear", "kitchen appliances", "office ergonomic"];

pub async fn seed_demo_catalog(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let catalog = SqlCatalogRepository::new(pool.clone());
    let reviews = SqlReviewRepository::new(pool.clone());
    let interactions = SqlInteractionRepository::new(pool.clone());
    seed_into(&catalog, &reviews, &interactions).await
}

/// Seeds any repository triple; exposed so tests and the CLI can share
/// one dataset.
pub async fn seed_into(
    catalog: &dyn CatalogRepository,
    reviews: &dyn ReviewRepository,
    interactions: &dyn InteractionRepository,
) -> Result<SeedSummary, RepositoryError> {
    if !catalog.list_all().await?.is_empty() {
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();

    for (id, name, category, price, tags, short_description) in DEMO_PRODUCTS {
        let price = Decimal::from_str(price)
            .map_err(|e| RepositoryError::Decode(format!("fixture price {price}: {e}")))?;
        catalog
            .add(&Product::new(ProductId(*id), *name, *category, price, *tags, *short_description))
            .await?;
        summary.products += 1;
    }

    // Three reviews per product, rotated so each product gets a distinct
    // mix of sentiments.
    for (index, (id, ..)) in DEMO_PRODUCTS.iter().enumerate() {
        for offset in 0..3 {
            let (rating, text) = DEMO_REVIEWS[(index + offset) % DEMO_REVIEWS.len()];
            reviews.add(NewReview::new(ProductId(*id), rating, text)).await?;
            summary.reviews += 1;
        }
    }

    // Browse/cart/purchase history per user, rotated across the catalog.
    for (user_index, user) in ["alice", "bob", "charlie"].iter().enumerate() {
        for step in 0..10 {
            let product = ProductId(((user_index * 3 + step) % DEMO_PRODUCTS.len()) as i64 + 1);
            let interaction = match step % 5 {
                3 => NewInteraction::cart(*user, product),
                4 => NewInteraction::purchase(*user, product),
                _ => NewInteraction::view(*user, product),
            };
            interactions.append(interaction).await?;
            summary.interactions += 1;
        }
        for query in DEMO_SEARCHES {
            interactions.append(NewInteraction::search(*user, *query)).await?;
            summary.interactions += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::seed_into;
    use crate::repositories::{
        CatalogRepository, InMemoryCatalogRepository, InMemoryInteractionRepository,
        InMemoryReviewRepository, InteractionRepository, ReviewRepository,
    };
    use shopmind_core::ProductId;

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let catalog = InMemoryCatalogRepository::default();
        let reviews = InMemoryReviewRepository::default();
        let interactions = InMemoryInteractionRepository::default();

        let first = seed_into(&catalog, &reviews, &interactions).await.expect("first seed");
        assert_eq!(first.products, 10);
        assert_eq!(first.reviews, 30);
        assert!(first.interactions > 0);

        let second = seed_into(&catalog, &reviews, &interactions).await.expect("second seed");
        assert_eq!(second.products, 0);
        assert_eq!(catalog.list_all().await.expect("list").len(), 10);
    }

    #[tokio::test]
    async fn seeded_data_supports_core_queries() {
        let catalog = InMemoryCatalogRepository::default();
        let reviews = InMemoryReviewRepository::default();
        let interactions = InMemoryInteractionRepository::default();
        seed_into(&catalog, &reviews, &interactions).await.expect("seed");

        let yoga_mat = catalog.find_by_id(ProductId(10)).await.expect("find").expect("present");
        assert_eq!(yoga_mat.name, "Yoga Mat");

        let recent = interactions.recent_for_user("alice", 50).await.expect("recent");
        assert!(recent.iter().any(|i| i.query_text.as_deref() == Some("wireless audio")));

        let product_reviews =
            reviews.recent_for_product(ProductId(1), 20).await.expect("reviews");
        assert_eq!(product_reviews.len(), 3);

        assert!(!interactions.purchase_counts().await.expect("counts").is_empty());
    }
}
