//! JSON API routes for the catalog assistant.
//!
//! Endpoints:
//! - `GET  /health`                              — liveness probe
//! - `GET  /api/products`                        — full catalog, ascending id
//! - `GET  /api/search?q=...&user=...`           — deterministic ranked search
//! - `GET  /api/recommendations/{user}`          — per-user recommendations
//! - `POST /api/chat`                            — grounded chat reply
//! - `POST /api/products/{id}/description`       — (re)generate AI description
//! - `POST /api/products/{id}/review-summary`    — (re)generate review summary

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use shopmind_agent::{
    ChatResponder, DescriptionGenerator, GeminiClient, NoopGenerator, RecommendationEngine,
    ReviewSummarizer, TextGenerator,
};
use shopmind_core::{ApplicationError, AppConfig, DomainError, Product, ProductId};
use shopmind_db::repositories::{
    CatalogRepository, InteractionRepository, ReviewRepository, SqlCatalogRepository,
    SqlInteractionRepository, SqlReviewRepository,
};
use shopmind_db::DbPool;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn CatalogRepository>,
    responder: Arc<ChatResponder>,
    recommendations: Arc<RecommendationEngine>,
    summarizer: Arc<ReviewSummarizer>,
    descriptions: Arc<DescriptionGenerator>,
}

impl AppState {
    /// Wires SQL-backed repositories to the engines. Without an API key
    /// the generator is the offline no-op and every AI path takes its
    /// deterministic fallback.
    pub fn from_pool(pool: DbPool, config: &AppConfig) -> Self {
        let generator: Arc<dyn TextGenerator> = match GeminiClient::from_config(&config.ai) {
            Some(client) => Arc::new(client),
            None => {
                info!(event_name = "system.ai.offline", "no AI key configured, using fallbacks");
                Arc::new(NoopGenerator)
            }
        };
        let catalog: Arc<dyn CatalogRepository> = Arc::new(SqlCatalogRepository::new(pool.clone()));
        let interactions: Arc<dyn InteractionRepository> =
            Arc::new(SqlInteractionRepository::new(pool.clone()));
        let reviews: Arc<dyn ReviewRepository> = Arc::new(SqlReviewRepository::new(pool));
        Self::new(catalog, interactions, reviews, generator)
    }

    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        interactions: Arc<dyn InteractionRepository>,
        reviews: Arc<dyn ReviewRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            responder: Arc::new(ChatResponder::new(
                catalog.clone(),
                interactions.clone(),
                generator.clone(),
            )),
            recommendations: Arc::new(RecommendationEngine::new(
                catalog.clone(),
                interactions,
                generator.clone(),
            )),
            summarizer: Arc::new(ReviewSummarizer::new(
                catalog.clone(),
                reviews,
                generator.clone(),
            )),
            descriptions: Arc::new(DescriptionGenerator::new(catalog.clone(), generator)),
            catalog,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(list_products))
        .route("/api/search", get(search))
        .route("/api/recommendations/{user}", get(recommendations))
        .route("/api/chat", post(chat))
        .route("/api/products/{id}/description", post(generate_description))
        .route("/api/products/{id}/review-summary", post(summarize_reviews))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub user: String,
    pub recommendations: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedTextResponse {
    pub product_id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// One wrapper so every handler can use `?`. Domain rejections keep
/// their fixed user-facing message; persistence failures are logged and
/// reported generically.
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self(value)
    }
}

impl From<shopmind_db::repositories::RepositoryError> for ApiError {
    fn from(value: shopmind_db::repositories::RepositoryError) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ApplicationError::Domain(domain) => {
                let status = match domain {
                    DomainError::EmptyMessage | DomainError::NoReviews(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    DomainError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::AiUnavailable { .. } => StatusCode::BAD_GATEWAY,
                };
                (status, domain.user_message().to_string())
            }
            ApplicationError::Persistence(detail) => {
                error!(event_name = "api.persistence_failed", detail = %detail, "request failed");
                (StatusCode::SERVICE_UNAVAILABLE, "Storage temporarily unavailable".to_string())
            }
        };
        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness plus a storage probe; degraded means the process is up but
/// the database is not answering.
async fn health(State(state): State<AppState>) -> Response {
    match state.catalog.find_by_id(ProductId(1)).await {
        Ok(_) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded" })),
        )
            .into_response(),
    }
}

async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state.catalog.list_all().await?;
    Ok(Json(ProductsResponse { count: products.len(), products }))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state.responder.search(&params.q, params.user.as_deref()).await?;
    Ok(Json(SearchResponse { query: params.q, count: results.len(), results }))
}

async fn recommendations(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let recommendations = state.recommendations.recommend(&user).await?;
    Ok(Json(RecommendationsResponse { user, recommendations }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "api.chat.received",
        correlation_id = %correlation_id,
        message_len = request.message.len(),
        "chat message received"
    );
    let reply = state.responder.respond(&request.message).await?;
    info!(
        event_name = "api.chat.replied",
        correlation_id = %correlation_id,
        reply_len = reply.len(),
        "chat reply produced"
    );
    Ok(Json(ChatResponse { reply }))
}

async fn generate_description(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GeneratedTextResponse>, ApiError> {
    let text = state.descriptions.generate_description(ProductId(id)).await?;
    Ok(Json(GeneratedTextResponse { product_id: id, text }))
}

async fn summarize_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GeneratedTextResponse>, ApiError> {
    let text = state.summarizer.summarize_reviews(ProductId(id)).await?;
    Ok(Json(GeneratedTextResponse { product_id: id, text }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use rust_decimal::Decimal;
    use tower::util::ServiceExt;

    use shopmind_agent::{NoopGenerator, AI_BUSY_NOTICE};
    use shopmind_core::{NewReview, Product, ProductId};
    use shopmind_db::repositories::{
        CatalogRepository, InMemoryCatalogRepository, InMemoryInteractionRepository,
        InMemoryReviewRepository, InteractionRepository, ReviewRepository,
    };

    use super::{router, AppState};

    fn demo_catalog() -> Vec<Product> {
        vec![
            Product::new(
                ProductId(1),
                "Wireless Earbuds",
                "Electronics",
                Decimal::new(4990, 2),
                "audio,wireless,gym",
                "Compact wireless earbuds for music and calls.",
            ),
            Product::new(
                ProductId(2),
                "Yoga Mat",
                "Sports",
                Decimal::new(1800, 2),
                "fitness,yoga,home-workout",
                "Non-slip mat for yoga and stretching.",
            ),
        ]
    }

    fn test_state() -> (AppState, Arc<InMemoryReviewRepository>) {
        let catalog: Arc<dyn CatalogRepository> =
            Arc::new(InMemoryCatalogRepository::with_products(demo_catalog()));
        let interactions: Arc<dyn InteractionRepository> =
            Arc::new(InMemoryInteractionRepository::default());
        let reviews = Arc::new(InMemoryReviewRepository::default());
        let review_repo: Arc<dyn ReviewRepository> = reviews.clone();
        let state = AppState::new(catalog, interactions, review_repo, Arc::new(NoopGenerator));
        (state, reviews)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn products_lists_the_whole_catalog() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(Request::builder().uri("/api/products").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["products"][0]["name"], "Wireless Earbuds");
    }

    #[tokio::test]
    async fn search_returns_ranked_results() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=under%20%2460&user=alice")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["count"], 2);
        // cheapest first for an under-bound query
        assert_eq!(body["results"][0]["name"], "Yoga Mat");
    }

    #[tokio::test]
    async fn empty_chat_message_is_a_bad_request() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(json_post("/api/chat", r#"{"message": "   "}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Please type a question first.");
    }

    #[tokio::test]
    async fn chat_without_ai_returns_catalog_reply_with_notice() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(json_post("/api/chat", r#"{"message": "under $30 sports"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let reply = body["reply"].as_str().expect("reply text");
        assert!(reply.contains("Yoga Mat"));
        assert!(reply.ends_with(AI_BUSY_NOTICE));
    }

    #[tokio::test]
    async fn recommendations_for_new_user_fall_back_to_catalog_order() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/recommendations/newcomer")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user"], "newcomer");
        assert_eq!(body["recommendations"][0]["name"], "Wireless Earbuds");
    }

    #[tokio::test]
    async fn description_without_ai_is_a_bad_gateway() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(json_post("/api/products/1/description", "{}"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "AI backend returned empty text");
    }

    #[tokio::test]
    async fn description_for_unknown_product_is_not_found() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(json_post("/api/products/99/description", "{}"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn review_summary_without_reviews_is_a_bad_request() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(json_post("/api/products/1/review-summary", "{}"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No reviews to summarize");
    }

    #[tokio::test]
    async fn review_summary_without_ai_returns_heuristic_text() {
        let (state, reviews) = test_state();
        reviews
            .add(NewReview::new(ProductId(1), 4, "Good value, works well."))
            .await
            .expect("add review");

        let response = router(state)
            .oneshot(json_post("/api/products/1/review-summary", "{}"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let text = body["text"].as_str().expect("summary text");
        assert!(text.contains("average rating is 4.0/5 from 1 review(s)"));
    }
}
