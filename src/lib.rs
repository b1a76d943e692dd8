//! Glazing quote management backend.
//!
//! Product catalog, client quotes and the pricing engine behind them, served
//! over a JSON API with a few server-rendered pages.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod pricing;
pub mod quotes;
pub mod routes;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use cache::AppCache;
pub use config::Config;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::quotes::list))
        .route("/quotes", get(routes::quotes::list))
        .route("/quotes/:id", get(routes::quotes::detail))
        // API
        .nest("/api/pricing", pricing::router())
        .nest("/api/products", catalog::router())
        .nest("/api/quotes", quotes::router())
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: cache::CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_support::test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["cache"]["products_size"], 0);
    }

    #[tokio::test]
    async fn test_invalid_quote_id_is_rejected_before_database() {
        let app = create_router(test_support::test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/quotes/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
