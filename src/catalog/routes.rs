//! Catalog API route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::AppState;

use super::requests::{ProductListQuery, ProductRequest};
use super::responses::ProductResponse;
use super::services;

/// Routes mounted under `/api/products`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(deactivate))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = services::list_products(&state.db, &state.cache, !query.include_inactive).await?;
    let currency = &state.config.currency;

    Ok(Json(
        products
            .iter()
            .map(|p| ProductResponse::from_product(p, currency))
            .collect(),
    ))
}

async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ProductResponse>> {
    let product = services::get_product(&state.db, &state.cache, id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ProductResponse::from_product(&product, &state.config.currency)))
}

async fn create(
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let product = services::create_product(&state.db, &state.cache, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::from_product(&product, &state.config.currency)),
    ))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    let product = services::update_product(&state.db, &state.cache, id, &request).await?;

    Ok(Json(ProductResponse::from_product(&product, &state.config.currency)))
}

async fn deactivate(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    services::deactivate_product(&state.db, &state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
