//! Quote API route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::models::QuoteStatus;
use super::requests::{QuoteListQuery, QuoteRequest};
use super::responses::{QuoteListResponse, QuoteResponse};
use super::services;

/// Routes mounted under `/api/quotes`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(detail).put(update).delete(remove))
        .route("/:id/validate", post(validate))
        .route("/:id/reject", post(reject))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuoteListQuery>,
) -> Result<Json<QuoteListResponse>> {
    let page = services::list_quotes(&state.db, query.status, query.page).await?;
    Ok(Json(QuoteListResponse::new(&page, &state.config.currency)))
}

async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteResponse>> {
    let quote = services::get_quote(&state.db, id).await?;
    Ok(Json(QuoteResponse::new(&quote, &state.config.currency)))
}

async fn create(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<(StatusCode, Json<QuoteResponse>)> {
    let quote = services::create_quote(
        &state.db,
        &state.cache,
        state.config.default_tax_rate_percent,
        &request,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(QuoteResponse::new(&quote, &state.config.currency)),
    ))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote = services::update_quote(&state.db, &state.cache, id, &request).await?;
    Ok(Json(QuoteResponse::new(&quote, &state.config.currency)))
}

async fn validate(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteResponse>> {
    let quote = services::set_status(&state.db, id, QuoteStatus::Validated).await?;
    Ok(Json(QuoteResponse::new(&quote, &state.config.currency)))
}

async fn reject(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteResponse>> {
    let quote = services::set_status(&state.db, id, QuoteStatus::Rejected).await?;
    Ok(Json(QuoteResponse::new(&quote, &state.config.currency)))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    services::delete_quote(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
