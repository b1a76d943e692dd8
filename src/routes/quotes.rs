//! Quote page handlers

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use uuid::Uuid;

use crate::error::Result;
use crate::quotes::requests::QuoteListQuery;
use crate::quotes::{services, Quote, QuoteItem, QuoteStatus};
use crate::AppState;

/// Quote listing template
#[derive(Template)]
#[template(path = "quotes/list.html")]
struct QuoteListTemplate {
    quotes: Vec<Quote>,
    status_filters: Vec<StatusFilter>,
    no_status_selected: bool,
    currency: String,
    page: i64,
    total_pages: i64,
    has_previous: bool,
    has_next: bool,
    has_quotes: bool,
    status_param: String,
}

/// Status filter link in the listing
struct StatusFilter {
    status: QuoteStatus,
    selected: bool,
}

/// Quote detail template
#[derive(Template)]
#[template(path = "quotes/detail.html")]
struct QuoteDetailTemplate {
    quote: Quote,
    items: Vec<QuoteItem>,
    currency: String,
    is_pending: bool,
}

/// Quote listing page, optionally filtered by status
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuoteListQuery>,
) -> Result<Html<String>> {
    let page = services::list_quotes(&state.db, query.status, query.page).await?;

    let template = QuoteListTemplate {
        has_quotes: !page.quotes.is_empty(),
        has_previous: page.page > 1,
        has_next: page.page < page.total_pages,
        status_param: query
            .status
            .map(|s| format!("&status={}", s))
            .unwrap_or_default(),
        quotes: page.quotes,
        status_filters: QuoteStatus::ALL
            .iter()
            .map(|&status| StatusFilter {
                status,
                selected: query.status == Some(status),
            })
            .collect(),
        no_status_selected: query.status.is_none(),
        currency: state.config.currency.clone(),
        page: page.page,
        total_pages: page.total_pages,
    };

    Ok(Html(template.render()?))
}

/// Quote detail page
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>> {
    let detail = services::get_quote(&state.db, id).await?;

    let template = QuoteDetailTemplate {
        is_pending: detail.quote.is_editable(),
        quote: detail.quote,
        items: detail.items,
        currency: state.config.currency.clone(),
    };

    Ok(Html(template.render()?))
}
