//! Pricing preview endpoints.
//!
//! Used by the quote form to show prices while the user types. Nothing is
//! persisted here.

use axum::{extract::State, routing::post, Json, Router};

use crate::error::Result;
use crate::AppState;

use super::calculators::{explain_line_price, totals_from_line_totals, LineItemRequest, PricingProfile};
use super::requests::{PriceLineRequest, QuoteTotalsRequest};
use super::responses::{PriceBreakdownResponse, QuoteTotalsResponse};

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/line", post(price_line))
        .route("/totals", post(quote_totals))
}

async fn price_line(
    State(state): State<AppState>,
    Json(request): Json<PriceLineRequest>,
) -> Result<Json<PriceBreakdownResponse>> {
    let profile = PricingProfile::from(&request.profile);
    let item = LineItemRequest::from(&request.item);

    let breakdown = explain_line_price(&profile, &item)?;

    Ok(Json(PriceBreakdownResponse::new(&breakdown, &state.config.currency)))
}

async fn quote_totals(
    State(state): State<AppState>,
    Json(request): Json<QuoteTotalsRequest>,
) -> Result<Json<QuoteTotalsResponse>> {
    let tax_rate = request
        .tax_rate_percent
        .unwrap_or(state.config.default_tax_rate_percent);

    let totals = totals_from_line_totals(request.lines.iter().map(|l| l.line_total), tax_rate)?;

    Ok(Json(QuoteTotalsResponse::new(&totals, tax_rate, &state.config.currency)))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{create_router, test_support::test_state};

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_price_line_endpoint() {
        let (status, json) = post_json(
            "/api/pricing/line",
            r#"{
                "profile": {
                    "base_price_per_unit_area": "45",
                    "complexity_factor": "1.0",
                    "thickness_base_factor": "1.0",
                    "minimum_price": "50"
                },
                "item": {"width_cm": "50", "length_cm": "50", "thickness_mm": "25", "quantity": 2}
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["minimum_applied"], true);
        assert_eq!(json["unit_price"]["amount"], "50.00");
        assert_eq!(json["line_total"]["amount"], "100.00");
        assert_eq!(json["line_total"]["currency"], "EUR");
    }

    #[tokio::test]
    async fn test_price_line_rejects_bad_dimensions() {
        let (status, json) = post_json(
            "/api/pricing/line",
            r#"{
                "profile": {
                    "base_price_per_unit_area": "45",
                    "complexity_factor": "1.0",
                    "thickness_base_factor": "1.0",
                    "minimum_price": "50"
                },
                "item": {"width_cm": "0", "length_cm": "50", "quantity": 1}
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error_type"], "invalid_dimensions");
        assert_eq!(json["details"]["field"], "width_cm");
    }

    #[tokio::test]
    async fn test_quote_totals_endpoint() {
        let (status, json) = post_json(
            "/api/pricing/totals",
            r#"{"lines": [{"line_total": "50"}, {"line_total": "100"}], "tax_rate_percent": "20"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_before_tax"]["amount"], "150.00");
        assert_eq!(json["tax_amount"]["amount"], "30.00");
        assert_eq!(json["total_with_tax"]["amount"], "180.00");
    }

    #[tokio::test]
    async fn test_price_line_huge_dimensions_is_unprocessable() {
        let (status, json) = post_json(
            "/api/pricing/line",
            r#"{
                "profile": {
                    "base_price_per_unit_area": "45",
                    "complexity_factor": "1.0",
                    "thickness_base_factor": "1.0",
                    "minimum_price": "50"
                },
                "item": {"width_cm": "10000000000000000", "length_cm": "10000000000000000", "quantity": 1}
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error_type"], "amount_out_of_range");
        assert_eq!(json["details"]["field"], "unit_price");
    }

    #[tokio::test]
    async fn test_quote_totals_overflow_is_unprocessable() {
        let (status, json) = post_json(
            "/api/pricing/totals",
            r#"{"lines": [{"line_total": "79228162514264337593543950335"}, {"line_total": "79228162514264337593543950335"}]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error_type"], "amount_out_of_range");
        assert_eq!(json["details"]["field"], "total_before_tax");
    }

    #[tokio::test]
    async fn test_quote_totals_negative_rate() {
        let (status, json) = post_json("/api/pricing/totals", r#"{"lines": [], "tax_rate_percent": "-5"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error_type"], "invalid_tax_rate");
    }
}
