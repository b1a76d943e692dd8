//! Quote service functions.
//!
//! Every write prices its lines from scratch through the pricing engine and
//! stores the result in a single transaction. Stored lines are never patched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::cache::AppCache;
use crate::catalog::{self, Product};
use crate::error::AppError;
use crate::pricing::{compute_line_price, compute_quote_totals, PriceResult, PricingError, QuoteTotals};

use super::models::{Quote, QuoteDetail, QuoteStatus};
use super::queries;
use super::requests::{QuoteItemRequest, QuoteRequest};

pub const QUOTES_PER_PAGE: i64 = 20;

/// Highest page whose offset still fits an `i64`
const MAX_PAGE: i64 = i64::MAX / QUOTES_PER_PAGE;

/// Quote workflow error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("Client name must not be empty")]
    MissingClientName,

    #[error("Client email {0:?} is not a valid address")]
    InvalidEmail(String),

    #[error("Line {index}: product {product_id} not found")]
    ProductNotFound { index: usize, product_id: Uuid },

    #[error("Line {index}: product {product_id} is no longer sold")]
    ProductInactive { index: usize, product_id: Uuid },

    #[error("Line {index}: {source}")]
    InvalidLine { index: usize, source: PricingError },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Quote {reference} is {status} and can no longer be edited")]
    NotEditable { reference: String, status: QuoteStatus },

    #[error("Cannot move quote from {from} to {to}")]
    InvalidTransition { from: QuoteStatus, to: QuoteStatus },
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::MissingClientName => AppError::validation("client_name", err.to_string()),
            QuoteError::InvalidEmail(_) => AppError::validation("client_email", err.to_string()),
            QuoteError::ProductNotFound { index, .. } | QuoteError::ProductInactive { index, .. } => {
                AppError::validation(format!("items[{}].product_id", index), err.to_string())
            }
            QuoteError::InvalidLine { index, ref source } => {
                let field = match source.field() {
                    Some(f) => format!("items[{}].{}", index, f),
                    None => format!("items[{}]", index),
                };
                AppError::validation(field, err.to_string())
            }
            QuoteError::Pricing(e) => AppError::Pricing(e),
            QuoteError::NotEditable { .. } | QuoteError::InvalidTransition { .. } => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

/// A requested line after pricing
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub description: Option<String>,
    pub width_cm: Decimal,
    pub length_cm: Decimal,
    /// Effective thickness, the reference one when the request had none
    pub thickness_mm: Decimal,
    pub quantity: i32,
    pub price: PriceResult,
}

/// All lines of a quote priced, with totals
#[derive(Debug, Clone, PartialEq)]
pub struct PricedQuote {
    pub lines: Vec<PricedLine>,
    pub totals: QuoteTotals,
    pub tax_rate_percent: Decimal,
}

/// Price every requested line against the catalog and aggregate the totals.
///
/// Pure: `products` must already hold every referenced product.
pub fn price_quote(
    items: &[QuoteItemRequest],
    products: &HashMap<Uuid, Arc<Product>>,
    tax_rate_percent: Decimal,
) -> Result<PricedQuote, QuoteError> {
    let mut lines = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let product = products.get(&item.product_id).ok_or(QuoteError::ProductNotFound {
            index,
            product_id: item.product_id,
        })?;
        if !product.active {
            return Err(QuoteError::ProductInactive {
                index,
                product_id: item.product_id,
            });
        }

        let request = item.line_item();
        let price = compute_line_price(&product.pricing_profile(), &request)
            .map_err(|source| QuoteError::InvalidLine { index, source })?;

        lines.push(PricedLine {
            product_id: product.id,
            product_name: product.name.clone(),
            description: item.description.clone(),
            width_cm: request.width_cm,
            length_cm: request.length_cm,
            thickness_mm: request.effective_thickness_mm(),
            quantity: request.quantity,
            price,
        });
    }

    let results: Vec<PriceResult> = lines.iter().map(|l| l.price).collect();
    let totals = compute_quote_totals(&results, tax_rate_percent)?;

    Ok(PricedQuote {
        lines,
        totals,
        tax_rate_percent,
    })
}

/// Check a lifecycle move and return the new status.
pub fn transition(current: QuoteStatus, target: QuoteStatus) -> Result<QuoteStatus, QuoteError> {
    if current.can_transition_to(target) {
        Ok(target)
    } else {
        Err(QuoteError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Human-readable quote reference, e.g. `Q-20261016-1A2B3C4D`.
pub fn generate_reference(created_at: DateTime<Utc>, id: Uuid) -> String {
    let suffix = id.simple().to_string()[..8].to_uppercase();
    format!("Q-{}-{}", created_at.format("%Y%m%d"), suffix)
}

/// Trim the contact fields of a request, dropping blank optional ones, and
/// check the client name and email.
pub fn normalize_contact(request: &QuoteRequest) -> Result<QuoteRequest, QuoteError> {
    let client_name = request.client_name.trim();
    if client_name.is_empty() {
        return Err(QuoteError::MissingClientName);
    }

    let client_email = non_blank(&request.client_email);
    if let Some(email) = &client_email {
        if !email.validate_email() {
            return Err(QuoteError::InvalidEmail(email.clone()));
        }
    }

    Ok(QuoteRequest {
        client_name: client_name.to_string(),
        client_email,
        client_phone: non_blank(&request.client_phone),
        client_address: non_blank(&request.client_address),
        notes: non_blank(&request.notes),
        ..request.clone()
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reprice a stored quote for an update, refusing anything no longer pending.
///
/// The stored tax rate is kept unless the request sets a new one.
pub fn reprice_for_update(
    quote: &Quote,
    request: &QuoteRequest,
    products: &HashMap<Uuid, Arc<Product>>,
) -> Result<PricedQuote, QuoteError> {
    if !quote.is_editable() {
        return Err(QuoteError::NotEditable {
            reference: quote.reference.clone(),
            status: quote.status,
        });
    }

    let tax_rate = request.tax_rate_percent.unwrap_or(quote.tax_rate_percent);
    price_quote(&request.items, products, tax_rate)
}

/// Fetch every product a request references. Runs outside any transaction.
async fn load_products(
    pool: &PgPool,
    cache: &AppCache,
    request: &QuoteRequest,
) -> Result<HashMap<Uuid, Arc<Product>>, AppError> {
    let ids: Vec<Uuid> = request.items.iter().map(|i| i.product_id).collect();
    catalog::services::get_products(pool, cache, &ids).await
}

/// Create a pending quote.
pub async fn create_quote(
    pool: &PgPool,
    cache: &AppCache,
    default_tax_rate_percent: Decimal,
    request: &QuoteRequest,
) -> Result<QuoteDetail, AppError> {
    let request = &normalize_contact(request)?;
    let tax_rate = request.tax_rate_percent.unwrap_or(default_tax_rate_percent);
    let products = load_products(pool, cache, request).await?;
    let priced = price_quote(&request.items, &products, tax_rate)?;

    let id = Uuid::new_v4();
    let reference = generate_reference(Utc::now(), id);

    let mut tx = pool.begin().await?;
    queries::insert_quote(&mut tx, id, &reference, request, tax_rate, &priced.totals).await?;
    queries::insert_items(&mut tx, id, &priced.lines).await?;
    tx.commit().await?;

    tracing::info!(
        "Created quote {} for {} ({} lines, total {})",
        reference,
        request.client_name,
        priced.lines.len(),
        priced.totals.total_with_tax
    );

    get_quote(pool, id).await
}

/// Replace the contents of a pending quote and reprice it.
pub async fn update_quote(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    request: &QuoteRequest,
) -> Result<QuoteDetail, AppError> {
    let request = &normalize_contact(request)?;
    let products = load_products(pool, cache, request).await?;

    // Only `tx` is used until commit; the pool may have no spare connection
    let mut tx = pool.begin().await?;

    let quote = queries::get_quote_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let priced = reprice_for_update(&quote, request, &products)?;

    queries::update_quote(&mut tx, id, request, priced.tax_rate_percent, &priced.totals).await?;
    queries::delete_items(&mut tx, id).await?;
    queries::insert_items(&mut tx, id, &priced.lines).await?;
    tx.commit().await?;

    tracing::info!(
        "Updated quote {} ({} lines, total {})",
        quote.reference,
        priced.lines.len(),
        priced.totals.total_with_tax
    );

    get_quote(pool, id).await
}

/// Validate or reject a pending quote.
pub async fn set_status(pool: &PgPool, id: Uuid, target: QuoteStatus) -> Result<QuoteDetail, AppError> {
    let mut tx = pool.begin().await?;

    let quote = queries::get_quote_for_update(&mut tx, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let status = transition(quote.status, target)?;

    queries::update_status(&mut tx, id, status).await?;
    tx.commit().await?;

    tracing::info!("Quote {} moved from {} to {}", quote.reference, quote.status, status);

    get_quote(pool, id).await
}

pub async fn get_quote(pool: &PgPool, id: Uuid) -> Result<QuoteDetail, AppError> {
    let quote = queries::get_quote(pool, id).await?.ok_or(AppError::NotFound)?;
    let items = queries::get_quote_items(pool, id).await?;

    Ok(QuoteDetail { quote, items })
}

/// One page of quotes
pub struct QuotePage {
    pub quotes: Vec<Quote>,
    pub page: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Clamp a requested page number and return it with its row offset.
pub fn page_offset(page: i64) -> (i64, i64) {
    let page = page.clamp(1, MAX_PAGE);
    (page, (page - 1) * QUOTES_PER_PAGE)
}

pub async fn list_quotes(pool: &PgPool, status: Option<QuoteStatus>, page: i64) -> Result<QuotePage, AppError> {
    let (page, offset) = page_offset(page);

    let quotes = queries::list_quotes(pool, status, QUOTES_PER_PAGE, offset).await?;
    let total = queries::count_quotes(pool, status).await?;
    let total_pages = (total + QUOTES_PER_PAGE - 1) / QUOTES_PER_PAGE;

    Ok(QuotePage {
        quotes,
        page,
        total,
        total_pages,
    })
}

pub async fn delete_quote(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    if !queries::delete_quote(pool, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("Deleted quote {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn product(name: &str, active: bool) -> Arc<Product> {
        Arc::new(Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            category: Some("float".to_string()),
            base_price_per_unit_area: dec!(45),
            complexity_factor: dec!(1.0),
            thickness_base_factor: dec!(1.0),
            minimum_price: dec!(50),
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn catalog_of(products: &[Arc<Product>]) -> HashMap<Uuid, Arc<Product>> {
        products.iter().map(|p| (p.id, p.clone())).collect()
    }

    fn item(product_id: Uuid, width: Decimal, length: Decimal, thickness: Option<Decimal>, quantity: i32) -> QuoteItemRequest {
        QuoteItemRequest {
            product_id,
            description: None,
            width_cm: width,
            length_cm: length,
            thickness_mm: thickness,
            quantity,
        }
    }

    #[test]
    fn test_price_quote_two_lines() {
        let float = product("Float 6mm", true);
        let products = catalog_of(&[float.clone()]);
        let items = vec![
            item(float.id, dec!(100), dec!(100), Some(dec!(6)), 1),
            item(float.id, dec!(50), dec!(50), Some(dec!(25)), 2),
        ];

        let priced = price_quote(&items, &products, dec!(20)).unwrap();

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].price.line_total, dec!(50.00));
        assert_eq!(priced.lines[1].price.line_total, dec!(100.00));
        assert_eq!(priced.lines[1].product_name, "Float 6mm");
        assert_eq!(priced.totals.total_before_tax, dec!(150.00));
        assert_eq!(priced.totals.tax_amount, dec!(30.00));
        assert_eq!(priced.totals.total_with_tax, dec!(180.00));
    }

    #[test]
    fn test_price_quote_records_reference_thickness() {
        let float = product("Float", true);
        let priced = price_quote(
            &[item(float.id, dec!(100), dec!(100), None, 1)],
            &catalog_of(&[float.clone()]),
            dec!(20),
        )
        .unwrap();
        assert_eq!(priced.lines[0].thickness_mm, dec!(6));
    }

    #[test]
    fn test_price_quote_empty_is_zero() {
        let priced = price_quote(&[], &HashMap::new(), dec!(20)).unwrap();
        assert!(priced.lines.is_empty());
        assert_eq!(priced.totals, QuoteTotals::zero());
    }

    #[test]
    fn test_price_quote_unknown_product() {
        let missing = Uuid::new_v4();
        let err = price_quote(&[item(missing, dec!(100), dec!(100), None, 1)], &HashMap::new(), dec!(20)).unwrap_err();
        assert_eq!(
            err,
            QuoteError::ProductNotFound {
                index: 0,
                product_id: missing
            }
        );
    }

    #[test]
    fn test_price_quote_inactive_product() {
        let retired = product("Retired", false);
        let err = price_quote(
            &[item(retired.id, dec!(100), dec!(100), None, 1)],
            &catalog_of(&[retired.clone()]),
            dec!(20),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::ProductInactive { index: 0, .. }));
    }

    #[test]
    fn test_price_quote_invalid_line_reports_index() {
        let float = product("Float", true);
        let items = vec![
            item(float.id, dec!(100), dec!(100), None, 1),
            item(float.id, dec!(100), dec!(100), None, 0),
        ];
        let err = price_quote(&items, &catalog_of(&[float.clone()]), dec!(20)).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidLine { index: 1, .. }));

        match AppError::from(err) {
            AppError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("items[1].quantity")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_price_quote_negative_tax() {
        let err = price_quote(&[], &HashMap::new(), dec!(-20)).unwrap_err();
        assert_eq!(err, QuoteError::Pricing(PricingError::InvalidTaxRate(dec!(-20))));
    }

    #[test]
    fn test_transition() {
        assert_eq!(transition(QuoteStatus::Pending, QuoteStatus::Validated), Ok(QuoteStatus::Validated));
        assert_eq!(
            transition(QuoteStatus::Rejected, QuoteStatus::Validated),
            Err(QuoteError::InvalidTransition {
                from: QuoteStatus::Rejected,
                to: QuoteStatus::Validated
            })
        );
        assert!(matches!(
            AppError::from(transition(QuoteStatus::Validated, QuoteStatus::Rejected).unwrap_err()),
            AppError::Conflict(_)
        ));
    }

    fn quote(status: QuoteStatus, tax_rate_percent: Decimal) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            reference: "Q-20261016-1A2B3C4D".to_string(),
            client_name: "Atelier Martin".to_string(),
            client_email: None,
            client_phone: None,
            client_address: None,
            notes: None,
            status,
            tax_rate_percent,
            total_before_tax: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_with_tax: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            decided_at: None,
        }
    }

    fn request(items: Vec<QuoteItemRequest>) -> QuoteRequest {
        QuoteRequest {
            client_name: "Atelier Martin".to_string(),
            client_email: None,
            client_phone: None,
            client_address: None,
            notes: None,
            tax_rate_percent: None,
            items,
        }
    }

    #[test]
    fn test_reprice_for_update_keeps_stored_tax_rate() {
        let float = product("Float", true);
        let products = catalog_of(&[float.clone()]);
        let request = request(vec![item(float.id, dec!(100), dec!(100), None, 2)]);

        let priced = reprice_for_update(&quote(QuoteStatus::Pending, dec!(10)), &request, &products).unwrap();
        assert_eq!(priced.tax_rate_percent, dec!(10));
        assert_eq!(priced.totals.total_before_tax, dec!(100.00));
        assert_eq!(priced.totals.tax_amount, dec!(10.00));

        let request = QuoteRequest {
            tax_rate_percent: Some(dec!(20)),
            ..request
        };
        let priced = reprice_for_update(&quote(QuoteStatus::Pending, dec!(10)), &request, &products).unwrap();
        assert_eq!(priced.totals.total_with_tax, dec!(120.00));
    }

    #[test]
    fn test_reprice_for_update_refuses_decided_quotes() {
        let float = product("Float", true);
        let products = catalog_of(&[float.clone()]);
        let request = request(vec![item(float.id, dec!(100), dec!(100), None, 1)]);

        for status in [QuoteStatus::Validated, QuoteStatus::Rejected] {
            let err = reprice_for_update(&quote(status, dec!(20)), &request, &products).unwrap_err();
            assert!(matches!(err, QuoteError::NotEditable { status: s, .. } if s == status));
            assert!(matches!(AppError::from(err), AppError::Conflict(_)));
        }
    }

    #[test]
    fn test_normalize_contact_drops_blank_fields() {
        let raw = QuoteRequest {
            client_name: "  Atelier Martin ".to_string(),
            client_email: Some("  ".to_string()),
            client_phone: Some(" 06 12 34 56 78 ".to_string()),
            client_address: Some(String::new()),
            notes: None,
            ..request(Vec::new())
        };

        let normalized = normalize_contact(&raw).unwrap();
        assert_eq!(normalized.client_name, "Atelier Martin");
        assert_eq!(normalized.client_email, None);
        assert_eq!(normalized.client_phone.as_deref(), Some("06 12 34 56 78"));
        assert_eq!(normalized.client_address, None);
    }

    #[test]
    fn test_normalize_contact_checks_name_and_email() {
        let blank_name = QuoteRequest {
            client_name: "   ".to_string(),
            ..request(Vec::new())
        };
        assert_eq!(normalize_contact(&blank_name).unwrap_err(), QuoteError::MissingClientName);

        let valid = QuoteRequest {
            client_email: Some(" contact@atelier-martin.fr ".to_string()),
            ..request(Vec::new())
        };
        assert_eq!(
            normalize_contact(&valid).unwrap().client_email.as_deref(),
            Some("contact@atelier-martin.fr")
        );

        let invalid = QuoteRequest {
            client_email: Some("not-an-address".to_string()),
            ..request(Vec::new())
        };
        let err = normalize_contact(&invalid).unwrap_err();
        assert_eq!(err, QuoteError::InvalidEmail("not-an-address".to_string()));
        match AppError::from(err) {
            AppError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("client_email")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_offset_clamps() {
        assert_eq!(page_offset(1), (1, 0));
        assert_eq!(page_offset(3), (3, 40));
        assert_eq!(page_offset(0), (1, 0));
        assert_eq!(page_offset(-7), (1, 0));

        let (page, offset) = page_offset(i64::MAX);
        assert_eq!(page, i64::MAX / QUOTES_PER_PAGE);
        assert!(offset > 0);
    }

    #[test]
    fn test_price_quote_line_out_of_range_reports_index() {
        let float = product("Float", true);
        let huge = dec!(10000000000000000);
        let err = price_quote(
            &[item(float.id, huge, huge, None, 1)],
            &catalog_of(&[float.clone()]),
            dec!(20),
        )
        .unwrap_err();

        match AppError::from(err) {
            AppError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("items[0].unit_price")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_reference() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let id = Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap();
        assert_eq!(generate_reference(at, id), "Q-20261016-1A2B3C4D");
    }
}
