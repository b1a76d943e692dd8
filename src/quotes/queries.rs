//! Database queries for quotes.
//!
//! Writes take a `PgConnection` so callers can run them inside a transaction.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use crate::pricing::QuoteTotals;

use super::models::{Quote, QuoteItem, QuoteStatus};
use super::requests::QuoteRequest;
use super::services::PricedLine;

const QUOTE_COLUMNS: &str = r#"
    id, reference, client_name, client_email, client_phone, client_address,
    notes, status, tax_rate_percent, total_before_tax, tax_amount, total_with_tax,
    created_at, updated_at, decided_at
"#;

const ITEM_COLUMNS: &str = r#"
    id, quote_id, product_id, product_name, description,
    width_cm, length_cm, thickness_mm, quantity,
    unit_price, line_total, position
"#;

/// List quotes, newest first, optionally filtered by status
pub async fn list_quotes(
    pool: &PgPool,
    status: Option<QuoteStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Quote>, AppError> {
    let sql = format!(
        r#"
        SELECT {}
        FROM quotes
        WHERE ($1::quote_status IS NULL OR status = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        QUOTE_COLUMNS
    );

    let quotes = sqlx::query_as::<_, Quote>(&sql)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(quotes)
}

/// Count quotes for pagination
pub async fn count_quotes(pool: &PgPool, status: Option<QuoteStatus>) -> Result<i64, AppError> {
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM quotes
        WHERE ($1::quote_status IS NULL OR status = $1)
        "#,
    )
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

/// Get a quote by id
pub async fn get_quote(pool: &PgPool, id: Uuid) -> Result<Option<Quote>, AppError> {
    let sql = format!("SELECT {} FROM quotes WHERE id = $1", QUOTE_COLUMNS);

    let quote = sqlx::query_as::<_, Quote>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(quote)
}

/// Get a quote by id and lock its row until the transaction ends
pub async fn get_quote_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Quote>, AppError> {
    let sql = format!("SELECT {} FROM quotes WHERE id = $1 FOR UPDATE", QUOTE_COLUMNS);

    let quote = sqlx::query_as::<_, Quote>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(quote)
}

/// Get the lines of a quote in display order
pub async fn get_quote_items(pool: &PgPool, quote_id: Uuid) -> Result<Vec<QuoteItem>, AppError> {
    let sql = format!(
        "SELECT {} FROM quote_items WHERE quote_id = $1 ORDER BY position",
        ITEM_COLUMNS
    );

    let items = sqlx::query_as::<_, QuoteItem>(&sql)
        .bind(quote_id)
        .fetch_all(pool)
        .await?;

    Ok(items)
}

/// Insert a new pending quote
pub async fn insert_quote(
    conn: &mut PgConnection,
    id: Uuid,
    reference: &str,
    request: &QuoteRequest,
    tax_rate_percent: Decimal,
    totals: &QuoteTotals,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO quotes (
            id, reference, client_name, client_email, client_phone, client_address,
            notes, status, tax_rate_percent, total_before_tax, tax_amount, total_with_tax
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(id)
    .bind(reference)
    .bind(&request.client_name)
    .bind(&request.client_email)
    .bind(&request.client_phone)
    .bind(&request.client_address)
    .bind(&request.notes)
    .bind(QuoteStatus::Pending)
    .bind(tax_rate_percent)
    .bind(totals.total_before_tax)
    .bind(totals.tax_amount)
    .bind(totals.total_with_tax)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Replace a quote's contact data, tax rate and totals
pub async fn update_quote(
    conn: &mut PgConnection,
    id: Uuid,
    request: &QuoteRequest,
    tax_rate_percent: Decimal,
    totals: &QuoteTotals,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE quotes
        SET client_name = $2,
            client_email = $3,
            client_phone = $4,
            client_address = $5,
            notes = $6,
            tax_rate_percent = $7,
            total_before_tax = $8,
            tax_amount = $9,
            total_with_tax = $10,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&request.client_name)
    .bind(&request.client_email)
    .bind(&request.client_phone)
    .bind(&request.client_address)
    .bind(&request.notes)
    .bind(tax_rate_percent)
    .bind(totals.total_before_tax)
    .bind(totals.tax_amount)
    .bind(totals.total_with_tax)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Insert priced lines, numbered in request order
pub async fn insert_items(conn: &mut PgConnection, quote_id: Uuid, lines: &[PricedLine]) -> Result<(), AppError> {
    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quote_items (
                id, quote_id, product_id, product_name, description,
                width_cm, length_cm, thickness_mm, quantity,
                unit_price, line_total, position
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(quote_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(&line.description)
        .bind(line.width_cm)
        .bind(line.length_cm)
        .bind(line.thickness_mm)
        .bind(line.quantity)
        .bind(line.price.unit_price)
        .bind(line.price.line_total)
        .bind(position as i32)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Remove every line of a quote
pub async fn delete_items(conn: &mut PgConnection, quote_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM quote_items WHERE quote_id = $1")
        .bind(quote_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Record a lifecycle decision
pub async fn update_status(conn: &mut PgConnection, id: Uuid, status: QuoteStatus) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE quotes
        SET status = $2, decided_at = NOW(), updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete a quote; its lines cascade
pub async fn delete_quote(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
