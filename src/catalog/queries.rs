//! Database queries for the product catalog.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::Product;
use super::requests::ProductRequest;

const PRODUCT_COLUMNS: &str = r#"
    id, name, description, category,
    base_price_per_unit_area, complexity_factor,
    thickness_base_factor, minimum_price,
    active, created_at, updated_at
"#;

/// List catalog products, optionally only active ones
pub async fn list_products(pool: &PgPool, active_only: bool) -> Result<Vec<Product>, AppError> {
    let sql = format!(
        "SELECT {} FROM catalog_products WHERE ($1 = FALSE OR active) ORDER BY name",
        PRODUCT_COLUMNS
    );

    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(active_only)
        .fetch_all(pool)
        .await?;

    Ok(products)
}

/// Get a product by id
pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<Option<Product>, AppError> {
    let sql = format!("SELECT {} FROM catalog_products WHERE id = $1", PRODUCT_COLUMNS);

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Get several products by id in one round trip
pub async fn get_products(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, AppError> {
    let sql = format!("SELECT {} FROM catalog_products WHERE id = ANY($1)", PRODUCT_COLUMNS);

    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(products)
}

/// Insert a new product
pub async fn insert_product(pool: &PgPool, request: &ProductRequest) -> Result<Product, AppError> {
    let sql = format!(
        r#"
        INSERT INTO catalog_products (
            id, name, description, category,
            base_price_per_unit_area, complexity_factor,
            thickness_base_factor, minimum_price, active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    );

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.base_price_per_unit_area)
        .bind(request.complexity_factor)
        .bind(request.thickness_base_factor)
        .bind(request.minimum_price)
        .bind(request.active)
        .fetch_one(pool)
        .await?;

    Ok(product)
}

/// Replace a product's editable fields
pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    request: &ProductRequest,
) -> Result<Option<Product>, AppError> {
    let sql = format!(
        r#"
        UPDATE catalog_products
        SET name = $2,
            description = $3,
            category = $4,
            base_price_per_unit_area = $5,
            complexity_factor = $6,
            thickness_base_factor = $7,
            minimum_price = $8,
            active = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    );

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(&request.category)
        .bind(request.base_price_per_unit_area)
        .bind(request.complexity_factor)
        .bind(request.thickness_base_factor)
        .bind(request.minimum_price)
        .bind(request.active)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Soft-delete a product; existing quotes keep their snapshot
pub async fn deactivate_product(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE catalog_products
        SET active = FALSE, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
