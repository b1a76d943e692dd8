//! Catalog service functions with cache-aware database access.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::models::Product;
use super::queries;
use super::requests::ProductRequest;

/// Look up one product, cache first.
pub async fn get_product(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
) -> Result<Option<Arc<Product>>, AppError> {
    if let Some(cached) = cache.products.get(&id).await {
        tracing::debug!("Cache HIT for product: {}", id);
        return Ok(Some(cached));
    }

    tracing::debug!("Cache MISS for product: {}", id);
    let product = match queries::get_product(pool, id).await? {
        Some(p) => Arc::new(p),
        None => return Ok(None),
    };
    cache.products.insert(id, product.clone()).await;

    Ok(Some(product))
}

/// Resolve every referenced product, hitting the database once for all misses.
///
/// Unknown ids are simply absent from the returned map.
pub async fn get_products(
    pool: &PgPool,
    cache: &AppCache,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Arc<Product>>, AppError> {
    let mut found = HashMap::with_capacity(ids.len());
    let mut missing = Vec::new();

    for id in ids {
        if found.contains_key(id) || missing.contains(id) {
            continue;
        }
        match cache.products.get(id).await {
            Some(cached) => {
                found.insert(*id, cached);
            }
            None => missing.push(*id),
        }
    }

    if !missing.is_empty() {
        tracing::debug!("Cache MISS for {} products", missing.len());
        for product in queries::get_products(pool, &missing).await? {
            let product = Arc::new(product);
            cache.products.insert(product.id, product.clone()).await;
            found.insert(product.id, product);
        }
    }

    Ok(found)
}

/// List products, cache first.
pub async fn list_products(
    pool: &PgPool,
    cache: &AppCache,
    active_only: bool,
) -> Result<Arc<Vec<Product>>, AppError> {
    let key = AppCache::product_list_key(active_only);
    if let Some(cached) = cache.product_lists.get(&key).await {
        return Ok(cached);
    }

    let products = Arc::new(queries::list_products(pool, active_only).await?);
    cache.product_lists.insert(key, products.clone()).await;

    Ok(products)
}

pub async fn create_product(
    pool: &PgPool,
    cache: &AppCache,
    request: &ProductRequest,
) -> Result<Product, AppError> {
    request.validate()?;

    let product = queries::insert_product(pool, request).await?;
    cache.invalidate_product(product.id).await;
    tracing::info!("Created product {} ({})", product.name, product.id);

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    cache: &AppCache,
    id: Uuid,
    request: &ProductRequest,
) -> Result<Product, AppError> {
    request.validate()?;

    let product = queries::update_product(pool, id, request)
        .await?
        .ok_or(AppError::NotFound)?;
    cache.invalidate_product(id).await;
    tracing::info!("Updated product {} ({})", product.name, product.id);

    Ok(product)
}

pub async fn deactivate_product(pool: &PgPool, cache: &AppCache, id: Uuid) -> Result<(), AppError> {
    if !queries::deactivate_product(pool, id).await? {
        return Err(AppError::NotFound);
    }
    cache.invalidate_product(id).await;
    tracing::info!("Deactivated product {}", id);

    Ok(())
}
