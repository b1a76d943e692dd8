//! In-memory caching using moka
//!
//! Read-through cache for catalog products. Prices are never cached: only the
//! product rows the pricing engine reads its profiles from.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{queries, Product};

/// Expiry policy for one cache
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_capacity: u64,
    pub time_to_live: Duration,
    pub time_to_idle: Option<Duration>,
}

impl CachePolicy {
    /// Build an expiring key-value cache following this policy
    pub fn build<K, V>(&self) -> Cache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let builder = Cache::builder()
            .max_capacity(self.max_capacity)
            .time_to_live(self.time_to_live);
        match self.time_to_idle {
            Some(idle) => builder.time_to_idle(idle).build(),
            None => builder.build(),
        }
    }
}

// Products: 1000 entries, 10 min TTL, 5 min idle
const PRODUCT_POLICY: CachePolicy = CachePolicy {
    max_capacity: 1000,
    time_to_live: Duration::from_secs(10 * 60),
    time_to_idle: Some(Duration::from_secs(5 * 60)),
};

// Product listings: active/all, 5 min TTL
const PRODUCT_LIST_POLICY: CachePolicy = CachePolicy {
    max_capacity: 10,
    time_to_live: Duration::from_secs(5 * 60),
    time_to_idle: None,
};

/// Application cache holding catalog products
#[derive(Clone)]
pub struct AppCache {
    /// Products (id -> Product)
    pub products: Cache<Uuid, Arc<Product>>,
    /// Product listings (cache_key -> Vec<Product>)
    pub product_lists: Cache<String, Arc<Vec<Product>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            products: PRODUCT_POLICY.build(),
            product_lists: PRODUCT_LIST_POLICY.build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            products_size: self.products.entry_count(),
            product_lists_size: self.product_lists.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.products.invalidate_all();
        self.product_lists.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a product after a catalog write
    pub async fn invalidate_product(&self, id: Uuid) {
        self.products.invalidate(&id).await;
        // Listings embed the product too
        self.product_lists.invalidate_all();
        info!("Cache invalidated for product: {}", id);
    }

    /// Generate cache key for a product listing
    pub fn product_list_key(active_only: bool) -> String {
        if active_only {
            "products:active".to_string()
        } else {
            "products:all".to_string()
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub products_size: u64,
    pub product_lists_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the active catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_products(db, true).await {
        Ok(products) => {
            for product in &products {
                cache.products.insert(product.id, Arc::new(product.clone())).await;
            }
            cache
                .product_lists
                .insert(AppCache::product_list_key(true), Arc::new(products))
                .await;
        }
        Err(e) => warn!("Failed to warm product cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
