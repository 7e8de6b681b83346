//! In-memory caching using moka
//!
//! Holds each tenant's pricing settings snapshot so pricing requests do not
//! hit PostgreSQL every time. Entries expire on a TTL and can be dropped
//! explicitly when the admin UI edits a tenant's settings.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::pricing::models::PricingSettings;

/// Default number of tenants kept in the settings cache
pub const DEFAULT_SETTINGS_CAPACITY: u64 = 1_000;

/// Default settings TTL
pub const DEFAULT_SETTINGS_TTL: Duration = Duration::from_secs(5 * 60);

/// Application cache holding per-tenant settings
#[derive(Clone)]
pub struct AppCache {
    /// Pricing settings (tenant_id -> PricingSettings)
    pub settings: Cache<Uuid, Arc<PricingSettings>>,
}

impl AppCache {
    /// Create a new cache instance with the given capacity and TTL
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            settings: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .time_to_idle(ttl / 2)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            settings_size: self.settings.entry_count(),
        }
    }

    /// Invalidate one tenant's settings
    pub async fn invalidate_tenant(&self, tenant_id: Uuid) {
        self.settings.invalidate(&tenant_id).await;
        info!("Settings cache invalidated for tenant: {}", tenant_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_CAPACITY, DEFAULT_SETTINGS_TTL)
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub settings_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn settings() -> PricingSettings {
        PricingSettings {
            labor_rate: dec!(25),
            overhead_percentage: dec!(15),
            margin_percentage: dec!(20),
            service_type_rates: BTreeMap::new(),
            frequency_multipliers: BTreeMap::new(),
            production_rates: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_invalidate_tenant_only_drops_that_tenant() {
        let cache = AppCache::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        cache.settings.insert(a, Arc::new(settings())).await;
        cache.settings.insert(b, Arc::new(settings())).await;

        cache.invalidate_tenant(a).await;

        assert!(cache.settings.get(&a).await.is_none());
        assert!(cache.settings.get(&b).await.is_some());
    }
}
