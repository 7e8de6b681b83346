//! Pricing service functions with database access.
//!
//! These functions resolve a tenant's settings through the cache and the
//! database, then hand them to `PricingEngine`. No arithmetic lives here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculators::{
    PreviewBreakdown, PreviewInput, PricingBreakdown, PricingCalculationInput, PricingEngine,
};
use super::models::{PricingSettings, PricingSettingsRecord};
use super::queries;

/// Canonical settings for tenants that have never saved their own.
///
/// This is the only place default rates are defined.
pub fn default_pricing_settings() -> PricingSettings {
    let service_type_rates = [
        ("residential", dec!(0.15)),
        ("commercial", dec!(0.12)),
        ("carpet", dec!(0.25)),
        ("window", dec!(0.10)),
        ("floor", dec!(0.20)),
    ];
    let frequency_multipliers = [
        ("one_time", dec!(1.0)),
        ("weekly", dec!(0.9)),
        ("bi_weekly", dec!(0.95)),
        ("monthly", dec!(1.0)),
        ("quarterly", dec!(1.1)),
    ];

    PricingSettings {
        labor_rate: dec!(25),
        overhead_percentage: dec!(15),
        margin_percentage: dec!(20),
        service_type_rates: rate_table(&service_type_rates),
        frequency_multipliers: rate_table(&frequency_multipliers),
        production_rates: BTreeMap::new(),
    }
}

fn rate_table(entries: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
    entries
        .iter()
        .map(|(key, rate)| (key.to_string(), *rate))
        .collect()
}

/// Load a tenant's pricing settings.
///
/// Order: cache, then `pricing_settings`, then the canonical defaults.
/// Rows that fail conversion are reported as configuration errors and are
/// not cached.
pub async fn load_settings(
    pool: &PgPool,
    cache: &AppCache,
    tenant_id: Uuid,
) -> Result<Arc<PricingSettings>, AppError> {
    if let Some(cached) = cache.settings.get(&tenant_id).await {
        debug!("Cache HIT for pricing settings: {}", tenant_id);
        return Ok(cached);
    }
    debug!("Cache MISS for pricing settings: {}", tenant_id);

    let record = queries::find_pricing_settings(pool, tenant_id).await?;
    cache_settings_row(cache, tenant_id, record).await
}

/// Turn the stored row (or its absence) into settings and cache the result.
async fn cache_settings_row(
    cache: &AppCache,
    tenant_id: Uuid,
    record: Option<PricingSettingsRecord>,
) -> Result<Arc<PricingSettings>, AppError> {
    let settings = match record {
        Some(record) => PricingSettings::try_from(record).map_err(|e| {
            warn!("Invalid pricing settings for tenant {}: {}", tenant_id, e);
            e
        })?,
        None => {
            debug!("No pricing settings stored for {}, using defaults", tenant_id);
            default_pricing_settings()
        }
    };

    let settings = Arc::new(settings);
    cache.settings.insert(tenant_id, settings.clone()).await;
    Ok(settings)
}

/// Calculate a full pricing breakdown for a tenant
pub async fn calculate_for_tenant(
    pool: &PgPool,
    cache: &AppCache,
    tenant_id: Uuid,
    input: &PricingCalculationInput,
) -> Result<PricingBreakdown, AppError> {
    let settings = load_settings(pool, cache, tenant_id).await?;
    let engine = PricingEngine::new(&settings)?;
    let breakdown = engine.calculate_pricing(input)?;

    if !breakdown.rate_configured {
        debug!(
            "No rate configured for service type '{}' (tenant {})",
            input.service_type, tenant_id
        );
    }

    Ok(breakdown)
}

/// Quick single-number estimate for a tenant
pub async fn quick_estimate_for_tenant(
    pool: &PgPool,
    cache: &AppCache,
    tenant_id: Uuid,
    service_type: &str,
    facility_size: Decimal,
    service_frequency: &str,
) -> Result<Decimal, AppError> {
    let settings = load_settings(pool, cache, tenant_id).await?;
    let engine = PricingEngine::new(&settings)?;
    Ok(engine.get_quick_estimate(service_type, facility_size, service_frequency)?)
}

/// Time-and-materials preview for a tenant
pub async fn preview_for_tenant(
    pool: &PgPool,
    cache: &AppCache,
    tenant_id: Uuid,
    input: &PreviewInput,
) -> Result<PreviewBreakdown, AppError> {
    let settings = load_settings(pool, cache, tenant_id).await?;
    let engine = PricingEngine::new(&settings)?;
    Ok(engine.calculate_preview(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingError;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/proposal_pricing_test")
            .unwrap()
    }

    #[test]
    fn test_default_settings_are_valid_for_engine() {
        let settings = default_pricing_settings();
        assert_eq!(settings.labor_rate, dec!(25));
        assert_eq!(settings.overhead_percentage, dec!(15));
        assert_eq!(settings.margin_percentage, dec!(20));
        assert!(PricingEngine::new(&settings).is_ok());
    }

    #[test]
    fn test_default_settings_residential_weekly() {
        let settings = default_pricing_settings();
        let engine = PricingEngine::new(&settings).unwrap();
        let estimate = engine
            .get_quick_estimate("residential", dec!(1000), "weekly")
            .unwrap();
        assert_eq!(estimate, dec!(182.25));
    }

    #[tokio::test]
    async fn test_load_settings_uses_cache() {
        let pool = lazy_pool();
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();
        let mut settings = default_pricing_settings();
        settings.labor_rate = dec!(40);
        cache.settings.insert(tenant, Arc::new(settings)).await;

        let loaded = load_settings(&pool, &cache, tenant).await.unwrap();
        assert_eq!(loaded.labor_rate, dec!(40));
    }

    fn stored_row(tenant: Uuid) -> PricingSettingsRecord {
        PricingSettingsRecord {
            tenant_id: tenant,
            labor_rate: Some(dec!(30)),
            overhead_percentage: Some(dec!(10)),
            margin_percentage: Some(dec!(25)),
            service_type_rates: Some(json!({"residential": "0.20"})),
            frequency_multipliers: Some(json!({"weekly": 0.85})),
            production_rates: None,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_row_caches_defaults() {
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();

        let settings = cache_settings_row(&cache, tenant, None).await.unwrap();
        assert_eq!(*settings, default_pricing_settings());

        let cached = cache.settings.get(&tenant).await.unwrap();
        assert_eq!(*cached, default_pricing_settings());
    }

    #[tokio::test]
    async fn test_stored_row_is_converted_and_cached() {
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();

        let settings = cache_settings_row(&cache, tenant, Some(stored_row(tenant)))
            .await
            .unwrap();
        assert_eq!(settings.labor_rate, dec!(30));
        assert_eq!(settings.service_type_rates["residential"], dec!(0.20));

        let cached = cache.settings.get(&tenant).await.unwrap();
        assert_eq!(cached.frequency_multipliers["weekly"], dec!(0.85));
    }

    #[tokio::test]
    async fn test_bad_row_is_configuration_error_and_not_cached() {
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();
        let mut row = stored_row(tenant);
        row.labor_rate = None;

        let err = cache_settings_row(&cache, tenant, Some(row)).await.unwrap_err();
        match err {
            AppError::Pricing(PricingError::Configuration { field, .. }) => {
                assert_eq!(field, "labor_rate")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(cache.settings.get(&tenant).await.is_none());
    }

    #[tokio::test]
    async fn test_calculate_for_tenant_propagates_validation_error() {
        let pool = lazy_pool();
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();
        cache
            .settings
            .insert(tenant, Arc::new(default_pricing_settings()))
            .await;

        let input = PricingCalculationInput {
            service_type: "residential".to_string(),
            facility_size: dec!(-5),
            service_frequency: "weekly".to_string(),
            ..Default::default()
        };
        let err = calculate_for_tenant(&pool, &cache, tenant, &input)
            .await
            .unwrap_err();

        match err {
            AppError::Pricing(PricingError::Validation { field, .. }) => {
                assert_eq!(field, "facilitySize")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cached_bad_settings_surface_configuration_error() {
        let pool = lazy_pool();
        let cache = AppCache::default();
        let tenant = Uuid::new_v4();
        let mut settings = default_pricing_settings();
        settings.margin_percentage = dec!(150);
        cache.settings.insert(tenant, Arc::new(settings)).await;

        let err = quick_estimate_for_tenant(&pool, &cache, tenant, "residential", dec!(10), "weekly")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::Configuration { .. })
        ));
    }
}
