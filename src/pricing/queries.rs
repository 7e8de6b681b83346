//! Database queries for the settings store.
//!
//! Read-only: the admin UI owns writes to `pricing_settings`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::PricingSettingsRecord;

/// Find the pricing settings row for a tenant
pub async fn find_pricing_settings(
    pool: &PgPool,
    tenant_id: Uuid,
) -> Result<Option<PricingSettingsRecord>, AppError> {
    let record = sqlx::query_as::<_, PricingSettingsRecord>(
        r#"
        SELECT
            tenant_id,
            labor_rate,
            overhead_percentage,
            margin_percentage,
            service_type_rates,
            frequency_multipliers,
            production_rates,
            updated_at
        FROM pricing_settings
        WHERE tenant_id = $1
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
