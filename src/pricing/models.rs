//! Pricing settings models.
//!
//! `PricingSettingsRecord` is the raw `pricing_settings` row as sqlx reads it;
//! `PricingSettings` is the typed snapshot the engine is built from.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::errors::PricingError;

/// Settings row from pricing_settings
#[derive(Debug, Clone, FromRow)]
pub struct PricingSettingsRecord {
    pub tenant_id: Uuid,
    pub labor_rate: Option<Decimal>,
    pub overhead_percentage: Option<Decimal>,
    pub margin_percentage: Option<Decimal>,
    pub service_type_rates: Option<Value>,
    pub frequency_multipliers: Option<Value>,
    pub production_rates: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

/// Per-tenant rate tables used by the pricing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingSettings {
    pub labor_rate: Decimal,
    pub overhead_percentage: Decimal,
    pub margin_percentage: Decimal,
    pub service_type_rates: BTreeMap<String, Decimal>,
    pub frequency_multipliers: BTreeMap<String, Decimal>,
    pub production_rates: BTreeMap<String, Decimal>,
}

impl TryFrom<PricingSettingsRecord> for PricingSettings {
    type Error = PricingError;

    fn try_from(record: PricingSettingsRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            labor_rate: required_decimal("labor_rate", record.labor_rate)?,
            overhead_percentage: required_decimal(
                "overhead_percentage",
                record.overhead_percentage,
            )?,
            margin_percentage: required_decimal("margin_percentage", record.margin_percentage)?,
            service_type_rates: rate_table("service_type_rates", record.service_type_rates.as_ref())?,
            frequency_multipliers: rate_table(
                "frequency_multipliers",
                record.frequency_multipliers.as_ref(),
            )?,
            production_rates: rate_table("production_rates", record.production_rates.as_ref())?,
        })
    }
}

fn required_decimal(field: &str, value: Option<Decimal>) -> Result<Decimal, PricingError> {
    value.ok_or_else(|| PricingError::configuration(field, "required field is missing"))
}

/// Parse a JSONB rate table. `NULL` is an empty table; anything other than an
/// object, or any entry that is not numeric, is a configuration error.
fn rate_table(field: &str, value: Option<&Value>) -> Result<BTreeMap<String, Decimal>, PricingError> {
    let object = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(PricingError::configuration(field, "expected an object of rates"));
        }
    };

    object
        .iter()
        .map(|(key, raw)| {
            decimal_from_json(raw)
                .map(|rate| (key.clone(), rate))
                .ok_or_else(|| {
                    PricingError::configuration(format!("{}.{}", field, key), "value is not numeric")
                })
        })
        .collect()
}

/// Read a decimal from a JSON number or numeric string.
///
/// Numbers go through their textual form so `0.15` stays exactly `0.15`
/// instead of picking up binary float noise.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
