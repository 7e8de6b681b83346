//! Request DTOs for pricing API endpoints.
//!
//! Shape validation happens in serde; value rules (positive size, tax range)
//! are left to the engine so both layers agree on what "invalid" means.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::calculators::{PreviewInput, PricingCalculationInput};

/// Request to calculate a full pricing breakdown
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatePricingRequest {
    pub service_type: String,
    pub facility_size: Decimal,
    pub service_frequency: String,
    #[serde(default)]
    pub service_specific_data: Map<String, Value>,
    #[serde(default)]
    pub global_inputs: Map<String, Value>,
    #[serde(default)]
    pub adjustments: BTreeMap<String, Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
}

impl From<&CalculatePricingRequest> for PricingCalculationInput {
    fn from(req: &CalculatePricingRequest) -> Self {
        Self {
            service_type: req.service_type.clone(),
            facility_size: req.facility_size,
            service_frequency: req.service_frequency.clone(),
            service_specific_data: req.service_specific_data.clone(),
            global_inputs: req.global_inputs.clone(),
            adjustments: req.adjustments.clone(),
            tax_rate: req.tax_rate,
        }
    }
}

/// Query parameters for a quick estimate
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickEstimateQuery {
    pub service_type: String,
    pub facility_size: Decimal,
    pub service_frequency: String,
}

/// Request to run the settings-screen preview calculator
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub labor_hours: Decimal,
    #[serde(default)]
    pub items: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub tax_rate: Decimal,
}

impl From<&PreviewRequest> for PreviewInput {
    fn from(req: &PreviewRequest) -> Self {
        Self {
            labor_hours: req.labor_hours,
            items: req.items.clone(),
            tax_rate: req.tax_rate,
        }
    }
}
