//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{PreviewBreakdown, PricingBreakdown};
use super::requests::{CalculatePricingRequest, PreviewRequest, QuickEstimateQuery};

/// Itemized breakdown for JSON responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub frequency_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub overhead_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub margin_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub adjustments_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub rate_configured: bool,
}

impl From<PricingBreakdown> for PricingBreakdownResponse {
    fn from(b: PricingBreakdown) -> Self {
        Self {
            base_rate: b.base_rate,
            frequency_multiplier: b.frequency_multiplier,
            base_price: b.base_price,
            overhead_amount: b.overhead_amount,
            margin_amount: b.margin_amount,
            adjustments_total: b.adjustments_total,
            subtotal: b.subtotal,
            tax_amount: b.tax_amount,
            total: b.total,
            rate_configured: b.rate_configured,
        }
    }
}

/// Response for full pricing calculation
#[derive(Debug, Serialize)]
pub struct CalculatePricingResponse {
    pub pricing: PricingBreakdownResponse,
    pub input: CalculatePricingRequest,
}

/// Response for quick estimate
#[derive(Debug, Serialize)]
pub struct QuickEstimateResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub estimate: Decimal,
    pub input: QuickEstimateQuery,
}

/// Preview calculator breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub labor_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub production_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl From<PreviewBreakdown> for PreviewBreakdownResponse {
    fn from(p: PreviewBreakdown) -> Self {
        Self {
            labor_cost: p.labor_cost,
            production_cost: p.production_cost,
            subtotal: p.subtotal,
            tax_amount: p.tax_amount,
            total: p.total,
        }
    }
}

/// Response for preview calculation
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview: PreviewBreakdownResponse,
    pub input: PreviewRequest,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
