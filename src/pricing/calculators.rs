//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. Every call site
//! (calculation API, quick estimate, settings preview) goes through
//! `PricingEngine` so identical inputs always produce identical numbers.

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::errors::PricingError;
use super::models::PricingSettings;

/// Decimal places for currency amounts.
pub const MONEY_PLACES: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round to specified decimal places, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(36.125), 2), dec!(36.13));
/// assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Input for the area-and-frequency calculation.
#[derive(Debug, Clone, Default)]
pub struct PricingCalculationInput {
    pub service_type: String,
    pub facility_size: Decimal,
    pub service_frequency: String,
    /// Opaque context carried for callers; not interpreted here.
    pub service_specific_data: Map<String, Value>,
    /// Opaque context carried for callers; not interpreted here.
    pub global_inputs: Map<String, Value>,
    pub adjustments: BTreeMap<String, Decimal>,
    pub tax_rate: Option<Decimal>,
}

/// Itemized result of `PricingEngine::calculate_pricing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingBreakdown {
    pub base_rate: Decimal,
    pub frequency_multiplier: Decimal,
    pub base_price: Decimal,
    pub overhead_amount: Decimal,
    pub margin_amount: Decimal,
    pub adjustments_total: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    /// False when the service type has no rate in the settings.
    pub rate_configured: bool,
}

/// Input for the time-and-materials preview calculator.
#[derive(Debug, Clone, Default)]
pub struct PreviewInput {
    pub labor_hours: Decimal,
    /// Production item -> quantity
    pub items: BTreeMap<String, Decimal>,
    pub tax_rate: Decimal,
}

/// Result of `PricingEngine::calculate_preview`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBreakdown {
    pub labor_cost: Decimal,
    pub production_cost: Decimal,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Pricing engine bound to one settings snapshot.
///
/// Holds a shared borrow of the settings and no other state, so it can be
/// built per request and used from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    settings: &'a PricingSettings,
}

impl<'a> PricingEngine<'a> {
    /// Build an engine, rejecting negative rates and percentages outside 0-100.
    pub fn new(settings: &'a PricingSettings) -> Result<Self, PricingError> {
        check_non_negative("labor_rate", settings.labor_rate)?;
        check_percentage("overhead_percentage", settings.overhead_percentage)?;
        check_percentage("margin_percentage", settings.margin_percentage)?;

        let tables = [
            ("service_type_rates", &settings.service_type_rates),
            ("frequency_multipliers", &settings.frequency_multipliers),
            ("production_rates", &settings.production_rates),
        ];
        for (table, rates) in tables {
            for (key, rate) in rates {
                check_non_negative(&format!("{}.{}", table, key), *rate)?;
            }
        }

        Ok(Self { settings })
    }

    /// Calculate the full price breakdown for a service request.
    ///
    /// Overhead and margin are each taken from `base_price` independently.
    /// Adjustments are summed as given and a negative subtotal is returned
    /// as-is.
    pub fn calculate_pricing(
        &self,
        input: &PricingCalculationInput,
    ) -> Result<PricingBreakdown, PricingError> {
        require_key("serviceType", &input.service_type)?;
        if input.facility_size <= Decimal::ZERO {
            return Err(PricingError::validation(
                "facilitySize",
                "must be greater than zero",
            ));
        }
        require_key("serviceFrequency", &input.service_frequency)?;
        let tax_rate = match input.tax_rate {
            Some(rate) => validate_tax_rate(rate)?,
            None => Decimal::ZERO,
        };

        let rate = self.settings.service_type_rates.get(&input.service_type).copied();
        let base_rate = rate.unwrap_or(Decimal::ZERO);
        let frequency_multiplier = self
            .settings
            .frequency_multipliers
            .get(&input.service_frequency)
            .copied()
            .unwrap_or(Decimal::ONE);

        let base_price = input
            .facility_size
            .checked_mul(base_rate)
            .and_then(|v| v.checked_mul(frequency_multiplier))
            .ok_or_else(|| out_of_range("facilitySize"))?;
        let overhead_amount = percentage_of(base_price, self.settings.overhead_percentage)
            .ok_or_else(|| out_of_range("facilitySize"))?;
        let margin_amount = percentage_of(base_price, self.settings.margin_percentage)
            .ok_or_else(|| out_of_range("facilitySize"))?;
        let adjustments_total = input
            .adjustments
            .values()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .ok_or_else(|| out_of_range("adjustments"))?;

        // Full precision until the result is built; each amount is rounded once.
        let subtotal = base_price
            .checked_add(overhead_amount)
            .and_then(|v| v.checked_add(margin_amount))
            .ok_or_else(|| out_of_range("facilitySize"))?
            .checked_add(adjustments_total)
            .ok_or_else(|| out_of_range("adjustments"))?;
        let tax_amount = percentage_of(subtotal, tax_rate).ok_or_else(|| out_of_range("taxRate"))?;
        let total = subtotal
            .checked_add(tax_amount)
            .ok_or_else(|| out_of_range("taxRate"))?;

        Ok(PricingBreakdown {
            base_rate,
            frequency_multiplier,
            base_price: round_money(base_price, MONEY_PLACES),
            overhead_amount: round_money(overhead_amount, MONEY_PLACES),
            margin_amount: round_money(margin_amount, MONEY_PLACES),
            adjustments_total: round_money(adjustments_total, MONEY_PLACES),
            subtotal: round_money(subtotal, MONEY_PLACES),
            tax_amount: round_money(tax_amount, MONEY_PLACES),
            total: round_money(total, MONEY_PLACES),
            rate_configured: rate.is_some(),
        })
    }

    /// Single-number preview: the full calculation with no adjustments and no
    /// tax, returning its subtotal.
    pub fn get_quick_estimate(
        &self,
        service_type: &str,
        facility_size: Decimal,
        service_frequency: &str,
    ) -> Result<Decimal, PricingError> {
        let input = PricingCalculationInput {
            service_type: service_type.to_string(),
            facility_size,
            service_frequency: service_frequency.to_string(),
            ..Default::default()
        };

        Ok(self.calculate_pricing(&input)?.subtotal)
    }

    /// Time-and-materials preview used by the settings screen.
    ///
    /// Items without a production rate are priced at zero.
    pub fn calculate_preview(&self, input: &PreviewInput) -> Result<PreviewBreakdown, PricingError> {
        if input.labor_hours < Decimal::ZERO {
            return Err(PricingError::validation("laborHours", "must not be negative"));
        }
        let tax_rate = validate_tax_rate(input.tax_rate)?;

        let labor_cost = input
            .labor_hours
            .checked_mul(self.settings.labor_rate)
            .ok_or_else(|| out_of_range("laborHours"))?;

        let mut production_cost = Decimal::ZERO;
        for (item, quantity) in &input.items {
            let field = format!("items.{}", item);
            if item.trim().is_empty() {
                return Err(PricingError::validation(field, "item name must not be empty"));
            }
            if *quantity < Decimal::ZERO {
                return Err(PricingError::validation(field, "quantity must not be negative"));
            }
            let rate = self
                .settings
                .production_rates
                .get(item)
                .copied()
                .unwrap_or(Decimal::ZERO);
            production_cost = quantity
                .checked_mul(rate)
                .and_then(|line| production_cost.checked_add(line))
                .ok_or_else(|| out_of_range(&field))?;
        }

        let subtotal = labor_cost
            .checked_add(production_cost)
            .ok_or_else(|| out_of_range("items"))?;
        let tax_amount = percentage_of(subtotal, tax_rate).ok_or_else(|| out_of_range("taxRate"))?;
        let total = subtotal
            .checked_add(tax_amount)
            .ok_or_else(|| out_of_range("taxRate"))?;

        Ok(PreviewBreakdown {
            labor_cost: round_money(labor_cost, MONEY_PLACES),
            production_cost: round_money(production_cost, MONEY_PLACES),
            subtotal: round_money(subtotal, MONEY_PLACES),
            tax_amount: round_money(tax_amount, MONEY_PLACES),
            total: round_money(total, MONEY_PLACES),
        })
    }
}

/// `amount * percentage / 100`, dividing the percentage first to keep the
/// intermediate value within range.
fn percentage_of(amount: Decimal, percentage: Decimal) -> Option<Decimal> {
    amount.checked_mul(percentage / HUNDRED)
}

fn out_of_range(field: &str) -> PricingError {
    PricingError::validation(field, "value out of range")
}

fn require_key(field: &str, value: &str) -> Result<(), PricingError> {
    if value.trim().is_empty() {
        return Err(PricingError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn validate_tax_rate(rate: Decimal) -> Result<Decimal, PricingError> {
    if rate < Decimal::ZERO || rate > HUNDRED {
        return Err(PricingError::validation("taxRate", "must be between 0 and 100"));
    }
    Ok(rate)
}

fn check_non_negative(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::configuration(field, "must not be negative"));
    }
    Ok(())
}

fn check_percentage(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(PricingError::configuration(field, "must be between 0 and 100"));
    }
    Ok(())
}
