//! Pricing engine module.
//!
//! Turns a tenant's rate tables and a service request into a deterministic
//! price breakdown. `calculators` holds the pure engine; `services` and
//! `routes` wrap it with settings lookup and the HTTP API.

pub mod calculators;
pub mod errors;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    round_money, PreviewBreakdown, PreviewInput, PricingBreakdown, PricingCalculationInput,
    PricingEngine,
};
pub use errors::PricingError;
pub use models::PricingSettings;
pub use routes::router;
pub use services::default_pricing_settings;
