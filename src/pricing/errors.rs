//! Error kinds raised by the pricing engine.

/// Pricing calculation error types.
///
/// The engine never performs I/O, so both kinds are terminal for the call
/// that raised them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// Settings are missing a field, hold a non-numeric value, or are out of range.
    #[error("Configuration error in '{field}': {message}")]
    Configuration { field: String, message: String },

    /// Call arguments are malformed.
    #[error("Validation error in '{field}': {message}")]
    Validation { field: String, message: String },
}

impl PricingError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        PricingError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PricingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending settings field or input argument.
    pub fn field(&self) -> &str {
        match self {
            PricingError::Configuration { field, .. } | PricingError::Validation { field, .. } => {
                field
            }
        }
    }

    /// Stable identifier used in JSON error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::Configuration { .. } => "configuration_error",
            PricingError::Validation { .. } => "validation_error",
        }
    }
}
