//! Pricing validation errors.

use rust_decimal::Decimal;

/// Pricing calculation error types
///
/// Raised at the boundary of the engine. Invalid input is never coerced
/// to a default value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid pricing profile: {field} {reason}")]
    InvalidProfile { field: &'static str, reason: String },

    #[error("Invalid dimensions: {field} {reason}")]
    InvalidDimensions { field: &'static str, reason: String },

    #[error("Invalid tax rate: {0} (must be zero or positive)")]
    InvalidTaxRate(Decimal),

    #[error("Amount out of range: {field} {reason}")]
    AmountOutOfRange { field: &'static str, reason: String },
}

impl PricingError {
    /// Stable machine-readable identifier used in API error bodies
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidProfile { .. } => "invalid_profile",
            PricingError::InvalidDimensions { .. } => "invalid_dimensions",
            PricingError::InvalidTaxRate(_) => "invalid_tax_rate",
            PricingError::AmountOutOfRange { .. } => "amount_out_of_range",
        }
    }

    /// Name of the offending input field, when there is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PricingError::InvalidProfile { field, .. } => Some(field),
            PricingError::InvalidDimensions { field, .. } => Some(field),
            PricingError::InvalidTaxRate(_) => Some("tax_rate_percent"),
            PricingError::AmountOutOfRange { field, .. } => Some(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidProfile {
            field: "base_price_per_unit_area",
            reason: "must be positive (got 0)".to_string(),
        };
        assert!(err.to_string().contains("base_price_per_unit_area"));

        let err = PricingError::InvalidDimensions {
            field: "quantity",
            reason: "must be at least 1 (got 0)".to_string(),
        };
        assert!(err.to_string().contains("quantity"));

        let err = PricingError::InvalidTaxRate(dec!(-5));
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_pricing_error_type_and_field() {
        let err = PricingError::InvalidTaxRate(dec!(-1));
        assert_eq!(err.error_type(), "invalid_tax_rate");
        assert_eq!(err.field(), Some("tax_rate_percent"));

        let err = PricingError::InvalidDimensions {
            field: "width_cm",
            reason: String::new(),
        };
        assert_eq!(err.error_type(), "invalid_dimensions");
        assert_eq!(err.field(), Some("width_cm"));

        let err = PricingError::AmountOutOfRange {
            field: "line_total",
            reason: String::new(),
        };
        assert_eq!(err.error_type(), "amount_out_of_range");
        assert_eq!(err.field(), Some("line_total"));
    }
}
