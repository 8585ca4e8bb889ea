//! Minor-unit money conversion.
//!
//! Stripe reports every amount in the smallest currency unit (cents for
//! USD). All division by 100 happens here, once, so the rest of the
//! codebase only ever sees `Decimal` amounts in currency units.

use rust_decimal::Decimal;

/// Convert a minor-unit amount (cents) to a two-decimal `Decimal`.
#[must_use]
pub fn minor_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_to_decimal() {
        assert_eq!(minor_to_decimal(5000).to_string(), "50.00");
        assert_eq!(minor_to_decimal(5400).to_string(), "54.00");
        assert_eq!(minor_to_decimal(1).to_string(), "0.01");
        assert_eq!(minor_to_decimal(0).to_string(), "0.00");
    }

    #[test]
    fn test_minor_to_decimal_negative() {
        // Refund deltas come through as negative minor amounts
        assert_eq!(minor_to_decimal(-250).to_string(), "-2.50");
    }
}
