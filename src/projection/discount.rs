//! Annual discounting at a single rate

use crate::error::ValuationError;
use serde::{Deserialize, Serialize};

/// Flat annual discount rate (the WACC)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRate {
    annual_rate: f64,
}

impl DiscountRate {
    /// Create a discount rate; `1 + rate` must be positive
    pub fn new(annual_rate: f64) -> Result<Self, ValuationError> {
        if !annual_rate.is_finite() || annual_rate <= -1.0 {
            return Err(ValuationError::invalid(
                "wacc",
                format!("discount rate {} must be a finite value above -1", annual_rate),
            ));
        }
        Ok(Self { annual_rate })
    }

    /// Discount factor to the end of `year`: (1 + r)^-year
    pub fn factor(&self, year: u32) -> f64 {
        1.0 / (1.0 + self.annual_rate).powi(year as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factors() {
        let rate = DiscountRate::new(0.10).unwrap();
        assert_relative_eq!(rate.factor(0), 1.0);
        assert_relative_eq!(rate.factor(1), 1.0 / 1.1, epsilon = 1e-15);
        assert_relative_eq!(rate.factor(5), 1.0 / 1.61051, epsilon = 1e-12);
    }

    #[test]
    fn test_lower_rate_discounts_less() {
        let low = DiscountRate::new(0.05).unwrap();
        let high = DiscountRate::new(0.12).unwrap();
        assert!(low.factor(3) > high.factor(3));
    }

    #[test]
    fn test_negative_rate_above_minus_one_is_allowed() {
        let rate = DiscountRate::new(-0.5).unwrap();
        assert_relative_eq!(rate.factor(1), 2.0);
    }

    #[test]
    fn test_rate_at_minus_one_rejected() {
        assert!(DiscountRate::new(-1.0).is_err());
        assert!(DiscountRate::new(-1.5).is_err());
        assert!(DiscountRate::new(f64::INFINITY).is_err());
    }
}
