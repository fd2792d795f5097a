//! Valuation assumptions: revenue, growth, margins, discount and terminal rates

pub mod loader;
mod overrides;

pub use loader::{LoadError, NamedAssumptions};
pub use overrides::AssumptionOverrides;

use crate::error::ValuationError;
use serde::{Deserialize, Serialize};

/// Number of explicitly projected years
pub const PROJECTION_YEARS: u32 = 5;

/// Revenue growth path over the projection horizon
///
/// Deserializes from either a bare number (constant growth) or an array
/// with one rate per projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrowthSchedule {
    /// Same growth rate every year
    Constant(f64),
    /// One growth rate per projected year (year 1 first)
    PerYear(Vec<f64>),
}

impl GrowthSchedule {
    /// Growth rate applied to revenue in `year` (1-indexed)
    pub fn rate_for_year(&self, year: u32) -> f64 {
        match self {
            Self::Constant(rate) => *rate,
            Self::PerYear(rates) => rates
                .get(year.saturating_sub(1) as usize)
                .copied()
                .unwrap_or(0.0),
        }
    }

    /// First and last year growth rates
    pub fn endpoints(&self) -> (f64, f64) {
        (self.rate_for_year(1), self.rate_for_year(PROJECTION_YEARS))
    }

    fn validate(&self) -> Result<(), ValuationError> {
        if let Self::PerYear(rates) = self {
            if rates.len() != PROJECTION_YEARS as usize {
                return Err(ValuationError::invalid(
                    "revenue_growth",
                    format!(
                        "expected {} yearly rates, got {}",
                        PROJECTION_YEARS,
                        rates.len()
                    ),
                ));
            }
        }

        for year in 1..=PROJECTION_YEARS {
            let rate = self.rate_for_year(year);
            if !rate.is_finite() || rate < -1.0 {
                // Anything below -100% turns revenue negative
                return Err(ValuationError::invalid(
                    "revenue_growth",
                    format!("year {} rate {} must be a finite value >= -1", year, rate),
                ));
            }
        }
        Ok(())
    }
}

/// Linear free cash flow adjustments, all expressed as fractions of revenue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CashFlowAdjustments {
    /// Capital expenditure as a share of the year's revenue (subtracted)
    pub capex_pct: f64,
    /// Depreciation and amortization as a share of the year's revenue (added back)
    pub depreciation_pct: f64,
    /// Net working capital investment as a share of the year's revenue change (subtracted)
    pub nwc_pct: f64,
}

impl CashFlowAdjustments {
    /// Net adjustment for a year with `revenue`, given the prior year's revenue
    pub fn apply(&self, revenue: f64, prior_revenue: f64) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        revenue * (self.depreciation_pct - self.capex_pct)
            - self.nwc_pct * (revenue - prior_revenue)
    }

    /// True when no adjustment is configured
    pub fn is_zero(&self) -> bool {
        self.capex_pct == 0.0 && self.depreciation_pct == 0.0 && self.nwc_pct == 0.0
    }

    fn validate(&self) -> Result<(), ValuationError> {
        for (field, value) in [
            ("capex_pct", self.capex_pct),
            ("depreciation_pct", self.depreciation_pct),
            ("nwc_pct", self.nwc_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValuationError::invalid(
                    field,
                    format!("{} must be a finite non-negative fraction", value),
                ));
            }
        }
        Ok(())
    }
}

fn default_fcf_conversion() -> f64 {
    1.0
}

/// Inputs to a single valuation
///
/// Immutable per calculation: the sensitivity grid derives modified copies
/// through [`Assumptions::with_rates`] instead of mutating shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assumptions {
    /// Revenue of the last actual year (year 0)
    pub base_revenue: f64,

    /// Revenue growth path
    pub revenue_growth: GrowthSchedule,

    /// EBIT as a fraction of revenue
    pub ebit_margin: f64,

    /// Tax rate applied to EBIT
    pub tax_rate: f64,

    /// Discount rate
    pub wacc: f64,

    /// Perpetual growth rate after the projection horizon
    pub terminal_growth: f64,

    /// Share of NOPAT converted to free cash flow (1.0 = FCF equals NOPAT)
    #[serde(default = "default_fcf_conversion")]
    pub fcf_conversion: f64,

    #[serde(default)]
    pub adjustments: CashFlowAdjustments,
}

impl Assumptions {
    /// Create assumptions with no FCF conversion haircut and no adjustments
    pub fn new(
        base_revenue: f64,
        revenue_growth: GrowthSchedule,
        ebit_margin: f64,
        tax_rate: f64,
        wacc: f64,
        terminal_growth: f64,
    ) -> Self {
        Self {
            base_revenue,
            revenue_growth,
            ebit_margin,
            tax_rate,
            wacc,
            terminal_growth,
            fcf_conversion: default_fcf_conversion(),
            adjustments: CashFlowAdjustments::default(),
        }
    }

    /// Preset matching the dashboard's initial sidebar values
    pub fn dashboard_defaults() -> Self {
        Self {
            fcf_conversion: 0.8,
            ..Self::new(
                100.0,
                GrowthSchedule::PerYear(vec![0.15, 0.12, 0.10, 0.08, 0.06]),
                0.20,
                0.25,
                0.10,
                0.03,
            )
        }
    }

    /// Copy with a different discount rate
    pub fn with_wacc(&self, wacc: f64) -> Self {
        Self {
            wacc,
            ..self.clone()
        }
    }

    /// Copy with a different terminal growth rate
    pub fn with_terminal_growth(&self, terminal_growth: f64) -> Self {
        Self {
            terminal_growth,
            ..self.clone()
        }
    }

    /// Copy with both discount and terminal growth rates replaced
    pub fn with_rates(&self, wacc: f64, terminal_growth: f64) -> Self {
        Self {
            wacc,
            terminal_growth,
            ..self.clone()
        }
    }

    /// Spread between the discount rate and terminal growth
    pub fn spread(&self) -> f64 {
        self.wacc - self.terminal_growth
    }

    /// Checks every input except the discount and terminal growth rates
    pub fn validate_operating(&self) -> Result<(), ValuationError> {
        if !self.base_revenue.is_finite() || self.base_revenue <= 0.0 {
            return Err(ValuationError::invalid(
                "base_revenue",
                format!("{} must be a finite positive number", self.base_revenue),
            ));
        }

        self.revenue_growth.validate()?;

        if !(0.0..=1.0).contains(&self.ebit_margin) {
            return Err(ValuationError::invalid(
                "ebit_margin",
                format!("{} must be within [0, 1]", self.ebit_margin),
            ));
        }
        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(ValuationError::invalid(
                "tax_rate",
                format!("{} must be within [0, 1]", self.tax_rate),
            ));
        }

        if !self.fcf_conversion.is_finite() || self.fcf_conversion < 0.0 {
            return Err(ValuationError::invalid(
                "fcf_conversion",
                format!("{} must be a finite non-negative fraction", self.fcf_conversion),
            ));
        }

        self.adjustments.validate()
    }

    /// Checks everything the explicit projection needs.
    ///
    /// Does not require `wacc > terminal_growth`; that only matters for the
    /// terminal value.
    pub fn validate_projection(&self) -> Result<(), ValuationError> {
        self.validate_operating()?;

        if !self.wacc.is_finite() || self.wacc <= -1.0 {
            // (1 + wacc) must stay positive for the discount factor
            return Err(ValuationError::invalid(
                "wacc",
                format!("{} must be a finite value above -1", self.wacc),
            ));
        }
        Ok(())
    }

    /// Full validation for a valuation including the terminal value
    pub fn validate(&self) -> Result<(), ValuationError> {
        self.validate_projection()?;
        check_terminal_rates(self.wacc, self.terminal_growth)
    }
}

/// Gordon growth requires a positive `wacc - terminal_growth` denominator
pub fn check_terminal_rates(wacc: f64, terminal_growth: f64) -> Result<(), ValuationError> {
    if !terminal_growth.is_finite() || terminal_growth <= -1.0 {
        return Err(ValuationError::invalid(
            "terminal_growth",
            format!("{} must be a finite value above -1", terminal_growth),
        ));
    }
    // Negated comparison so a NaN wacc is rejected too
    if !(wacc > terminal_growth) {
        return Err(ValuationError::invalid(
            "wacc",
            format!(
                "wacc {} must exceed terminal growth {}",
                wacc, terminal_growth
            ),
        ));
    }
    Ok(())
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::dashboard_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Assumptions {
        Assumptions::new(100.0, GrowthSchedule::Constant(0.10), 0.20, 0.25, 0.10, 0.03)
    }

    #[test]
    fn test_growth_schedule_rates() {
        let constant = GrowthSchedule::Constant(0.05);
        assert_eq!(constant.rate_for_year(1), 0.05);
        assert_eq!(constant.rate_for_year(5), 0.05);

        let per_year = GrowthSchedule::PerYear(vec![0.15, 0.12, 0.10, 0.08, 0.06]);
        assert_eq!(per_year.rate_for_year(1), 0.15);
        assert_eq!(per_year.rate_for_year(5), 0.06);
        assert_eq!(per_year.endpoints(), (0.15, 0.06));
    }

    #[test]
    fn test_valid_assumptions_pass() {
        assert!(base().validate().is_ok());
        assert!(Assumptions::dashboard_defaults().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_revenue() {
        let mut a = base();
        a.base_revenue = -5.0;
        assert_eq!(a.validate().unwrap_err().field(), "base_revenue");

        a.base_revenue = f64::NAN;
        assert_eq!(a.validate().unwrap_err().field(), "base_revenue");
    }

    #[test]
    fn test_rejects_wrong_schedule_length() {
        let mut a = base();
        a.revenue_growth = GrowthSchedule::PerYear(vec![0.1, 0.1, 0.1]);
        assert_eq!(a.validate().unwrap_err().field(), "revenue_growth");
    }

    #[test]
    fn test_rejects_wacc_at_or_below_minus_one() {
        let a = base().with_rates(-1.0, -2.0);
        assert_eq!(a.validate_projection().unwrap_err().field(), "wacc");
    }

    #[test]
    fn test_projection_does_not_need_positive_spread() {
        let a = base().with_rates(0.05, 0.06);
        assert!(a.validate_projection().is_ok());
        assert_eq!(a.validate().unwrap_err().field(), "wacc");
    }

    #[test]
    fn test_equal_rates_rejected() {
        assert!(check_terminal_rates(0.04, 0.04).is_err());
        assert!(check_terminal_rates(0.05, 0.04).is_ok());
    }

    #[test]
    fn test_with_rates_leaves_original_untouched() {
        let a = base();
        let b = a.with_rates(0.12, 0.02);
        assert_eq!(a.wacc, 0.10);
        assert_eq!(b.wacc, 0.12);
        assert_eq!(b.terminal_growth, 0.02);
        assert_eq!(b.base_revenue, a.base_revenue);
    }

    #[test]
    fn test_adjustments_apply() {
        let adj = CashFlowAdjustments {
            capex_pct: 0.05,
            depreciation_pct: 0.03,
            nwc_pct: 0.10,
        };
        // 110 * (0.03 - 0.05) - 0.10 * 10
        approx::assert_relative_eq!(adj.apply(110.0, 100.0), -3.2, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_adjustments_ignore_infinite_revenue() {
        let adj = CashFlowAdjustments::default();
        assert!(adj.is_zero());
        assert_eq!(adj.apply(f64::INFINITY, 1e307), 0.0);
    }

    #[test]
    fn test_deserialize_constant_and_per_year_growth() {
        let json = r#"{
            "base_revenue": 100.0,
            "revenue_growth": 0.1,
            "ebit_margin": 0.2,
            "tax_rate": 0.25,
            "wacc": 0.1,
            "terminal_growth": 0.03
        }"#;
        let a: Assumptions = serde_json::from_str(json).unwrap();
        assert_eq!(a, base());

        let json = r#"{
            "base_revenue": 100.0,
            "revenue_growth": [0.15, 0.12, 0.10, 0.08, 0.06],
            "ebit_margin": 0.2,
            "tax_rate": 0.25,
            "wacc": 0.1,
            "terminal_growth": 0.03,
            "fcf_conversion": 0.8
        }"#;
        let a: Assumptions = serde_json::from_str(json).unwrap();
        assert_eq!(a, Assumptions::dashboard_defaults());
    }
}
