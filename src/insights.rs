//! Diagnostics reported alongside a valuation

use crate::assumptions::Assumptions;
use crate::projection::ValuationResult;
use crate::sensitivity::wacc_sensitivity;
use serde::{Deserialize, Serialize};

/// Terminal value share above which the valuation is flagged
pub const HIGH_TERMINAL_SHARE: f64 = 0.75;

/// Minimum WACC - terminal growth spread before the valuation is flagged
pub const MIN_RATE_SPREAD: f64 = 0.03;

/// WACC move used for the sensitivity figure
pub const WACC_BUMP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightWarning {
    /// Most of the value sits beyond the explicit forecast
    HighTerminalValueShare,
    /// WACC barely exceeds terminal growth, so the terminal value is unstable
    NarrowSpread,
}

impl InsightWarning {
    pub fn description(&self) -> &'static str {
        match self {
            Self::HighTerminalValueShare => {
                "High terminal value risk: more than 75% of value in the terminal period"
            }
            Self::NarrowSpread => {
                "WACC - terminal growth spread below 3% may produce unreliable results"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInsights {
    pub terminal_value_share: f64,
    pub forecast_share: f64,
    /// Compound revenue growth over the projection horizon
    pub revenue_cagr: Option<f64>,
    pub first_year_growth: f64,
    pub final_year_growth: f64,
    pub rate_spread: f64,
    /// Relative EV change for a one point WACC move; `None` if a bumped WACC is invalid
    pub wacc_sensitivity: Option<f64>,
    pub warnings: Vec<InsightWarning>,
}

impl ValuationInsights {
    pub fn from_result(assumptions: &Assumptions, result: &ValuationResult) -> Self {
        let terminal_value_share = result.terminal_value_share();
        let rate_spread = assumptions.spread();
        let (first_year_growth, final_year_growth) = assumptions.revenue_growth.endpoints();

        let mut warnings = Vec::new();
        if terminal_value_share > HIGH_TERMINAL_SHARE {
            warnings.push(InsightWarning::HighTerminalValueShare);
        }
        if rate_spread < MIN_RATE_SPREAD {
            warnings.push(InsightWarning::NarrowSpread);
        }
        for warning in &warnings {
            log::warn!("{}", warning.description());
        }

        Self {
            terminal_value_share,
            forecast_share: result.forecast_share(),
            revenue_cagr: result.projection.revenue_cagr(),
            first_year_growth,
            final_year_growth,
            rate_spread,
            wacc_sensitivity: wacc_sensitivity(assumptions, WACC_BUMP).ok(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::GrowthSchedule;
    use crate::projection::enterprise_value;
    use approx::assert_relative_eq;

    fn insights_for(a: &Assumptions) -> ValuationInsights {
        let result = enterprise_value(a).unwrap();
        ValuationInsights::from_result(a, &result)
    }

    #[test]
    fn test_scenario_shares_and_cagr() {
        let a = Assumptions::new(100.0, GrowthSchedule::Constant(0.10), 0.20, 0.25, 0.10, 0.03);
        let insights = insights_for(&a);

        // PV forecast 75, PV terminal 15 * 1.03 / 0.07
        let pv_tv = 15.0 * 1.03 / 0.07;
        assert_relative_eq!(insights.terminal_value_share, pv_tv / (75.0 + pv_tv), epsilon = 1e-12);
        assert_relative_eq!(
            insights.terminal_value_share + insights.forecast_share,
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(insights.revenue_cagr.unwrap(), 0.10, epsilon = 1e-12);
        assert_relative_eq!(insights.rate_spread, 0.07, epsilon = 1e-12);
        assert!(insights.wacc_sensitivity.unwrap() > 0.0);
        // Terminal share is just under 75%
        assert!(insights.warnings.is_empty());
    }

    #[test]
    fn test_narrow_spread_warnings() {
        let a = Assumptions::dashboard_defaults().with_rates(0.06, 0.05);
        let insights = insights_for(&a);
        assert_eq!(
            insights.warnings,
            vec![InsightWarning::HighTerminalValueShare, InsightWarning::NarrowSpread]
        );
    }

    #[test]
    fn test_no_warnings_for_short_lived_value() {
        let a = Assumptions::new(100.0, GrowthSchedule::Constant(0.0), 0.30, 0.25, 0.40, 0.0);
        let insights = insights_for(&a);
        assert!(insights.terminal_value_share < HIGH_TERMINAL_SHARE);
        assert!(insights.warnings.is_empty());
        assert_eq!(insights.first_year_growth, 0.0);
    }

    #[test]
    fn test_sensitivity_absent_when_bump_invalid() {
        let a = Assumptions::dashboard_defaults().with_rates(0.035, 0.03);
        let insights = insights_for(&a);
        assert!(insights.wacc_sensitivity.is_none());
    }
}
