//! Field-by-field overrides layered on top of a base assumption set

use super::{Assumptions, GrowthSchedule};

/// Optional replacement for each assumption; `None` keeps the base value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssumptionOverrides {
    pub base_revenue: Option<f64>,
    /// One rate means constant growth, several mean one rate per year
    pub growth: Option<Vec<f64>>,
    pub ebit_margin: Option<f64>,
    pub tax_rate: Option<f64>,
    pub wacc: Option<f64>,
    pub terminal_growth: Option<f64>,
    pub fcf_conversion: Option<f64>,
    pub capex_pct: Option<f64>,
    pub depreciation_pct: Option<f64>,
    pub nwc_pct: Option<f64>,
}

impl AssumptionOverrides {
    /// Write every set override into `assumptions`.
    ///
    /// No validation happens here; the engine validates whatever comes out.
    pub fn apply(&self, assumptions: &mut Assumptions) {
        if let Some(v) = self.base_revenue {
            assumptions.base_revenue = v;
        }
        if let Some(growth) = &self.growth {
            assumptions.revenue_growth = match growth.as_slice() {
                [rate] => GrowthSchedule::Constant(*rate),
                rates => GrowthSchedule::PerYear(rates.to_vec()),
            };
        }
        if let Some(v) = self.ebit_margin {
            assumptions.ebit_margin = v;
        }
        if let Some(v) = self.tax_rate {
            assumptions.tax_rate = v;
        }
        if let Some(v) = self.wacc {
            assumptions.wacc = v;
        }
        if let Some(v) = self.terminal_growth {
            assumptions.terminal_growth = v;
        }
        if let Some(v) = self.fcf_conversion {
            assumptions.fcf_conversion = v;
        }
        if let Some(v) = self.capex_pct {
            assumptions.adjustments.capex_pct = v;
        }
        if let Some(v) = self.depreciation_pct {
            assumptions.adjustments.depreciation_pct = v;
        }
        if let Some(v) = self.nwc_pct {
            assumptions.adjustments.nwc_pct = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::CashFlowAdjustments;

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut a = Assumptions::dashboard_defaults();
        AssumptionOverrides::default().apply(&mut a);
        assert_eq!(a, Assumptions::dashboard_defaults());
    }

    #[test]
    fn test_every_field_is_overridden() {
        let overrides = AssumptionOverrides {
            base_revenue: Some(250.0),
            growth: Some(vec![0.05]),
            ebit_margin: Some(0.3),
            tax_rate: Some(0.21),
            wacc: Some(0.09),
            terminal_growth: Some(0.02),
            fcf_conversion: Some(0.9),
            capex_pct: Some(0.05),
            depreciation_pct: Some(0.04),
            nwc_pct: Some(0.1),
        };
        let mut a = Assumptions::dashboard_defaults();
        overrides.apply(&mut a);

        assert_eq!(a.base_revenue, 250.0);
        assert_eq!(a.revenue_growth, GrowthSchedule::Constant(0.05));
        assert_eq!(a.ebit_margin, 0.3);
        assert_eq!(a.tax_rate, 0.21);
        assert_eq!(a.wacc, 0.09);
        assert_eq!(a.terminal_growth, 0.02);
        assert_eq!(a.fcf_conversion, 0.9);
        assert_eq!(
            a.adjustments,
            CashFlowAdjustments {
                capex_pct: 0.05,
                depreciation_pct: 0.04,
                nwc_pct: 0.1,
            }
        );
    }

    #[test]
    fn test_partial_overrides_keep_other_fields() {
        let overrides = AssumptionOverrides {
            wacc: Some(0.12),
            ..Default::default()
        };
        let mut a = Assumptions::dashboard_defaults();
        overrides.apply(&mut a);

        assert_eq!(a.wacc, 0.12);
        assert_eq!(a, Assumptions::dashboard_defaults().with_wacc(0.12));
    }

    #[test]
    fn test_several_growth_rates_become_yearly_schedule() {
        let overrides = AssumptionOverrides {
            growth: Some(vec![0.2, 0.15, 0.1, 0.05, 0.03]),
            ..Default::default()
        };
        let mut a = Assumptions::new(100.0, GrowthSchedule::Constant(0.1), 0.2, 0.25, 0.1, 0.03);
        overrides.apply(&mut a);

        assert_eq!(
            a.revenue_growth,
            GrowthSchedule::PerYear(vec![0.2, 0.15, 0.1, 0.05, 0.03])
        );
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_wrong_growth_count_surfaces_at_validation() {
        let overrides = AssumptionOverrides {
            growth: Some(vec![0.2, 0.15]),
            ..Default::default()
        };
        let mut a = Assumptions::dashboard_defaults();
        overrides.apply(&mut a);
        assert_eq!(a.validate().unwrap_err().field(), "revenue_growth");
    }
}
