//! Projection output structures

use crate::error::ValuationError;
use serde::{Deserialize, Serialize};

/// A single projected year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Year index, 1-based
    pub year: u32,
    pub growth_rate: f64,
    pub revenue: f64,
    pub ebit: f64,
    /// EBIT after tax
    pub nopat: f64,
    pub free_cash_flow: f64,
    /// (1 + wacc)^-year
    pub discount_factor: f64,
    pub present_value: f64,
}

impl ProjectionRow {
    /// First non-finite field, if any
    fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("revenue", self.revenue),
            ("ebit", self.ebit),
            ("nopat", self.nopat),
            ("free_cash_flow", self.free_cash_flow),
            ("discount_factor", self.discount_factor),
            ("present_value", self.present_value),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

/// Ordered projection rows, year 1 first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    /// Revenue of year 0
    pub base_revenue: f64,
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionTable {
    pub fn new(base_revenue: f64) -> Self {
        Self {
            base_revenue,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    /// Last projected year, the base of the terminal value
    pub fn final_row(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }

    /// Rejects tables whose arithmetic overflowed or produced NaN
    pub fn check_finite(&self) -> Result<(), ValuationError> {
        for row in &self.rows {
            if let Some(field) = row.non_finite_field() {
                return Err(ValuationError::invalid(
                    "base_revenue",
                    format!("year {} {} is not finite", row.year, field),
                ));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of discounted free cash flows over the projection horizon
    pub fn pv_forecast_period(&self) -> f64 {
        self.rows.iter().map(|r| r.present_value).sum()
    }

    /// Revenue series including year 0, for charting
    pub fn revenue_path(&self) -> Vec<f64> {
        std::iter::once(self.base_revenue)
            .chain(self.rows.iter().map(|r| r.revenue))
            .collect()
    }

    /// Compound annual revenue growth from year 0 to the final year
    pub fn revenue_cagr(&self) -> Option<f64> {
        let last = self.final_row()?;
        if self.base_revenue <= 0.0 {
            return None;
        }
        Some((last.revenue / self.base_revenue).powf(1.0 / last.year as f64) - 1.0)
    }
}

/// Gordon growth terminal value and its present value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalValue {
    pub value: f64,
    pub present_value: f64,
}

/// One bar of the enterprise value waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub label: String,
    pub value: f64,
}

/// Complete valuation of one assumption set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub projection: ProjectionTable,
    pub terminal: TerminalValue,
    /// Sum of discounted projected free cash flows
    pub pv_forecast_period: f64,
    pub enterprise_value: f64,
}

impl ValuationResult {
    /// Share of enterprise value coming from the terminal value
    pub fn terminal_value_share(&self) -> f64 {
        self.terminal.present_value / self.enterprise_value
    }

    /// Share of enterprise value coming from the explicit forecast
    pub fn forecast_share(&self) -> f64 {
        self.pv_forecast_period / self.enterprise_value
    }

    /// Waterfall steps: one per year's PV, then the terminal PV
    pub fn waterfall(&self) -> Vec<WaterfallStep> {
        self.projection
            .rows
            .iter()
            .map(|r| WaterfallStep {
                label: format!("Year {} FCF", r.year),
                value: r.present_value,
            })
            .chain(std::iter::once(WaterfallStep {
                label: "Terminal Value".to_string(),
                value: self.terminal.present_value,
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(year: u32, revenue: f64, present_value: f64) -> ProjectionRow {
        ProjectionRow {
            year,
            growth_rate: 0.0,
            revenue,
            ebit: 0.0,
            nopat: 0.0,
            free_cash_flow: 0.0,
            discount_factor: 1.0,
            present_value,
        }
    }

    #[test]
    fn test_table_summaries() {
        let mut table = ProjectionTable::new(100.0);
        assert!(table.final_row().is_none());
        assert!(table.revenue_cagr().is_none());

        table.add_row(row(1, 110.0, 10.0));
        table.add_row(row(2, 121.0, 12.5));

        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.pv_forecast_period(), 22.5);
        assert_eq!(table.revenue_path(), vec![100.0, 110.0, 121.0]);
        assert_relative_eq!(table.revenue_cagr().unwrap(), 0.10, epsilon = 1e-12);
        assert!(table.check_finite().is_ok());
    }

    #[test]
    fn test_check_finite_names_year_and_field() {
        let mut table = ProjectionTable::new(100.0);
        table.add_row(row(1, 110.0, 10.0));
        table.add_row(row(2, f64::INFINITY, f64::NAN));

        let err = table.check_finite().unwrap_err();
        assert_eq!(err.field(), "base_revenue");
        assert!(err.to_string().contains("year 2 revenue"));
    }

    #[test]
    fn test_waterfall_order() {
        let mut projection = ProjectionTable::new(100.0);
        projection.add_row(row(1, 110.0, 10.0));
        projection.add_row(row(2, 121.0, 12.0));
        let result = ValuationResult {
            projection,
            terminal: TerminalValue {
                value: 150.0,
                present_value: 78.0,
            },
            pv_forecast_period: 22.0,
            enterprise_value: 100.0,
        };

        let steps = result.waterfall();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].label, "Year 1 FCF");
        assert_eq!(
            steps[2],
            WaterfallStep {
                label: "Terminal Value".to_string(),
                value: 78.0,
            }
        );
        let total: f64 = steps.iter().map(|s| s.value).sum();
        assert_relative_eq!(total, result.enterprise_value);
        assert_relative_eq!(result.terminal_value_share(), 0.78);
        assert_relative_eq!(result.forecast_share(), 0.22);
    }
}
