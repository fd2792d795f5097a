//! Core DCF engine: yearly projection, Gordon growth terminal value, enterprise value

use super::discount::DiscountRate;
use super::rows::{ProjectionRow, ProjectionTable, TerminalValue, ValuationResult};
use crate::assumptions::{check_terminal_rates, Assumptions, PROJECTION_YEARS};
use crate::error::ValuationError;

/// Valuation engine bound to one validated assumption set
///
/// Holds no mutable state; every method recomputes from the assumptions.
#[derive(Debug, Clone)]
pub struct DcfEngine {
    assumptions: Assumptions,
    discount: DiscountRate,
}

impl DcfEngine {
    /// Validate the projection inputs and build an engine
    pub fn new(assumptions: Assumptions) -> Result<Self, ValuationError> {
        assumptions.validate_projection()?;
        let discount = DiscountRate::new(assumptions.wacc)?;
        Ok(Self {
            assumptions,
            discount,
        })
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Project revenue, EBIT, NOPAT and free cash flow for each year.
    ///
    /// Fails if the inputs are so large that the arithmetic leaves the finite range.
    pub fn project(&self) -> Result<ProjectionTable, ValuationError> {
        let table = self.build_table();
        table.check_finite()?;
        Ok(table)
    }

    fn build_table(&self) -> ProjectionTable {
        let mut table = ProjectionTable::new(self.assumptions.base_revenue);
        let mut prior_revenue = self.assumptions.base_revenue;

        for year in 1..=PROJECTION_YEARS {
            let row = self.calculate_year(year, prior_revenue);
            prior_revenue = row.revenue;
            table.add_row(row);
        }

        table
    }

    fn calculate_year(&self, year: u32, prior_revenue: f64) -> ProjectionRow {
        let a = &self.assumptions;

        let growth_rate = a.revenue_growth.rate_for_year(year);
        let revenue = prior_revenue * (1.0 + growth_rate);
        let ebit = revenue * a.ebit_margin;
        let nopat = ebit * (1.0 - a.tax_rate);
        let free_cash_flow =
            nopat * a.fcf_conversion + a.adjustments.apply(revenue, prior_revenue);

        let discount_factor = self.discount.factor(year);

        ProjectionRow {
            year,
            growth_rate,
            revenue,
            ebit,
            nopat,
            free_cash_flow,
            discount_factor,
            present_value: free_cash_flow * discount_factor,
        }
    }

    /// Full valuation: projection plus discounted terminal value
    pub fn value(&self) -> Result<ValuationResult, ValuationError> {
        let projection = self.project()?;
        let final_row = projection.final_row().ok_or_else(|| {
            ValuationError::invalid("projection_years", "projection produced no rows")
        })?;

        let terminal = terminal_value(
            final_row,
            self.assumptions.wacc,
            self.assumptions.terminal_growth,
        )?;

        let pv_forecast_period = projection.pv_forecast_period();
        let enterprise_value = pv_forecast_period + terminal.present_value;
        if !terminal.value.is_finite() || !enterprise_value.is_finite() {
            return Err(ValuationError::invalid(
                "base_revenue",
                format!("enterprise value {} is not finite", enterprise_value),
            ));
        }

        log::debug!(
            "wacc={:.4} g={:.4}: pv_forecast={:.4} pv_terminal={:.4} ev={:.4}",
            self.assumptions.wacc,
            self.assumptions.terminal_growth,
            pv_forecast_period,
            terminal.present_value,
            enterprise_value
        );

        Ok(ValuationResult {
            projection,
            terminal,
            pv_forecast_period,
            enterprise_value,
        })
    }
}

/// Project the explicit forecast years for `assumptions`
pub fn project(assumptions: &Assumptions) -> Result<ProjectionTable, ValuationError> {
    DcfEngine::new(assumptions.clone())?.project()
}

/// Gordon growth terminal value on the final projected year.
///
/// Fails unless `wacc > terminal_growth`.
pub fn terminal_value(
    final_row: &ProjectionRow,
    wacc: f64,
    terminal_growth: f64,
) -> Result<TerminalValue, ValuationError> {
    check_terminal_rates(wacc, terminal_growth)?;

    let value = final_row.free_cash_flow * (1.0 + terminal_growth) / (wacc - terminal_growth);
    Ok(TerminalValue {
        value,
        present_value: value * final_row.discount_factor,
    })
}

/// Enterprise value = discounted forecast cash flows + discounted terminal value
pub fn enterprise_value(assumptions: &Assumptions) -> Result<ValuationResult, ValuationError> {
    assumptions.validate()?;
    DcfEngine::new(assumptions.clone())?.value()
}
