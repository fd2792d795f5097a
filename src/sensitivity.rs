//! WACC x terminal growth sensitivity grid
//!
//! Each cell re-runs the full valuation with the pair substituted into the
//! base assumptions. Cells where the Gordon growth denominator is not
//! positive are left undefined rather than filled with a meaningless value.

use crate::assumptions::{check_terminal_rates, Assumptions};
use crate::error::ValuationError;
use crate::projection::enterprise_value;
use serde::{Deserialize, Serialize};

/// Ordered sequence of rates along one grid axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRange {
    values: Vec<f64>,
}

impl SensitivityRange {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// `count` evenly spaced values from `start` to `end` inclusive
    pub fn linspace(start: f64, end: f64, count: usize) -> Self {
        let values = match count {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f64;
                (0..n).map(|i| start + step * i as f64).collect()
            }
        };
        Self { values }
    }

    /// `base` plus and minus `steps` increments of `step` (2 * steps + 1 values)
    pub fn centered(base: f64, step: f64, steps: usize) -> Self {
        let steps = steps as i64;
        let values = (-steps..=steps).map(|k| base + step * k as f64).collect();
        Self { values }
    }

    /// Dashboard default discount rate axis: 6% to 14% in 1% steps
    pub fn default_wacc() -> Self {
        Self::linspace(0.06, 0.14, 9)
    }

    /// Dashboard default terminal growth axis: 2% to 5% in 0.5% steps
    pub fn default_terminal_growth() -> Self {
        Self::linspace(0.02, 0.05, 7)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Matrix of enterprise values; rows follow the WACC axis, columns the growth axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub wacc_values: Vec<f64>,
    pub growth_values: Vec<f64>,
    /// `None` where the pair admits no valuation
    pub cells: Vec<Vec<Option<f64>>>,
}

impl SensitivityGrid {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.wacc_values.len(), self.growth_values.len())
    }

    /// Enterprise value at (row, col), or the reason the cell is undefined.
    ///
    /// `None` when the indices fall outside the grid, like `slice::get`.
    pub fn get(&self, row: usize, col: usize) -> Option<Result<f64, ValuationError>> {
        let wacc = *self.wacc_values.get(row)?;
        let growth = *self.growth_values.get(col)?;
        let cell = *self.cells.get(row)?.get(col)?;
        Some(match cell {
            Some(ev) => Ok(ev),
            None => check_terminal_rates(wacc, growth).and_then(|()| {
                Err(ValuationError::invalid(
                    "wacc",
                    format!("no valuation for wacc {} and terminal growth {}", wacc, growth),
                ))
            }),
        })
    }

    /// Number of cells holding a value
    pub fn defined_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Smallest and largest defined enterprise values
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &ev| match acc {
                None => Some((ev, ev)),
                Some((lo, hi)) => Some((lo.min(ev), hi.max(ev))),
            })
    }
}

/// Re-value `assumptions` at every (wacc, terminal growth) pair.
///
/// Fails only when the base assumptions cannot be projected at all; pairs
/// with `wacc <= g` become undefined cells.
pub fn sensitivity_grid(
    assumptions: &Assumptions,
    wacc_range: &SensitivityRange,
    growth_range: &SensitivityRange,
) -> Result<SensitivityGrid, ValuationError> {
    // Rates are substituted per cell
    assumptions.validate_operating()?;

    let cells: Vec<Vec<Option<f64>>> = wacc_range
        .values()
        .iter()
        .map(|&wacc| {
            growth_range
                .values()
                .iter()
                .map(|&growth| {
                    enterprise_value(&assumptions.with_rates(wacc, growth))
                        .map(|result| result.enterprise_value)
                        .ok()
                })
                .collect()
        })
        .collect();

    let grid = SensitivityGrid {
        wacc_values: wacc_range.values().to_vec(),
        growth_values: growth_range.values().to_vec(),
        cells,
    };

    log::debug!(
        "sensitivity grid {:?}: {} of {} cells defined",
        grid.shape(),
        grid.defined_count(),
        grid.wacc_values.len() * grid.growth_values.len()
    );

    Ok(grid)
}

/// Relative EV change for a +/- `bump` move in WACC:
/// (EV(wacc - bump) - EV(wacc + bump)) / (2 * EV(wacc))
pub fn wacc_sensitivity(assumptions: &Assumptions, bump: f64) -> Result<f64, ValuationError> {
    let base = enterprise_value(assumptions)?.enterprise_value;
    let minus = enterprise_value(&assumptions.with_wacc(assumptions.wacc - bump))?.enterprise_value;
    let plus = enterprise_value(&assumptions.with_wacc(assumptions.wacc + bump))?.enterprise_value;
    Ok((minus - plus) / (2.0 * base))
}
