//! CSV and console output for valuations, grids and batches

use crate::assumptions::Assumptions;
use crate::batch::BatchOutcome;
use crate::insights::ValuationInsights;
use crate::projection::{ProjectionTable, ValuationResult, WaterfallStep};
use crate::sensitivity::SensitivityGrid;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// Everything `dcf value --json` prints, including the chart series
#[derive(Debug, Serialize)]
pub struct ValuationReport<'a> {
    pub assumptions: &'a Assumptions,
    pub result: &'a ValuationResult,
    pub insights: &'a ValuationInsights,
    /// Revenue from year 0 through the final projected year
    pub revenue_path: Vec<f64>,
    /// PV contributions that sum to enterprise value
    pub waterfall: Vec<WaterfallStep>,
}

impl<'a> ValuationReport<'a> {
    pub fn new(
        assumptions: &'a Assumptions,
        result: &'a ValuationResult,
        insights: &'a ValuationInsights,
    ) -> Self {
        Self {
            assumptions,
            result,
            insights,
            revenue_path: result.projection.revenue_path(),
            waterfall: result.waterfall(),
        }
    }
}

/// Write one CSV row per projected year
pub fn write_projection_csv<W: Write>(table: &ProjectionTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &table.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the grid with terminal growth values as the header row and one
/// row per WACC value. Undefined cells are left empty.
pub fn write_grid_csv<W: Write>(grid: &SensitivityGrid, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["wacc".to_string()];
    header.extend(grid.growth_values.iter().map(|g| format!("{:.6}", g)));
    wtr.write_record(&header)?;

    for (wacc, cells) in grid.wacc_values.iter().zip(&grid.cells) {
        let mut record = vec![format!("{:.6}", wacc)];
        record.extend(
            cells
                .iter()
                .map(|cell| cell.map(|ev| format!("{:.8}", ev)).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct BatchSummaryRow<'a> {
    name: &'a str,
    enterprise_value: Option<f64>,
    pv_forecast_period: Option<f64>,
    pv_terminal_value: Option<f64>,
    error: Option<String>,
}

/// Write one summary row per batch entry
pub fn write_batch_csv<W: Write>(outcomes: &[BatchOutcome], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(result) => BatchSummaryRow {
                name: &outcome.name,
                enterprise_value: Some(result.enterprise_value),
                pv_forecast_period: Some(result.pv_forecast_period),
                pv_terminal_value: Some(result.terminal.present_value),
                error: None,
            },
            Err(err) => BatchSummaryRow {
                name: &outcome.name,
                enterprise_value: None,
                pv_forecast_period: None,
                pv_terminal_value: None,
                error: Some(err.to_string()),
            },
        };
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed-width projection table for the console
pub fn format_valuation(result: &ValuationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4} {:>8} {:>12} {:>12} {:>12} {:>12} {:>10} {:>12}",
        "Year", "Growth", "Revenue", "EBIT", "NOPAT", "FCF", "DF", "PV"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));
    for row in &result.projection.rows {
        let _ = writeln!(
            out,
            "{:>4} {:>7.2}% {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>10.6} {:>12.2}",
            row.year,
            row.growth_rate * 100.0,
            row.revenue,
            row.ebit,
            row.nopat,
            row.free_cash_flow,
            row.discount_factor,
            row.present_value,
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  PV of forecast FCF:  {:>12.2}", result.pv_forecast_period);
    let _ = writeln!(out, "  Terminal value:      {:>12.2}", result.terminal.value);
    let _ = writeln!(out, "  PV of terminal:      {:>12.2}", result.terminal.present_value);
    let _ = writeln!(out, "  Enterprise value:    {:>12.2}", result.enterprise_value);
    let _ = writeln!(out);
    let _ = writeln!(out, "Valuation waterfall:");
    for step in result.waterfall() {
        let _ = writeln!(out, "  {:<20} {:>12.2}", step.label, step.value);
    }
    out
}

/// Console rendering of the grid; undefined cells show as `n/a`
pub fn format_grid(grid: &SensitivityGrid) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>10}", "WACC \\ g");
    for g in &grid.growth_values {
        let _ = write!(out, " {:>10}", format!("{:.2}%", g * 100.0));
    }
    let _ = writeln!(out);

    for (wacc, cells) in grid.wacc_values.iter().zip(&grid.cells) {
        let _ = write!(out, "{:>10}", format!("{:.2}%", wacc * 100.0));
        for cell in cells {
            match cell {
                Some(ev) => {
                    let _ = write!(out, " {:>10.1}", ev);
                }
                None => {
                    let _ = write!(out, " {:>10}", "n/a");
                }
            }
        }
        let _ = writeln!(out);
    }
    out
}
