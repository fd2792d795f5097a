//! DCF valuation CLI
//!
//! Command-line interface for single valuations and sensitivity grids

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dcf_valuation::assumptions::loader::{self, DEFAULT_ASSUMPTIONS_PATH};
use dcf_valuation::report::{
    format_grid, format_valuation, write_grid_csv, write_projection_csv, ValuationReport,
};
use dcf_valuation::{
    enterprise_value, sensitivity_grid, AssumptionOverrides, Assumptions, SensitivityRange,
    ValuationInsights,
};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dcf")]
#[command(about = "Discounted cash flow valuation with sensitivity analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project five years of cash flows and compute enterprise value
    Value {
        #[command(flatten)]
        inputs: AssumptionArgs,

        /// Print the full result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Write the projection table to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Enterprise value over a WACC x terminal growth grid
    Sensitivity {
        #[command(flatten)]
        inputs: AssumptionArgs,

        #[command(flatten)]
        ranges: RangeArgs,

        /// Print the grid as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Write the grid to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Assumption sources: a JSON file (or the dashboard preset) overridden by flags
#[derive(Args, Debug)]
struct AssumptionArgs {
    /// JSON assumptions file [default: data/assumptions.json if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Current annual revenue
    #[arg(long)]
    revenue: Option<f64>,

    /// Revenue growth: one rate, or five comma-separated yearly rates
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    growth: Option<Vec<f64>>,

    #[arg(long)]
    ebit_margin: Option<f64>,

    #[arg(long)]
    tax_rate: Option<f64>,

    #[arg(long)]
    wacc: Option<f64>,

    #[arg(long)]
    terminal_growth: Option<f64>,

    /// Share of NOPAT converted to free cash flow
    #[arg(long)]
    fcf_conversion: Option<f64>,

    #[arg(long)]
    capex_pct: Option<f64>,

    #[arg(long)]
    depreciation_pct: Option<f64>,

    #[arg(long)]
    nwc_pct: Option<f64>,
}

impl AssumptionArgs {
    fn overrides(&self) -> AssumptionOverrides {
        AssumptionOverrides {
            base_revenue: self.revenue,
            growth: self.growth.clone(),
            ebit_margin: self.ebit_margin,
            tax_rate: self.tax_rate,
            wacc: self.wacc,
            terminal_growth: self.terminal_growth,
            fcf_conversion: self.fcf_conversion,
            capex_pct: self.capex_pct,
            depreciation_pct: self.depreciation_pct,
            nwc_pct: self.nwc_pct,
        }
    }

    fn resolve(&self) -> Result<Assumptions> {
        let mut assumptions =
            loader::resolve_base(self.config.as_deref(), Path::new(DEFAULT_ASSUMPTIONS_PATH))
                .context("loading assumptions")?;
        self.overrides().apply(&mut assumptions);
        Ok(assumptions)
    }
}

/// Sensitivity axes, evenly spaced and inclusive of both ends
#[derive(Args, Debug)]
struct RangeArgs {
    #[arg(long, default_value_t = 0.06)]
    wacc_min: f64,

    #[arg(long, default_value_t = 0.14)]
    wacc_max: f64,

    #[arg(long, default_value_t = 9)]
    wacc_steps: usize,

    #[arg(long, default_value_t = 0.02)]
    growth_min: f64,

    #[arg(long, default_value_t = 0.05)]
    growth_max: f64,

    #[arg(long, default_value_t = 7)]
    growth_steps: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Value {
            inputs,
            json,
            output,
        } => run_value(&inputs, json, output.as_deref()),
        Command::Sensitivity {
            inputs,
            ranges,
            json,
            output,
        } => run_sensitivity(&inputs, &ranges, json, output.as_deref()),
    }
}

fn run_value(inputs: &AssumptionArgs, json: bool, output: Option<&Path>) -> Result<()> {
    let assumptions = inputs.resolve()?;
    let result = enterprise_value(&assumptions).context("valuation failed")?;
    let insights = ValuationInsights::from_result(&assumptions, &result);

    if json {
        let report = ValuationReport::new(&assumptions, &result, &insights);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_valuation(&result));
        println!();
        println!("Insights:");
        println!(
            "  Terminal value share:  {:.1}%",
            insights.terminal_value_share * 100.0
        );
        println!("  Forecast share:        {:.1}%", insights.forecast_share * 100.0);
        if let Some(cagr) = insights.revenue_cagr {
            println!("  Revenue CAGR (5Y):     {:.2}%", cagr * 100.0);
        }
        println!(
            "  Growth path:           {:.1}% -> {:.1}%",
            insights.first_year_growth * 100.0,
            insights.final_year_growth * 100.0
        );
        match insights.wacc_sensitivity {
            Some(s) => println!("  WACC +/-1% moves EV:   +/-{:.1}%", s * 100.0),
            None => println!("  WACC +/-1% moves EV:   n/a"),
        }
        for warning in &insights.warnings {
            println!("  Warning: {}", warning.description());
        }
    }

    if let Some(path) = output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_projection_csv(&result.projection, file)?;
        println!("\nProjection written to: {}", path.display());
    }

    Ok(())
}

fn run_sensitivity(
    inputs: &AssumptionArgs,
    ranges: &RangeArgs,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let assumptions = inputs.resolve()?;
    let wacc_range = SensitivityRange::linspace(ranges.wacc_min, ranges.wacc_max, ranges.wacc_steps);
    let growth_range =
        SensitivityRange::linspace(ranges.growth_min, ranges.growth_max, ranges.growth_steps);

    let grid = sensitivity_grid(&assumptions, &wacc_range, &growth_range)
        .context("sensitivity grid failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        println!("Enterprise value sensitivity (rows: WACC, columns: terminal growth)");
        print!("{}", format_grid(&grid));
        if let Some((lo, hi)) = grid.value_range() {
            println!("\nRange: {:.1} to {:.1}", lo, hi);
        }
    }

    if let Some(path) = output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_grid_csv(&grid, file)?;
        println!("\nGrid written to: {}", path.display());
    }

    Ok(())
}
