//! File-based assumption loaders
//!
//! Single valuations read a JSON document; batch runs read one company per CSV row.

use super::{Assumptions, CashFlowAdjustments, GrowthSchedule};
use crate::error::ValuationError;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default path to the assumptions document
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

/// Errors raised while reading assumptions from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON assumptions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed CSV assumptions: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] ValuationError),
}

/// An assumption set labelled with the company or scenario it describes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAssumptions {
    pub name: String,
    pub assumptions: Assumptions,
}

/// Raw CSV row for batch inputs
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    base_revenue: f64,
    growth_y1: f64,
    growth_y2: f64,
    growth_y3: f64,
    growth_y4: f64,
    growth_y5: f64,
    ebit_margin: f64,
    tax_rate: f64,
    wacc: f64,
    terminal_growth: f64,
    #[serde(default)]
    fcf_conversion: Option<f64>,
    #[serde(default)]
    capex_pct: Option<f64>,
    #[serde(default)]
    depreciation_pct: Option<f64>,
    #[serde(default)]
    nwc_pct: Option<f64>,
}

impl CsvRow {
    fn into_named(self) -> NamedAssumptions {
        let mut assumptions = Assumptions::new(
            self.base_revenue,
            GrowthSchedule::PerYear(vec![
                self.growth_y1,
                self.growth_y2,
                self.growth_y3,
                self.growth_y4,
                self.growth_y5,
            ]),
            self.ebit_margin,
            self.tax_rate,
            self.wacc,
            self.terminal_growth,
        );
        if let Some(conversion) = self.fcf_conversion {
            assumptions.fcf_conversion = conversion;
        }
        assumptions.adjustments = CashFlowAdjustments {
            capex_pct: self.capex_pct.unwrap_or(0.0),
            depreciation_pct: self.depreciation_pct.unwrap_or(0.0),
            nwc_pct: self.nwc_pct.unwrap_or(0.0),
        };

        NamedAssumptions {
            name: self.name,
            assumptions,
        }
    }
}

/// Parse and validate a JSON assumptions document
pub fn parse_json(json: &str) -> Result<Assumptions, LoadError> {
    let assumptions: Assumptions = serde_json::from_str(json)?;
    assumptions.validate_projection()?;
    Ok(assumptions)
}

/// Load a JSON assumptions document from `path`
pub fn load_json(path: &Path) -> Result<Assumptions, LoadError> {
    let mut json = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut json))
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let assumptions = parse_json(&json)?;
    log::info!("Loaded assumptions from {}", path.display());
    Ok(assumptions)
}

/// Pick the base assumption set: an explicit file, else `default_path` if it
/// exists, else the dashboard preset.
pub fn resolve_base(config: Option<&Path>, default_path: &Path) -> Result<Assumptions, LoadError> {
    match config {
        Some(path) => load_json(path),
        None if default_path.exists() => load_json(default_path),
        None => {
            log::info!("No assumptions file, using dashboard defaults");
            Ok(Assumptions::dashboard_defaults())
        }
    }
}

/// Read named assumption sets from any CSV source.
///
/// Rows are only parsed here; validation happens per entry at valuation
/// time so one bad company does not reject the whole file.
pub fn read_batch_csv<R: Read>(reader: R) -> Result<Vec<NamedAssumptions>, LoadError> {
    let mut reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        entries.push(result?.into_named());
    }

    Ok(entries)
}

/// Load named assumption sets from a CSV file at `path`
pub fn load_batch_csv(path: &Path) -> Result<Vec<NamedAssumptions>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = read_batch_csv(file)?;
    log::info!("Loaded {} assumption sets from {}", entries.len(), path.display());
    Ok(entries)
}
