//! DCF Valuation - discounted cash flow engine for enterprise valuation
//!
//! This library provides:
//! - Five-year revenue / EBIT / NOPAT / free cash flow projections
//! - Gordon growth terminal value and enterprise value
//! - WACC x terminal growth sensitivity grids
//! - Valuation diagnostics and parallel batch valuation

pub mod assumptions;
pub mod batch;
pub mod error;
pub mod insights;
pub mod projection;
pub mod report;
pub mod sensitivity;

// Re-export commonly used types
pub use assumptions::{
    AssumptionOverrides, Assumptions, CashFlowAdjustments, GrowthSchedule, NamedAssumptions,
};
pub use error::ValuationError;
pub use insights::ValuationInsights;
pub use projection::{
    enterprise_value, project, terminal_value, DcfEngine, ProjectionRow, ProjectionTable,
    TerminalValue, ValuationResult,
};
pub use sensitivity::{sensitivity_grid, SensitivityGrid, SensitivityRange};
