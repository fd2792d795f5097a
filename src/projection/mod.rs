//! Five-year DCF projection, terminal value and enterprise value

mod discount;
mod engine;
mod rows;

pub use discount::DiscountRate;
pub use engine::{enterprise_value, project, terminal_value, DcfEngine};
pub use rows::{ProjectionRow, ProjectionTable, TerminalValue, ValuationResult, WaterfallStep};
