//! Error types for valuation operations

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the DCF engine.
///
/// The engine never retries or partially recovers: the first invalid
/// input combination it sees is returned to the caller.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ValuationError {
    /// An assumption (or a combination of assumptions) the arithmetic cannot handle
    #[error("invalid assumption `{field}`: {reason}")]
    InvalidAssumption {
        /// Name of the offending assumption
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },
}

impl ValuationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the assumption that triggered the error
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidAssumption { field, .. } => field,
        }
    }
}
