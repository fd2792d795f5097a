//! Parallel valuation of many independent assumption sets

use crate::assumptions::NamedAssumptions;
use crate::error::ValuationError;
use crate::projection::{enterprise_value, ValuationResult};
use rayon::prelude::*;
use serde::Serialize;

/// Valuation outcome for one named entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<ValuationResult, ValuationError>,
}

impl BatchOutcome {
    pub fn enterprise_value(&self) -> Option<f64> {
        self.result.as_ref().ok().map(|r| r.enterprise_value)
    }
}

/// Value every entry in parallel. Output order follows input order and an
/// invalid entry only affects its own outcome.
pub fn value_batch(entries: &[NamedAssumptions]) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = entries
        .par_iter()
        .map(|entry| BatchOutcome {
            name: entry.name.clone(),
            result: enterprise_value(&entry.assumptions),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        log::warn!("{} of {} batch entries failed validation", failed, outcomes.len());
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Assumptions, GrowthSchedule};

    fn named(name: &str, assumptions: Assumptions) -> NamedAssumptions {
        NamedAssumptions {
            name: name.to_string(),
            assumptions,
        }
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_errors() {
        let good = Assumptions::new(100.0, GrowthSchedule::Constant(0.10), 0.20, 0.25, 0.10, 0.03);
        let entries: Vec<_> = (0..50)
            .map(|i| {
                if i == 17 {
                    named("broken", good.with_rates(0.05, 0.06))
                } else {
                    named(&format!("co{}", i), good.with_wacc(0.08 + i as f64 * 0.001))
                }
            })
            .collect();

        let outcomes = value_batch(&entries);
        assert_eq!(outcomes.len(), 50);
        assert_eq!(outcomes[0].name, "co0");
        assert_eq!(outcomes[49].name, "co49");

        assert!(outcomes[17].result.is_err());
        assert!(outcomes[17].enterprise_value().is_none());

        for (outcome, entry) in outcomes.iter().zip(&entries) {
            if outcome.name != "broken" {
                let expected = enterprise_value(&entry.assumptions).unwrap().enterprise_value;
                assert_eq!(outcome.enterprise_value(), Some(expected));
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(value_batch(&[]).is_empty());
    }
}
