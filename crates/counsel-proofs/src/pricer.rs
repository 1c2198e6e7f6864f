//! Bundled externality pricer over declared plan budgets.
//!
//! The real pricer is an external subsystem. This implementation derives
//! an assessment from what the plan itself declares: coverage is the
//! mean of its `budget_lines`, shortfall lines become priced negative
//! externalities, and rollback readiness is the presence of a
//! `rollback_recipe`.

use crate::collaborators::{Assessment, ExternalLine, ExternalityPricer, Result};
use serde_json::Value;

/// Prices a plan from its own declared budget lines.
#[derive(Debug, Clone)]
pub struct DeclaredPlanPricer {
    /// Budget level below which a line is priced as an externality.
    shortfall_floor: f64,
}

impl DeclaredPlanPricer {
    /// Creates a pricer with the given shortfall floor.
    pub fn new(shortfall_floor: f64) -> Self {
        Self { shortfall_floor }
    }
}

impl Default for DeclaredPlanPricer {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl ExternalityPricer for DeclaredPlanPricer {
    fn assess(&self, plan: &Value) -> Result<Assessment> {
        let lines = plan.get("budget_lines").and_then(Value::as_object);

        let mut externals = Vec::new();
        let coverage = match lines {
            Some(map) if !map.is_empty() => {
                let mut total = 0.0;
                for (name, value) in map {
                    let level = value.as_f64().unwrap_or(0.0).clamp(0.0, 1.0);
                    total += level;
                    if level < self.shortfall_floor {
                        externals.push(ExternalLine {
                            id: format!("budget:{}", name),
                            description: format!("under-budgeted {} line", name),
                            kind: "negative".to_string(),
                            magnitude: -(self.shortfall_floor - level),
                            likelihood: 1.0 - level,
                        });
                    }
                }
                total / map.len() as f64
            }
            // No declared budget: fall back to an explicit coverage field,
            // else unknown coverage is zero and fails the gate.
            _ => plan.get("coverage").and_then(Value::as_f64).unwrap_or(0.0),
        };

        let rollback_ready = match plan.get("rollback_recipe") {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) | None => false,
            Some(_) => true,
        };

        Ok(Assessment {
            coverage,
            rollback_ready,
            externals,
        })
    }
}
