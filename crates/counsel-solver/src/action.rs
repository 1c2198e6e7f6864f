//! Candidate actions.

use crate::truth::TruthValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A candidate action under consideration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Action identifier.
    pub id: String,
    /// What the action does; becomes the answer text if chosen.
    pub description: String,
    /// Free-form attributes read by the kernels and models.
    pub params: Value,
    /// Whether the action can be undone.
    pub reversible: bool,
    /// Predicted truth value of the action's claim.
    pub predicted_truth: TruthValue,
}

impl Action {
    /// Creates a reversible action predicted true, with empty params.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            params: Value::Object(Default::default()),
            reversible: true,
            predicted_truth: TruthValue::True,
        }
    }

    /// Replaces the parameter map.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Sets reversibility.
    pub fn with_reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Sets the predicted truth value.
    pub fn with_truth(mut self, truth: TruthValue) -> Self {
        self.predicted_truth = truth;
        self
    }

    /// Whether the action is flagged as a reversible micro-move.
    pub fn is_reversible_micro_move(&self) -> bool {
        self.params
            .get("reversible_micro_move")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let action = Action::new("a1", "run a pilot");
        assert!(action.reversible);
        assert_eq!(action.predicted_truth, TruthValue::True);
        assert!(!action.is_reversible_micro_move());
    }

    #[test]
    fn test_micro_move_flag() {
        let action = Action::new("a1", "toggle flag for 1% cohort")
            .with_params(json!({"reversible_micro_move": true}));
        assert!(action.is_reversible_micro_move());
    }
}
