//! The minimal-clean-move solver.
//!
//! Lexicographic selection: minimize effective cost (raw cost shaped by
//! the will kernel), break ties by higher coherence, then by lower raw
//! cost. The winner must clear both the negative move threshold and the
//! zone-dependent coherence floor, or no move is made.

use crate::action::Action;
use crate::config::SolverConfig;
use crate::models::{CoherenceModel, CoherenceWeights, CostModel};
use crate::state::DecisionState;
use counsel_kernel::{weight_for, ActionProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Scores for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Index into the candidate slice.
    pub index: usize,
    /// Raw cost from the cost model.
    pub raw_cost: f64,
    /// Kernel weight applied to the raw cost.
    pub kernel_weight: f64,
    /// `raw_cost * kernel_weight`.
    pub effective_cost: f64,
    /// Coherence score in [0, 1].
    pub coherence: f64,
}

/// The accepted minimal clean move.
#[derive(Debug, Clone)]
pub struct SelectedMove {
    /// The chosen action.
    pub action: Action,
    /// Raw cost of the chosen action.
    pub raw_cost: f64,
    /// Effective (kernel-shaped) cost.
    pub effective_cost: f64,
    /// Coherence score.
    pub coherence: f64,
}

/// Lexicographic minimal-clean-move solver.
pub struct MoveSolver {
    cost: Box<dyn CostModel>,
    coherence: Box<dyn CoherenceModel>,
    weights: CoherenceWeights,
    config: SolverConfig,
}

impl MoveSolver {
    /// Creates a solver over the given models.
    pub fn new(
        config: SolverConfig,
        cost: Box<dyn CostModel>,
        coherence: Box<dyn CoherenceModel>,
    ) -> Self {
        Self {
            cost,
            coherence,
            weights: CoherenceWeights::default(),
            config,
        }
    }

    /// Replaces the coherence component weights.
    pub fn with_weights(mut self, weights: CoherenceWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The solver's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Scores every candidate.
    ///
    /// A candidate whose cost model fails, or whose cost is not finite,
    /// is excluded conservatively; a failing coherence model degrades to
    /// a coherence of 0.0, which no floor accepts.
    pub fn score(&self, state: &DecisionState, candidates: &[Action]) -> Vec<ScoredCandidate> {
        let paradox_nearby = state.paradox_nearby(&self.config);
        let mut scored = Vec::with_capacity(candidates.len());

        for (index, action) in candidates.iter().enumerate() {
            let raw_cost = match self.cost.cost(state, action) {
                Ok(cost) if cost.is_finite() => cost,
                Ok(cost) => {
                    warn!(action = %action.id, cost, "non-finite cost, candidate excluded");
                    continue;
                }
                Err(e) => {
                    warn!(action = %action.id, error = %e, "cost model failed, candidate excluded");
                    continue;
                }
            };

            let profile = ActionProfile::from_params(&action.params, action.reversible);
            let kernel_weight =
                weight_for(state.will, &profile, paradox_nearby, &self.config.clamp);

            let coherence = match self.coherence.coherence(state, action, &self.weights) {
                Ok(score) => score.clamp(0.0, 1.0),
                Err(e) => {
                    warn!(action = %action.id, error = %e, "coherence model failed, degrading to 0");
                    0.0
                }
            };

            scored.push(ScoredCandidate {
                index,
                raw_cost,
                kernel_weight,
                effective_cost: raw_cost * kernel_weight,
                coherence,
            });
        }

        scored
    }

    /// Selects the minimal clean move, if any candidate qualifies.
    pub fn select(&self, state: &DecisionState, candidates: &[Action]) -> Option<SelectedMove> {
        let scored = self.score(state, candidates);
        if scored.is_empty() {
            return None;
        }

        let floor = self.config.floor_for(state.zone(&self.config));

        // Lexicographic best: effective cost, then coherence, then raw cost.
        let best = scored.iter().fold(None::<&ScoredCandidate>, |best, c| {
            match best {
                None => Some(c),
                Some(b) if Self::precedes(c, b) => Some(c),
                Some(b) => Some(b),
            }
        })?;

        if best.raw_cost < self.config.move_threshold && best.coherence >= floor {
            debug!(index = best.index, cost = best.effective_cost, "move accepted");
            return Some(self.resolve(best, candidates));
        }

        if best.raw_cost >= self.config.move_threshold {
            debug!("no candidate clears the move threshold");
            return None;
        }

        // The top pick cleared cost but missed the floor: retry among all
        // cost-clearing candidates, most coherent first.
        let mut viable: Vec<&ScoredCandidate> = scored
            .iter()
            .filter(|c| c.raw_cost < self.config.move_threshold)
            .collect();
        viable.sort_by(|a, b| {
            b.coherence
                .partial_cmp(&a.coherence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.raw_cost
                        .partial_cmp(&b.raw_cost)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });
        let fallback = viable.into_iter().find(|c| c.coherence >= floor)?;
        debug!(index = fallback.index, "coherence fallback accepted");
        Some(self.resolve(fallback, candidates))
    }

    /// Whether `a` beats `b` in the lexicographic order.
    fn precedes(a: &ScoredCandidate, b: &ScoredCandidate) -> bool {
        if a.effective_cost != b.effective_cost {
            return a.effective_cost < b.effective_cost;
        }
        if a.coherence != b.coherence {
            return a.coherence > b.coherence;
        }
        a.raw_cost < b.raw_cost
    }

    fn resolve(&self, scored: &ScoredCandidate, candidates: &[Action]) -> SelectedMove {
        SelectedMove {
            action: candidates[scored.index].clone(),
            raw_cost: scored.raw_cost,
            effective_cost: scored.effective_cost,
            coherence: scored.coherence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelError, Result as ModelResult};
    use counsel_kernel::WillOperator;
    use serde_json::{json, Value};

    /// Test model reading cost and coherence straight from params.
    struct DeclaredModel;

    impl CostModel for DeclaredModel {
        fn cost(&self, _state: &DecisionState, action: &Action) -> ModelResult<f64> {
            match action.params.get("cost").and_then(Value::as_f64) {
                Some(cost) => Ok(cost),
                None => Err(ModelError::Unavailable("no declared cost".to_string())),
            }
        }
    }

    impl CoherenceModel for DeclaredModel {
        fn coherence(
            &self,
            _state: &DecisionState,
            action: &Action,
            _weights: &CoherenceWeights,
        ) -> ModelResult<f64> {
            Ok(action
                .params
                .get("coherence")
                .and_then(Value::as_f64)
                .unwrap_or(0.0))
        }
    }

    fn solver() -> MoveSolver {
        MoveSolver::new(
            SolverConfig::default(),
            Box::new(DeclaredModel),
            Box::new(DeclaredModel),
        )
    }

    fn state() -> DecisionState {
        DecisionState::new("S5", WillOperator::Potentiation)
    }

    fn candidate(id: &str, cost: f64, coherence: f64) -> Action {
        Action::new(id, format!("candidate {id}"))
            .with_params(json!({"cost": cost, "coherence": coherence}))
    }

    #[test]
    fn test_selects_lowest_effective_cost() {
        let candidates = vec![
            candidate("a", -0.20, 0.70),
            candidate("b", -0.40, 0.70),
            candidate("c", -0.10, 0.70),
        ];
        let selected = solver().select(&state(), &candidates).unwrap();
        assert_eq!(selected.action.id, "b");
    }

    #[test]
    fn test_tie_broken_by_coherence() {
        // Identical params give identical kernel weights, so effective
        // costs tie exactly.
        let candidates = vec![candidate("a", -0.30, 0.60), candidate("b", -0.30, 0.90)];
        let selected = solver().select(&state(), &candidates).unwrap();
        assert_eq!(selected.action.id, "b");
    }

    #[test]
    fn test_double_tie_broken_by_raw_cost() {
        // Shape b's raw cost lower while keeping effective cost equal by
        // differing reversibility (kernel weight 0.90 vs 1.05).
        let a = Action::new("a", "a")
            .with_reversible(true)
            .with_params(json!({"cost": -0.35, "coherence": 0.8}));
        let b = Action::new("b", "b")
            .with_reversible(false)
            .with_params(json!({"cost": -0.30, "coherence": 0.8}));
        // effective: a = -0.35 * 0.90 = -0.315, b = -0.30 * 1.05 = -0.315
        let selected = solver().select(&state(), &[a, b]).unwrap();
        assert_eq!(selected.action.id, "a");
        assert!((selected.effective_cost + 0.315).abs() < 1e-12);
    }

    #[test]
    fn test_no_candidate_clears_threshold() {
        let candidates = vec![candidate("a", -0.05, 0.9), candidate("b", 0.10, 0.9)];
        assert!(solver().select(&state(), &candidates).is_none());
    }

    #[test]
    fn test_coherence_floor_fallback() {
        // The cheapest candidate misses the floor; the runner-up clears it.
        let candidates = vec![candidate("a", -0.50, 0.30), candidate("b", -0.20, 0.70)];
        let selected = solver().select(&state(), &candidates).unwrap();
        assert_eq!(selected.action.id, "b");
    }

    #[test]
    fn test_no_move_when_floor_unreachable() {
        let candidates = vec![candidate("a", -0.50, 0.30), candidate("b", -0.20, 0.40)];
        assert!(solver().select(&state(), &candidates).is_none());
    }

    #[test]
    fn test_floor_tightens_near_paradox() {
        let candidates = vec![candidate("a", -0.30, 0.58)];
        // 0.58 clears the normal floor (0.55)...
        assert!(solver().select(&state(), &candidates).is_some());
        // ...but not the paradox-near floor (0.60).
        let near = state().with_paradox_proximity(0.6);
        assert!(solver().select(&near, &candidates).is_none());
    }

    #[test]
    fn test_failing_cost_model_excludes_candidate() {
        let no_cost = Action::new("x", "undeclared").with_params(json!({"coherence": 0.9}));
        let ok = candidate("a", -0.30, 0.70);
        let selected = solver().select(&state(), &[no_cost, ok]).unwrap();
        assert_eq!(selected.action.id, "a");
    }

    #[test]
    fn test_empty_candidate_set() {
        assert!(solver().select(&state(), &[]).is_none());
    }
}
