//! # Counsel Solver
//!
//! Given a decision state and a set of candidate actions, computes each
//! candidate's effective cost (raw cost shaped by the will kernel) and
//! coherence score, then selects the least-cost, most-coherent candidate
//! subject to hard thresholds - the minimal clean move. The solver's
//! output (or its absence) is classified into Answer / Refuse / Stand by
//! an ordered, configurable paradox-gate transition table sensitive to a
//! four-valued truth model and paradox proximity.

pub mod gate;
pub mod models;

mod action;
mod config;
mod solver;
mod state;
mod truth;

pub use action::Action;
pub use config::{CoherenceFloors, RepairHorizonConfig, SolverConfig};
pub use gate::{GateInput, GateTable, Requirement, RuleCondition, TransitionRule, Verdict};
pub use models::{
    BlendCoherenceModel, CoherenceModel, CoherenceWeights, CostModel, DriftCostModel, ModelError,
};
pub use solver::{MoveSolver, ScoredCandidate, SelectedMove};
pub use state::{DecisionState, ParadoxZone};
pub use truth::TruthValue;
