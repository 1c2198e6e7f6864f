//! Unified configuration for the decision core.
//!
//! Loaded once at process start, validated, and treated as read-only
//! for the process lifetime. Components receive it by reference at
//! construction; there are no hidden process-wide singletons and no
//! mid-decision reloads.

use counsel_gates::{ApophaticPolicy, ConsentScope};
use counsel_kernel::KernelClamp;
use counsel_proofs::PipelineConfig;
use counsel_solver::{GateTable, RepairHorizonConfig, SolverConfig};
use serde::{Deserialize, Serialize};

/// Configuration for the counsel decision facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounselConfig {
    /// Apophatic key sets.
    pub apophatic: ApophaticPolicy,
    /// Scope consent must cover; `None` accepts any valid ticket.
    pub target_scope: Option<ConsentScope>,
    /// Proof pipeline thresholds.
    pub pipeline: PipelineConfig,
    /// Solver thresholds, floors and kernel clamp.
    pub solver: SolverConfig,
    /// Ordered paradox-gate transition rules.
    pub gate_rules: GateTable,
    /// Repair-horizon bounds for paradox-near decisions.
    pub repair: RepairHorizonConfig,
    /// Whether every Answer is mirrored through the shadow twin.
    pub twin_check: bool,
}

impl Default for CounselConfig {
    fn default() -> Self {
        Self {
            apophatic: ApophaticPolicy::default(),
            target_scope: None,
            pipeline: PipelineConfig::default(),
            solver: SolverConfig::default(),
            gate_rules: GateTable::baseline(),
            repair: RepairHorizonConfig::default(),
            twin_check: true,
        }
    }
}

impl CounselConfig {
    /// Validates every threshold. Gate-affecting values are never
    /// silently defaulted; a malformed configuration is fatal.
    pub fn validate(&self) -> Result<(), String> {
        self.pipeline.validate()?;
        self.solver.validate()?;
        self.repair.validate()?;
        Ok(())
    }

    /// The kernel clamp in force.
    pub fn clamp(&self) -> &KernelClamp {
        &self.solver.clamp
    }
}
