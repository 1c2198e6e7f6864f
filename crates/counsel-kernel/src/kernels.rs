//! The nine geometric kernels.
//!
//! Each kernel returns a multiplicative weight applied to a candidate's
//! raw cost. Weights above 1.0 penalize, below 1.0 reward. All results
//! are clamped into the configured range before use.

use crate::error::KernelError;
use crate::operator::WillOperator;
use crate::profile::ActionProfile;
use serde::{Deserialize, Serialize};

/// Clamp bounds for kernel weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KernelClamp {
    /// Lower bound, default 0.25.
    pub min: f64,
    /// Upper bound, default 4.0.
    pub max: f64,
}

impl Default for KernelClamp {
    fn default() -> Self {
        Self { min: 0.25, max: 4.0 }
    }
}

impl KernelClamp {
    /// Rejects non-finite, non-positive or inverted bounds.
    pub fn validate(&self) -> Result<(), KernelError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 || self.min > self.max
        {
            return Err(KernelError::InvalidClamp {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn apply(&self, weight: f64) -> f64 {
        weight.clamp(self.min, self.max)
    }
}

fn reversibility_bonus(profile: &ActionProfile) -> f64 {
    if profile.reversible {
        0.90
    } else {
        1.05
    }
}

fn externality_penalty(profile: &ActionProfile) -> f64 {
    if profile.externality_priced {
        // Up to -0.25 weight for full coverage.
        1.0 - 0.25 * profile.coverage.min(1.0)
    } else {
        // Unpriced scaling.
        1.20
    }
}

fn scale_penalty(scale: f64) -> f64 {
    if scale <= 1.0 {
        1.0
    } else {
        (1.0 + 0.10 * (scale - 1.0)).min(1.50)
    }
}

fn repair_bonus(profile: &ActionProfile) -> f64 {
    if profile.repair_plan {
        0.90
    } else {
        1.0
    }
}

fn aesthetic_bonus(profile: &ActionProfile) -> f64 {
    1.0 - 0.10 * profile.aesthetic_coherence.clamp(0.0, 1.0)
}

/// Negation: favor clean cuts that minimize humiliation and carry repair
/// invitations; penalize compromises that leave coercion intact.
fn inverted_tetrahedron(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    let coercion = if p.coercion_risk { 1.0 } else { 0.0 };
    (1.10 + 0.40 * coercion + 0.30 * p.humiliation_risk) * repair_bonus(p)
}

/// Potentiation: favor reversible micro-moves; discourage large
/// irreversible openings. Scale is softened to half weight.
fn spiral_sphere(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    reversibility_bonus(p) * scale_penalty(p.scale * 0.5)
}

/// Generation: reward actions with feedback loops and a fitting tending
/// cadence.
fn dual_torus(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    let loops = if p.feedback_loops { 1.0 } else { 0.0 };
    1.05 - 0.15 * loops - 0.10 * p.cadence_fit
}

/// Expansion: enforce proportional scaling; require externality pricing
/// and a rollback recipe.
fn golden_gnomon(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    let mut base = scale_penalty(p.scale) * externality_penalty(p);
    if !p.rollback_recipe {
        base *= 1.20;
    }
    base
}

/// Possession: reward custody clarity; penalize clutching and ownership
/// theater.
fn nested_dodecahedron(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    1.05 + 0.30 * p.clutching_index - 0.20 * p.custody_clarity
}

/// Consummation: prefer single-sided continuity across apparent flips;
/// penalize diffusion.
fn mobius_intersect(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    1.05 + 0.25 * p.diffusion_risk - 0.20 * p.direction_coherence
}

/// Aspiration: reward beauty that is priced and testable; block the
/// aesthetic bypass.
fn spiral_pyramid(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    let mut base = 1.05 - 0.15 * p.aesthetic_coherence;
    if !p.aesthetic_priced {
        base *= 1.15;
    }
    base
}

/// Transcension: widen the Stand radius near the apophatic boundary;
/// favor minimal, gentle moves.
fn vanishing_ellipse(p: &ActionProfile, paradox_nearby: bool) -> f64 {
    let near = p.apophatic_nearby.unwrap_or(paradox_nearby);
    let base = if near { 1.10 } else { 1.0 };
    base * reversibility_bonus(p) * aesthetic_bonus(p)
}

/// Annihilation: require clean dissolution with repair and kenosis;
/// penalize identity theater.
fn folded_voidstar(p: &ActionProfile, _paradox_nearby: bool) -> f64 {
    let mut base = 1.10 + 0.30 * p.identity_theater - 0.20 * p.kenosis_signal;
    if p.repair_plan {
        base *= 0.90;
    }
    base
}

/// Computes the kernel weight for an operator over a resolved profile.
///
/// The weight is deterministic in its inputs and clamped into the
/// configured range.
pub fn weight_for(
    operator: WillOperator,
    profile: &ActionProfile,
    paradox_nearby: bool,
    clamp: &KernelClamp,
) -> f64 {
    let raw = match operator {
        WillOperator::Negation => inverted_tetrahedron(profile, paradox_nearby),
        WillOperator::Potentiation => spiral_sphere(profile, paradox_nearby),
        WillOperator::Generation => dual_torus(profile, paradox_nearby),
        WillOperator::Expansion => golden_gnomon(profile, paradox_nearby),
        WillOperator::Possession => nested_dodecahedron(profile, paradox_nearby),
        WillOperator::Consummation => mobius_intersect(profile, paradox_nearby),
        WillOperator::Aspiration => spiral_pyramid(profile, paradox_nearby),
        WillOperator::Transcension => vanishing_ellipse(profile, paradox_nearby),
        WillOperator::Annihilation => folded_voidstar(profile, paradox_nearby),
    };
    clamp.apply(raw)
}
