//! Solver thresholds and the repair-horizon bounds.

use counsel_kernel::KernelClamp;
use serde::{Deserialize, Serialize};

/// Coherence floors per paradox zone. The floor tightens as the state
/// approaches paradox.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoherenceFloors {
    /// Floor with no paradox in sight. Default 0.55.
    pub normal: f64,
    /// Floor near a detected paradox. Default 0.60.
    pub paradox_near: f64,
    /// Floor inside the apophatic margin. Default 0.62.
    pub apophatic_margin: f64,
}

impl Default for CoherenceFloors {
    fn default() -> Self {
        Self {
            normal: 0.55,
            paradox_near: 0.60,
            apophatic_margin: 0.62,
        }
    }
}

/// Solver configuration, loaded once and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// A move is accepted only if its raw cost is strictly below this.
    /// Default -0.05: the cost must be a net improvement.
    pub move_threshold: f64,
    /// Coherence floors per paradox zone.
    pub floors: CoherenceFloors,
    /// Paradox proximity at which the state counts as paradox-near.
    /// Default 0.5.
    pub paradox_near_threshold: f64,
    /// Paradox proximity at which the state enters the apophatic margin.
    /// Default 0.8.
    pub apophatic_margin_threshold: f64,
    /// Kernel weight clamp bounds.
    pub clamp: KernelClamp,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            move_threshold: -0.05,
            floors: CoherenceFloors::default(),
            paradox_near_threshold: 0.5,
            apophatic_margin_threshold: 0.8,
            clamp: KernelClamp::default(),
        }
    }
}

impl SolverConfig {
    /// The coherence floor for a zone.
    pub fn floor_for(&self, zone: crate::state::ParadoxZone) -> f64 {
        match zone {
            crate::state::ParadoxZone::Normal => self.floors.normal,
            crate::state::ParadoxZone::ParadoxNear => self.floors.paradox_near,
            crate::state::ParadoxZone::ApophaticMargin => self.floors.apophatic_margin,
        }
    }

    /// Rejects malformed thresholds. Gate-affecting values never fall
    /// back to silent defaults.
    pub fn validate(&self) -> Result<(), String> {
        if !self.move_threshold.is_finite() {
            return Err("move threshold must be finite".to_string());
        }
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        let f = &self.floors;
        if !unit(f.normal) || !unit(f.paradox_near) || !unit(f.apophatic_margin) {
            return Err("coherence floors must be in [0, 1]".to_string());
        }
        if f.normal > f.paradox_near || f.paradox_near > f.apophatic_margin {
            return Err("coherence floors must tighten toward paradox".to_string());
        }
        if !unit(self.paradox_near_threshold)
            || !unit(self.apophatic_margin_threshold)
            || self.paradox_near_threshold > self.apophatic_margin_threshold
        {
            return Err("paradox zone thresholds must be ordered within [0, 1]".to_string());
        }
        self.clamp.validate().map_err(|e| e.to_string())
    }
}

/// Bounds for the repair horizon attached near paradox.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RepairHorizonConfig {
    /// Shortest allowed horizon, in days. Default 1.
    pub min_days: f64,
    /// Longest allowed horizon, in days. Default 14.
    pub max_days: f64,
    /// Horizon to attach, clamped into [min, max]. Default 14.
    pub days: f64,
}

impl Default for RepairHorizonConfig {
    fn default() -> Self {
        Self {
            min_days: 1.0,
            max_days: 14.0,
            days: 14.0,
        }
    }
}

impl RepairHorizonConfig {
    /// The recheck deadline for a decision stamped at `now`.
    pub fn horizon_after(&self, now: f64) -> f64 {
        now + self.days.clamp(self.min_days, self.max_days) * 86_400.0
    }

    /// Rejects inverted or non-positive bounds.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_days.is_finite() && self.max_days.is_finite() && self.days.is_finite()) {
            return Err("repair horizon days must be finite".to_string());
        }
        if self.min_days <= 0.0 || self.min_days > self.max_days {
            return Err("repair horizon bounds must satisfy 0 < min <= max".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(RepairHorizonConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_floors_rejected() {
        let mut config = SolverConfig::default();
        config.floors.normal = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zone_thresholds_must_be_ordered() {
        let mut config = SolverConfig::default();
        config.paradox_near_threshold = 0.9;
        config.apophatic_margin_threshold = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_horizon_clamped_into_bounds() {
        let config = RepairHorizonConfig {
            min_days: 1.0,
            max_days: 14.0,
            days: 30.0,
        };
        let now = 1_700_000_000.0;
        assert_eq!(config.horizon_after(now), now + 14.0 * 86_400.0);
    }

    #[test]
    fn test_bad_horizon_bounds_rejected() {
        let config = RepairHorizonConfig {
            min_days: 5.0,
            max_days: 2.0,
            days: 3.0,
        };
        assert!(config.validate().is_err());
    }
}
