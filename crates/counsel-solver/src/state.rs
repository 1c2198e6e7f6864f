//! Decision state and paradox zones.

use crate::config::SolverConfig;
use counsel_gates::ConsentTicket;
use counsel_kernel::WillOperator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How close the state sits to a detected paradox.
///
/// Crossing a zone boundary tightens the coherence floor and may require
/// a reversible micro-move or repair horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParadoxZone {
    /// No paradox in sight.
    Normal,
    /// Near a detected paradox.
    ParadoxNear,
    /// Very close to paradox, inside the apophatic margin.
    ApophaticMargin,
}

/// The state a decision is evaluated in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionState {
    /// Context map: topic, session, consent information.
    pub context: Value,
    /// Pipeline stage tag, e.g. `S5`.
    pub stage: String,
    /// Active will operator.
    pub will: WillOperator,
    /// Consent tickets attached to the state.
    pub consent_tickets: Vec<ConsentTicket>,
    /// Estimated proximity to logical/ethical/ontological paradox, 0..1.
    pub paradox_proximity: f64,
}

impl DecisionState {
    /// Creates a state with empty context, no tickets, zero proximity.
    pub fn new(stage: impl Into<String>, will: WillOperator) -> Self {
        Self {
            context: Value::Object(Default::default()),
            stage: stage.into(),
            will,
            consent_tickets: Vec::new(),
            paradox_proximity: 0.0,
        }
    }

    /// Replaces the context map.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    /// Attaches consent tickets.
    pub fn with_tickets(mut self, tickets: Vec<ConsentTicket>) -> Self {
        self.consent_tickets = tickets;
        self
    }

    /// Sets the paradox proximity estimate.
    pub fn with_paradox_proximity(mut self, proximity: f64) -> Self {
        self.paradox_proximity = proximity.clamp(0.0, 1.0);
        self
    }

    /// The paradox zone this state falls in under the given thresholds.
    pub fn zone(&self, config: &SolverConfig) -> ParadoxZone {
        if self.paradox_proximity >= config.apophatic_margin_threshold {
            ParadoxZone::ApophaticMargin
        } else if self.paradox_proximity >= config.paradox_near_threshold {
            ParadoxZone::ParadoxNear
        } else {
            ParadoxZone::Normal
        }
    }

    /// Whether the state is near a paradox at all.
    pub fn paradox_nearby(&self, config: &SolverConfig) -> bool {
        self.zone(config) != ParadoxZone::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_thresholds() {
        let config = SolverConfig::default();
        let state = DecisionState::new("S5", WillOperator::Expansion);
        assert_eq!(state.zone(&config), ParadoxZone::Normal);

        let near = state.clone().with_paradox_proximity(0.6);
        assert_eq!(near.zone(&config), ParadoxZone::ParadoxNear);
        assert!(near.paradox_nearby(&config));

        let margin = state.with_paradox_proximity(0.9);
        assert_eq!(margin.zone(&config), ParadoxZone::ApophaticMargin);
    }

    #[test]
    fn test_proximity_clamped() {
        let state = DecisionState::new("S1", WillOperator::Negation).with_paradox_proximity(7.0);
        assert_eq!(state.paradox_proximity, 1.0);
    }

    #[test]
    fn test_zone_ordering() {
        assert!(ParadoxZone::Normal < ParadoxZone::ParadoxNear);
        assert!(ParadoxZone::ParadoxNear < ParadoxZone::ApophaticMargin);
    }
}
