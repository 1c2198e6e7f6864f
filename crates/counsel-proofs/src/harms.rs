//! Bundled harms-index collaborator.
//!
//! Records harm events and derives the index from what remains
//! unresolved: severity weighted by intentionality feeds the aggregate
//! pressure, consent- and dignity-category events feed their debts, and
//! mitigation presence feeds the reversibility score.

use crate::collaborators::{HarmIndexSnapshot, HarmPenalties, HarmsIndex, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the bundled harms recorder.
#[derive(Debug, Error)]
pub enum HarmsError {
    /// An event id was recorded twice.
    #[error("harm event already recorded: {0}")]
    DuplicateEvent(String),

    /// Resolution referenced an unknown event.
    #[error("no such harm event: {0}")]
    UnknownEvent(String),
}

/// A recorded harm, potential or actual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmEvent {
    /// Event identifier.
    pub id: String,
    /// Recording time, epoch seconds.
    pub recorded_at: f64,
    /// Who caused the harm.
    pub agent: String,
    /// Category, e.g. `informational`, `consent`, `dignity`.
    pub category: String,
    /// Severity, 0..1.
    pub severity: f64,
    /// Malice vector, 0..1.
    pub intentionality: f64,
    /// Planned mitigation steps.
    pub mitigation_steps: Vec<String>,
    /// Whether the harm has been resolved.
    pub resolved: bool,
}

/// In-memory harm-event recorder implementing [`HarmsIndex`].
#[derive(Debug, Default)]
pub struct HarmsRecorder {
    events: Mutex<BTreeMap<String, HarmEvent>>,
}

impl HarmsRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a harm event.
    pub fn record_event(&self, event: HarmEvent) -> std::result::Result<(), HarmsError> {
        let mut events = self.events.lock().expect("harms recorder poisoned");
        if events.contains_key(&event.id) {
            return Err(HarmsError::DuplicateEvent(event.id));
        }
        events.insert(event.id.clone(), event);
        Ok(())
    }

    /// Marks an event resolved. Resolution never deletes the record.
    pub fn resolve_event(&self, event_id: &str) -> std::result::Result<(), HarmsError> {
        let mut events = self.events.lock().expect("harms recorder poisoned");
        match events.get_mut(event_id) {
            Some(event) => {
                event.resolved = true;
                Ok(())
            }
            None => Err(HarmsError::UnknownEvent(event_id.to_string())),
        }
    }

    /// Number of recorded events, resolved included.
    pub fn len(&self) -> usize {
        self.events.lock().expect("harms recorder poisoned").len()
    }

    /// Whether no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HarmsIndex for HarmsRecorder {
    fn compute_index(&self) -> Result<HarmIndexSnapshot> {
        let events = self.events.lock().expect("harms recorder poisoned");
        let unresolved: Vec<&HarmEvent> = events.values().filter(|e| !e.resolved).collect();

        if unresolved.is_empty() {
            return Ok(HarmIndexSnapshot {
                h: 0.0,
                consent_debt: 0.0,
                dignity_debt: 0.0,
                reversibility_score: 1.0,
            });
        }

        let n = unresolved.len() as f64;
        let pressure: f64 = unresolved
            .iter()
            .map(|e| e.severity * (0.5 + 0.5 * e.intentionality))
            .sum::<f64>()
            / n;
        let debt = |category: &str| -> f64 {
            unresolved
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.severity)
                .sum::<f64>()
                .min(1.0)
        };
        let mitigated = unresolved
            .iter()
            .filter(|e| !e.mitigation_steps.is_empty())
            .count() as f64;

        Ok(HarmIndexSnapshot {
            h: pressure.min(1.0),
            consent_debt: debt("consent"),
            dignity_debt: debt("dignity"),
            reversibility_score: mitigated / n,
        })
    }

    fn penalties(&self, index: &HarmIndexSnapshot) -> HarmPenalties {
        HarmPenalties {
            energy_penalty: (index.h + 0.5 * index.consent_debt).min(1.0),
            grace_penalty: (index.dignity_debt + 0.25 * (1.0 - index.reversibility_score))
                .min(1.0),
        }
    }
}
