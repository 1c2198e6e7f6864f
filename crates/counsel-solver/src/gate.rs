//! The paradox-gate state machine.
//!
//! Classifies the solver's output (or its absence) into a terminal
//! verdict - Answer, Refuse or Stand - by scanning an ordered,
//! configurable transition table top to bottom. The first rule whose
//! conditions fully match and whose extra requirements are satisfied
//! wins; a matching rule with unmet requirements is skipped. No match
//! defaults to Stand.

use crate::truth::TruthValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tri-state verdict of a decision instance. Terminal: this is a
/// classification, not a persistent automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Emit the chosen action as advice.
    Answer,
    /// Refuse to advise.
    Refuse,
    /// Stand: neither answer nor refuse, awaiting repair or evidence.
    Stand,
}

impl Verdict {
    /// Returns true for an Answer verdict.
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer)
    }

    /// Returns true for a Refuse verdict.
    pub fn is_refuse(&self) -> bool {
        matches!(self, Self::Refuse)
    }

    /// Returns true for a Stand verdict.
    pub fn is_stand(&self) -> bool {
        matches!(self, Self::Stand)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer => write!(f, "Answer"),
            Self::Refuse => write!(f, "Refuse"),
            Self::Stand => write!(f, "Stand"),
        }
    }
}

/// The decision-context fields a transition rule may key on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateInput {
    /// Whether the solver accepted a move.
    pub accepted: bool,
    /// Truth value of the chosen action, Neither when no action.
    pub truth: TruthValue,
    /// Consent gate outcome.
    pub consent_ok: bool,
    /// Apophatic gate outcome.
    pub apophatic_ok: bool,
    /// Whether the accepted move cleared the cost threshold.
    pub cost_ok: bool,
    /// Whether the accepted move cleared its coherence floor.
    pub coherence_ok: bool,
    /// Whether the state is near a paradox.
    pub paradox_nearby: bool,
    /// Whether the chosen action is a reversible micro-move.
    pub reversible_micro_move: bool,
    /// Whether a repair horizon is attached to the bundle.
    pub has_repair_horizon: bool,
}

/// An extra requirement a rule may impose beyond its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// The chosen action must carry a reversible micro-move flag.
    ReversibleMicroMove,
    /// The bundle must carry a repair horizon.
    RepairHorizon,
}

impl Requirement {
    fn satisfied(&self, input: &GateInput) -> bool {
        match self {
            Self::ReversibleMicroMove => input.reversible_micro_move,
            Self::RepairHorizon => input.has_repair_horizon,
        }
    }
}

/// Conditions of one transition rule; `None` fields are wildcards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Required truth value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truth: Option<TruthValue>,
    /// Required acceptance state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    /// Required consent outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_ok: Option<bool>,
    /// Required apophatic outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apophatic_ok: Option<bool>,
    /// Required cost-threshold outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_ok: Option<bool>,
    /// Required coherence-floor outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherence_ok: Option<bool>,
    /// Required paradox proximity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paradox_nearby: Option<bool>,
}

impl RuleCondition {
    /// A condition that matches everything.
    pub fn any() -> Self {
        Self::default()
    }

    /// Requires a truth value.
    pub fn truth(mut self, truth: TruthValue) -> Self {
        self.truth = Some(truth);
        self
    }

    /// Requires an acceptance state.
    pub fn accepted(mut self, accepted: bool) -> Self {
        self.accepted = Some(accepted);
        self
    }

    /// Requires a consent outcome.
    pub fn consent_ok(mut self, ok: bool) -> Self {
        self.consent_ok = Some(ok);
        self
    }

    /// Requires an apophatic outcome.
    pub fn apophatic_ok(mut self, ok: bool) -> Self {
        self.apophatic_ok = Some(ok);
        self
    }

    /// Requires a paradox-proximity state.
    pub fn paradox_nearby(mut self, nearby: bool) -> Self {
        self.paradox_nearby = Some(nearby);
        self
    }

    /// Whether every set field matches the input.
    pub fn matches(&self, input: &GateInput) -> bool {
        fn check<T: PartialEq>(want: &Option<T>, have: T) -> bool {
            match want {
                Some(v) => *v == have,
                None => true,
            }
        }
        check(&self.truth, input.truth)
            && check(&self.accepted, input.accepted)
            && check(&self.consent_ok, input.consent_ok)
            && check(&self.apophatic_ok, input.apophatic_ok)
            && check(&self.cost_ok, input.cost_ok)
            && check(&self.coherence_ok, input.coherence_ok)
            && check(&self.paradox_nearby, input.paradox_nearby)
    }
}

/// One rule of the transition table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Conditions that must all hold.
    pub when: RuleCondition,
    /// Verdict issued when the rule fires.
    pub verdict: Verdict,
    /// Extra requirements; unmet requirements skip the rule.
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl TransitionRule {
    /// Creates a rule without extra requirements.
    pub fn new(when: RuleCondition, verdict: Verdict) -> Self {
        Self {
            when,
            verdict,
            requires: Vec::new(),
        }
    }

    /// Adds a requirement.
    pub fn requiring(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }
}

/// The ordered transition table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateTable {
    /// Rules scanned top to bottom.
    pub rules: Vec<TransitionRule>,
}

impl Default for GateTable {
    fn default() -> Self {
        Self::baseline()
    }
}

impl GateTable {
    /// Builds a table from explicit rules.
    pub fn new(rules: Vec<TransitionRule>) -> Self {
        Self { rules }
    }

    /// The baseline semantics used before configuration override.
    ///
    /// No accepted action: Refuse if consent or apophatic failed, else
    /// Stand. Truth F refuses, N stands. An accepted T or B move
    /// answers; near a paradox the answer additionally requires a
    /// reversible micro-move and a repair horizon, falling through to
    /// the Stand default otherwise.
    pub fn baseline() -> Self {
        use Requirement::{RepairHorizon, ReversibleMicroMove};
        Self::new(vec![
            TransitionRule::new(
                RuleCondition::any().accepted(false).consent_ok(false),
                Verdict::Refuse,
            ),
            TransitionRule::new(
                RuleCondition::any().accepted(false).apophatic_ok(false),
                Verdict::Refuse,
            ),
            TransitionRule::new(RuleCondition::any().accepted(false), Verdict::Stand),
            TransitionRule::new(RuleCondition::any().truth(TruthValue::False), Verdict::Refuse),
            TransitionRule::new(
                RuleCondition::any().truth(TruthValue::Neither),
                Verdict::Stand,
            ),
            TransitionRule::new(
                RuleCondition::any()
                    .truth(TruthValue::True)
                    .accepted(true)
                    .paradox_nearby(true),
                Verdict::Answer,
            )
            .requiring(ReversibleMicroMove)
            .requiring(RepairHorizon),
            TransitionRule::new(
                RuleCondition::any()
                    .truth(TruthValue::Both)
                    .accepted(true)
                    .paradox_nearby(true),
                Verdict::Answer,
            )
            .requiring(ReversibleMicroMove)
            .requiring(RepairHorizon),
            TransitionRule::new(
                RuleCondition::any()
                    .truth(TruthValue::True)
                    .accepted(true)
                    .paradox_nearby(false),
                Verdict::Answer,
            ),
            TransitionRule::new(
                RuleCondition::any()
                    .truth(TruthValue::Both)
                    .accepted(true)
                    .paradox_nearby(false),
                Verdict::Answer,
            ),
        ])
    }

    /// Scans the table and returns the first firing rule's verdict,
    /// defaulting to Stand.
    pub fn evaluate(&self, input: &GateInput) -> Verdict {
        for rule in &self.rules {
            if !rule.when.matches(input) {
                continue;
            }
            if rule.requires.iter().all(|r| r.satisfied(input)) {
                return rule.verdict;
            }
            // Matching rule with unmet requirements: fall through.
        }
        Verdict::Stand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> GateInput {
        GateInput {
            accepted: true,
            truth: TruthValue::True,
            consent_ok: true,
            apophatic_ok: true,
            cost_ok: true,
            coherence_ok: true,
            paradox_nearby: false,
            reversible_micro_move: false,
            has_repair_horizon: false,
        }
    }

    #[test]
    fn test_accepted_true_move_answers() {
        assert_eq!(GateTable::baseline().evaluate(&input()), Verdict::Answer);
    }

    #[test]
    fn test_dialetheic_move_answers() {
        let mut i = input();
        i.truth = TruthValue::Both;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Answer);
    }

    #[test]
    fn test_false_refuses() {
        let mut i = input();
        i.truth = TruthValue::False;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Refuse);
    }

    #[test]
    fn test_neither_stands() {
        let mut i = input();
        i.truth = TruthValue::Neither;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Stand);
    }

    #[test]
    fn test_no_action_with_failed_consent_refuses() {
        let mut i = input();
        i.accepted = false;
        i.truth = TruthValue::Neither;
        i.consent_ok = false;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Refuse);
    }

    #[test]
    fn test_no_action_with_clean_gates_stands() {
        let mut i = input();
        i.accepted = false;
        i.truth = TruthValue::Neither;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Stand);
    }

    #[test]
    fn test_paradox_near_requires_micro_move() {
        let mut i = input();
        i.paradox_nearby = true;
        i.has_repair_horizon = true;
        // No reversible micro-move: the Answer rule is skipped and the
        // scan falls through to the Stand default.
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Stand);

        i.reversible_micro_move = true;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Answer);
    }

    #[test]
    fn test_paradox_near_requires_repair_horizon() {
        let mut i = input();
        i.paradox_nearby = true;
        i.reversible_micro_move = true;
        assert_eq!(GateTable::baseline().evaluate(&i), Verdict::Stand);
    }

    #[test]
    fn test_custom_table_first_match_wins() {
        let table = GateTable::new(vec![
            TransitionRule::new(RuleCondition::any(), Verdict::Refuse),
            TransitionRule::new(RuleCondition::any(), Verdict::Answer),
        ]);
        assert_eq!(table.evaluate(&input()), Verdict::Refuse);
    }

    #[test]
    fn test_empty_table_defaults_to_stand() {
        let table = GateTable::new(Vec::new());
        assert_eq!(table.evaluate(&input()), Verdict::Stand);
    }

    #[test]
    fn test_table_serializes() {
        let json = serde_json::to_string(&GateTable::baseline()).unwrap();
        let parsed: GateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rules.len(), GateTable::baseline().rules.len());
    }
}
