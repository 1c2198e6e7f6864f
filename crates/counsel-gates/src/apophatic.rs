//! The apophatic gate.
//!
//! Rejects drafts whose context or parameters assert total, sovereign or
//! ultimate predication. Three disjoint key sets drive the check:
//!
//! - **forbidden**: presence anywhere is an immediate failure;
//! - **constrained**: when present, the value must be literally `true`
//!   or the string marker `"enforced"`;
//! - **warned**: reported but never fatal.
//!
//! Keys are matched on the final segment of their flattened dot path, so
//! nesting cannot hide them.

use crate::flatten::{flatten, leaf};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// The three key sets enforced by the apophatic gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApophaticPolicy {
    /// Keys that must never appear.
    pub forbidden: BTreeSet<String>,
    /// Keys that must be affirmed (`true` or `"enforced"`) when present.
    pub constrained: BTreeSet<String>,
    /// Keys that are flagged but tolerated.
    pub warned: BTreeSet<String>,
}

impl Default for ApophaticPolicy {
    fn default() -> Self {
        let set = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            forbidden: set(&[
                "ground_is",
                "ultimate_name",
                "final_owner",
                "sovereign_claim",
                "ground_truth",
                "completion",
            ]),
            constrained: set(&[
                "no_image",
                "no_totalization",
                "no_equivalence",
                "no_exchange",
                "no_possession",
            ]),
            warned: set(&["meta_closure", "self_grounding", "category_violation"]),
        }
    }
}

/// Outcome of an apophatic check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApophaticReport {
    /// Whether the draft is admissible.
    pub admissible: bool,
    /// Fatal findings, `forbidden:<key>` or `constraint_violation:<key>`.
    pub violations: Vec<String>,
    /// Non-fatal findings, `warning:<key>`.
    pub warnings: Vec<String>,
}

impl ApophaticReport {
    fn clean() -> Self {
        Self {
            admissible: true,
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Whether a constrained key's value counts as affirmed.
fn affirmed(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || value.as_str() == Some("enforced")
}

/// Runs the apophatic check over the union of `context` and `params`.
///
/// Both inputs are flattened to dot paths; `params` entries shadow
/// `context` entries at the same path. Matching is by the final path
/// segment, so a forbidden key buried three objects deep still fails.
pub fn check(policy: &ApophaticPolicy, context: &Value, params: &Value) -> ApophaticReport {
    let mut combined: BTreeMap<String, Value> = flatten(context);
    combined.extend(flatten(params));

    let mut report = ApophaticReport::clean();
    for (path, value) in &combined {
        let key = leaf(path);
        if policy.forbidden.contains(key) {
            report.violations.push(format!("forbidden:{}", key));
        } else if policy.constrained.contains(key) && !affirmed(value) {
            report.violations.push(format!("constraint_violation:{}", key));
        } else if policy.warned.contains(key) {
            report.warnings.push(format!("warning:{}", key));
        }
    }
    report.admissible = report.violations.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_params_admissible() {
        let policy = ApophaticPolicy::default();
        let report = check(
            &policy,
            &json!({}),
            &json!({"no_totalization": true, "no_image": "enforced", "safe_key": "value"}),
        );
        assert!(report.admissible);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_forbidden_key_fails() {
        let policy = ApophaticPolicy::default();
        let report = check(&policy, &json!({}), &json!({"ground_is": "being"}));
        assert!(!report.admissible);
        assert_eq!(report.violations, vec!["forbidden:ground_is"]);
    }

    #[test]
    fn test_constraint_must_be_affirmed() {
        let policy = ApophaticPolicy::default();
        let report = check(&policy, &json!({}), &json!({"no_totalization": false}));
        assert!(!report.admissible);
        assert_eq!(report.violations, vec!["constraint_violation:no_totalization"]);
    }

    #[test]
    fn test_enforced_marker_accepted() {
        let policy = ApophaticPolicy::default();
        let report = check(&policy, &json!({}), &json!({"no_exchange": "enforced"}));
        assert!(report.admissible);
    }

    #[test]
    fn test_nesting_cannot_hide_forbidden_key() {
        let policy = ApophaticPolicy::default();
        let report = check(
            &policy,
            &json!({}),
            &json!({"deep": {"deeper": {"ground_is": "hidden here"}}}),
        );
        assert!(!report.admissible);
        assert_eq!(report.violations, vec!["forbidden:ground_is"]);
    }

    #[test]
    fn test_context_also_inspected() {
        let policy = ApophaticPolicy::default();
        let report = check(&policy, &json!({"sovereign_claim": "mine"}), &json!({}));
        assert!(!report.admissible);
    }

    #[test]
    fn test_warning_markers_not_fatal() {
        let policy = ApophaticPolicy::default();
        let report = check(&policy, &json!({}), &json!({"meta_closure": "attempted"}));
        assert!(report.admissible);
        assert_eq!(report.warnings, vec!["warning:meta_closure"]);
    }
}
