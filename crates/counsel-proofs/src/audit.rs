//! Audit verification of proof tokens.
//!
//! Recomputes every token from its proof's (name, outcome, details)
//! triple. A mismatch indicates tampering or nondeterminism and must
//! halt the decision before any Answer is surfaced.

use crate::advice::AdviceWithProof;
use crate::proof::Proof;
use thiserror::Error;

/// Audit integrity failures. Fatal.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A recomputed token did not match the recorded one.
    #[error("proof token mismatch for '{name}': expected {expected}, recorded {recorded}")]
    TokenMismatch {
        /// Name of the failing proof.
        name: String,
        /// Token recomputed from the proof contents.
        expected: String,
        /// Token recorded on the proof.
        recorded: String,
    },
}

/// Verifies every proof token on a piece of advice.
pub fn verify(awp: &AdviceWithProof) -> Result<(), AuditError> {
    for proof in &awp.proofs {
        let expected = Proof::token_for(proof.name, proof.ok, &proof.details);
        if expected != proof.token {
            return Err(AuditError::TokenMismatch {
                name: proof.name.as_str().to_string(),
                expected,
                recorded: proof.token.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::ProofName;
    use serde_json::json;

    fn advice() -> AdviceWithProof {
        AdviceWithProof {
            id: "x".into(),
            answer: "y".into(),
            risk: 0.1,
            proofs: vec![
                Proof::new(ProofName::Consent, true, json!({"reason": "consent:validated"})),
                Proof::new(ProofName::Apophatic, true, json!({"violations": []})),
            ],
            assessment: json!({}),
            decided_at: 0.0,
        }
    }

    #[test]
    fn test_untampered_advice_verifies() {
        assert!(verify(&advice()).is_ok());
    }

    #[test]
    fn test_tampered_outcome_detected() {
        let mut awp = advice();
        awp.proofs[0].ok = false;
        assert!(matches!(
            verify(&awp),
            Err(AuditError::TokenMismatch { name, .. }) if name == "consent"
        ));
    }

    #[test]
    fn test_tampered_details_detected() {
        let mut awp = advice();
        awp.proofs[1].details = json!({"violations": ["forbidden:ground_is"]});
        assert!(verify(&awp).is_err());
    }

    #[test]
    fn test_tampered_token_detected() {
        let mut awp = advice();
        awp.proofs[0].token = "0".repeat(64);
        assert!(verify(&awp).is_err());
    }
}
