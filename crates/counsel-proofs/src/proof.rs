//! Proof values and their tamper-evident tokens.

use crate::canonical;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// The five named gates a proof can attest to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofName {
    Consent,
    Apophatic,
    Externalities,
    HarmsLedger,
    Remembrance,
}

impl ProofName {
    /// Wire name of the proof.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::Apophatic => "apophatic",
            Self::Externalities => "externalities",
            Self::HarmsLedger => "harms_ledger",
            Self::Remembrance => "remembrance",
        }
    }
}

impl fmt::Display for ProofName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single gate attestation.
///
/// The token is the lowercase-hex SHA-256 of the canonical JSON of
/// `{"details": ..., "name": ..., "ok": ...}`. Identical inputs always
/// produce identical tokens; this is tamper evidence, not secrecy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proof {
    /// Which gate this proof attests to.
    pub name: ProofName,
    /// Gate outcome.
    pub ok: bool,
    /// Evidence payload recorded at check time.
    pub details: Value,
    /// Content-hash token over (name, ok, details).
    pub token: String,
}

impl Proof {
    /// Builds a proof, sealing the token over its contents.
    pub fn new(name: ProofName, ok: bool, details: Value) -> Self {
        let token = Self::token_for(name, ok, &details);
        Self {
            name,
            ok,
            details,
            token,
        }
    }

    /// Recomputes the token a proof with these contents must carry.
    pub fn token_for(name: ProofName, ok: bool, details: &Value) -> String {
        canonical::hash_hex(&json!({
            "name": name.as_str(),
            "ok": ok,
            "details": details,
        }))
    }
}
