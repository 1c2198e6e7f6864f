//! Four-valued truth.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Truth value of a candidate's predicted outcome.
///
/// First-degree entailment: a claim can be true, false, both (a
/// tolerated dialetheia) or neither (insufficient grounds either way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TruthValue {
    /// True.
    #[serde(rename = "T")]
    True,
    /// False.
    #[serde(rename = "F")]
    False,
    /// Both true and false; dialetheic, tolerated with a repair plan.
    #[serde(rename = "B")]
    Both,
    /// Neither true nor false; insufficient grounds.
    #[serde(rename = "N")]
    Neither,
}

impl TruthValue {
    /// Whether this value licenses an answer at all (T or B).
    pub fn is_assertable(&self) -> bool {
        matches!(self, Self::True | Self::Both)
    }

    /// Wire tag of the value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "T",
            Self::False => "F",
            Self::Both => "B",
            Self::Neither => "N",
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
