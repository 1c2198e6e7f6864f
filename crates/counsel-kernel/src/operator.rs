//! The nine will operators and their counter table.

use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The discrete will operator carried by a decision state.
///
/// Each operator selects one geometric kernel for cost shaping and maps
/// to exactly one counter operator for the shadow-twin inversion. The
/// counter table is an involution: inverting twice returns the original
/// operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WillOperator {
    Negation,
    Potentiation,
    Generation,
    Expansion,
    Possession,
    Consummation,
    Aspiration,
    Transcension,
    Annihilation,
}

impl WillOperator {
    /// All nine operators, in canonical order.
    pub const ALL: [WillOperator; 9] = [
        Self::Negation,
        Self::Potentiation,
        Self::Generation,
        Self::Expansion,
        Self::Possession,
        Self::Consummation,
        Self::Aspiration,
        Self::Transcension,
        Self::Annihilation,
    ];

    /// Three-letter operator code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Negation => "NEG",
            Self::Potentiation => "POT",
            Self::Generation => "GEN",
            Self::Expansion => "EXP",
            Self::Possession => "POS",
            Self::Consummation => "CON",
            Self::Aspiration => "ASP",
            Self::Transcension => "TRN",
            Self::Annihilation => "ANN",
        }
    }

    /// Full operator name, uppercase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Negation => "NEGATION",
            Self::Potentiation => "POTENTIATION",
            Self::Generation => "GENERATION",
            Self::Expansion => "EXPANSION",
            Self::Possession => "POSSESSION",
            Self::Consummation => "CONSUMMATION",
            Self::Aspiration => "ASPIRATION",
            Self::Transcension => "TRANSCENSION",
            Self::Annihilation => "ANNIHILATION",
        }
    }

    /// Name of the geometric kernel this operator selects.
    pub fn kernel_name(&self) -> &'static str {
        match self {
            Self::Negation => "inverted_tetrahedron",
            Self::Potentiation => "spiral_sphere",
            Self::Generation => "dual_torus",
            Self::Expansion => "golden_gnomon",
            Self::Possession => "nested_dodecahedron",
            Self::Consummation => "mobius_intersect",
            Self::Aspiration => "spiral_pyramid",
            Self::Transcension => "vanishing_ellipse",
            Self::Annihilation => "folded_voidstar",
        }
    }

    /// The counter operator used by the shadow twin.
    ///
    /// Pairs: NEG<->POT, GEN<->ANN, EXP<->POS, CON<->ASP; TRN is its own
    /// counter, the fixed point that keeps the table involutive.
    pub fn invert(&self) -> WillOperator {
        match self {
            Self::Negation => Self::Potentiation,
            Self::Potentiation => Self::Negation,
            Self::Generation => Self::Annihilation,
            Self::Annihilation => Self::Generation,
            Self::Expansion => Self::Possession,
            Self::Possession => Self::Expansion,
            Self::Consummation => Self::Aspiration,
            Self::Aspiration => Self::Consummation,
            Self::Transcension => Self::Transcension,
        }
    }
}

impl fmt::Display for WillOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WillOperator {
    type Err = KernelError;

    /// Accepts full names and three-letter codes, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NEGATION" | "NEG" => Ok(Self::Negation),
            "POTENTIATION" | "POT" => Ok(Self::Potentiation),
            "GENERATION" | "GEN" => Ok(Self::Generation),
            "EXPANSION" | "EXP" => Ok(Self::Expansion),
            "POSSESSION" | "POS" => Ok(Self::Possession),
            "CONSUMMATION" | "CON" => Ok(Self::Consummation),
            "ASPIRATION" | "ASP" => Ok(Self::Aspiration),
            "TRANSCENSION" | "TRN" => Ok(Self::Transcension),
            "ANNIHILATION" | "ANN" => Ok(Self::Annihilation),
            other => Err(KernelError::UnknownOperator(other.to_string())),
        }
    }
}
