//! Player decision types.
//!
//! A decision is the player's verdict on one traveler. Whether it was
//! *correct* is decided against the rulebook's verdict for that document,
//! never against the content source's opinion.

use serde::{Deserialize, Serialize};

use crate::error::VeritaminalError;

/// The player's call on the current traveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Stamp the document and wave the traveler through.
    Approve,
    /// Turn the traveler away.
    Deny,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Approve => f.write_str("approve"),
            Decision::Deny => f.write_str("deny"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = VeritaminalError;

    /// Parse the gameplay command words, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Decision::Approve),
            "deny" => Ok(Decision::Deny),
            other => Err(VeritaminalError::InvalidCommand {
                input: other.to_string(),
            }),
        }
    }
}

/// The resolved outcome of one decision, as returned by the shift engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// What the player chose.
    pub decision: Decision,
    /// Whether the choice matched the rulebook's verdict.
    pub correct: bool,
    /// Points earned: 1 for a correct call, 0 otherwise.
    pub points: u32,
}
