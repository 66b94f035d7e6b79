//! Border setting types.
//!
//! A border setting is one checkpoint assignment: its fiction, its document
//! requirements as shown to the player, and the id the borders crate uses to
//! look up the matching rule pack and milestones.

use serde::{Deserialize, Serialize};

/// One checkpoint assignment the player can serve at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSetting {
    /// Stable identifier, e.g. "eastokva_crossing". Also keys save files.
    pub id: String,
    /// Display name, e.g. "Eastokva Crossing".
    pub name: String,
    /// One-paragraph description shown at selection time.
    pub description: String,
    /// The situation briefing shown when a shift starts.
    pub situation: String,
    /// Player-facing list of what valid documents need here.
    pub document_requirements: Vec<String>,
    /// Player-facing list of the forgeries this border sees most.
    pub common_issues: Vec<String>,
    /// Seals a properly issued document carries at this border. Content
    /// sources stamp these onto every clean document so that seal rules
    /// only fire on tampered ones.
    pub customary_seals: Vec<String>,
}

/// A scripted story beat tied to a specific day at one border.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Day the beat fires, 1-based.
    pub day: u32,
    /// Text shown in the day banner.
    pub text: String,
}
