//! Narrative state and ending types.
//!
//! `StoryState` is the small set of counters the narrative engine mutates as
//! decisions land. The thresholds that turn these counters into an `Ending`
//! live in the narrative crate — this module only defines the data.

use serde::{Deserialize, Serialize};

/// Career length in days. Day `MAX_DAYS + 1` resolves the career.
pub const MAX_DAYS: u32 = 10;

/// The narrative counters for one career.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryState {
    /// Current in-game day, starting at 1.
    pub day: u32,
    /// Standing with travelers and the public. Negative is bad.
    pub trust: i32,
    /// Suspicion of corruption accumulated from waving forgeries through.
    pub corruption: i32,
    /// Total travelers approved this career.
    pub approvals: u32,
    /// Total travelers denied this career.
    pub denials: u32,
}

impl StoryState {
    /// One-line HUD summary, e.g. `Trust: +2 | Corruption: 1`.
    pub fn summary(&self) -> String {
        format!("Trust: {:+} | Corruption: {}", self.trust, self.corruption)
    }
}

impl Default for StoryState {
    fn default() -> Self {
        Self {
            day: 1,
            trust: 0,
            corruption: 0,
            approvals: 0,
            denials: 0,
        }
    }
}

/// The four ways a career can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingKind {
    /// Ten days served with a strong record.
    Good,
    /// Ten days served, but the record did not hold up.
    Bad,
    /// Too many forgeries waved through.
    Corrupt,
    /// Too many legitimate travelers turned away.
    Strict,
}

impl std::fmt::Display for EndingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EndingKind::Good => "good",
            EndingKind::Bad => "bad",
            EndingKind::Corrupt => "corrupt",
            EndingKind::Strict => "strict",
        };
        f.write_str(s)
    }
}

/// A resolved career ending: the kind plus the closing message shown on the
/// game-over screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub kind: EndingKind,
    pub message: String,
}

/// The banner data produced when a new day begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStart {
    /// The day that just began.
    pub day: u32,
    /// Story beat for this day, when the border pack defines one.
    pub milestone: Option<String>,
    /// Names of rules that come into force today.
    pub new_rules: Vec<String>,
}

impl DayStart {
    /// Render the banner the UI prints between shifts.
    pub fn banner(&self) -> String {
        let mut line = format!("Day {} begins.", self.day);
        if let Some(milestone) = &self.milestone {
            line.push(' ');
            line.push_str(milestone);
        }
        for rule in &self.new_rules {
            line.push_str(&format!(" New directive in force: {}.", rule));
        }
        line
    }
}
