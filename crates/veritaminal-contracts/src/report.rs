//! Rule evaluation report types.
//!
//! The rulebook evaluates a document against every rule active on the
//! current day and returns a `RuleReport`. All failures are collected before
//! returning so the player-facing hint and the decision record see the full
//! picture, not just the first violation.

use serde::{Deserialize, Serialize};

/// The result of checking one document against the active rulebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// True only if every active rule passed.
    pub valid: bool,
    /// All violations found during this evaluation. Empty when valid.
    pub violations: Vec<RuleViolation>,
}

impl RuleReport {
    /// A report with no violations.
    pub fn clean() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    /// Build a report from collected violations.
    pub fn from_violations(violations: Vec<RuleViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Rule ids of every violation, in evaluation order.
    pub fn violated_rule_ids(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.rule_id.clone()).collect()
    }

    /// One-line summary of the violations, `"-"` when clean.
    pub fn summary(&self) -> String {
        if self.violations.is_empty() {
            "-".to_string()
        } else {
            self.violations
                .iter()
                .map(|v| format!("[{}] {}", v.rule_id, v.message))
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// A single rule failure within a `RuleReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// The `id` of the rule that failed.
    pub rule_id: String,
    /// Human-readable explanation of why the rule failed.
    pub message: String,
}

/// Advisory judgment from a content source about one document.
///
/// Shown to the player after their decision. Never used for scoring — the
/// rulebook verdict is the ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// The verdict the source would have given.
    pub verdict: crate::decision::Decision,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Short reasoning text.
    pub reasoning: String,
}

impl Assessment {
    /// Build an assessment, clamping confidence into `[0.0, 1.0]`.
    pub fn new(
        verdict: crate::decision::Decision,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            verdict,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
        }
    }
}
