//! Day-aware rulebook built from a TOML rule pack.
//!
//! Evaluation algorithm:
//!
//! 1. Select the rules whose `day_introduced` has been reached.
//! 2. Run every selected rule's check against the document.
//! 3. Collect all violations before returning so the player (and Veritas)
//!    see the full failure set in one report.

use std::path::Path;

use tracing::{debug, warn};

use veritaminal_contracts::{
    document::Document,
    error::{GameResult, VeritaminalError},
    report::{RuleReport, RuleViolation},
};

use crate::rule::{Rule, RulePack};

/// An ordered set of document rules with day-based activation.
///
/// Construct via `from_toml_str` or `from_file`, then pass to the shift
/// engine.
///
/// ```rust,ignore
/// use veritaminal_rules::Rulebook;
///
/// let rulebook = Rulebook::from_toml_str(include_str!("../packs/eastokva.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Rulebook {
    rules: Vec<Rule>,
}

impl Rulebook {
    /// Parse `s` as TOML and build a `Rulebook`.
    ///
    /// Returns `VeritaminalError::Config` if the TOML is malformed or does
    /// not match the expected `RulePack` schema.
    pub fn from_toml_str(s: &str) -> GameResult<Self> {
        let pack: RulePack = toml::from_str(s).map_err(|e| VeritaminalError::Config {
            reason: format!("failed to parse rule pack TOML: {}", e),
        })?;
        Ok(Self { rules: pack.rules })
    }

    /// Read the file at `path` and parse it as a TOML rule pack.
    ///
    /// Returns `VeritaminalError::Config` if the file cannot be read or its
    /// contents are not valid TOML matching `RulePack`.
    pub fn from_file(path: &Path) -> GameResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VeritaminalError::Config {
            reason: format!("failed to read rule pack '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Every rule in declaration order, including ones not yet in force.
    pub fn all_rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rules enforced on `day`, in declaration order.
    pub fn active_rules(&self, day: u32) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.in_force(day)).collect()
    }

    /// The rules that come into force exactly on `day`.
    ///
    /// Drives the "new directive" line of the day-start announcement.
    pub fn introduced_on(&self, day: u32) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.day_introduced == day)
            .collect()
    }

    /// Evaluate `doc` against every rule in force on `day`.
    ///
    /// All violations are accumulated; the report carries the full failure
    /// set rather than only the first violation found.
    pub fn evaluate(&self, doc: &Document, day: u32) -> RuleReport {
        let mut violations: Vec<RuleViolation> = Vec::new();

        for rule in &self.rules {
            if !rule.in_force(day) {
                continue;
            }

            debug!(rule_id = %rule.id, day, "checking rule");

            if let Some(violation) = rule.check_document(doc) {
                warn!(
                    rule_id = %violation.rule_id,
                    message = %violation.message,
                    "document violates rule"
                );
                violations.push(violation);
            }
        }

        let report = RuleReport::from_violations(violations);
        debug!(
            traveler = %doc.name,
            day,
            valid = report.valid,
            violation_count = report.violations.len(),
            "document evaluated"
        );

        report
    }
}
