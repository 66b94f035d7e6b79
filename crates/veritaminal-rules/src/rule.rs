//! Document rule types and configuration schema.
//!
//! A `RulePack` is deserialized from TOML and holds the full rule list for
//! one border setting. Every rule carries the day it comes into force; the
//! `Rulebook` only enforces rules whose `day_introduced` has been reached.

use serde::{Deserialize, Serialize};

use veritaminal_contracts::{
    document::{Document, DocumentField},
    report::RuleViolation,
};

/// The check a rule performs against a traveler's document.
///
/// Expressed in TOML with an explicit `type` tag (snake_case).
///
/// Example:
/// ```toml
/// [rules.check]
/// type = "permit_prefix"
/// prefix = "P"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCheck {
    /// The permit code must start with `prefix`.
    PermitPrefix { prefix: String },

    /// The permit code must be exactly `length` characters and end in
    /// `digits` ASCII digits.
    PermitNumber { length: usize, digits: usize },

    /// The traveler's name must have at least `min_parts` whitespace-separated
    /// parts.
    FullName { min_parts: usize },

    /// The named field must be present on the document.
    RequiredField { field: DocumentField },

    /// The named field, when present, must not contain `pattern` as a
    /// substring. An absent field passes; presence is `RequiredField`'s job.
    ForbiddenPattern { field: DocumentField, pattern: String },

    /// The named field must be present and its text must be one of `values`.
    AllowedValues { field: DocumentField, values: Vec<String> },

    /// The document must carry the named seal.
    RequiredSeal { seal: String },

    /// When both dates are present, the document must not expire before it
    /// was issued.
    DatesOrdered,
}

/// A single verification rule loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier used in memory records and violation messages.
    pub id: String,

    /// Short name shown to the player on the rules screen and in day-start
    /// announcements.
    pub name: String,

    /// Human-readable explanation of what the rule requires.
    pub description: String,

    /// First day (1-based) on which this rule is enforced. Rules with
    /// `day_introduced = 1` hold from the start of a career.
    #[serde(default = "default_day_introduced")]
    pub day_introduced: u32,

    /// The check this rule performs.
    pub check: RuleCheck,
}

fn default_day_introduced() -> u32 {
    1
}

impl Rule {
    /// True if this rule is enforced on `day`.
    pub fn in_force(&self, day: u32) -> bool {
        day >= self.day_introduced
    }

    /// Run this rule's check against `doc`.
    ///
    /// Returns `Some(violation)` when the document fails the check, `None`
    /// when it passes.
    pub fn check_document(&self, doc: &Document) -> Option<RuleViolation> {
        let message: Option<String> = match &self.check {
            RuleCheck::PermitPrefix { prefix } => {
                if doc.permit.starts_with(prefix.as_str()) {
                    None
                } else {
                    Some(format!(
                        "permit '{}' does not start with '{}'",
                        doc.permit, prefix
                    ))
                }
            }

            RuleCheck::PermitNumber { length, digits } => {
                let chars: Vec<char> = doc.permit.chars().collect();
                if chars.len() != *length {
                    Some(format!(
                        "permit '{}' must be exactly {} characters",
                        doc.permit, length
                    ))
                } else if !chars
                    .iter()
                    .rev()
                    .take(*digits)
                    .all(|c| c.is_ascii_digit())
                {
                    Some(format!(
                        "permit '{}' must end in {} digits",
                        doc.permit, digits
                    ))
                } else {
                    None
                }
            }

            RuleCheck::FullName { min_parts } => {
                let parts = doc.name.split_whitespace().count();
                if parts >= *min_parts {
                    None
                } else {
                    Some(format!(
                        "name '{}' has {} part(s); at least {} required",
                        doc.name, parts, min_parts
                    ))
                }
            }

            RuleCheck::RequiredField { field } => {
                if doc.field_text(*field).is_some() {
                    None
                } else {
                    Some(format!("required field '{}' is missing", field))
                }
            }

            RuleCheck::ForbiddenPattern { field, pattern } => match doc.field_text(*field) {
                Some(text) if text.contains(pattern.as_str()) => Some(format!(
                    "field '{}' contains forbidden pattern '{}'",
                    field, pattern
                )),
                _ => None,
            },

            RuleCheck::AllowedValues { field, values } => match doc.field_text(*field) {
                None => Some(format!(
                    "field '{}' is missing; cannot check allowed values",
                    field
                )),
                Some(text) => {
                    if values.iter().any(|v| v == &text) {
                        None
                    } else {
                        Some(format!(
                            "field '{}' has value '{}' which is not in the allowed set",
                            field, text
                        ))
                    }
                }
            },

            RuleCheck::RequiredSeal { seal } => {
                if doc.seals.iter().any(|s| s == seal) {
                    None
                } else {
                    Some(format!("document lacks required seal '{}'", seal))
                }
            }

            RuleCheck::DatesOrdered => match (doc.issued_on, doc.expires_on) {
                (Some(issued), Some(expires)) if expires < issued => Some(format!(
                    "document expires on {} before it was issued on {}",
                    expires, issued
                )),
                _ => None,
            },
        };

        message.map(|message| RuleViolation {
            rule_id: self.id.clone(),
            message,
        })
    }
}

/// The top-level structure deserialized from a TOML rule pack.
///
/// Rules are evaluated in the order they appear in the `rules` array.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "permit-prefix"
/// name = "Permit Prefix"
/// description = "Valid permits begin with the letter P"
/// day_introduced = 1
///
/// [rules.check]
/// type = "permit_prefix"
/// prefix = "P"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulePack {
    /// Ordered list of rules. Every rule in force is checked; violations are
    /// collected rather than stopping at the first.
    pub rules: Vec<Rule>,
}
