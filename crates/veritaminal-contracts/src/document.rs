//! Traveler document types.
//!
//! A `Document` is what one traveler hands across the desk: a name, a permit
//! code, a backstory, and optionally seals and validity dates. Verification
//! rules address individual fields through `DocumentField`, so rule packs can
//! name fields in TOML without knowing the struct layout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One traveler's papers, as presented at the checkpoint.
///
/// A well-formed permit is the letter `P` followed by exactly four ASCII
/// digits. Whether this document actually satisfies the rules in force is
/// decided by the rulebook for the current day — validity is never stored on
/// the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Full traveler name, normally first and last.
    pub name: String,
    /// Permit code, e.g. "P4821".
    pub permit: String,
    /// Short in-fiction backstory, one or two sentences.
    pub backstory: String,
    /// Authority seals stamped on the document. Empty for most travelers.
    #[serde(default)]
    pub seals: Vec<String>,
    /// Date the document was issued, when the border requires one.
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    /// Date the document expires, when the border requires one.
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

impl Document {
    /// Build a minimal document with only the three core fields set.
    pub fn new(
        name: impl Into<String>,
        permit: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            permit: permit.into(),
            backstory: backstory.into(),
            seals: Vec::new(),
            issued_on: None,
            expires_on: None,
        }
    }

    /// Text content of the given field, or `None` when the field is unset.
    ///
    /// Used by rule checks that match on field text. `Seals` renders as a
    /// comma-separated list; an empty seal list and unset dates are `None` so
    /// `required_field` style checks treat them as missing.
    pub fn field_text(&self, field: DocumentField) -> Option<String> {
        match field {
            DocumentField::Name => Some(self.name.clone()),
            DocumentField::Permit => Some(self.permit.clone()),
            DocumentField::Backstory => Some(self.backstory.clone()),
            DocumentField::Seals => {
                if self.seals.is_empty() {
                    None
                } else {
                    Some(self.seals.join(", "))
                }
            }
            DocumentField::IssuedOn => self.issued_on.map(|d| d.to_string()),
            DocumentField::ExpiresOn => self.expires_on.map(|d| d.to_string()),
        }
    }
}

/// The addressable fields of a `Document`.
///
/// Serialized in snake_case so TOML rule packs read naturally:
/// `check = { type = "required_field", field = "issued_on" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentField {
    Name,
    Permit,
    Backstory,
    Seals,
    IssuedOn,
    ExpiresOn,
}

impl std::fmt::Display for DocumentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DocumentField::Name => "name",
            DocumentField::Permit => "permit",
            DocumentField::Backstory => "backstory",
            DocumentField::Seals => "seals",
            DocumentField::IssuedOn => "issued_on",
            DocumentField::ExpiresOn => "expires_on",
        };
        f.write_str(s)
    }
}
