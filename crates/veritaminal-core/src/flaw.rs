//! Document tampering: the typed flaws the engine can plant.
//!
//! Sources always generate clean documents; when the flaw dice come up, the
//! engine picks a flaw that applies to the document at hand and applies it.
//! Keeping the flaw set typed means every tampered document is tampered in a
//! way the rulebook can actually catch.

use veritaminal_contracts::document::Document;

/// A deliberate defect planted in an otherwise clean document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFlaw {
    /// Swap the leading 'P' of the permit for a 'B'.
    PermitPrefix,

    /// Append a stray character to the permit, breaking its length.
    PermitSuffix,

    /// Drop everything after the first name, leaving a single-word name.
    DroppedSurname,

    /// Strip every seal from the document.
    MissingSeals,

    /// Swap the issue and expiry dates so the document expires before it
    /// was issued.
    ReversedDates,

    /// Blank the expiry date.
    MissingExpiry,
}

impl DocumentFlaw {
    /// Every flaw the engine knows how to plant, in fall-through order.
    pub const ALL: [DocumentFlaw; 6] = [
        DocumentFlaw::PermitPrefix,
        DocumentFlaw::PermitSuffix,
        DocumentFlaw::DroppedSurname,
        DocumentFlaw::MissingSeals,
        DocumentFlaw::ReversedDates,
        DocumentFlaw::MissingExpiry,
    ];

    /// Whether this flaw can be planted in `doc` at all.
    ///
    /// A prefix swap needs the expected 'P' to swap away; dropping a surname
    /// needs a surname to drop. The suffix flaw applies to any permit.
    pub fn applies_to(&self, doc: &Document) -> bool {
        match self {
            DocumentFlaw::PermitPrefix => doc.permit.starts_with('P'),
            DocumentFlaw::PermitSuffix => !doc.permit.is_empty(),
            DocumentFlaw::DroppedSurname => doc.name.split_whitespace().count() >= 2,
            DocumentFlaw::MissingSeals => !doc.seals.is_empty(),
            DocumentFlaw::ReversedDates => match (doc.issued_on, doc.expires_on) {
                (Some(issued), Some(expires)) => issued < expires,
                _ => false,
            },
            DocumentFlaw::MissingExpiry => doc.expires_on.is_some(),
        }
    }

    /// Plant this flaw in `doc`.
    ///
    /// Callers check `applies_to` first; applying an inapplicable flaw
    /// leaves the document unchanged.
    pub fn apply(&self, doc: &mut Document) {
        match self {
            DocumentFlaw::PermitPrefix => {
                if doc.permit.starts_with('P') {
                    doc.permit.replace_range(0..1, "B");
                }
            }
            DocumentFlaw::PermitSuffix => {
                if !doc.permit.is_empty() {
                    doc.permit.push('X');
                }
            }
            DocumentFlaw::DroppedSurname => {
                if let Some(first) = doc.name.split_whitespace().next() {
                    doc.name = first.to_string();
                }
            }
            DocumentFlaw::MissingSeals => {
                doc.seals.clear();
            }
            DocumentFlaw::ReversedDates => {
                std::mem::swap(&mut doc.issued_on, &mut doc.expires_on);
            }
            DocumentFlaw::MissingExpiry => {
                doc.expires_on = None;
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
