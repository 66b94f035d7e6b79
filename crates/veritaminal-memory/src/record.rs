//! Traveler record types.
//!
//! `TravelerRecord` is a single entry in the hash chain. It wraps a
//! `DecisionRecord` with sequence numbering and the SHA-256 hashes that make
//! save-file tampering detectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veritaminal_contracts::decision::Decision;

/// What happened at the booth for one traveler.
///
/// This is the payload committed to by the hash chain. It records the
/// decision as made, not the document itself; the name and permit are enough
/// to reconstruct the encounter when reviewing a career.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Career day (1-based) on which the traveler was processed.
    pub day: u32,

    /// The traveler's name as printed on the document.
    pub traveler_name: String,

    /// The permit code as printed on the document.
    pub permit: String,

    /// The decision the player made.
    pub decision: Decision,

    /// Whether the decision matched the rulebook's verdict.
    pub correct: bool,

    /// Rule ids the document violated, empty for a clean document.
    pub violations: Vec<String>,

    /// Wall-clock time (UTC) the decision was made.
    pub timestamp: DateTime<Utc>,
}

/// A single entry in the SHA-256 hash chain for one career.
///
/// Each record commits to the previous record via `prev_hash`, forming an
/// append-only chain. Modifying any field, including those of the embedded
/// `record`, invalidates `this_hash` and every subsequent `prev_hash`, which
/// `verify_chain` detects when a save file is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelerRecord {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,

    /// The career this record belongs to.
    pub career_id: Uuid,

    /// The immutable decision record.
    pub record: DecisionRecord,

    /// SHA-256 hash (hex) of the previous record, or `GENESIS_HASH` for the
    /// first record.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this record's canonical content.
    ///
    /// Computed by `hash_record()` over (career_id, sequence, prev_hash,
    /// canonical JSON of record).
    pub this_hash: String,
}

impl TravelerRecord {
    /// The sentinel `prev_hash` used for the first record in every chain.
    ///
    /// 64 hex zeros, a value that can never be the SHA-256 of real data, so
    /// genesis detection is unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
