//! Career memory log.
//!
//! `MemoryLog` is the full record of one career: which border it is served
//! at, the story state, the running score, and the hash-chained list of
//! every traveler processed. It is the unit that save files persist.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use veritaminal_contracts::{
    decision::Decision,
    error::{GameResult, VeritaminalError},
    story::StoryState,
};

use crate::{
    chain::{hash_record, verify_chain},
    record::{DecisionRecord, TravelerRecord},
};

/// The append-only memory of one career.
///
/// Decisions enter through `record_traveler`, which extends the hash chain.
/// `verify_integrity` confirms the chain still holds, both for in-memory
/// logs and for logs deserialized from save files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLog {
    /// Unique id assigned when the career starts.
    pub career_id: Uuid,

    /// The border setting this career is served at.
    pub border_id: String,

    /// Narrative state: day, trust, corruption, decision tallies.
    pub story: StoryState,

    /// Points earned from correct decisions.
    pub score: u32,

    /// Names already seen this career, so generated travelers stay distinct.
    pub used_names: Vec<String>,

    /// All traveler records in chain order (sequence 0 first).
    pub records: Vec<TravelerRecord>,
}

impl MemoryLog {
    /// Start an empty log for a new career at `border_id`.
    pub fn new(border_id: impl Into<String>) -> Self {
        Self {
            career_id: Uuid::new_v4(),
            border_id: border_id.into(),
            story: StoryState::default(),
            score: 0,
            used_names: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Append one decision to the hash chain.
    ///
    /// Computes `this_hash` from (career_id, sequence, prev_hash, record),
    /// wraps the record in a `TravelerRecord`, and appends it. The traveler's
    /// name is added to `used_names` so later documents avoid it.
    pub fn record_traveler(
        &mut self,
        day: u32,
        traveler_name: impl Into<String>,
        permit: impl Into<String>,
        decision: Decision,
        correct: bool,
        violations: Vec<String>,
    ) {
        let record = DecisionRecord {
            day,
            traveler_name: traveler_name.into(),
            permit: permit.into(),
            decision,
            correct,
            violations,
            timestamp: Utc::now(),
        };

        let sequence = self.records.len() as u64;
        let prev_hash = self.terminal_hash();
        let this_hash = hash_record(&self.career_id, sequence, &record, &prev_hash);

        if !self.used_names.contains(&record.traveler_name) {
            self.used_names.push(record.traveler_name.clone());
        }

        info!(
            career_id = %self.career_id,
            sequence,
            traveler = %record.traveler_name,
            decision = %record.decision,
            correct = record.correct,
            "traveler recorded"
        );

        self.records.push(TravelerRecord {
            sequence,
            career_id: self.career_id,
            record,
            prev_hash,
            this_hash,
        });
    }

    /// The `this_hash` of the last record, or `GENESIS_HASH` for an empty
    /// log, so it is always a valid `prev_hash` for the next record.
    pub fn terminal_hash(&self) -> String {
        self.records
            .last()
            .map(|r| r.this_hash.clone())
            .unwrap_or_else(|| TravelerRecord::GENESIS_HASH.to_string())
    }

    /// Verify that the chain has not been tampered with.
    ///
    /// Returns `VeritaminalError::TamperDetected` naming the first offending
    /// record when verification fails.
    pub fn verify_integrity(&self) -> GameResult<()> {
        verify_chain(&self.records).map_err(|reason| VeritaminalError::TamperDetected { reason })
    }

    /// Number of travelers processed so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no traveler has been processed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent `n` records, newest last.
    ///
    /// Used by the ending screen to show the tail of the career ledger.
    pub fn recent(&self, n: usize) -> &[TravelerRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}
