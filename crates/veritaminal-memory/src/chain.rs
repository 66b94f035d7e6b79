//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Every field that contributes to a record's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. career_id as its raw 16 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of record (serde_json with no pretty-printing)

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::record::{DecisionRecord, TravelerRecord};

/// Compute the SHA-256 hash for a single traveler record.
///
/// The hash commits to every field that uniquely identifies a record: its
/// position in the chain (`sequence`), the career it belongs to
/// (`career_id`), its link to the previous record (`prev_hash`), and the
/// full decision record (`record`).
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON, which cannot happen for
/// the well-formed `DecisionRecord` type.
pub fn hash_record(
    career_id: &Uuid,
    sequence: u64,
    record: &DecisionRecord,
    prev_hash: &str,
) -> String {
    // serde_json::to_vec produces canonical, deterministic JSON without
    // trailing whitespace or key reordering across calls on the same value.
    let record_json =
        serde_json::to_vec(record).expect("DecisionRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(career_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// The chain is valid when both rules hold for every record:
///
/// 1. **Prev-hash linkage**: each record's `prev_hash` equals the
///    `this_hash` of the preceding record (or `GENESIS_HASH` for record 0).
/// 2. **Hash correctness**: each record's `this_hash` matches the value
///    recomputed from its own fields.
///
/// Returns `Err` naming the first offending record the moment any mismatch
/// is detected. An empty chain is defined as valid.
pub fn verify_chain(records: &[TravelerRecord]) -> Result<(), String> {
    let mut expected_prev = TravelerRecord::GENESIS_HASH.to_string();

    for record in records {
        // Rule 1: the stored prev_hash must match what we expect.
        if record.prev_hash != expected_prev {
            return Err(format!(
                "record {}: prev_hash does not match the preceding record",
                record.sequence
            ));
        }

        // Rule 2: recompute this_hash and compare to the stored value.
        let recomputed = hash_record(
            &record.career_id,
            record.sequence,
            &record.record,
            &record.prev_hash,
        );
        if record.this_hash != recomputed {
            return Err(format!(
                "record {}: stored hash does not match its contents",
                record.sequence
            ));
        }

        // Advance the expected prev_hash to this record's hash.
        expected_prev = record.this_hash.clone();
    }

    Ok(())
}
