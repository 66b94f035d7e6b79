//! # veritaminal-memory
//!
//! Hash-chained career memory and JSON save files for Veritaminal.
//!
//! ## Overview
//!
//! Every decision the player makes is wrapped in a `TravelerRecord` that
//! links to the previous record via its SHA-256 hash. Editing a save file by
//! hand, even a single byte of one record, breaks the chain and is detected
//! when the file is loaded.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veritaminal_memory::{MemoryLog, SaveStore};
//!
//! let mut log = MemoryLog::new("eastokva_crossing");
//! log.record_traveler(1, "Anya Volkova", "P4821", decision, correct, violations);
//!
//! let store = SaveStore::default();
//! let path = store.save(&log)?;
//! let restored = store.load(&path)?;
//! ```

pub mod chain;
pub mod log;
pub mod record;
pub mod store;

pub use chain::{hash_record, verify_chain};
pub use log::MemoryLog;
pub use record::{DecisionRecord, TravelerRecord};
pub use store::{SaveEntry, SaveGame, SaveStore, SAVE_VERSION};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use veritaminal_contracts::decision::Decision;
    use veritaminal_contracts::error::VeritaminalError;

    use super::{MemoryLog, SaveStore, TravelerRecord};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build a log with `n` travelers recorded on day 1.
    fn log_with_travelers(n: usize) -> MemoryLog {
        let mut log = MemoryLog::new("eastokva_crossing");
        for i in 0..n {
            log.record_traveler(
                1,
                format!("Traveler Number{}", i),
                format!("P{:04}", i),
                Decision::Approve,
                true,
                vec![],
            );
        }
        log
    }

    // ── Chain tests ───────────────────────────────────────────────────────────

    /// Recording three travelers produces a valid chain.
    #[test]
    fn test_hash_chain_integrity() {
        let log = log_with_travelers(3);
        assert!(
            log.verify_integrity().is_ok(),
            "chain must be valid after sequential records"
        );
    }

    /// Mutating any record's payload breaks the chain at that record.
    #[test]
    fn test_tamper_detection() {
        let mut log = log_with_travelers(3);

        // Flip the correctness flag on the second record, the classic edit a
        // player might attempt to launder a mistake.
        log.records[1].record.correct = false;

        match log.verify_integrity() {
            Err(VeritaminalError::TamperDetected { reason }) => {
                assert!(
                    reason.contains("record 1"),
                    "tamper reason should name the offending record: {reason}"
                );
            }
            other => panic!("expected TamperDetected, got {:?}", other),
        }
    }

    /// The first record's `prev_hash` must equal the genesis sentinel.
    #[test]
    fn test_genesis_hash() {
        let log = log_with_travelers(1);
        assert_eq!(log.records[0].prev_hash, TravelerRecord::GENESIS_HASH);
    }

    /// Sequence numbers must be 0, 1, 2, … with no gaps.
    #[test]
    fn test_sequence_monotonic() {
        let log = log_with_travelers(4);
        for (idx, record) in log.records.iter().enumerate() {
            assert_eq!(record.sequence, idx as u64);
        }
    }

    /// An empty log is trivially valid and reports the genesis terminal hash.
    #[test]
    fn test_empty_log_valid() {
        let log = MemoryLog::new("veldania_port");
        assert!(log.verify_integrity().is_ok());
        assert_eq!(log.terminal_hash(), TravelerRecord::GENESIS_HASH);
        assert!(log.is_empty());
    }

    /// Names are collected once each for the generator to avoid.
    #[test]
    fn test_used_names_deduplicated() {
        let mut log = MemoryLog::new("eastokva_crossing");
        log.record_traveler(1, "Anya Volkova", "P4821", Decision::Approve, true, vec![]);
        log.record_traveler(2, "Anya Volkova", "P9177", Decision::Deny, true, vec![]);

        assert_eq!(log.used_names, vec!["Anya Volkova"]);
    }

    // ── Save file tests ───────────────────────────────────────────────────────

    /// A saved career loads back byte-for-byte equivalent and chain-valid.
    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let log = log_with_travelers(3);
        let path = store.save(&log).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "eastokva_crossing_day01.json"
        );

        let restored = store.load(&path).unwrap();
        assert_eq!(restored.career_id, log.career_id);
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.terminal_hash(), log.terminal_hash());
    }

    /// A save file edited on disk is rejected with `TamperDetected`.
    #[test]
    fn test_load_rejects_tampered_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let log = log_with_travelers(2);
        let path = store.save(&log).unwrap();

        // Edit the file the way a cheating player would: flip a decision's
        // correctness without recomputing any hashes.
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["career"]["records"][0]["record"]["correct"] = serde_json::Value::Bool(false);
        std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

        match store.load(&path) {
            Err(VeritaminalError::TamperDetected { reason }) => {
                assert!(reason.contains("record 0"), "unexpected reason: {reason}");
            }
            other => panic!("expected TamperDetected, got {:?}", other),
        }
    }

    /// A save file from an unknown schema version is rejected as corrupt.
    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let path = store.save(&log_with_travelers(1)).unwrap();

        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        value["version"] = serde_json::Value::from(99);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        match store.load(&path) {
            Err(VeritaminalError::SaveCorrupt { reason }) => {
                assert!(reason.contains("version 99"), "unexpected reason: {reason}");
            }
            other => panic!("expected SaveCorrupt, got {:?}", other),
        }
    }

    /// Garbage files in the save directory are skipped, not fatal.
    #[test]
    fn test_list_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        store.save(&log_with_travelers(1)).unwrap();
        std::fs::write(dir.path().join("notes.json"), "not a save file").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "ignored entirely").unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].border_id, "eastokva_crossing");
        assert_eq!(entries[0].day, 1);
    }

    /// A store whose directory was never created lists no saves.
    #[test]
    fn test_list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("never_created"));
        assert!(store.list().unwrap().is_empty());
    }
}
