//! Scenario 3: A Tampered Save
//!
//! Careers persist as JSON with a SHA-256 hash chain over every decision.
//! This scenario saves a short career, reloads it cleanly as a control, then
//! edits one recorded decision on disk and shows the load path refusing it.
//!
//! Walk-through for the demo run:
//!   1. Two approvals at the Port of Veldania, saved to a scratch directory
//!   2. Clean reload: chain verifies, career usable
//!   3. On-disk edit: records[0]'s "correct" flag flipped to false
//!   4. Reload rejected with TamperDetected naming the offending record

use std::fs;

use serde_json::Value;

use veritaminal_contracts::{
    decision::Decision,
    error::{GameResult, VeritaminalError},
};
use veritaminal_gen::LocalSource;
use veritaminal_memory::SaveStore;

use crate::catalog;

const CONTENT_SEED: u64 = 31;
const DICE_SEED: u64 = 3;

const BORDER_ID: &str = "veldania_port";

fn io_err(e: std::io::Error) -> VeritaminalError {
    VeritaminalError::SaveIo {
        reason: e.to_string(),
    }
}

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 3: edit a save on disk and watch the load path refuse it.
pub fn run_scenario() -> GameResult<()> {
    println!("=== Scenario 3: A Tampered Save ===");
    println!();

    // ── Play a short career and save it ───────────────────────────────────────

    let source = LocalSource::with_seed(CONTENT_SEED);
    let mut engine = catalog::shift_for(BORDER_ID)?
        .with_seed(DICE_SEED)
        .with_flaw_rate(0.0);

    for _ in 0..2 {
        engine.next_traveler(&source)?;
        engine.decide(Decision::Approve, &source)?;
        engine.advance_day();
    }

    let scratch =
        std::env::temp_dir().join(format!("veritaminal-demo-{}", engine.log().career_id));
    let store = SaveStore::new(&scratch);
    let path = store.save(engine.log())?;

    println!("  Career saved:   {}", path.display());
    println!("  Records:        {}", engine.log().len());

    // ── Control case: the untouched file loads cleanly ────────────────────────

    let reloaded = store.load(&path)?;
    println!("  Clean reload:   OK ({} record(s), chain holds)", reloaded.len());
    println!();

    // ── Flip one recorded decision on disk ────────────────────────────────────

    let contents = fs::read_to_string(&path).map_err(io_err)?;
    let mut save: Value =
        serde_json::from_str(&contents).map_err(|e| VeritaminalError::SaveCorrupt {
            reason: e.to_string(),
        })?;
    save["career"]["records"][0]["record"]["correct"] = Value::Bool(false);
    let edited =
        serde_json::to_string_pretty(&save).map_err(|e| VeritaminalError::SaveCorrupt {
            reason: e.to_string(),
        })?;
    fs::write(&path, edited).map_err(io_err)?;

    println!("  Edited on disk: records[0].correct flipped to false");

    // ── The load path refuses the edited file ─────────────────────────────────

    match store.load(&path) {
        Err(VeritaminalError::TamperDetected { reason }) => {
            println!("  Load rejected:  {}", reason);
        }
        Ok(_) => println!("  UNEXPECTED:     tampered save loaded cleanly"),
        Err(other) => println!("  UNEXPECTED:     {}", other),
    }

    let _ = fs::remove_dir_all(&scratch);

    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Flipping one ledger field on disk breaks that record's hash.
    #[test]
    fn test_tampered_save_is_refused() {
        let dir = tempdir().unwrap();
        let source = LocalSource::with_seed(CONTENT_SEED);
        let mut engine = catalog::shift_for(BORDER_ID)
            .unwrap()
            .with_seed(DICE_SEED)
            .with_flaw_rate(0.0);

        for _ in 0..2 {
            engine.next_traveler(&source).unwrap();
            engine.decide(Decision::Approve, &source).unwrap();
            engine.advance_day();
        }

        let store = SaveStore::new(dir.path());
        let path = store.save(engine.log()).unwrap();
        assert!(store.load(&path).is_ok());

        let mut save: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        save["career"]["records"][0]["record"]["correct"] = Value::Bool(false);
        fs::write(&path, serde_json::to_string_pretty(&save).unwrap()).unwrap();

        match store.load(&path) {
            Err(VeritaminalError::TamperDetected { reason }) => {
                assert!(reason.contains("record 0"), "reason: {}", reason);
            }
            other => panic!("expected TamperDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_scenario_runs_to_completion() {
        run_scenario().unwrap();
    }
}
