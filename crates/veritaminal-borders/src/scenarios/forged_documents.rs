//! Scenario 2: Forged Documents
//!
//! The tamper dice are loaded to 100%: every traveler's papers carry a flaw
//! the day's rules can catch. Veritas hints at each problem, and the player
//! makes one good call between two bad ones.
//!
//! Walk-through for the demo run:
//!   1. Career at Eastokva Crossing, flaw rate 1.0
//!   2. Traveler 1: forgery approved  → corruption 1, trust -1
//!   3. Traveler 2: forgery denied    → +1 point, trust recovers
//!   4. Traveler 3: forgery approved  → corruption 2
//!   5. The career survives, one bad approval short of dismissal

use veritaminal_contracts::{decision::Decision, error::GameResult};
use veritaminal_gen::LocalSource;

use crate::catalog;

const CONTENT_SEED: u64 = 23;
const DICE_SEED: u64 = 5;

const BORDER_ID: &str = "eastokva_crossing";

/// The player's calls, one per traveler. Every document is forged, so the
/// approvals are wrong and the denial is right.
const CALLS: [Decision; 3] = [Decision::Approve, Decision::Deny, Decision::Approve];

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 2: three forgeries, two waved through.
pub fn run_scenario() -> GameResult<()> {
    println!("=== Scenario 2: Forged Documents ===");
    println!();

    let source = LocalSource::with_seed(CONTENT_SEED);
    let mut engine = catalog::shift_for(BORDER_ID)?
        .with_seed(DICE_SEED)
        .with_flaw_rate(1.0);

    println!("  Border:   {}", engine.border().name);
    println!("  Tampering: every document (loaded dice)");
    println!();

    for decision in CALLS {
        println!("  {}", engine.current_day_start().banner());

        // ── Inspect the forged papers ─────────────────────────────────────────

        let encounter = engine.next_traveler(&source)?;
        println!(
            "    Traveler:     {} ({})",
            encounter.document.name, encounter.document.permit
        );
        match encounter.flaw {
            Some(flaw) => println!("    Planted flaw: {:?}", flaw),
            None => println!("    Planted flaw: none (document clean)"),
        }
        println!("    Rule report:  {}", encounter.report.summary());

        let hint = engine.hint(&source)?;
        println!("    Veritas:      {}", hint);

        // ── The player's call ─────────────────────────────────────────────────

        let outcome = engine.decide(decision, &source)?;
        println!(
            "    Decision:     {} [{}]",
            outcome.verdict.decision,
            if outcome.verdict.correct { "CORRECT" } else { "WRONG" }
        );
        println!("    {}", outcome.narrative);
        println!("    Story:        {}", engine.story().summary());
        println!();

        engine.advance_day();
    }

    // ── Close out the shift ───────────────────────────────────────────────────

    println!("  Final score:    {} / {}", engine.score(), CALLS.len());
    match engine.check_game_over() {
        Some(ending) => println!("  Career over:    [{}] {}", ending.kind, ending.message),
        None => println!("  Career intact:  one more bad approval means dismissal"),
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Two wrong approvals and one correct denial land exactly on the
    /// consequence table: score 1, trust -1, corruption 2, career intact.
    #[test]
    fn test_forged_shift_moves_the_story() {
        let source = LocalSource::with_seed(CONTENT_SEED);
        let mut engine = catalog::shift_for(BORDER_ID)
            .unwrap()
            .with_seed(DICE_SEED)
            .with_flaw_rate(1.0);

        let expected = [false, true, false];

        for (decision, expect_correct) in CALLS.into_iter().zip(expected) {
            let encounter = engine.next_traveler(&source).unwrap();
            assert!(encounter.flaw.is_some());
            assert!(!encounter.report.valid);

            let hint = engine.hint(&source).unwrap();
            assert!(!hint.is_empty());

            let outcome = engine.decide(decision, &source).unwrap();
            assert_eq!(outcome.verdict.correct, expect_correct);

            engine.advance_day();
        }

        assert_eq!(engine.score(), 1);
        assert_eq!(engine.story().trust, -1);
        assert_eq!(engine.story().corruption, 2);
        assert!(engine.check_game_over().is_none());
    }

    #[test]
    fn test_scenario_runs_to_completion() {
        run_scenario().unwrap();
    }
}
