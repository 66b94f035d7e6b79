//! # veritaminal-narrative
//!
//! Trust and corruption tracking, day flow, and career endings.
//!
//! ## Overview
//!
//! The story reacts to every decision: correct calls build trust, wrong
//! approvals breed corruption, wrong denials burn trust fast. At the start of
//! each day the state is checked against the ending conditions; a career that
//! survives all ten days is judged on its score.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veritaminal_narrative::{apply_verdict, check_game_over};
//!
//! apply_verdict(&mut log.story, verdict);
//! if let Some(ending) = check_game_over(&log.story, log.score) {
//!     println!("{}", ending.message);
//! }
//! ```

pub mod story;

pub use story::{
    advance_day, apply_verdict, check_game_over, ending, CORRUPTION_LIMIT, CORRUPTION_MAX,
    TRUST_FLOOR, TRUST_MAX, TRUST_MIN, WINNING_SCORE,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use veritaminal_contracts::{
        decision::{Decision, Verdict},
        story::{EndingKind, StoryState, MAX_DAYS},
    };

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn verdict(decision: Decision, correct: bool) -> Verdict {
        Verdict {
            decision,
            correct,
            points: if correct { 1 } else { 0 },
        }
    }

    // ── Consequence table ─────────────────────────────────────────────────────

    /// A correct decision raises trust regardless of direction.
    #[test]
    fn test_correct_decision_builds_trust() {
        let mut state = StoryState::default();

        apply_verdict(&mut state, verdict(Decision::Approve, true));
        assert_eq!(state.trust, 1);
        assert_eq!(state.corruption, 0);

        apply_verdict(&mut state, verdict(Decision::Deny, true));
        assert_eq!(state.trust, 2);
        assert_eq!(state.corruption, 0);
        assert_eq!(state.approvals, 1);
        assert_eq!(state.denials, 1);
    }

    /// Waving a bad document through costs trust and breeds corruption.
    #[test]
    fn test_wrong_approval_breeds_corruption() {
        let mut state = StoryState::default();
        apply_verdict(&mut state, verdict(Decision::Approve, false));

        assert_eq!(state.trust, -1);
        assert_eq!(state.corruption, 1);
    }

    /// Turning away a valid traveler costs double trust but no corruption.
    #[test]
    fn test_wrong_denial_burns_trust() {
        let mut state = StoryState::default();
        apply_verdict(&mut state, verdict(Decision::Deny, false));

        assert_eq!(state.trust, -2);
        assert_eq!(state.corruption, 0);
    }

    /// Trust and corruption never leave their clamped ranges.
    #[test]
    fn test_clamping() {
        let mut state = StoryState::default();
        for _ in 0..30 {
            apply_verdict(&mut state, verdict(Decision::Approve, true));
        }
        assert_eq!(state.trust, TRUST_MAX);

        let mut state = StoryState::default();
        for _ in 0..30 {
            apply_verdict(&mut state, verdict(Decision::Deny, false));
        }
        assert_eq!(state.trust, TRUST_MIN);
    }

    // ── Endings ───────────────────────────────────────────────────────────────

    /// A fresh career is not over.
    #[test]
    fn test_fresh_career_continues() {
        let state = StoryState::default();
        assert!(check_game_over(&state, 0).is_none());
    }

    /// Corruption at the limit ends the career immediately, before the day
    /// count matters.
    #[test]
    fn test_corrupt_ending() {
        let mut state = StoryState::default();
        state.corruption = CORRUPTION_LIMIT;
        state.day = 4;

        let ending = check_game_over(&state, 3).unwrap();
        assert_eq!(ending.kind, EndingKind::Corrupt);
    }

    /// Trust at the floor ends the career in the strict ending.
    #[test]
    fn test_strict_ending() {
        let mut state = StoryState::default();
        state.trust = TRUST_FLOOR;
        state.day = 6;

        let ending = check_game_over(&state, 5).unwrap();
        assert_eq!(ending.kind, EndingKind::Strict);
    }

    /// When both conditions hold at once, corruption takes precedence.
    #[test]
    fn test_corruption_outranks_strictness() {
        let mut state = StoryState::default();
        state.corruption = CORRUPTION_LIMIT;
        state.trust = TRUST_FLOOR;

        let ending = check_game_over(&state, 0).unwrap();
        assert_eq!(ending.kind, EndingKind::Corrupt);
    }

    /// Surviving past the final day is judged on score: at the winning score
    /// the ending is good, one point short it is bad.
    #[test]
    fn test_final_day_judged_on_score() {
        let mut state = StoryState::default();
        state.day = MAX_DAYS + 1;

        let good = check_game_over(&state, WINNING_SCORE).unwrap();
        assert_eq!(good.kind, EndingKind::Good);

        let bad = check_game_over(&state, WINNING_SCORE - 1).unwrap();
        assert_eq!(bad.kind, EndingKind::Bad);
    }

    /// The last scheduled day still plays; the career only ends after it.
    #[test]
    fn test_last_day_still_plays() {
        let mut state = StoryState::default();
        state.day = MAX_DAYS;
        assert!(check_game_over(&state, 9).is_none());
    }

    // ── Day flow ──────────────────────────────────────────────────────────────

    /// Advancing the day increments the counter and carries the milestone and
    /// new directives into the announcement.
    #[test]
    fn test_advance_day_banner() {
        let mut state = StoryState::default();

        let start = advance_day(
            &mut state,
            Some("A ministry inspector arrives unannounced.".to_string()),
            vec!["Ministry Seal".to_string()],
        );

        assert_eq!(state.day, 2);
        assert_eq!(start.day, 2);

        let banner = start.banner();
        assert!(banner.starts_with("Day 2 begins."));
        assert!(banner.contains("inspector"));
        assert!(banner.contains("Ministry Seal"));
    }
}
