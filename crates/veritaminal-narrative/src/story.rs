//! Story state transitions: decision consequences, day flow, endings.
//!
//! The state itself lives in `veritaminal_contracts::story::StoryState` (and
//! is persisted inside the career memory); this module holds the transition
//! rules. Consequence table:
//!
//! | decision            | trust | corruption |
//! |---------------------|-------|------------|
//! | correct (either)    |  +1   |     0      |
//! | wrongly approved    |  -1   |    +1      |
//! | wrongly denied      |  -2   |     0      |
//!
//! Wrong approvals let a bad document through, which reads as complicity;
//! wrong denials turn away the innocent, which costs trust twice as fast.

use tracing::{debug, info};

use veritaminal_contracts::{
    decision::{Decision, Verdict},
    story::{DayStart, Ending, EndingKind, StoryState, MAX_DAYS},
};

/// Trust is clamped to this closed range.
pub const TRUST_MIN: i32 = -10;
/// Trust is clamped to this closed range.
pub const TRUST_MAX: i32 = 10;
/// Corruption is clamped to `0..=CORRUPTION_MAX`.
pub const CORRUPTION_MAX: i32 = 10;

/// Corruption at or above this ends the career in disgrace.
pub const CORRUPTION_LIMIT: i32 = 3;
/// Trust at or below this ends the career in exile.
pub const TRUST_FLOOR: i32 = -3;
/// Score needed after the final day for the good ending.
pub const WINNING_SCORE: u32 = 7;

/// Apply one decision's consequences to the story state.
///
/// Tallies the decision and shifts trust and corruption per the consequence
/// table, clamping both to their ranges.
pub fn apply_verdict(state: &mut StoryState, verdict: Verdict) {
    match verdict.decision {
        Decision::Approve => state.approvals += 1,
        Decision::Deny => state.denials += 1,
    }

    if verdict.correct {
        state.trust += 1;
    } else {
        match verdict.decision {
            Decision::Approve => {
                state.corruption += 1;
                state.trust -= 1;
            }
            Decision::Deny => {
                state.trust -= 2;
            }
        }
    }

    state.trust = state.trust.clamp(TRUST_MIN, TRUST_MAX);
    state.corruption = state.corruption.clamp(0, CORRUPTION_MAX);

    debug!(
        decision = %verdict.decision,
        correct = verdict.correct,
        trust = state.trust,
        corruption = state.corruption,
        "story state updated"
    );
}

/// Move the story to the next day and describe its start.
///
/// `milestone` is the border's scripted event for the new day, if any;
/// `new_rules` are the names of directives coming into force. Both flow into
/// the returned `DayStart` announcement.
pub fn advance_day(
    state: &mut StoryState,
    milestone: Option<String>,
    new_rules: Vec<String>,
) -> DayStart {
    state.day += 1;

    info!(day = state.day, "day advanced");

    DayStart {
        day: state.day,
        milestone,
        new_rules,
    }
}

/// Check whether the career has ended, and how.
///
/// Checked at the start of each day, before a traveler is generated.
/// Corruption is checked first: an inspector who is both corrupt and
/// distrusted is remembered for the bribes. Outlasting day `MAX_DAYS` ends
/// the career by score.
pub fn check_game_over(state: &StoryState, score: u32) -> Option<Ending> {
    let kind = if state.corruption >= CORRUPTION_LIMIT {
        EndingKind::Corrupt
    } else if state.trust <= TRUST_FLOOR {
        EndingKind::Strict
    } else if state.day > MAX_DAYS {
        if score >= WINNING_SCORE {
            EndingKind::Good
        } else {
            EndingKind::Bad
        }
    } else {
        return None;
    };

    info!(
        kind = %kind,
        day = state.day,
        trust = state.trust,
        corruption = state.corruption,
        score,
        "career ended"
    );

    Some(ending(kind))
}

/// The canonical ending text for each career outcome.
pub fn ending(kind: EndingKind) -> Ending {
    let message = match kind {
        EndingKind::Good => {
            "You have served the borderlands with distinction. Ten days of sound \
             judgment earned you a commendation and a quiet posting of your choosing."
        }
        EndingKind::Bad => {
            "Ten days came and went, but too many errors crossed your desk. The \
             ministry reassigns you to a records basement far from any border."
        }
        EndingKind::Corrupt => {
            "Too many bribes, too many blind eyes. Internal Affairs arrives at your \
             booth with a warrant bearing your name."
        }
        EndingKind::Strict => {
            "Your rigid denials turned away the innocent along with the guilty. The \
             borderland grows to hate the checkpoint, and the ministry quietly \
             withdraws your commission."
        }
    };

    Ending {
        kind,
        message: message.to_string(),
    }
}
