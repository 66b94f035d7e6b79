//! The offline content source.
//!
//! Serves when no API key is configured, and backs the demo scenarios. All
//! content comes from built-in pools: documents from the scaffolding tables,
//! Veritas's voice from the line pools below. Hints and assessments are
//! derived from the rule report the same way the online source's are, so
//! offline play gives the same kind of guidance with less variety.

use std::sync::{Mutex, MutexGuard};

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use veritaminal_contracts::{
    decision::{Decision, Verdict},
    document::Document,
    error::{GameResult, VeritaminalError},
    report::{Assessment, RuleReport},
    story::StoryState,
};
use veritaminal_core::traits::{ContentSource, GenContext};

use crate::scaffold;

const CLEAN_HINTS: &[&str] = &[
    "Nothing jumps out at me. The paperwork reads the way paperwork should.",
    "I ran my checks twice. Quiet ones, this lot.",
    "If something is wrong here, it is hidden better than I can see.",
];

const PERMIT_HINTS: &[&str] = &[
    "Look twice at the permit code. The series does not sit right with me.",
    "I have read a lot of permits today. This one reads like a guess.",
];

const NAME_HINTS: &[&str] = &[
    "Half a name is not a name. Ask yourself where the rest of it went.",
    "The name field feels light. People usually carry more of one.",
];

const SEAL_HINTS: &[&str] = &[
    "Hold it up to the light. Where are the stamps that should be there?",
    "Issued papers carry ink from the issuing office. I see none.",
];

const DATE_HINTS: &[&str] = &[
    "Read the dates twice, and then read them in the other order.",
    "Paper that expires before it exists is a bold kind of paper.",
];

const STORY_HINTS: &[&str] = &[
    "The backstory mentions a route I would not repeat out loud at this desk.",
    "Something in the story disagrees with the day's directives.",
];

const APPROVE_CORRECT_LINES: &[&str] = &[
    "{name} nods and moves through. The line behind them shuffles forward.",
    "The stamp lands. {name} is gone into the crowd before the ink dries.",
];

const APPROVE_WRONG_LINES: &[&str] = &[
    "{name} walks through a little too quickly. Someone in the queue watches you.",
    "The stamp lands. Later, you wonder about the details you chose not to see.",
];

const DENY_CORRECT_LINES: &[&str] = &[
    "{name} argues, then folds the papers away and leaves. The queue approves in silence.",
    "You slide the papers back. {name} does not meet your eyes on the way out.",
];

const DENY_WRONG_LINES: &[&str] = &[
    "{name} pleads for a moment, then goes. You file the doubt away with the carbon copy.",
    "The gate stays shut behind {name}. Somewhere, an appeal letter starts its slow journey.",
];

/// `ContentSource` with no network behind it.
#[derive(Debug)]
pub struct LocalSource {
    rng: Mutex<StdRng>,
}

impl LocalSource {
    /// A source seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// A deterministically seeded source, for demos and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn rng(&self) -> GameResult<MutexGuard<'_, StdRng>> {
        self.rng.lock().map_err(|_| VeritaminalError::Generation {
            reason: "content rng lock poisoned".to_string(),
        })
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(rng: &mut StdRng, lines: &[&str]) -> String {
    lines[rng.random_range(0..lines.len())].to_string()
}

/// Choose a hint pool from the first violation's rule id. Rule packs name
/// rules by what they check ("permit-prefix", "ministry-seal"), so a
/// substring match on the id is enough to land in the right register.
fn hint_for(rng: &mut StdRng, report: &RuleReport) -> String {
    let Some(first) = report.violations.first() else {
        return pick(rng, CLEAN_HINTS);
    };

    let id = first.rule_id.as_str();
    if id.contains("permit") {
        pick(rng, PERMIT_HINTS)
    } else if id.contains("name") {
        pick(rng, NAME_HINTS)
    } else if id.contains("seal") {
        pick(rng, SEAL_HINTS)
    } else if id.contains("date") || id.contains("expiry") {
        pick(rng, DATE_HINTS)
    } else {
        pick(rng, STORY_HINTS)
    }
}

fn reasoning_for(report: &RuleReport) -> String {
    if report.valid {
        "Every field lines up with the directives in force today. I would stamp it.".to_string()
    } else {
        let count = report.violations.len();
        let plural = if count == 1 { "problem" } else { "problems" };
        format!(
            "The checklist finds {} {} with this document: {}",
            count,
            plural,
            report.summary()
        )
    }
}

fn narration_for(
    rng: &mut StdRng,
    state: &StoryState,
    traveler_name: &str,
    verdict: Verdict,
) -> String {
    let pool = match (verdict.decision, verdict.correct) {
        (Decision::Approve, true) => APPROVE_CORRECT_LINES,
        (Decision::Approve, false) => APPROVE_WRONG_LINES,
        (Decision::Deny, true) => DENY_CORRECT_LINES,
        (Decision::Deny, false) => DENY_WRONG_LINES,
    };

    let mut line = pick(rng, pool).replace("{name}", traveler_name);
    if state.corruption >= 2 {
        line.push_str(" Word of flexible judgment travels in certain circles.");
    } else if state.trust <= -2 {
        line.push_str(" The ministry's weekly bulletin mentions rising complaints.");
    }
    line
}

impl ContentSource for LocalSource {
    fn next_document(&self, ctx: &GenContext<'_>) -> GameResult<Document> {
        let mut rng = self.rng()?;
        let name = scaffold::draw_name(&mut rng, ctx.used_names);
        let backstory = scaffold::stock_backstory(&mut rng);
        debug!(traveler = %name, "offline document generated");
        Ok(scaffold::assemble_document(&mut rng, name, backstory, ctx.border))
    }

    fn hint(
        &self,
        _doc: &Document,
        report: &RuleReport,
        _ctx: &GenContext<'_>,
    ) -> GameResult<String> {
        let mut rng = self.rng()?;
        Ok(hint_for(&mut rng, report))
    }

    fn assessment(
        &self,
        _doc: &Document,
        report: &RuleReport,
        _ctx: &GenContext<'_>,
    ) -> GameResult<Assessment> {
        Ok(Assessment::new(
            scaffold::verdict_for(report),
            scaffold::derived_confidence(report),
            reasoning_for(report),
        ))
    }

    fn decision_narrative(
        &self,
        state: &StoryState,
        traveler_name: &str,
        verdict: Verdict,
    ) -> GameResult<String> {
        let mut rng = self.rng()?;
        Ok(narration_for(&mut rng, state, traveler_name, verdict))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use veritaminal_contracts::{
        border::BorderSetting,
        report::{RuleReport, RuleViolation},
    };

    use super::*;

    fn border() -> BorderSetting {
        BorderSetting {
            id: "test_border".to_string(),
            name: "Test Border".to_string(),
            description: "Testing only.".to_string(),
            situation: "Quiet.".to_string(),
            document_requirements: vec![],
            common_issues: vec![],
            customary_seals: vec!["ministry".to_string()],
        }
    }

    fn violation(rule_id: &str) -> RuleReport {
        RuleReport::from_violations(vec![RuleViolation {
            rule_id: rule_id.to_string(),
            message: format!("{} failed", rule_id),
        }])
    }

    #[test]
    fn test_documents_are_clean_by_construction() {
        let source = LocalSource::with_seed(3);
        let border = border();
        let used: Vec<String> = Vec::new();
        let ctx = GenContext {
            border: &border,
            day: 1,
            used_names: &used,
        };

        for _ in 0..20 {
            let doc = source.next_document(&ctx).unwrap();
            assert!(doc.permit.starts_with('P'));
            assert_eq!(doc.permit.len(), 5);
            assert!(doc.permit[1..].chars().all(|c| c.is_ascii_digit()));
            assert!(doc.name.split_whitespace().count() >= 2);
            assert_eq!(doc.seals, vec!["ministry".to_string()]);
            assert!(doc.issued_on < doc.expires_on);
            assert!(!doc.backstory.is_empty());
        }
    }

    #[test]
    fn test_documents_avoid_used_names() {
        let source = LocalSource::with_seed(5);
        let border = border();
        let used = vec!["Anya Volkova".to_string(), "Marek Novak".to_string()];
        let ctx = GenContext {
            border: &border,
            day: 2,
            used_names: &used,
        };

        for _ in 0..30 {
            let doc = source.next_document(&ctx).unwrap();
            assert!(!used.contains(&doc.name));
        }
    }

    #[test]
    fn test_seeded_sources_agree() {
        let border = border();
        let used: Vec<String> = Vec::new();
        let ctx = GenContext {
            border: &border,
            day: 1,
            used_names: &used,
        };

        let a = LocalSource::with_seed(9).next_document(&ctx).unwrap();
        let b = LocalSource::with_seed(9).next_document(&ctx).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hint_register_tracks_the_report() {
        let source = LocalSource::with_seed(1);
        let border = border();
        let used: Vec<String> = Vec::new();
        let ctx = GenContext {
            border: &border,
            day: 1,
            used_names: &used,
        };
        let doc = Document::new("Anya Volkova", "B4821", "Visiting a cousin.");

        let hint = source.hint(&doc, &violation("permit-prefix"), &ctx).unwrap();
        assert!(PERMIT_HINTS.contains(&hint.as_str()));

        let hint = source.hint(&doc, &violation("ministry-seal"), &ctx).unwrap();
        assert!(SEAL_HINTS.contains(&hint.as_str()));

        let hint = source.hint(&doc, &RuleReport::clean(), &ctx).unwrap();
        assert!(CLEAN_HINTS.contains(&hint.as_str()));
    }

    #[test]
    fn test_assessment_follows_the_report() {
        let source = LocalSource::with_seed(1);
        let border = border();
        let used: Vec<String> = Vec::new();
        let ctx = GenContext {
            border: &border,
            day: 1,
            used_names: &used,
        };
        let doc = Document::new("Anya", "B4821X", "Visiting a cousin.");

        let report = violation("permit-prefix");
        let assessment = source.assessment(&doc, &report, &ctx).unwrap();
        assert_eq!(assessment.verdict, Decision::Deny);
        assert!(assessment.confidence > 0.6);
        assert!(assessment.reasoning.contains("permit-prefix failed"));

        let assessment = source.assessment(&doc, &RuleReport::clean(), &ctx).unwrap();
        assert_eq!(assessment.verdict, Decision::Approve);
        assert_eq!(assessment.confidence, 0.82);
    }

    #[test]
    fn test_narration_names_the_traveler() {
        let source = LocalSource::with_seed(1);
        let state = StoryState::default();
        let verdict = Verdict {
            decision: Decision::Approve,
            correct: true,
            points: 1,
        };

        let line = source
            .decision_narrative(&state, "Anya Volkova", verdict)
            .unwrap();
        assert!(line.contains("Anya Volkova"));
    }

    #[test]
    fn test_narration_reflects_a_troubled_career() {
        let source = LocalSource::with_seed(1);
        let state = StoryState {
            day: 4,
            trust: -1,
            corruption: 2,
            approvals: 6,
            denials: 1,
        };
        let verdict = Verdict {
            decision: Decision::Approve,
            correct: false,
            points: 0,
        };

        let line = source
            .decision_narrative(&state, "Anya Volkova", verdict)
            .unwrap();
        assert!(line.contains("flexible judgment"));
    }
}
