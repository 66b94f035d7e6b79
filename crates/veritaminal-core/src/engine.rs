//! The shift engine: the deterministic driver of one career.
//!
//! The engine enforces the encounter pipeline:
//!
//!   Generate → Tamper (maybe) → Evaluate → [player decides] → Score → Story → Record
//!
//! The correctness invariant is absolute: whether a decision was right is
//! judged by evaluating the document against the rulebook at the moment of
//! decision. A content source can invent names and backstories, but it never
//! gets a vote on validity.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, warn};

use veritaminal_contracts::{
    border::{BorderSetting, Milestone},
    decision::{Decision, Verdict},
    document::Document,
    error::{GameResult, VeritaminalError},
    report::{Assessment, RuleReport},
    story::{DayStart, Ending, StoryState},
};
use veritaminal_memory::MemoryLog;
use veritaminal_rules::Rulebook;

use crate::traits::{ContentSource, GenContext};
use crate::flaw::DocumentFlaw;

/// Chance that a freshly generated document gets a flaw planted in it.
pub const FLAW_RATE: f64 = 0.3;

/// Stock narration used when the source cannot produce any.
const FALLBACK_NARRATION: &str = "The line shuffles forward.";

/// A traveler standing at the booth, waiting for a decision.
#[derive(Debug, Clone)]
pub struct Encounter {
    /// The document as presented, flaw included if one was planted.
    pub document: Document,

    /// The rulebook's finding at generation time. Feeds hints and
    /// assessments; correctness is recomputed when the decision lands.
    pub report: RuleReport,

    /// The flaw the engine planted, if any. Revealed in post-decision
    /// feedback, never to the deciding player.
    pub flaw: Option<DocumentFlaw>,
}

/// Everything that came out of one decision.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The decision and whether it was correct.
    pub verdict: Verdict,

    /// The document that was decided on.
    pub document: Document,

    /// The rulebook's finding at decision time.
    pub report: RuleReport,

    /// The flaw that was planted, if any.
    pub flaw: Option<DocumentFlaw>,

    /// Narration reacting to the decision.
    pub narrative: String,
}

/// The central engine that drives a single career.
///
/// Owns the rulebook, the border definition with its scripted milestones,
/// and the career memory. Content sources are passed per call so the same
/// engine can run against the online or the offline source.
pub struct ShiftEngine {
    border: BorderSetting,
    rulebook: Rulebook,
    milestones: Vec<Milestone>,
    log: MemoryLog,
    rng: StdRng,
    flaw_rate: f64,
    pending: Option<Encounter>,
}

impl ShiftEngine {
    /// Start a fresh career at `border`.
    pub fn new(border: BorderSetting, rulebook: Rulebook, milestones: Vec<Milestone>) -> Self {
        let log = MemoryLog::new(border.id.clone());
        Self::resume(border, rulebook, milestones, log)
    }

    /// Continue a career from a loaded memory log.
    pub fn resume(
        border: BorderSetting,
        rulebook: Rulebook,
        milestones: Vec<Milestone>,
        log: MemoryLog,
    ) -> Self {
        Self {
            border,
            rulebook,
            milestones,
            log,
            rng: StdRng::from_os_rng(),
            flaw_rate: FLAW_RATE,
            pending: None,
        }
    }

    /// Reseed the flaw dice for reproducible runs, as the demo scenarios do.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Override the tamper probability, forcing an all-clean (0.0) or
    /// all-forged (1.0) queue.
    pub fn with_flaw_rate(mut self, rate: f64) -> Self {
        self.flaw_rate = rate.clamp(0.0, 1.0);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn border(&self) -> &BorderSetting {
        &self.border
    }

    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    pub fn log(&self) -> &MemoryLog {
        &self.log
    }

    pub fn story(&self) -> &StoryState {
        &self.log.story
    }

    pub fn score(&self) -> u32 {
        self.log.score
    }

    pub fn day(&self) -> u32 {
        self.log.story.day
    }

    /// The traveler currently at the booth, if any.
    pub fn pending(&self) -> Option<&Encounter> {
        self.pending.as_ref()
    }

    // ── Day flow ─────────────────────────────────────────────────────────────

    /// The announcement for the day already in progress.
    ///
    /// Used when a career starts or resumes. Day 1 announces no directives;
    /// the base rules are standing orders, not news.
    pub fn current_day_start(&self) -> DayStart {
        let day = self.log.story.day;
        DayStart {
            day,
            milestone: self.milestone_for(day),
            new_rules: if day > 1 {
                self.new_rule_names(day)
            } else {
                Vec::new()
            },
        }
    }

    /// Close the current day and announce the next one.
    pub fn advance_day(&mut self) -> DayStart {
        let next = self.log.story.day + 1;
        let milestone = self.milestone_for(next);
        let new_rules = self.new_rule_names(next);
        veritaminal_narrative::advance_day(&mut self.log.story, milestone, new_rules)
    }

    /// Whether the career has ended, checked at the start of each day.
    pub fn check_game_over(&self) -> Option<Ending> {
        veritaminal_narrative::check_game_over(&self.log.story, self.log.score)
    }

    fn milestone_for(&self, day: u32) -> Option<String> {
        self.milestones
            .iter()
            .find(|m| m.day == day)
            .map(|m| m.text.clone())
    }

    fn new_rule_names(&self, day: u32) -> Vec<String> {
        self.rulebook
            .introduced_on(day)
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    fn gen_context(&self) -> GenContext<'_> {
        GenContext {
            border: &self.border,
            day: self.log.story.day,
            used_names: &self.log.used_names,
        }
    }

    // ── Encounter pipeline ───────────────────────────────────────────────────

    /// Call the next traveler to the booth.
    ///
    /// # Pipeline
    ///
    /// 1. Ask the source for a clean document.
    /// 2. Roll the flaw dice; on a hit, plant the first flaw (from a random
    ///    starting candidate) that applies and that the day's rules catch.
    /// 3. Evaluate the (possibly tampered) document against the day's rules.
    ///
    /// Errors when a traveler is already waiting: the booth takes one
    /// person at a time.
    pub fn next_traveler(&mut self, source: &dyn ContentSource) -> GameResult<&Encounter> {
        if self.pending.is_some() {
            return Err(VeritaminalError::OutOfTurn {
                reason: "a traveler is already at the booth".to_string(),
            });
        }

        let day = self.log.story.day;

        // ── Step 1: Generate ─────────────────────────────────────────────────
        let ctx = self.gen_context();
        let mut document = source.next_document(&ctx)?;

        // ── Step 2: Maybe tamper ─────────────────────────────────────────────
        let flaw = if self.rng.random_bool(self.flaw_rate) {
            self.plant_flaw(&mut document)
        } else {
            None
        };

        // ── Step 3: Evaluate ─────────────────────────────────────────────────
        let report = self.rulebook.evaluate(&document, day);

        info!(
            traveler = %document.name,
            permit = %document.permit,
            day,
            valid = report.valid,
            tampered = flaw.is_some(),
            "traveler at the booth"
        );

        Ok(self.pending.insert(Encounter {
            document,
            report,
            flaw,
        }))
    }

    /// Plant a flaw in `doc`, starting from a random candidate and falling
    /// through to the next until one fits. A candidate must both apply to
    /// this document and produce a violation under the day's rules; stripping
    /// seals before a seal rule is in force, say, tampers with nothing worth
    /// catching. Returns `None` when no candidate qualifies.
    fn plant_flaw(&mut self, doc: &mut Document) -> Option<DocumentFlaw> {
        let count = DocumentFlaw::ALL.len();
        let start = self.rng.random_range(0..count);
        let day = self.log.story.day;

        for offset in 0..count {
            let flaw = DocumentFlaw::ALL[(start + offset) % count];
            if !flaw.applies_to(doc) {
                continue;
            }

            let mut tampered = doc.clone();
            flaw.apply(&mut tampered);
            if self.rulebook.evaluate(&tampered, day).valid {
                continue;
            }

            *doc = tampered;
            debug!(?flaw, "flaw planted");
            return Some(flaw);
        }

        debug!("no catchable flaw; document stays clean");
        None
    }

    /// Veritas's one-line hint about the waiting traveler.
    pub fn hint(&self, source: &dyn ContentSource) -> GameResult<String> {
        let encounter = self.pending.as_ref().ok_or_else(|| VeritaminalError::OutOfTurn {
            reason: "no traveler at the booth".to_string(),
        })?;

        source.hint(&encounter.document, &encounter.report, &self.gen_context())
    }

    /// Veritas's full assessment of the waiting traveler.
    pub fn assessment(&self, source: &dyn ContentSource) -> GameResult<Assessment> {
        let encounter = self.pending.as_ref().ok_or_else(|| VeritaminalError::OutOfTurn {
            reason: "no traveler at the booth".to_string(),
        })?;

        source.assessment(&encounter.document, &encounter.report, &self.gen_context())
    }

    /// Decide on the waiting traveler.
    ///
    /// # Pipeline
    ///
    /// 1. Re-evaluate the document against the rules in force right now;
    ///    a decision is correct when it matches that verdict.
    /// 2. Apply score and story consequences.
    /// 3. Append the decision to the career memory chain.
    /// 4. Ask the source for narration. The decision is already recorded at
    ///    this point, so narration failures cost flavor, not progress.
    pub fn decide(&mut self, decision: Decision, source: &dyn ContentSource) -> GameResult<Outcome> {
        let encounter = self.pending.take().ok_or_else(|| VeritaminalError::OutOfTurn {
            reason: "no traveler at the booth".to_string(),
        })?;

        let day = self.log.story.day;

        // ── Step 1: Judge ────────────────────────────────────────────────────
        let report = self.rulebook.evaluate(&encounter.document, day);
        let correct = match decision {
            Decision::Approve => report.valid,
            Decision::Deny => !report.valid,
        };
        let verdict = Verdict {
            decision,
            correct,
            points: u32::from(correct),
        };

        // ── Step 2: Consequences ─────────────────────────────────────────────
        self.log.score += verdict.points;
        veritaminal_narrative::apply_verdict(&mut self.log.story, verdict);

        // ── Step 3: Record ───────────────────────────────────────────────────
        self.log.record_traveler(
            day,
            encounter.document.name.clone(),
            encounter.document.permit.clone(),
            decision,
            correct,
            report.violated_rule_ids(),
        );

        // ── Step 4: Narrate ──────────────────────────────────────────────────
        let narrative = match source.decision_narrative(
            &self.log.story,
            &encounter.document.name,
            verdict,
        ) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "narration failed; using stock line");
                FALLBACK_NARRATION.to_string()
            }
        };

        info!(
            traveler = %encounter.document.name,
            decision = %decision,
            correct,
            score = self.log.score,
            trust = self.log.story.trust,
            corruption = self.log.story.corruption,
            "decision recorded"
        );

        Ok(Outcome {
            verdict,
            document: encounter.document,
            report,
            flaw: encounter.flaw,
            narrative,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use veritaminal_contracts::{
        border::{BorderSetting, Milestone},
        decision::{Decision, Verdict},
        document::Document,
        error::{GameResult, VeritaminalError},
        report::{Assessment, RuleReport},
        story::{EndingKind, StoryState},
    };
    use veritaminal_rules::Rulebook;

    use crate::flaw::DocumentFlaw;
    use crate::traits::{ContentSource, GenContext};

    use super::ShiftEngine;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A source that serves the same document every time and counts calls.
    struct MockSource {
        doc: Document,
        narration_fails: bool,
        documents_served: Arc<Mutex<u32>>,
    }

    impl MockSource {
        fn serving(doc: Document) -> Self {
            Self {
                doc,
                narration_fails: false,
                documents_served: Arc::new(Mutex::new(0)),
            }
        }

        fn without_narration(doc: Document) -> Self {
            Self {
                narration_fails: true,
                ..Self::serving(doc)
            }
        }
    }

    impl ContentSource for MockSource {
        fn next_document(&self, _ctx: &GenContext<'_>) -> GameResult<Document> {
            *self.documents_served.lock().unwrap() += 1;
            Ok(self.doc.clone())
        }

        fn hint(
            &self,
            doc: &Document,
            _report: &RuleReport,
            _ctx: &GenContext<'_>,
        ) -> GameResult<String> {
            Ok(format!("Look closely at {}'s permit.", doc.name))
        }

        fn assessment(
            &self,
            _doc: &Document,
            report: &RuleReport,
            _ctx: &GenContext<'_>,
        ) -> GameResult<Assessment> {
            let verdict = if report.valid {
                Decision::Approve
            } else {
                Decision::Deny
            };
            Ok(Assessment::new(verdict, 0.85, "routine check"))
        }

        fn decision_narrative(
            &self,
            _state: &StoryState,
            traveler_name: &str,
            _verdict: Verdict,
        ) -> GameResult<String> {
            if self.narration_fails {
                Err(VeritaminalError::Generation {
                    reason: "offline".to_string(),
                })
            } else {
                Ok(format!("{} passes out of sight.", traveler_name))
            }
        }
    }

    fn test_border() -> BorderSetting {
        BorderSetting {
            id: "test_border".to_string(),
            name: "Test Border".to_string(),
            description: "A checkpoint that exists only in tests.".to_string(),
            situation: "Quiet.".to_string(),
            document_requirements: vec![],
            common_issues: vec![],
            customary_seals: vec![],
        }
    }

    fn test_rulebook() -> Rulebook {
        Rulebook::from_toml_str(
            r#"
            [[rules]]
            id = "permit-prefix"
            name = "Permit Prefix"
            description = "Valid permits begin with the letter P"

            [rules.check]
            type = "permit_prefix"
            prefix = "P"

            [[rules]]
            id = "permit-number"
            name = "Permit Number"
            description = "Permits are five characters ending in four digits"

            [rules.check]
            type = "permit_number"
            length = 5
            digits = 4

            [[rules]]
            id = "full-name"
            name = "Full Name"
            description = "Travelers must present a first and last name"

            [rules.check]
            type = "full_name"
            min_parts = 2

            [[rules]]
            id = "ministry-seal"
            name = "Ministry Seal"
            description = "Documents must carry the Ministry seal"
            day_introduced = 2

            [rules.check]
            type = "required_seal"
            seal = "ministry"
        "#,
        )
        .unwrap()
    }

    fn clean_doc() -> Document {
        Document::new("Anya Volkova", "P4821", "Visiting a cousin in the capital.")
    }

    /// A document where only the permit-suffix flaw applies, making the
    /// planted flaw deterministic regardless of the dice.
    fn suffix_only_doc() -> Document {
        Document::new("Anya", "B4821", "Rides the same cart every week.")
    }

    fn engine(flaw_rate: f64) -> ShiftEngine {
        ShiftEngine::new(test_border(), test_rulebook(), vec![])
            .with_seed(7)
            .with_flaw_rate(flaw_rate)
    }

    // ── Test cases ───────────────────────────────────────────────────────────

    /// With the flaw dice disarmed, a clean document arrives untouched and
    /// approving it is correct: score and trust both rise.
    #[test]
    fn test_clean_document_approved() {
        let mut engine = engine(0.0);
        let source = MockSource::serving(clean_doc());

        let encounter = engine.next_traveler(&source).unwrap();
        assert!(encounter.report.valid);
        assert!(encounter.flaw.is_none());
        assert_eq!(encounter.document.permit, "P4821");

        let outcome = engine.decide(Decision::Approve, &source).unwrap();
        assert!(outcome.verdict.correct);
        assert_eq!(outcome.narrative, "Anya Volkova passes out of sight.");

        assert_eq!(engine.score(), 1);
        assert_eq!(engine.story().trust, 1);
        assert_eq!(engine.log().len(), 1);
        assert!(engine.log().verify_integrity().is_ok());
    }

    /// With the flaw dice forced on, the engine tampers with the document
    /// and denying it is the correct call.
    #[test]
    fn test_forged_document_denied() {
        let mut engine = engine(1.0);
        let source = MockSource::serving(suffix_only_doc());

        let encounter = engine.next_traveler(&source).unwrap();
        assert_eq!(encounter.flaw, Some(DocumentFlaw::PermitSuffix));
        assert_eq!(encounter.document.permit, "B4821X");
        assert!(!encounter.report.valid);

        let outcome = engine.decide(Decision::Deny, &source).unwrap();
        assert!(outcome.verdict.correct);
        assert_eq!(engine.score(), 1);
    }

    /// Waving a forged document through is wrong: no points, corruption up,
    /// trust down.
    #[test]
    fn test_wrong_approval_consequences() {
        let mut engine = engine(1.0);
        let source = MockSource::serving(suffix_only_doc());

        engine.next_traveler(&source).unwrap();
        let outcome = engine.decide(Decision::Approve, &source).unwrap();

        assert!(!outcome.verdict.correct);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.story().corruption, 1);
        assert_eq!(engine.story().trust, -1);
    }

    /// The booth takes one traveler at a time.
    #[test]
    fn test_one_traveler_at_a_time() {
        let mut engine = engine(0.0);
        let source = MockSource::serving(clean_doc());
        let served = source.documents_served.clone();

        engine.next_traveler(&source).unwrap();
        match engine.next_traveler(&source) {
            Err(VeritaminalError::OutOfTurn { reason }) => {
                assert!(reason.contains("already at the booth"));
            }
            other => panic!("expected OutOfTurn, got {:?}", other),
        }

        // The second call must not have reached the source.
        assert_eq!(*served.lock().unwrap(), 1);
    }

    /// Deciding with nobody at the booth is out of turn.
    #[test]
    fn test_decide_requires_traveler() {
        let mut engine = engine(0.0);
        let source = MockSource::serving(clean_doc());

        assert!(matches!(
            engine.decide(Decision::Approve, &source),
            Err(VeritaminalError::OutOfTurn { .. })
        ));
    }

    /// Hint and assessment both flow through the source with the current
    /// encounter's document and report.
    #[test]
    fn test_hint_and_assessment_delegate() {
        let mut engine = engine(0.0);
        let source = MockSource::serving(clean_doc());

        engine.next_traveler(&source).unwrap();

        let hint = engine.hint(&source).unwrap();
        assert!(hint.contains("Anya Volkova"));

        let assessment = engine.assessment(&source).unwrap();
        assert_eq!(assessment.verdict, Decision::Approve);
        assert!((assessment.confidence - 0.85).abs() < f64::EPSILON);
    }

    /// Narration failures after a decision cost only flavor: the outcome is
    /// returned with a stock line and the record stands.
    #[test]
    fn test_narration_failure_falls_back() {
        let mut engine = engine(0.0);
        let source = MockSource::without_narration(clean_doc());

        engine.next_traveler(&source).unwrap();
        let outcome = engine.decide(Decision::Approve, &source).unwrap();

        assert_eq!(outcome.narrative, "The line shuffles forward.");
        assert_eq!(engine.log().len(), 1);
    }

    /// Correctness follows the rules in force at decision time: a document
    /// that was fine yesterday is judged by today's rules.
    #[test]
    fn test_validity_recomputed_at_decision_time() {
        let mut engine = engine(0.0);
        let source = MockSource::serving(clean_doc());

        // Day 1: the ministry-seal rule is dormant and the document is clean.
        let encounter = engine.next_traveler(&source).unwrap();
        assert!(encounter.report.valid);

        // The day turns over while the traveler is still waiting.
        engine.advance_day();

        // Day 2: the seal rule is now in force, so denying is correct.
        let outcome = engine.decide(Decision::Deny, &source).unwrap();
        assert!(outcome.verdict.correct);
        assert_eq!(outcome.report.violated_rule_ids(), vec!["ministry-seal"]);
    }

    /// Day announcements carry the milestone and newly introduced directives.
    #[test]
    fn test_advance_day_announcement() {
        let milestones = vec![Milestone {
            day: 2,
            text: "A ministry inspector arrives unannounced.".to_string(),
        }];
        let mut engine = ShiftEngine::new(test_border(), test_rulebook(), milestones)
            .with_seed(7)
            .with_flaw_rate(0.0);

        let start = engine.advance_day();
        assert_eq!(start.day, 2);
        assert_eq!(engine.day(), 2);
        assert_eq!(
            start.milestone.as_deref(),
            Some("A ministry inspector arrives unannounced.")
        );
        assert_eq!(start.new_rules, vec!["Ministry Seal"]);
    }

    /// Day 1 announces the milestone but not the standing base directives.
    #[test]
    fn test_day_one_start_is_quiet() {
        let milestones = vec![Milestone {
            day: 1,
            text: "First morning at the booth.".to_string(),
        }];
        let engine = ShiftEngine::new(test_border(), test_rulebook(), milestones)
            .with_flaw_rate(0.0);

        let start = engine.current_day_start();
        assert_eq!(start.day, 1);
        assert!(start.new_rules.is_empty());
        assert!(start.milestone.is_some());
    }

    /// Three wrong approvals corrupt the career beyond saving.
    #[test]
    fn test_corruption_ends_career() {
        let mut engine = engine(1.0);
        let source = MockSource::serving(suffix_only_doc());

        for _ in 0..3 {
            engine.next_traveler(&source).unwrap();
            engine.decide(Decision::Approve, &source).unwrap();
        }

        let ending = engine.check_game_over().unwrap();
        assert_eq!(ending.kind, EndingKind::Corrupt);
    }
}
