//! Prompt text for the Gemini-backed source.
//!
//! Three personas, one per kind of content: a document generator, Veritas
//! the booth assistant, and a narrator. The persona text sets the voice;
//! the builder functions below fill in the per-call details. Keeping every
//! prompt here, as plain functions of game state, means the wire layer in
//! `gemini` stays mechanical and the prompts stay testable.

use veritaminal_contracts::{
    border::BorderSetting,
    decision::Verdict,
    document::Document,
    report::RuleReport,
    story::{StoryState, MAX_DAYS},
};

/// Persona for traveler document pieces. Generation is asked for clean
/// content only; tampering is the engine's job, never the model's.
pub const DOCUMENT_GENERATION: &str = "You are a document generation system for a \
border control game. Generate realistic but fictional traveler details. Create \
varied and plausible names and backstories. Reply with only the requested text, \
no labels and no commentary.";

/// Persona for hints and assessments.
pub const VERITAS_ASSISTANT: &str = "You are Veritas, an AI assistant to a border \
control agent. Provide subtle hints about document authenticity. Be informative \
but slightly ambiguous. Your goal is to assist without making the decision for \
the agent. Avoid directly telling the agent the answer, and keep your hints \
subtle.";

/// Persona for post-decision narration.
pub const NARRATIVE_GENERATION: &str = "You are crafting a branching narrative for \
a border control simulation game. Create engaging story elements that respond to \
the player's decisions. Maintain consistency with the game's world and prior \
events. Keep the text concise (25-50 words) and atmospheric.";

/// Output budget for document pieces (a name or a backstory).
pub const DOCUMENT_TOKENS: u32 = 200;

/// Output budget for hints and assessment reasoning.
pub const HINT_TOKENS: u32 = 100;

/// Output budget for narrative updates. Generous so the model never cuts a
/// sentence short; the prompt itself asks for one or two sentences.
pub const NARRATIVE_TOKENS: u32 = 2000;

/// How many recent names the name prompt lists as taken. Careers run long
/// enough that sending the whole history would bloat every request.
const AVOID_LIST_CAP: usize = 20;

/// Prompt for a fresh traveler name.
pub fn name_prompt(border_name: &str, used_names: &[String]) -> String {
    let mut prompt = format!(
        "Generate a unique traveler name (first and last name) for someone \
         crossing {}. Reply with the name only.",
        border_name
    );
    if !used_names.is_empty() {
        let recent: Vec<&str> = used_names
            .iter()
            .rev()
            .take(AVOID_LIST_CAP)
            .map(String::as_str)
            .collect();
        prompt.push_str(&format!(
            " Do not reuse any of these names: {}.",
            recent.join(", ")
        ));
    }
    prompt
}

/// Prompt for a one-sentence backstory for a named traveler.
pub fn backstory_prompt(name: &str, border: &BorderSetting) -> String {
    format!(
        "Create a one-sentence backstory for a traveler named {} at {}. {} \
         Mention where they are going and why. Reply with the sentence only.",
        name, border.name, border.situation
    )
}

/// Prompt for Veritas's booth hint.
///
/// The rulebook's finding rides along so the hint can gesture at something
/// real, but the persona is told to keep it oblique.
pub fn hint_prompt(doc: &Document, report: &RuleReport) -> String {
    format!(
        "Analyze this traveler: Name: {}, Permit: {}, Backstory: {}. Provide a \
         subtle hint about document authenticity without directly revealing \
         whether it is valid. Internal checklist, never to be quoted directly: {}.",
        doc.name,
        doc.permit,
        doc.backstory,
        checklist_line(report)
    )
}

/// Prompt for the reasoning text of a full assessment. The verdict and
/// confidence are derived from the report, not from the model; this prompt
/// only asks for the prose that goes with them.
pub fn assessment_prompt(doc: &Document, report: &RuleReport) -> String {
    let seals = if doc.seals.is_empty() {
        "none".to_string()
    } else {
        doc.seals.join(", ")
    };
    format!(
        "Give your reasoning (one or two sentences) about this document. \
         Name: {}, Permit: {}, Seals: {}, Backstory: {}. Internal checklist, \
         never to be quoted directly: {}. Point at the evidence rather than \
         stating a final verdict.",
        doc.name, doc.permit, seals, doc.backstory, checklist_line(report)
    )
}

/// Prompt for the narration that follows a decision.
pub fn narrative_prompt(state: &StoryState, traveler_name: &str, verdict: Verdict) -> String {
    format!(
        "Traveler: {}\n\
         Player decision: {}\n\
         Decision correctness: {}\n\
         Current corruption level: {}\n\
         Current trust level: {}\n\
         Day: {} of {}\n\n\
         Generate a brief narrative update (one or two sentences) describing \
         the consequences of this decision at the checkpoint.",
        traveler_name,
        verdict.decision,
        if verdict.correct { "correct" } else { "incorrect" },
        state.corruption,
        state.trust,
        state.day,
        MAX_DAYS,
    )
}

fn checklist_line(report: &RuleReport) -> String {
    if report.valid {
        "every check passes".to_string()
    } else {
        report.summary()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use veritaminal_contracts::{
        border::BorderSetting,
        decision::{Decision, Verdict},
        document::Document,
        report::{RuleReport, RuleViolation},
        story::StoryState,
    };

    use super::*;

    fn border() -> BorderSetting {
        BorderSetting {
            id: "eastokva_crossing".to_string(),
            name: "Eastokva Crossing".to_string(),
            description: "A northern land crossing.".to_string(),
            situation: "Smuggling is up this season.".to_string(),
            document_requirements: vec![],
            common_issues: vec![],
            customary_seals: vec!["ministry".to_string()],
        }
    }

    #[test]
    fn test_name_prompt_lists_recent_names_only() {
        let used: Vec<String> = (0..30).map(|i| format!("Traveler Number{}", i)).collect();
        let prompt = name_prompt("Eastokva Crossing", &used);

        assert!(prompt.contains("Eastokva Crossing"));
        assert!(prompt.contains("Traveler Number29"));
        assert!(prompt.contains("Traveler Number10"));
        // Older names fall off the avoid list.
        assert!(!prompt.contains("Traveler Number9,"));
        assert!(!prompt.contains("Traveler Number0,"));
    }

    #[test]
    fn test_name_prompt_without_history_has_no_avoid_list() {
        let prompt = name_prompt("Eastokva Crossing", &[]);
        assert!(!prompt.contains("Do not reuse"));
    }

    #[test]
    fn test_hint_prompt_carries_the_checklist() {
        let doc = Document::new("Anya Volkova", "B4821", "Visiting a cousin.");
        let report = RuleReport::from_violations(vec![RuleViolation {
            rule_id: "permit-prefix".to_string(),
            message: "permit does not start with 'P'".to_string(),
        }]);

        let prompt = hint_prompt(&doc, &report);
        assert!(prompt.contains("Anya Volkova"));
        assert!(prompt.contains("B4821"));
        assert!(prompt.contains("permit does not start with 'P'"));
        assert!(prompt.contains("never to be quoted directly"));
    }

    #[test]
    fn test_hint_prompt_for_clean_documents() {
        let doc = Document::new("Anya Volkova", "P4821", "Visiting a cousin.");
        let prompt = hint_prompt(&doc, &RuleReport::clean());
        assert!(prompt.contains("every check passes"));
    }

    #[test]
    fn test_backstory_prompt_mentions_the_situation() {
        let prompt = backstory_prompt("Anya Volkova", &border());
        assert!(prompt.contains("Anya Volkova"));
        assert!(prompt.contains("Smuggling is up this season."));
    }

    #[test]
    fn test_narrative_prompt_shape() {
        let state = StoryState {
            day: 3,
            trust: -1,
            corruption: 2,
            approvals: 4,
            denials: 2,
        };
        let verdict = Verdict {
            decision: Decision::Approve,
            correct: false,
            points: 0,
        };

        let prompt = narrative_prompt(&state, "Anya Volkova", verdict);
        assert!(prompt.contains("Player decision: approve"));
        assert!(prompt.contains("Decision correctness: incorrect"));
        assert!(prompt.contains("Current corruption level: 2"));
        assert!(prompt.contains("Current trust level: -1"));
        assert!(prompt.contains("Day: 3 of 10"));
    }
}
