//! The content source trait: where documents and Veritas's voice come from.
//!
//! The shift engine is deterministic and owns all game rules; everything
//! creative flows through `ContentSource`. Implementations may be backed by
//! an LLM (the Gemini source) or by local tables (the offline source), and
//! the engine treats both identically: generated content never decides
//! validity, the rulebook does.

use veritaminal_contracts::{
    border::BorderSetting,
    decision::Verdict,
    document::Document,
    error::GameResult,
    report::{Assessment, RuleReport},
    story::StoryState,
};

/// Everything a source needs to know to generate content for one encounter.
#[derive(Debug, Clone, Copy)]
pub struct GenContext<'a> {
    /// The border the career is served at.
    pub border: &'a BorderSetting,

    /// Current career day (1-based).
    pub day: u32,

    /// Traveler names already used this career. Sources should avoid them so
    /// the queue does not repeat faces.
    pub used_names: &'a [String],
}

/// A provider of documents, hints, assessments, and narration.
///
/// Implementations are considered **untrusted**: the engine re-checks every
/// generated document against the rulebook and never lets a source's opinion
/// override it. A source that fails mid-shift should degrade gracefully
/// where it can; the engine only treats `next_document` errors as fatal to
/// the encounter.
pub trait ContentSource: Send + Sync {
    /// Produce an unblemished document for the next traveler in line.
    ///
    /// The engine may tamper with the returned document afterwards to plant
    /// a flaw; sources always generate documents that would pass the day's
    /// rules.
    fn next_document(&self, ctx: &GenContext<'_>) -> GameResult<Document>;

    /// Veritas's one-line hint about the document at the booth.
    ///
    /// `report` is the rulebook's finding for the current day. The hint
    /// should gesture at the problem (or the cleanliness) without reciting
    /// the report verbatim.
    fn hint(&self, doc: &Document, report: &RuleReport, ctx: &GenContext<'_>) -> GameResult<String>;

    /// Veritas's full reasoned assessment, with a recommended decision and a
    /// confidence level.
    fn assessment(
        &self,
        doc: &Document,
        report: &RuleReport,
        ctx: &GenContext<'_>,
    ) -> GameResult<Assessment>;

    /// A short piece of narration reacting to a decision just made.
    ///
    /// Called after the decision is already recorded, so failures here are
    /// cosmetic; the engine falls back to a stock line rather than
    /// propagating the error.
    fn decision_narrative(
        &self,
        state: &StoryState,
        traveler_name: &str,
        verdict: Verdict,
    ) -> GameResult<String>;
}
