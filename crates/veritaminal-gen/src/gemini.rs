//! The online content source, backed by Google's Gemini API.
//!
//! ## Overview
//!
//! One blocking `generateContent` call per piece of content, authenticated
//! with the `x-goog-api-key` header. The request body mixes casings because
//! the API does: `contents` and `system_instruction` are snake_case while
//! `generationConfig` and its fields are camelCase.
//!
//! Request building and response parsing are plain functions over JSON so
//! they can be tested without a network. Every failure maps to
//! `VeritaminalError::Generation`; callers decide whether that is fatal
//! (document generation) or cosmetic (narration).

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use veritaminal_contracts::{
    decision::Verdict,
    document::Document,
    error::{GameResult, VeritaminalError},
    report::{Assessment, RuleReport},
    story::StoryState,
};
use veritaminal_core::traits::{ContentSource, GenContext};

use crate::prompt;
use crate::scaffold;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.0-flash-lite";
const TEMPERATURE: f64 = 0.9;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cap on how much of an HTTP error body is carried into an error message.
const ERROR_BODY_CAP: usize = 600;

/// Typed response payloads. Field names follow the API's camelCase; every
/// field is optional because the API omits whole sections freely.
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Response {
        pub candidates: Option<Vec<Candidate>>,
        pub error: Option<ErrorInfo>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Candidate {
        pub content: Option<Content>,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Content {
        pub parts: Option<Vec<Part>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Part {
        pub text: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ErrorInfo {
        pub code: Option<i32>,
        pub message: Option<String>,
    }

    impl ErrorInfo {
        pub fn message_or_default(&self) -> &str {
            self.message.as_deref().unwrap_or("unknown API error")
        }
    }
}

/// `ContentSource` that asks Gemini for names, backstories, hints, and
/// narration.
///
/// Only the creative fields come from the model. Permits, dates, and seals
/// are built locally via [`scaffold`], so a generated document is clean by
/// construction and tampering stays under the engine's control.
pub struct GeminiSource {
    http: Client,
    api_key: String,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for GeminiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSource")
            .field("model", &MODEL)
            .finish_non_exhaustive()
    }
}

impl GeminiSource {
    /// Build a source around the given API key.
    pub fn new(api_key: impl Into<String>) -> GameResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VeritaminalError::Config {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    fn rng(&self) -> GameResult<MutexGuard<'_, StdRng>> {
        self.rng.lock().map_err(|_| VeritaminalError::Generation {
            reason: "content rng lock poisoned".to_string(),
        })
    }

    /// One generateContent round trip: send the prompt under the given
    /// persona, return the response text.
    fn generate(&self, persona: &str, prompt: &str, max_tokens: u32) -> GameResult<String> {
        let url = format!("{}/models/{}:generateContent", API_BASE, MODEL);
        let body = build_request_body(prompt, persona, max_tokens);

        debug!(max_tokens, "calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| VeritaminalError::Generation {
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response);
            return Err(VeritaminalError::Generation {
                reason: format!("HTTP {}: {}", status, body),
            });
        }

        let parsed: wire::Response =
            response.json().map_err(|e| VeritaminalError::Generation {
                reason: format!("unparseable response: {}", e),
            })?;

        extract_text(parsed)
    }
}

fn build_request_body(prompt: &str, persona: &str, max_tokens: u32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "system_instruction": {
            "parts": [{ "text": persona }]
        },
        "generationConfig": {
            "maxOutputTokens": max_tokens,
            "temperature": TEMPERATURE
        }
    })
}

fn read_capped_error_body(response: reqwest::blocking::Response) -> String {
    let text = response.text().unwrap_or_default();
    text.chars().take(ERROR_BODY_CAP).collect()
}

/// Pull the text out of a parsed response, surfacing API-level errors and
/// blocked candidates as `Generation` errors.
fn extract_text(response: wire::Response) -> GameResult<String> {
    if let Some(error) = response.error {
        return Err(VeritaminalError::Generation {
            reason: format!(
                "API error {}: {}",
                error.code.unwrap_or_default(),
                error.message_or_default()
            ),
        });
    }

    let Some(candidate) = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
    else {
        return Err(VeritaminalError::Generation {
            reason: "response contained no candidates".to_string(),
        });
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if let Some(message) = blocked_reason(reason) {
            return Err(VeritaminalError::Generation {
                reason: message.to_string(),
            });
        }
    }

    let text: String = candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(VeritaminalError::Generation {
            reason: "response contained no text".to_string(),
        });
    }
    Ok(text)
}

/// Finish reasons that mean the content was blocked rather than completed.
/// `STOP`, `MAX_TOKENS`, and anything unrecognized pass through.
fn blocked_reason(reason: &str) -> Option<&'static str> {
    match reason {
        "SAFETY" => Some("response blocked by safety settings"),
        "RECITATION" => Some("response blocked for recitation"),
        "BLOCKLIST" => Some("response contains blocked terms"),
        "PROHIBITED_CONTENT" => Some("response blocked as prohibited content"),
        "SPII" => Some("response blocked for sensitive information"),
        _ => None,
    }
}

impl ContentSource for GeminiSource {
    fn next_document(&self, ctx: &GenContext<'_>) -> GameResult<Document> {
        let raw_name = self.generate(
            prompt::DOCUMENT_GENERATION,
            &prompt::name_prompt(&ctx.border.name, ctx.used_names),
            prompt::DOCUMENT_TOKENS,
        )?;
        let name = match scaffold::clean_name(&raw_name) {
            Some(name) => name,
            None => {
                warn!(raw = %raw_name, "generated name unusable; drawing from the local pool");
                scaffold::draw_name(&mut self.rng()?, ctx.used_names)
            }
        };

        let raw_backstory = self.generate(
            prompt::DOCUMENT_GENERATION,
            &prompt::backstory_prompt(&name, ctx.border),
            prompt::DOCUMENT_TOKENS,
        )?;
        let mut backstory = scaffold::clean_line(&raw_backstory);
        if backstory.is_empty() {
            backstory = scaffold::stock_backstory(&mut self.rng()?);
        }

        let mut rng = self.rng()?;
        Ok(scaffold::assemble_document(&mut rng, name, backstory, ctx.border))
    }

    fn hint(
        &self,
        doc: &Document,
        report: &RuleReport,
        _ctx: &GenContext<'_>,
    ) -> GameResult<String> {
        let text = self.generate(
            prompt::VERITAS_ASSISTANT,
            &prompt::hint_prompt(doc, report),
            prompt::HINT_TOKENS,
        )?;
        Ok(scaffold::clean_line(&text))
    }

    fn assessment(
        &self,
        doc: &Document,
        report: &RuleReport,
        _ctx: &GenContext<'_>,
    ) -> GameResult<Assessment> {
        let reasoning = self.generate(
            prompt::VERITAS_ASSISTANT,
            &prompt::assessment_prompt(doc, report),
            prompt::HINT_TOKENS,
        )?;

        Ok(Assessment::new(
            scaffold::verdict_for(report),
            scaffold::derived_confidence(report),
            scaffold::clean_line(&reasoning),
        ))
    }

    fn decision_narrative(
        &self,
        state: &StoryState,
        traveler_name: &str,
        verdict: Verdict,
    ) -> GameResult<String> {
        let text = self.generate(
            prompt::NARRATIVE_GENERATION,
            &prompt::narrative_prompt(state, traveler_name, verdict),
            prompt::NARRATIVE_TOKENS,
        )?;
        Ok(scaffold::clean_line(&text))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
