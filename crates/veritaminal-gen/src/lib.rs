//! # veritaminal-gen
//!
//! Content sources for Veritaminal: where documents, hints, assessments,
//! and narration come from.
//!
//! ## Overview
//!
//! Two implementations of the engine's `ContentSource` trait:
//!
//! - [`GeminiSource`] asks Google's Gemini API for the creative fields, one
//!   blocking call per piece of content.
//! - [`LocalSource`] draws everything from built-in pools. No network, fully
//!   deterministic when seeded.
//!
//! Both build the structural document fields (permit, dates, seals) locally,
//! so generated documents are always clean; tampering belongs to the engine.
//! [`resolve_api_key`] decides which source a binary should run with.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veritaminal_core::ContentSource;
//! use veritaminal_gen::{resolve_api_key, GeminiSource, LocalSource};
//!
//! let source: Box<dyn ContentSource> = match resolve_api_key() {
//!     Some(key) => Box::new(GeminiSource::new(key)?),
//!     None => Box::new(LocalSource::new()),
//! };
//! ```

pub mod gemini;
pub mod key;
pub mod local;
pub mod prompt;
mod scaffold;

pub use gemini::GeminiSource;
pub use key::{resolve_api_key, API_KEY_VAR};
pub use local::LocalSource;

// ── Tests ────────────────────────────────────────────────────────────────────
