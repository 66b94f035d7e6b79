//! # veritaminal-core
//!
//! The shift engine that drives a Veritaminal career.
//!
//! ## Overview
//!
//! One `ShiftEngine` runs one career: it calls travelers to the booth,
//! occasionally tampers with their documents, judges every decision against
//! the rulebook, applies story consequences, and appends each decision to the
//! hash-chained career memory.
//!
//! Creative content (documents, hints, assessments, narration) flows through
//! the [`ContentSource`](traits::ContentSource) trait, so the same engine
//! runs online against Gemini or fully offline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veritaminal_core::{ShiftEngine, traits::ContentSource};
//!
//! let mut engine = ShiftEngine::new(border, rulebook, milestones);
//! let encounter = engine.next_traveler(&source)?;
//! let outcome = engine.decide(decision, &source)?;
//! let day_start = engine.advance_day();
//! ```

pub mod engine;
pub mod flaw;
pub mod traits;

pub use engine::{Encounter, Outcome, ShiftEngine, FLAW_RATE};
pub use flaw::DocumentFlaw;
pub use traits::{ContentSource, GenContext};
