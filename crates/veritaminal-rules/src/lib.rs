//! # veritaminal-rules
//!
//! A TOML-driven document rule engine for Veritaminal.
//!
//! ## Overview
//!
//! This crate provides [`Rulebook`], which loads verification rules from a
//! TOML rule pack and evaluates traveler documents against them. Rules carry
//! the career day they come into force, so the checkpoint gets stricter as a
//! career progresses.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use veritaminal_rules::Rulebook;
//!
//! let rulebook = Rulebook::from_toml_str(pack_toml)?;
//! let report = rulebook.evaluate(&document, day);
//! if !report.valid {
//!     println!("{}", report.summary());
//! }
//! ```
//!
//! ## Evaluation
//!
//! Every rule in force on the given day is checked. Violations are collected
//! rather than short-circuiting, so a forged document with three problems
//! produces a report naming all three.

pub mod rule;
pub mod rulebook;

pub use rule::{Rule, RuleCheck, RulePack};
pub use rulebook::Rulebook;

// ── Tests ─────────────────────────────────────────────────────────────────────
