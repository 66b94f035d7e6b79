//! # veritaminal-contracts
//!
//! Shared types and error contracts for the Veritaminal game.
//!
//! All crates in the workspace import from here. No game logic lives in this
//! crate — only data definitions and error types.

pub mod border;
pub mod decision;
pub mod document;
pub mod error;
pub mod report;
pub mod story;
