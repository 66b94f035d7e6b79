//! Runtime error types for the Veritaminal game.
//!
//! All fallible operations in the game crates return `GameResult<T>`.
//! Error variants carry enough context to produce a useful log line and a
//! player-facing message.

use thiserror::Error;

/// The unified error type for the Veritaminal crates.
#[derive(Debug, Error)]
pub enum VeritaminalError {
    /// A rule pack, border definition, or other configuration failed to load.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A content source failed to produce text (HTTP failure, API error
    /// payload, empty candidates, unparseable document).
    #[error("content generation failed: {reason}")]
    Generation { reason: String },

    /// `GEMINI_API_KEY` is not set and the online source was required.
    #[error("GEMINI_API_KEY is not set; set it in the environment or a .env file")]
    MissingApiKey,

    /// A save file could not be read or written.
    #[error("save i/o failed: {reason}")]
    SaveIo { reason: String },

    /// A save file parsed but its contents are not a usable career.
    #[error("save file corrupt: {reason}")]
    SaveCorrupt { reason: String },

    /// The decision ledger in a save file failed hash-chain verification.
    ///
    /// Fatal for that file; an edited career cannot be resumed.
    #[error("save file tampered: {reason}")]
    TamperDetected { reason: String },

    /// Input that does not parse as any known command word.
    #[error("invalid command: {input}")]
    InvalidCommand { input: String },

    /// A valid operation requested at the wrong point in the shift, such as
    /// deciding when no traveler is at the booth.
    #[error("out of turn: {reason}")]
    OutOfTurn { reason: String },
}

/// Convenience alias used throughout the Veritaminal crates.
pub type GameResult<T> = Result<T, VeritaminalError>;
