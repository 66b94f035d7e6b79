//! Command-line flags, logging setup, and content-source selection.
//!
//! The TUI owns stdout, so logs go to `veritaminal.log` in the working
//! directory. The content source degrades to the offline generator whenever
//! the API key is missing or the HTTP client cannot be built; starting the
//! game must never fail for lack of a credential.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use veritaminal_contracts::error::{GameResult, VeritaminalError};
use veritaminal_core::ContentSource;
use veritaminal_gen::{resolve_api_key, GeminiSource, LocalSource};

/// Log file written in the working directory.
pub const LOG_FILE: &str = "veritaminal.log";

/// Veritaminal — a terminal document verification game.
#[derive(Debug, Parser)]
#[command(
    name = "veritaminal",
    about = "Work the border booth: verify documents, approve or deny travelers",
    version
)]
pub struct Cli {
    /// Verbose (debug-level) logging.
    #[arg(long)]
    pub debug: bool,

    /// Resume the career in SAVE_FILE, bypassing the menu.
    #[arg(long, value_name = "SAVE_FILE")]
    pub load: Option<PathBuf>,

    /// Start a new career at the default border immediately.
    #[arg(long)]
    pub skip_menu: bool,

    /// Never call the generative API; use the offline generator.
    #[arg(long)]
    pub offline: bool,

    /// Directory save files are written to.
    #[arg(long, value_name = "DIR", default_value = "saves")]
    pub saves_dir: PathBuf,
}

/// Route `tracing` output to [`LOG_FILE`].
///
/// `RUST_LOG` still wins when set; otherwise the default level is `info`,
/// or `debug` with `--debug`.
pub fn init_logging(debug: bool) -> GameResult<()> {
    let file = File::create(LOG_FILE).map_err(|e| VeritaminalError::Config {
        reason: format!("cannot open log file '{}': {}", LOG_FILE, e),
    })?;

    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();

    Ok(())
}

/// Pick the content source for this session.
///
/// `--offline` forces the local generator. Otherwise the Gemini source is
/// used when a key resolves; a missing key or unbuildable client falls back
/// to the local generator with a warning, never an error.
pub fn select_source(offline: bool) -> Box<dyn ContentSource> {
    if offline {
        info!("offline mode requested; using the local generator");
        return Box::new(LocalSource::new());
    }

    match resolve_api_key() {
        Some(key) => match GeminiSource::new(key) {
            Ok(source) => {
                info!("online content source ready");
                Box::new(source)
            }
            Err(e) => {
                warn!(error = %e, "online source unavailable; using the local generator");
                Box::new(LocalSource::new())
            }
        },
        None => {
            warn!(
                "{}; using the local generator",
                VeritaminalError::MissingApiKey
            );
            Box::new(LocalSource::new())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
