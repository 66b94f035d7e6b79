//! Veritaminal — Scripted Scenario Demo CLI
//!
//! Runs one or all of the three border scenarios without the interactive
//! terminal. Each scenario wires real components (catalog, shift engine,
//! offline content source, save store) together with seeded randomness.
//!
//! Usage:
//!   cargo run -p veritaminal-demo -- run-all
//!   cargo run -p veritaminal-demo -- clean-shift
//!   cargo run -p veritaminal-demo -- forged-documents
//!   cargo run -p veritaminal-demo -- tampered-save

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veritaminal_borders::scenarios::{clean_shift, forged_documents, tampered_save};
use veritaminal_contracts::error::GameResult;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Veritaminal — document verification game demo.
///
/// Each subcommand runs one or all of the three scripted scenarios,
/// demonstrating document generation, tampering, scoring, and the
/// tamper-evident save chain.
#[derive(Parser)]
#[command(
    name = "veritaminal-demo",
    about = "Veritaminal scripted scenario demo",
    long_about = "Runs Veritaminal demo scenarios showing document generation, rule\n\
                  evaluation, story consequences, and save-file chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: A Clean Shift (three legitimate travelers approved).
    CleanShift,
    /// Scenario 2: Forged Documents (loaded tamper dice, mixed calls).
    ForgedDocuments,
    /// Scenario 3: A Tampered Save (on-disk edit rejected at load).
    TamperedSave,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::CleanShift => run_clean_shift(),
        Command::ForgedDocuments => run_forged_documents(),
        Command::TamperedSave => run_tampered_save(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> GameResult<()> {
    run_clean_shift()?;
    run_forged_documents()?;
    run_tampered_save()?;
    Ok(())
}

fn run_clean_shift() -> GameResult<()> {
    clean_shift::run_scenario()
}

fn run_forged_documents() -> GameResult<()> {
    forged_documents::run_scenario()
}

fn run_tampered_save() -> GameResult<()> {
    tampered_save::run_scenario()
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VERITAMINAL — Document Verification Game");
    println!("Scripted Scenario Demo");
    println!("========================================");
    println!();
    println!("Booth pipeline per traveler:");
    println!("  [1] Content source generates a clean document (offline pools here)");
    println!("  [2] Tamper dice may plant a flaw the day's rules can catch");
    println!("  [3] Rulebook evaluates the document for the current day");
    println!("  [4] Player decision scored against the rulebook's verdict");
    println!("  [5] Consequences applied; record appended to the SHA-256 memory chain");
    println!();
}
