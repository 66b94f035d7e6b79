//! Shared document scaffolding for content sources.
//!
//! Permit codes, validity dates, and seals are structural: both sources
//! build them locally so that a freshly generated document always satisfies
//! the formal rules, whatever the prose around it says. The name and
//! backstory pools live here too; the Gemini source falls back to them when
//! the model returns something unusable.

use chrono::{Duration, NaiveDate, Utc};
use rand::{rngs::StdRng, Rng};

use veritaminal_contracts::{
    border::BorderSetting,
    decision::Decision,
    document::Document,
    report::RuleReport,
};

pub(crate) const FIRST_NAMES: &[&str] = &[
    "Anya", "Marek", "Irena", "Tomas", "Vesna", "Petar", "Lidia", "Goran",
    "Mira", "Stefan", "Zora", "Niko", "Elena", "Dragan", "Katya", "Emil",
    "Sofia", "Viktor", "Hana", "Leon", "Dara", "Milan", "Rosa", "Ivo",
];

pub(crate) const SURNAMES: &[&str] = &[
    "Volkova", "Novak", "Petrov", "Kral", "Horvat", "Babic", "Vidmar",
    "Kovac", "Maras", "Zorin", "Dolezal", "Brankov", "Sirok", "Havel",
    "Petric", "Valen", "Drost", "Kalin", "Obran", "Stanek", "Ferenc",
    "Lazar", "Marev", "Tausk",
];

const BACKSTORY_TEMPLATES: &[&str] = &[
    "Visiting a cousin in {}.",
    "Returning home after seasonal work near {}.",
    "Carrying trade samples for a merchant house in {}.",
    "Traveling to a wedding in {}.",
    "Seeking treatment at the clinic in {}.",
    "Delivering machine parts ordered by a workshop in {}.",
    "Going to settle an inheritance in {}.",
    "Enrolled for the winter term at the academy in {}.",
];

const TOWNS: &[&str] = &[
    "Kolvey", "Old Varen", "Stonebridge", "Dren", "the lake district",
    "Maro Heights", "Castellan Row", "Byrek",
];

/// How many redraws `draw_name` makes before accepting a repeat. The pools
/// give several hundred combinations, so hitting this limit means the
/// career has seen nearly all of them.
const NAME_DRAW_ATTEMPTS: usize = 32;

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

/// Draw a first-and-last name from the pools, avoiding names already used
/// this career.
pub(crate) fn draw_name(rng: &mut StdRng, used: &[String]) -> String {
    for _ in 0..NAME_DRAW_ATTEMPTS {
        let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, SURNAMES));
        if !used.iter().any(|u| u == &name) {
            return name;
        }
    }
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, SURNAMES))
}

/// A backstory composed from the template and town pools.
pub(crate) fn stock_backstory(rng: &mut StdRng) -> String {
    let template = pick(rng, BACKSTORY_TEMPLATES);
    let town = pick(rng, TOWNS);
    template.replacen("{}", town, 1)
}

/// A well-formed permit code: 'P' followed by four digits.
pub(crate) fn fresh_permit(rng: &mut StdRng) -> String {
    format!("P{:04}", rng.random_range(0..10_000))
}

/// An issue date in the recent past and an expiry two years after it, so
/// the pair always satisfies ordering and presence checks.
pub(crate) fn fresh_dates(rng: &mut StdRng) -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let issued = today - Duration::days(rng.random_range(30..720));
    let expires = issued + Duration::days(730);
    (issued, expires)
}

/// Assemble a complete clean document: the creative fields as given, the
/// structural fields freshly built, the seals the border customarily stamps.
pub(crate) fn assemble_document(
    rng: &mut StdRng,
    name: String,
    backstory: String,
    border: &BorderSetting,
) -> Document {
    let (issued_on, expires_on) = fresh_dates(rng);
    let mut doc = Document::new(name, fresh_permit(rng), backstory);
    doc.seals = border.customary_seals.clone();
    doc.issued_on = Some(issued_on);
    doc.expires_on = Some(expires_on);
    doc
}

/// Reduce raw model output to a plausible "First Last" name, or `None` when
/// it cannot be salvaged. Handles quoted names, label prefixes like
/// "Name: ...", and stray markdown.
pub(crate) fn clean_name(raw: &str) -> Option<String> {
    let line = raw.lines().find(|l| !l.trim().is_empty())?;
    let line = match line.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => line,
    };
    let line = line
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '.')
        .trim();

    let parts: Vec<&str> = line.split_whitespace().collect();
    let plausible = (2..=4).contains(&parts.len())
        && parts
            .iter()
            .all(|part| part.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\''));
    plausible.then(|| parts.join(" "))
}

/// Collapse raw model output to a single trimmed line.
pub(crate) fn clean_line(raw: &str) -> String {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim_matches('"').trim().to_string()
}

/// The decision a source would advise, straight from the report.
pub(crate) fn verdict_for(report: &RuleReport) -> Decision {
    if report.valid {
        Decision::Approve
    } else {
        Decision::Deny
    }
}

/// Advisory confidence derived from the report. A clean report earns steady
/// confidence; each violation past the first firms up a deny.
pub(crate) fn derived_confidence(report: &RuleReport) -> f64 {
    if report.valid {
        0.82
    } else {
        (0.6 + 0.12 * report.violations.len() as f64).min(0.95)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
