//! The border catalog: three playable settings and their rule packs.
//!
//! Each border ships as a TOML pack (embedded at compile time) carrying its
//! `[[rules]]` and `[[milestones]]` tables, plus a [`BorderSetting`] built
//! here so the player-facing prose lives next to the pack it describes.
//!
//! The rules crate parses the `[[rules]]` half of a pack and ignores the
//! rest; this module parses the `[[milestones]]` half the same way.

use serde::Deserialize;
use tracing::debug;

use veritaminal_contracts::{
    border::{BorderSetting, Milestone},
    error::{GameResult, VeritaminalError},
};
use veritaminal_core::ShiftEngine;
use veritaminal_rules::Rulebook;

// ── Embedded rule packs ───────────────────────────────────────────────────────

const EASTOKVA_PACK: &str = include_str!("../packs/eastokva.toml");
const VELDANIA_PACK: &str = include_str!("../packs/veldania.toml");
const MIRASTAN_PACK: &str = include_str!("../packs/mirastan.toml");

/// The milestone half of a pack file.
#[derive(Debug, Deserialize)]
struct MilestonePack {
    #[serde(default)]
    milestones: Vec<Milestone>,
}

// ── Settings ──────────────────────────────────────────────────────────────────

fn eastokva() -> BorderSetting {
    BorderSetting {
        id: "eastokva_crossing".to_string(),
        name: "Eastokva Crossing".to_string(),
        description: "The first land crossing reopened after reunification. Foot traffic, \
                      farm trucks, and a queue that remembers the war."
            .to_string(),
        situation: "Reunification brought families back to the road. It also brought the \
                    forgers who sell them shortcuts, and a ministry eager to prove the \
                    checkpoint works."
            .to_string(),
        document_requirements: vec![
            "Permit code in the P series, four digits".to_string(),
            "First and last name on every document".to_string(),
            "Ministry seal on entry papers once the circular lands".to_string(),
        ],
        common_issues: vec![
            "Permit codes from the retired B series".to_string(),
            "Single-name papers from the old registry".to_string(),
            "Backstories routed through the closed Zemel corridor".to_string(),
        ],
        customary_seals: vec!["ministry".to_string()],
    }
}

fn veldania() -> BorderSetting {
    BorderSetting {
        id: "veldania_port".to_string(),
        name: "Port of Veldania".to_string(),
        description: "A maritime trade hub where manifests outnumber people. The harbor \
                      authority counts everything twice."
            .to_string(),
        situation: "Trade season is peaking and the harbor masters want shore papers as \
                    tidy as their berths. Anything undated goes back on the boat."
            .to_string(),
        document_requirements: vec![
            "Permit code in the P series, four digits".to_string(),
            "Full name matching the ship's manifest".to_string(),
            "Issue date on all shore papers".to_string(),
            "Harbor seal once the season directive takes effect".to_string(),
        ],
        common_issues: vec![
            "Undated shore passes".to_string(),
            "Papers that expire before they were issued".to_string(),
            "Entry stamps missing the harbor seal".to_string(),
        ],
        customary_seals: vec!["harbor".to_string()],
    }
}

fn mirastan() -> BorderSetting {
    BorderSetting {
        id: "mirastan_pass".to_string(),
        name: "Mirastan Mountain Pass".to_string(),
        description: "A high-altitude crossing, the only route open through winter. Thin \
                      air, long lines, short tempers."
            .to_string(),
        situation: "A refugee surge is moving through the pass and every issuing office \
                    in the foothills is overwhelmed. Some have stopped checking what \
                    they stamp."
            .to_string(),
        document_requirements: vec![
            "Permit code in the P series, four digits".to_string(),
            "Full name as registered at the foothill offices".to_string(),
            "Expiry date on winter permits once the advisory lands".to_string(),
        ],
        common_issues: vec![
            "Papers traced to the suspended Foothill Office".to_string(),
            "Winter permits issued with no expiry date".to_string(),
            "Names clipped to one word by hurried clerks".to_string(),
        ],
        // Mountain permits are issued unsealed; no seal rule ever activates here.
        customary_seals: vec![],
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

/// Every border a career can be started at, in menu order.
pub fn available_settings() -> Vec<BorderSetting> {
    vec![eastokva(), veldania(), mirastan()]
}

/// The border used when no choice is made (skip-menu mode).
pub fn default_setting() -> BorderSetting {
    eastokva()
}

/// Look up a setting by its stable id.
pub fn setting_by_id(id: &str) -> Option<BorderSetting> {
    available_settings().into_iter().find(|s| s.id == id)
}

fn pack_for(border_id: &str) -> GameResult<&'static str> {
    match border_id {
        "eastokva_crossing" => Ok(EASTOKVA_PACK),
        "veldania_port" => Ok(VELDANIA_PACK),
        "mirastan_pass" => Ok(MIRASTAN_PACK),
        other => Err(VeritaminalError::Config {
            reason: format!("unknown border id '{}'", other),
        }),
    }
}

/// The rulebook for one border, parsed from its embedded pack.
pub fn rulebook_for(border_id: &str) -> GameResult<Rulebook> {
    let rulebook = Rulebook::from_toml_str(pack_for(border_id)?)?;
    debug!(
        border_id,
        rules = rulebook.all_rules().len(),
        "rule pack loaded"
    );
    Ok(rulebook)
}

/// The scripted story beats for one border, in pack order.
pub fn milestones_for(border_id: &str) -> GameResult<Vec<Milestone>> {
    let pack: MilestonePack =
        toml::from_str(pack_for(border_id)?).map_err(|e| VeritaminalError::Config {
            reason: format!("milestones for '{}' failed to parse: {}", border_id, e),
        })?;
    Ok(pack.milestones)
}

/// Assemble a fresh career at the given border: setting, rulebook, and
/// milestones wired into a [`ShiftEngine`] on day 1.
pub fn shift_for(border_id: &str) -> GameResult<ShiftEngine> {
    let setting = setting_by_id(border_id).ok_or_else(|| VeritaminalError::Config {
        reason: format!("unknown border id '{}'", border_id),
    })?;
    let rulebook = rulebook_for(border_id)?;
    let milestones = milestones_for(border_id)?;
    Ok(ShiftEngine::new(setting, rulebook, milestones))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use veritaminal_contracts::{document::Document, story::MAX_DAYS};

    /// A document carrying everything the border customarily issues.
    fn complete_document(setting: &BorderSetting) -> Document {
        let mut doc = Document::new("Anya Volkova", "P4821", "Returning home for the season.");
        doc.seals = setting.customary_seals.clone();
        doc.issued_on = "2026-01-10".parse().ok();
        doc.expires_on = "2028-01-10".parse().ok();
        doc
    }

    #[test]
    fn test_every_pack_parses() {
        for setting in available_settings() {
            let rulebook = rulebook_for(&setting.id).unwrap();
            assert!(
                rulebook.all_rules().len() >= 3,
                "{} pack has too few rules",
                setting.id
            );
        }
    }

    /// Each border opens with exactly the three base document rules.
    #[test]
    fn test_three_base_rules_active_on_day_one() {
        for setting in available_settings() {
            let rulebook = rulebook_for(&setting.id).unwrap();
            assert_eq!(rulebook.active_rules(1).len(), 3, "{}", setting.id);
        }
    }

    /// A fully stamped document must stay valid under every rule the pack
    /// will ever introduce, or clean travelers start failing mid-career.
    #[test]
    fn test_customary_documents_stay_valid_all_career() {
        for setting in available_settings() {
            let rulebook = rulebook_for(&setting.id).unwrap();
            let doc = complete_document(&setting);
            for day in 1..=MAX_DAYS {
                let report = rulebook.evaluate(&doc, day);
                assert!(
                    report.valid,
                    "{} day {}: {}",
                    setting.id,
                    day,
                    report.summary()
                );
            }
        }
    }

    #[test]
    fn test_eastokva_introduces_the_zemel_advisory_on_day_three() {
        let rulebook = rulebook_for("eastokva_crossing").unwrap();
        let day3: Vec<&str> = rulebook
            .introduced_on(3)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(day3, vec!["Zemel Corridor Advisory"]);
        assert_eq!(rulebook.active_rules(5).len(), 5);
    }

    #[test]
    fn test_milestones_cover_every_border() {
        for setting in available_settings() {
            let milestones = milestones_for(&setting.id).unwrap();
            assert!(!milestones.is_empty(), "{}", setting.id);
            assert!(
                milestones.iter().all(|m| m.day >= 1 && m.day <= MAX_DAYS),
                "{} has a milestone outside the career",
                setting.id
            );
        }
    }

    #[test]
    fn test_setting_ids_are_unique() {
        let mut ids: Vec<String> = available_settings().into_iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_unknown_border_is_a_config_error() {
        match rulebook_for("atlantis_gate") {
            Err(VeritaminalError::Config { reason }) => assert!(reason.contains("atlantis_gate")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_setting_is_first_in_menu_order() {
        assert_eq!(default_setting().id, available_settings()[0].id);
    }

    #[test]
    fn test_shift_for_assembles_a_day_one_engine() {
        let engine = shift_for("veldania_port").unwrap();
        assert_eq!(engine.border().id, "veldania_port");
        assert_eq!(engine.day(), 1);
        assert_eq!(engine.score(), 0);
    }
}
