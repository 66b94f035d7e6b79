//! API key discovery.
//!
//! The process environment wins; a `.env` file in the working directory is
//! the fallback. Returning `None` is not an error: binaries treat a missing
//! key as the signal to run with the offline source instead.

use std::path::Path;

use tracing::debug;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Look up the API key from the environment, then from `./.env`.
pub fn resolve_api_key() -> Option<String> {
    if let Ok(value) = std::env::var(API_KEY_VAR) {
        let value = value.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    let contents = std::fs::read_to_string(Path::new(".env")).ok()?;
    let key = parse_env_file(&contents);
    if key.is_some() {
        debug!("{} loaded from .env", API_KEY_VAR);
    }
    key
}

/// Minimal KEY=VALUE parser for `.env` files: blank lines and `#` comments
/// are skipped, values may be single- or double-quoted.
fn parse_env_file(contents: &str) -> Option<String> {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() != API_KEY_VAR {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'').trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::parse_env_file;

    #[test]
    fn test_parse_plain_assignment() {
        assert_eq!(
            parse_env_file("GEMINI_API_KEY=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_parse_quoted_values() {
        assert_eq!(
            parse_env_file("GEMINI_API_KEY=\"abc123\""),
            Some("abc123".to_string())
        );
        assert_eq!(
            parse_env_file("GEMINI_API_KEY='abc123'"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_parse_skips_comments_and_other_keys() {
        let contents = "\
# the key lives below
OTHER_VAR=nope

GEMINI_API_KEY = abc123
";
        assert_eq!(parse_env_file(contents), Some("abc123".to_string()));
    }

    #[test]
    fn test_parse_missing_or_empty_key() {
        assert_eq!(parse_env_file(""), None);
        assert_eq!(parse_env_file("OTHER_VAR=value"), None);
        assert_eq!(parse_env_file("GEMINI_API_KEY="), None);
        assert_eq!(parse_env_file("GEMINI_API_KEY"), None);
    }
}
