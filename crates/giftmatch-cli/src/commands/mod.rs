//! CLI command implementations

pub mod assign;
pub mod check;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use giftmatch_exchange::Exchange;
use giftmatch_types::{EngineConfig, ExclusionSet, Participant};
use serde::Deserialize;

/// Exchange file structure.
///
/// ```json
/// {
///   "name": "office 2026",
///   "participants": [{ "id": 1, "name": "Ann", "status": "accepted" }],
///   "exclusions": [[1, 2]]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeFile {
    #[serde(default)]
    pub name: Option<String>,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub exclusions: ExclusionSet,
}

/// Load engine config from a file, or use defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    EngineConfig::from_json_str(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn load_exchange_file(path: &Path) -> Result<ExchangeFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read exchange file: {}", path.display()))?;
    parse_exchange_file(&raw)
        .with_context(|| format!("Failed to parse exchange file: {}", path.display()))
}

pub fn parse_exchange_file(raw: &str) -> Result<ExchangeFile> {
    Ok(serde_json::from_str(raw)?)
}

/// Build an INVITING exchange from the file contents.
///
/// Exclusions naming an id that is not in the participant list are skipped
/// with a warning.
pub fn build_exchange(file: ExchangeFile) -> Result<Exchange> {
    let mut exchange = Exchange::new(file.name.unwrap_or_else(|| "exchange".to_string()));
    for participant in file.participants {
        exchange.add_participant(participant)?;
    }
    for pair in &file.exclusions {
        let known = exchange.registry().contains(pair.low())
            && exchange.registry().contains(pair.high());
        if !known {
            tracing::warn!(pair = %pair, "Skipping exclusion with unknown participant");
            continue;
        }
        exchange.add_exclusion(pair.low(), pair.high())?;
    }
    exchange.open_invitations()?;
    Ok(exchange)
}

#[cfg(test)]
mod tests {
    use giftmatch_types::{ExchangeStatus, ParticipantId};

    use super::*;

    const SAMPLE: &str = r#"{
        "name": "office",
        "participants": [
            { "id": 1, "name": "Ann", "status": "accepted" },
            { "id": 2, "name": "Bo", "status": "accepted" },
            { "id": 3, "name": "Cy", "status": "declined" }
        ],
        "exclusions": [[1, 3], [2, 42]]
    }"#;

    #[test]
    fn parses_sample() {
        let file = parse_exchange_file(SAMPLE).unwrap();
        assert_eq!(file.participants.len(), 3);
        assert_eq!(file.exclusions.len(), 2);
    }

    #[test]
    fn build_skips_unknown_exclusions() {
        let exchange = build_exchange(parse_exchange_file(SAMPLE).unwrap()).unwrap();
        assert_eq!(exchange.status(), ExchangeStatus::Inviting);
        assert_eq!(exchange.exclusions().len(), 1);
        assert!(exchange.exclusions().contains(ParticipantId(3), ParticipantId(1)));
        assert_eq!(exchange.name(), "office");
    }

    #[test]
    fn rejects_self_exclusion() {
        let raw = r#"{ "participants": [], "exclusions": [[5, 5]] }"#;
        assert!(parse_exchange_file(raw).is_err());
    }

    #[test]
    fn duplicate_participant_is_an_error() {
        let raw = r#"{ "participants": [
            { "id": 1, "status": "accepted" },
            { "id": 1, "status": "accepted" }
        ] }"#;
        let err = build_exchange(parse_exchange_file(raw).unwrap()).unwrap_err();
        assert!(format!("{err}").contains("GM_ERR_101"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
