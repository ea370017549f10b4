//! Check command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use giftmatch_engine::MatchingEngine;
use giftmatch_exchange::Exchange;
use giftmatch_types::GiftmatchError;

use super::{build_exchange, load_config, load_exchange_file};

pub fn run(input: &Path, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = MatchingEngine::with_config(config);
    let exchange = build_exchange(load_exchange_file(input)?)?;

    let verdict = check(&exchange, &engine);
    println!("{}", verdict.message);
    match verdict.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

struct Verdict {
    message: String,
    error: Option<GiftmatchError>,
}

fn check(exchange: &Exchange, engine: &MatchingEngine) -> Verdict {
    let accepted = exchange.registry().accepted_ids().len();
    match exchange.check_feasibility(engine) {
        Ok(()) => Verdict {
            message: format!(
                "OK: a valid assignment exists for {accepted} accepted participants ({} exclusions)",
                exchange.exclusions().len()
            ),
            error: None,
        },
        Err(err) => Verdict {
            message: format!("NOT FEASIBLE: {err}"),
            error: Some(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse_exchange_file;

    fn exchange(raw: &str) -> Exchange {
        build_exchange(parse_exchange_file(raw).unwrap()).unwrap()
    }

    #[test]
    fn feasible_exchange_reports_ok() {
        let ex = exchange(
            r#"{ "participants": [
                { "id": 1, "status": "accepted" },
                { "id": 2, "status": "accepted" },
                { "id": 3, "status": "accepted" },
                { "id": 4, "status": "accepted" }
            ], "exclusions": [[1, 2]] }"#,
        );
        let verdict = check(&ex, &MatchingEngine::new());
        assert!(verdict.error.is_none());
        assert!(verdict.message.starts_with("OK: a valid assignment exists for 4"));
        assert!(verdict.message.ends_with("(1 exclusions)"));
    }

    #[test]
    fn trio_with_one_exclusion_is_infeasible() {
        // Both 3-cycles use the excluded edge in one direction.
        let ex = exchange(
            r#"{ "participants": [
                { "id": 1, "status": "accepted" },
                { "id": 2, "status": "accepted" },
                { "id": 3, "status": "accepted" }
            ], "exclusions": [[1, 2]] }"#,
        );
        let verdict = check(&ex, &MatchingEngine::new());
        assert!(verdict.message.starts_with("NOT FEASIBLE: GM_ERR_301"));
        assert!(verdict.error.is_some());
    }

    #[test]
    fn couple_alone_is_infeasible() {
        let ex = exchange(
            r#"{ "participants": [
                { "id": 1, "status": "accepted" },
                { "id": 2, "status": "accepted" }
            ], "exclusions": [[1, 2]] }"#,
        );
        let verdict = check(&ex, &MatchingEngine::new());
        assert!(verdict.message.contains("GM_ERR_301"));
        assert!(verdict.error.is_some());
    }

    #[test]
    fn single_acceptance_is_insufficient() {
        let ex = exchange(r#"{ "participants": [{ "id": 1, "status": "accepted" }] }"#);
        let verdict = check(&ex, &MatchingEngine::new());
        assert!(verdict.message.contains("GM_ERR_300"));
    }
}
