//! Assign command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use giftmatch_engine::MatchingEngine;
use giftmatch_exchange::{AssignmentNotice, Exchange, Outbox};
use giftmatch_types::{Assignment, ParticipantId, Strategy};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use super::{build_exchange, load_config, load_exchange_file};
use crate::OutputFormat;

/// JSON shape printed by `assign --format json`.
#[derive(Debug, Serialize)]
struct AssignReport<'a> {
    exchange: &'a str,
    strategy: Strategy,
    digest: String,
    pairs: &'a [AssignmentNotice],
}

pub fn run(
    input: &Path,
    seed: Option<u64>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let engine = MatchingEngine::with_config(config);
    let mut exchange = build_exchange(load_exchange_file(input)?)?;

    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    exchange
        .start(&engine, &mut rng)
        .with_context(|| format!("Could not start exchange '{}'", exchange.name()))?;

    let mut outbox = Outbox::new();
    exchange.notify(&mut outbox)?;
    let notices = outbox.drain();

    print!("{}", render(&exchange, &notices, format)?);
    Ok(())
}

fn render(
    exchange: &Exchange,
    notices: &[AssignmentNotice],
    format: OutputFormat,
) -> Result<String> {
    let assignment = exchange
        .assignment()
        .context("Exchange is active but holds no assignment")?;
    match format {
        OutputFormat::Human => Ok(render_human(exchange.name(), assignment, notices)),
        OutputFormat::Json => {
            let report = AssignReport {
                exchange: exchange.name(),
                strategy: assignment.strategy,
                digest: assignment.digest_hex(),
                pairs: notices,
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
        }
    }
}

fn render_human(name: &str, assignment: &Assignment, notices: &[AssignmentNotice]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Exchange: {name}\n"));
    out.push_str(&format!("Strategy: {}\n", assignment.strategy));
    out.push_str(&format!("Digest:   {}\n\n", assignment.digest_hex()));
    for notice in notices {
        out.push_str(&format!(
            "  {} -> {}\n",
            label(notice.giver, &notice.giver_name),
            label(notice.recipient, &notice.recipient_name),
        ));
    }
    out
}

fn label(id: ParticipantId, name: &str) -> String {
    if name.is_empty() {
        id.to_string()
    } else {
        format!("{name} ({id})")
    }
}
