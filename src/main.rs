//! Gridfall headless host (default binary).
//!
//! This is the primary entrypoint. It owns the game session, serves the
//! line-delimited JSON adapter, and keeps the best-score record up to date.
//! Run with `observe [--host H] [--port P]` to follow a running host instead
//! of starting one.

mod best_score;
mod observe;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use best_score::BestScoreStore;
use gridfall::adapter::protocol::observation_message;
use gridfall::adapter::{apply_command, mutates_state, Adapter, OutboundMessage};
use gridfall::core::GameSession;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(config) = observe::parse_observe_args(&args)? {
        return observe::run(config);
    }
    run_host()
}

/// Session seed: `GRIDFALL_SEED` when set, otherwise clock-derived
fn session_seed() -> u32 {
    if let Some(seed) = std::env::var("GRIDFALL_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos().wrapping_add(d.as_secs() as u32))
        .unwrap_or(1)
}

fn run_host() -> Result<()> {
    let mut store = BestScoreStore::open_default()?;
    let mut session = GameSession::new(session_seed());
    println!("[Host] best score on record: {}", store.best());

    let Some(mut adapter) = Adapter::start_from_env() else {
        return Ok(());
    };

    while let Some(cmd) = adapter.recv() {
        let reply = apply_command(&mut session, cmd.seq, cmd.op, store.best());
        adapter.send(OutboundMessage::ToClient {
            client_id: cmd.client_id,
            line: serde_json::to_string(&reply)?,
        });

        if session.score() > store.best() {
            store.record(session.score())?;
        }

        if mutates_state(cmd.op) {
            let obs = observation_message(&session, cmd.seq, store.best());
            adapter.send(OutboundMessage::Broadcast {
                line: serde_json::to_string(&obs)?,
            });
        }
    }

    Ok(())
}
