//! Adapter runtime integration.
//!
//! Bridges the synchronous host loop with the async TCP server, and maps
//! protocol commands onto a live game session. The host loop owns the
//! session; the server only ever sees channels.

use std::net::SocketAddr;

use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{observation_message, result_message, CommandOp, HostMessage};
use crate::server::{run_server, InboundCommand, OutboundMessage, ServerConfig};
use gridfall_core::GameSession;

/// Apply a protocol command to the session and build the direct reply
///
/// `best_score` is host-owned state included in observations.
pub fn apply_command(
    session: &mut GameSession,
    seq: u64,
    op: CommandOp,
    best_score: u32,
) -> HostMessage {
    match op {
        CommandOp::NewGame => {
            session.new_game();
            observation_message(session, seq, best_score)
        }
        CommandOp::Query => observation_message(session, seq, best_score),
        CommandOp::Preview { index, x, y } => HostMessage::Preview {
            seq,
            valid: session.preview_validity(index, x, y),
        },
        CommandOp::Place { index, x, y } => {
            let outcome = session.attempt_placement(index, x, y);
            result_message(seq, &outcome, session.score())
        }
    }
}

/// Whether a command mutates session state (and so warrants a broadcast)
pub fn mutates_state(op: CommandOp) -> bool {
    matches!(op, CommandOp::NewGame | CommandOp::Place { .. })
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

/// Maximum commands buffered ahead of the host loop
const MAX_PENDING_COMMANDS: usize = 32;

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `GRIDFALL_ADAPTER_DISABLED` is set.
    pub fn start_from_env() -> Option<Self> {
        if ServerConfig::is_disabled() {
            println!("[Adapter] disabled via GRIDFALL_ADAPTER_DISABLED");
            return None;
        }
        Some(Self::start(ServerConfig::from_env(), None))
    }

    /// Start the adapter with an explicit configuration.
    pub fn start(config: ServerConfig, ready: Option<oneshot::Sender<SocketAddr>>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(MAX_PENDING_COMMANDS);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().expect("Failed to create tokio runtime");
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, ready).await {
                eprintln!("[Adapter] server stopped: {}", e);
            }
        });

        Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        }
    }

    /// Block until the next client command, or None if the server is gone.
    pub fn recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    /// Non-blocking poll for a pending command.
    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
