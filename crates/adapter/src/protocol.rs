//! Protocol module - JSON message types for the host adapter
//!
//! Line-delimited JSON over TCP. A client introduces itself with `hello` and
//! then issues `command` messages; the host answers each message and
//! broadcasts an `observation` to every client after state-changing commands.
//! Every message carries the client's `seq` so replies can be correlated.

use serde::{Deserialize, Serialize};

use gridfall_core::{GameSession, PlacementOutcome};
use gridfall_types::{ClearedCell, GRID_SIZE, HAND_SIZE};

/// Protocol version reported in `welcome`
pub const PROTOCOL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Operations a client may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CommandOp {
    /// Reset all engine state
    NewGame,
    /// Request a fresh observation without mutating anything
    Query,
    /// Drag-preview check for a hand piece at an origin
    Preview { index: usize, x: i8, y: i8 },
    /// Attempt to place a hand piece at an origin
    Place { index: usize, x: i8, y: i8 },
}

/// Client -> host messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Hello {
        seq: u64,
        client: ClientInfo,
    },
    Command {
        seq: u64,
        #[serde(flatten)]
        op: CommandOp,
    },
}

/// One cleared cell on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedCellWire {
    pub x: u8,
    pub y: u8,
    pub family: String,
}

impl From<ClearedCell> for ClearedCellWire {
    fn from(value: ClearedCell) -> Self {
        Self {
            x: value.x,
            y: value.y,
            family: value.family.as_str().to_string(),
        }
    }
}

/// One hand piece on the wire: family, display color, 0/1 shape rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPieceWire {
    pub family: String,
    pub color: String,
    pub rows: Vec<Vec<u8>>,
}

/// Host -> client messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    Welcome {
        seq: u64,
        protocol_version: String,
        grid_size: u8,
        hand_size: u8,
    },
    Preview {
        seq: u64,
        valid: bool,
    },
    Result {
        seq: u64,
        accepted: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        rejection: Option<String>,
        lines_cleared: u32,
        score_delta: u32,
        score: u32,
        game_over: bool,
        cleared: Vec<ClearedCellWire>,
    },
    Observation {
        seq: u64,
        board: Vec<Vec<u8>>,
        hand: Vec<HandPieceWire>,
        score: u32,
        best_score: u32,
        game_over: bool,
    },
    Error {
        seq: u64,
        message: String,
    },
}

impl HostMessage {
    pub fn welcome(seq: u64) -> Self {
        Self::Welcome {
            seq,
            protocol_version: PROTOCOL_VERSION.to_string(),
            grid_size: GRID_SIZE,
            hand_size: HAND_SIZE as u8,
        }
    }

    pub fn error(seq: u64, message: impl Into<String>) -> Self {
        Self::Error {
            seq,
            message: message.into(),
        }
    }
}

/// Build a `result` message from a placement outcome
pub fn result_message(seq: u64, outcome: &PlacementOutcome, score: u32) -> HostMessage {
    HostMessage::Result {
        seq,
        accepted: outcome.accepted,
        rejection: outcome.rejection.map(|r| r.as_str().to_string()),
        lines_cleared: outcome.lines_cleared,
        score_delta: outcome.score_delta,
        score,
        game_over: outcome.game_over,
        cleared: outcome.cleared.iter().map(|&c| c.into()).collect(),
    }
}

/// Build an `observation` message from the current session state
pub fn observation_message(session: &GameSession, seq: u64, best_score: u32) -> HostMessage {
    let snapshot = session.snapshot();

    let board = snapshot
        .board
        .iter()
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();

    let hand = session
        .hand()
        .iter()
        .map(|piece| {
            let shape = &piece.shape;
            let rows = (0..shape.height())
                .map(|r| {
                    (0..shape.width())
                        .map(|c| u8::from(shape.is_set(r as usize, c as usize)))
                        .collect()
                })
                .collect();
            HandPieceWire {
                family: piece.family.as_str().to_string(),
                color: piece.color().to_string(),
                rows,
            }
        })
        .collect();

    HostMessage::Observation {
        seq,
        board,
        hand,
        score: snapshot.score,
        best_score,
        game_over: snapshot.game_over,
    }
}
