//! Host adapter module - drive the engine over line-delimited JSON
//!
//! The engine is headless; presentation layers, bots, and observers connect
//! over TCP and speak a small JSON protocol (see [`protocol`]). The server
//! runs on a background tokio runtime and bridges to the synchronous host
//! loop over channels (see [`runtime`]), so the session keeps exactly one
//! owner and no engine state is shared across threads.

pub mod protocol;
pub mod runtime;
pub mod server;

// Re-export commonly used types
pub use protocol::{
    observation_message, result_message, ClientInfo, ClientMessage, CommandOp, HostMessage,
    PROTOCOL_VERSION,
};
pub use runtime::{apply_command, mutates_state, Adapter};
pub use server::{InboundCommand, OutboundMessage, ServerConfig};
