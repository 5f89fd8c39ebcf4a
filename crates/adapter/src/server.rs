//! TCP server for the host adapter
//!
//! Accepts line-delimited JSON clients and forwards their commands to the
//! synchronous host loop over an mpsc channel. Uses tokio for async
//! networking. Each client must send `hello` before any command; per-client
//! failures are isolated and the server keeps serving.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::{ClientMessage, CommandOp, HostMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7641,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("GRIDFALL_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("GRIDFALL_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7641);
        let log_path = env::var("GRIDFALL_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            host,
            port,
            log_path,
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("GRIDFALL_ADAPTER_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }
}

/// Command delivered to the host loop
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub op: CommandOp,
}

/// Outbound message to be delivered by the server
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

type Registry = Arc<RwLock<HashMap<usize, mpsc::UnboundedSender<String>>>>;

/// Best-effort seq extraction from a line that failed to parse
fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let mut end = 0usize;
    for b in rest.as_bytes() {
        if b.is_ascii_digit() {
            end += 1;
        } else {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Optional wire transcript: every line in or out, prefixed with direction
fn spawn_wire_log(log_path: Option<String>) -> Option<mpsc::UnboundedSender<String>> {
    let path = log_path?;
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await;
        let mut file = match file {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Adapter] wire log unavailable ({}): {}", path, e);
                return;
            }
        };
        while let Some(record) = rx.recv().await {
            if file.write_all(record.as_bytes()).await.is_err() {
                break;
            }
            if file.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    Some(tx)
}

fn wire_log(log: &Option<mpsc::UnboundedSender<String>>, client_id: usize, dir: &str, line: &str) {
    if let Some(tx) = log {
        let _ = tx.send(format!("{} client={} {}", dir, client_id, line));
    }
}

/// Run the adapter server until the listener fails or the host drops
///
/// `ready` receives the bound address once listening (used by tests to bind
/// an ephemeral port).
pub async fn run_server(
    config: ServerConfig,
    cmd_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let bound = listener.local_addr()?;
    println!("[Adapter] listening on {}", bound);
    if let Some(tx) = ready {
        let _ = tx.send(bound);
    }

    let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
    let log_tx = spawn_wire_log(config.log_path.clone());

    // Outbound dispatcher: routes host replies and broadcasts
    {
        let registry = registry.clone();
        let log_tx = log_tx.clone();
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        wire_log(&log_tx, client_id, "send", &line);
                        if let Some(tx) = registry.read().await.get(&client_id) {
                            let _ = tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for (&client_id, tx) in registry.read().await.iter() {
                            wire_log(&log_tx, client_id, "send", &line);
                            let _ = tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    let mut next_id: usize = 0;
    loop {
        let (stream, peer) = listener.accept().await?;
        next_id += 1;
        let client_id = next_id;
        println!("[Adapter] client {} connected from {}", client_id, peer);

        let cmd_tx = cmd_tx.clone();
        let registry = registry.clone();
        let log_tx = log_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = client_loop(stream, client_id, cmd_tx, &registry, log_tx).await {
                eprintln!("[Adapter] client {} error: {}", client_id, e);
            }
            registry.write().await.remove(&client_id);
            println!("[Adapter] client {} disconnected", client_id);
        });
    }
}

fn encode(msg: &HostMessage) -> String {
    serde_json::to_string(msg).unwrap_or_else(|_| String::from("{\"type\":\"error\"}"))
}

async fn client_loop(
    stream: TcpStream,
    client_id: usize,
    cmd_tx: mpsc::Sender<InboundCommand>,
    registry: &Registry,
    log_tx: Option<mpsc::UnboundedSender<String>>,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    registry.write().await.insert(client_id, line_tx.clone());

    // Writer task: serializes all outbound lines for this client
    tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    let mut greeted = false;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        wire_log(&log_tx, client_id, "recv", &line);

        match serde_json::from_str::<ClientMessage>(&line) {
            Ok(ClientMessage::Hello { seq, client }) => {
                greeted = true;
                println!(
                    "[Adapter] client {} hello: {} {}",
                    client_id, client.name, client.version
                );
                let reply = encode(&HostMessage::welcome(seq));
                wire_log(&log_tx, client_id, "send", &reply);
                let _ = line_tx.send(reply);
            }
            Ok(ClientMessage::Command { seq, op }) => {
                if !greeted {
                    let reply = encode(&HostMessage::error(seq, "hello required before commands"));
                    wire_log(&log_tx, client_id, "send", &reply);
                    let _ = line_tx.send(reply);
                    continue;
                }
                let command = InboundCommand { client_id, seq, op };
                if cmd_tx.send(command).await.is_err() {
                    // Host loop is gone; nothing left to serve
                    break;
                }
            }
            Err(e) => {
                let seq = extract_seq_best_effort(&line).unwrap_or(0);
                let reply = encode(&HostMessage::error(seq, format!("parse error: {}", e)));
                wire_log(&log_tx, client_id, "send", &reply);
                let _ = line_tx.send(reply);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "x": 1}"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"seq":7}"#), Some(7));
        assert_eq!(extract_seq_best_effort(r#"{"x": 1}"#), None);
        assert_eq!(extract_seq_best_effort(r#"{"seq": "nope"}"#), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7641);
        assert!(config.log_path.is_none());
    }
}
