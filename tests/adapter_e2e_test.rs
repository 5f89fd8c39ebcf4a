//! Adapter end-to-end test - real TCP round trip through the server

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use gridfall::adapter::protocol::{ClientInfo, ClientMessage, CommandOp, HostMessage};
use gridfall::adapter::server::run_server;
use gridfall::adapter::{apply_command, InboundCommand, OutboundMessage, ServerConfig};
use gridfall::core::GameSession;

const WAIT: Duration = Duration::from_secs(5);

async fn send_line(write_half: &mut tokio::net::tcp::OwnedWriteHalf, msg: &ClientMessage) {
    let line = serde_json::to_string(msg).unwrap();
    write_half.write_all(line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
}

async fn read_message(
    lines: &mut tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
) -> HostMessage {
    let line = timeout(WAIT, lines.next_line())
        .await
        .expect("timed out waiting for host line")
        .expect("read failed")
        .expect("connection closed");
    serde_json::from_str(&line).expect("host sent invalid JSON")
}

#[tokio::test]
async fn test_hello_command_result_round_trip() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_path: None,
    };
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx)
        .await
        .expect("server did not start")
        .expect("ready channel dropped");

    let stream = TcpStream::connect(addr).await.expect("connect");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // hello -> welcome
    send_line(
        &mut write_half,
        &ClientMessage::Hello {
            seq: 1,
            client: ClientInfo {
                name: "e2e".to_string(),
                version: "0.0.0".to_string(),
            },
        },
    )
    .await;

    match read_message(&mut lines).await {
        HostMessage::Welcome {
            seq, grid_size, ..
        } => {
            assert_eq!(seq, 1);
            assert_eq!(grid_size, 10);
        }
        other => panic!("expected welcome, got {:?}", other),
    }

    // place command travels to the host side
    send_line(
        &mut write_half,
        &ClientMessage::Command {
            seq: 2,
            op: CommandOp::Place {
                index: 0,
                x: 0,
                y: 0,
            },
        },
    )
    .await;

    let cmd = timeout(WAIT, cmd_rx.recv())
        .await
        .expect("timed out waiting for command")
        .expect("command channel closed");
    assert_eq!(cmd.seq, 2);
    assert_eq!(
        cmd.op,
        CommandOp::Place {
            index: 0,
            x: 0,
            y: 0
        }
    );

    // the test plays the host loop role: apply and reply
    let mut session = GameSession::new(1);
    let reply = apply_command(&mut session, cmd.seq, cmd.op, 0);
    out_tx
        .send(OutboundMessage::ToClient {
            client_id: cmd.client_id,
            line: serde_json::to_string(&reply).unwrap(),
        })
        .unwrap();

    match read_message(&mut lines).await {
        HostMessage::Result { seq, accepted, .. } => {
            assert_eq!(seq, 2);
            assert!(accepted);
        }
        other => panic!("expected result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_command_before_hello_is_refused() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_path: None,
    };
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx)
        .await
        .expect("server did not start")
        .expect("ready channel dropped");

    let stream = TcpStream::connect(addr).await.expect("connect");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    send_line(
        &mut write_half,
        &ClientMessage::Command {
            seq: 9,
            op: CommandOp::Query,
        },
    )
    .await;

    match read_message(&mut lines).await {
        HostMessage::Error { seq, message } => {
            assert_eq!(seq, 9);
            assert!(message.contains("hello"));
        }
        other => panic!("expected error, got {:?}", other),
    }

    // Nothing reached the host side
    assert!(cmd_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unparseable_line_gets_error_with_seq() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_path: None,
    };
    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = timeout(WAIT, ready_rx)
        .await
        .expect("server did not start")
        .expect("ready channel dropped");

    let stream = TcpStream::connect(addr).await.expect("connect");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half
        .write_all(b"{\"seq\": 41, \"type\": \"nonsense\"\n")
        .await
        .unwrap();

    match read_message(&mut lines).await {
        HostMessage::Error { seq, .. } => assert_eq!(seq, 41),
        other => panic!("expected error, got {:?}", other),
    }
}
