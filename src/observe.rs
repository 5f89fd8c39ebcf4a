//! Observer mode - follow a running host from the terminal.
//!
//! Connects as a read-only client, prints every observation as an ASCII
//! board, and summarizes placements as they happen.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::{anyhow, Context, Result};

use gridfall::adapter::{ClientInfo, ClientMessage, CommandOp, HostMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveConfig {
    pub host: String,
    pub port: u16,
}

pub fn parse_observe_args(args: &[String]) -> Result<Option<ObserveConfig>> {
    if args.is_empty() || args[0] != "observe" {
        return Ok(None);
    }

    let mut host = String::from("127.0.0.1");
    let mut port: u16 = 7641;
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("observe: missing value for --host"))?;
                host = v.clone();
            }
            "--port" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("observe: missing value for --port"))?;
                port = v.parse().context("observe: invalid --port")?;
            }
            other => return Err(anyhow!("observe: unknown argument {}", other)),
        }
        i += 1;
    }

    Ok(Some(ObserveConfig { host, port }))
}

pub fn run(config: ObserveConfig) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let stream = TcpStream::connect(&addr).with_context(|| format!("connecting to {}", addr))?;
    let mut writer = stream.try_clone().context("cloning stream for writes")?;
    let reader = BufReader::new(stream);

    let hello = ClientMessage::Hello {
        seq: 0,
        client: ClientInfo {
            name: "gridfall-observe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };
    writeln!(writer, "{}", serde_json::to_string(&hello)?)?;

    // Ask for an initial observation; later ones arrive as broadcasts
    let query = ClientMessage::Command {
        seq: 1,
        op: CommandOp::Query,
    };
    writeln!(writer, "{}", serde_json::to_string(&query)?)?;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostMessage>(&line) {
            Ok(HostMessage::Welcome {
                protocol_version, ..
            }) => {
                println!("connected (protocol {})", protocol_version);
            }
            Ok(HostMessage::Observation {
                board,
                score,
                best_score,
                game_over,
                ..
            }) => {
                print_board(&board);
                let status = if game_over { " [game over]" } else { "" };
                println!("score {} / best {}{}", score, best_score, status);
            }
            Ok(HostMessage::Result {
                accepted,
                lines_cleared,
                score_delta,
                ..
            }) => {
                if accepted {
                    println!("placed: +{} ({} lines)", score_delta, lines_cleared);
                }
            }
            Ok(_) => {}
            Err(e) => eprintln!("unparseable line: {}", e),
        }
    }

    Ok(())
}

fn print_board(board: &[Vec<u8>]) {
    for row in board {
        let rendered: String = row
            .iter()
            .map(|&c| if c == 0 { '.' } else { '#' })
            .collect();
        println!("{}", rendered);
    }
}
