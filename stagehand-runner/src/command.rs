//! Inbound commands
//!
//! Operator commands arrive as text lines on stdin and are handed to the
//! service loop through a channel:
//!
//! - `change-layout <code>`
//! - `active-run <json>` or `active-run none`
//! - `snapshot`

use anyhow::{Context, Result};
use stagehand_core::domain::run::ActiveRun;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A command for the service loop
#[derive(Debug)]
pub enum Command {
    /// Switch to the layout with this code; `reply` fires once applied
    ChangeLayout {
        code: String,
        reply: Option<oneshot::Sender<()>>,
    },
    /// Replace the active run record
    SetActiveRun(Option<ActiveRun>),
    /// Print every replicant as JSON
    Snapshot,
}

impl Command {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "change-layout" => Ok(Some(Command::ChangeLayout {
                code: rest.to_string(),
                reply: None,
            })),
            "active-run" if rest == "none" || rest.is_empty() => {
                Ok(Some(Command::SetActiveRun(None)))
            }
            "active-run" => {
                let run: ActiveRun =
                    serde_json::from_str(rest).context("Invalid active run JSON")?;
                Ok(Some(Command::SetActiveRun(Some(run))))
            }
            "snapshot" => Ok(Some(Command::Snapshot)),
            other => anyhow::bail!("Unknown command: {}", other),
        }
    }
}

/// Spawns a task forwarding stdin lines as commands
///
/// The task ends, dropping `tx`, when stdin closes or the receiver is gone.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Command>) -> JoinHandle<()> {
    tokio::spawn(async move {
        forward_commands(BufReader::new(tokio::io::stdin()), tx).await;
    })
}

/// Forwards every parseable line of `reader` as a command
///
/// Lines that are not valid UTF-8 or not a known command are logged and
/// skipped.
pub async fn forward_commands<R>(mut reader: R, tx: mpsc::Sender<Command>)
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("Command input closed");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read command input: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        match Command::parse(&line) {
            Ok(Some(command)) => {
                debug!("Received command: {:?}", command);
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring command {:?}: {:#}", line, e),
        }
    }
}
