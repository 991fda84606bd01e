//! The inbound transport boundary.
//!
//! The gateway process feeding this tracker writes one JSON transition
//! per line on our stdin. This module parses that stream and pushes
//! typed transitions onto the engine's channel. Delivery guarantees,
//! reconnects, and authentication all live on the gateway side.

use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use vt_core::VoiceTransition;

/// Reads JSON-lines transitions from stdin until EOF or the engine hangs up.
///
/// Malformed lines are logged and skipped; blank lines are ignored.
pub async fn read_stdin(tx: mpsc::Sender<VoiceTransition>) {
    let stdin = tokio::io::stdin();
    let mut lines = tokio::io::BufReader::new(stdin).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if !forward_line(&line, &tx).await {
                    break;
                }
            }
            Ok(None) => {
                debug!("stdin closed; transport stopping");
                break;
            }
            Err(error) => {
                warn!(%error, "failed to read from stdin; transport stopping");
                break;
            }
        }
    }
}

/// Parses and forwards one line. Returns `false` when the receiver is gone.
async fn forward_line(line: &str, tx: &mpsc::Sender<VoiceTransition>) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    match serde_json::from_str::<VoiceTransition>(line) {
        Ok(transition) => tx.send(transition).await.is_ok(),
        Err(error) => {
            warn!(%error, "skipping malformed transition line");
            true
        }
    }
}
