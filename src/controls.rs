//! Interactive controls read from stdin.
//!
//! Parses one command per line and forwards it to the service loop over a
//! channel: the speech toggle, immediate mute, and quit.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events sent from the command reader to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    SpeechOn,
    SpeechOff,
    MuteNow,
    Quit,
}

pub fn parse_command(line: &str) -> Option<ControlEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "speech on" | "on" => Some(ControlEvent::SpeechOn),
        "speech off" | "off" => Some(ControlEvent::SpeechOff),
        "mute" => Some(ControlEvent::MuteNow),
        "quit" | "exit" | "q" => Some(ControlEvent::Quit),
        _ => None,
    }
}

/// Read commands until stdin closes or the service goes away.
pub async fn run(tx: mpsc::Sender<ControlEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Some(event) => {
                debug!("Control: {event:?}");
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            None => {
                if !line.trim().is_empty() {
                    warn!("Unknown command: {} (try: on, off, mute, quit)", line.trim());
                }
            }
        }
    }
}
