//! WebSocket server streaming phone snapshots to browsers.
//!
//! Each client receives the current snapshot on connect and every snapshot
//! after that as a text frame. Clients send commands as JSON text frames.

use super::driver::DriverHandle;
use crate::phone::Command;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Accept connections on `port` until the process exits.
pub async fn start_live_server(port: u16, driver: Arc<DriverHandle>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Live feed listening on ws://localhost:{}", port);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let driver = Arc::clone(&driver);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, driver).await {
                        warn!("Connection error from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                warn!("Accept error: {}", e);
            }
        }
    }
}

/// Parse one client frame. Unknown shapes are rejected, never guessed at.
pub fn parse_command(text: &str) -> Option<Command> {
    match serde_json::from_str(text) {
        Ok(command) => Some(command),
        Err(e) => {
            debug!("Ignoring malformed command: {}", e);
            None
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    driver: Arc<DriverHandle>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("Live feed client connected: {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Subscribe before reading the initial snapshot so nothing is missed
    let mut snapshot_rx = driver.subscribe();
    if let Some(json) = driver.snapshot_json().await {
        ws_sender.send(Message::Text(json)).await?;
    }

    let send_task = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                // A slow client only needs the latest state
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Some(command) = parse_command(&text) {
                    driver.apply(command).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    info!("Live feed client disconnected: {}", addr);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_accepts_wire_format() {
        assert_eq!(
            parse_command(r#"{"type":"leave","chatId":"4"}"#),
            Some(Command::Leave {
                chat_id: "4".into()
            })
        );
    }

    #[test]
    fn test_parse_command_rejects_garbage() {
        assert_eq!(parse_command("charge please"), None);
        assert_eq!(parse_command(r#"{"type":"selfDestruct"}"#), None);
    }
}
