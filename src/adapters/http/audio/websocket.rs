//! Alerts WebSocket: pushes playback commands to connected displays.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::adapters::audio::PlaybackCommand;

use super::handlers::AudioHandlers;

/// GET /api/sounds/stream - Subscribe to playback commands
pub async fn alerts_ws(State(handlers): State<AudioHandlers>, ws: WebSocketUpgrade) -> Response {
    let receiver = handlers.output().subscribe();
    ws.on_upgrade(move |socket| stream_commands(socket, receiver))
}

async fn stream_commands(
    socket: WebSocket,
    mut receiver: tokio::sync::broadcast::Receiver<PlaybackCommand>,
) {
    tracing::debug!("display connected to alerts stream");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            command = receiver.recv() => match command {
                Ok(command) => {
                    let payload = match serde_json::to_string(&command) {
                        Ok(payload) => payload,
                        Err(error) => {
                            tracing::error!(%error, "failed to encode playback command");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                // A slow display missed some commands; stale alert sounds
                // are not worth replaying, so pick up from the current one.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "alerts stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            // Drain client frames so pings are answered and a close frame
            // ends the task promptly.
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    tracing::debug!("display disconnected from alerts stream");
}
