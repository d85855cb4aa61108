//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use hearth_server::infrastructure::dto::websocket::{ChatSubmission, ClientMessage};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    domain::{SessionEnd, validate_message},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket connection to the chat server.
pub async fn connect(url: &str) -> Result<WsStream, ClientError> {
    let (stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    Ok(stream)
}

/// Encode a chat frame for the server.
pub fn encode_chat(username: &str, message: String) -> Result<String, ClientError> {
    let frame = ClientMessage::Chat(ChatSubmission {
        username: Some(username.to_string()),
        message,
    });
    serde_json::to_string(&frame).map_err(|e| ClientError::InvalidMessage(e.to_string()))
}

/// Run one connected session until the user leaves or the connection ends.
///
/// Returns `Ok` for a clean end and `Err(ConnectionError)` when the
/// connection was lost, which the runner treats as retryable.
pub async fn run_session(
    stream: WsStream,
    username: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    let (mut write, read) = stream.split();
    let mut read_task = tokio::spawn(read_loop(read, username.to_string()));

    loop {
        tokio::select! {
            read_result = &mut read_task => {
                return match read_result {
                    Ok(end) => end,
                    Err(e) => Err(ClientError::ConnectionError(e.to_string())),
                };
            }
            line = input.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(SessionEnd::UserExit);
                };
                if let Err(e) = send_line(&mut write, username, &line).await {
                    if matches!(e, ClientError::ConnectionError(_)) {
                        read_task.abort();
                        return Err(e);
                    }
                    println!("{}", e);
                    redisplay_prompt(username);
                }
            }
        }
    }
}

async fn send_line(
    write: &mut SplitSink<WsStream, Message>,
    username: &str,
    line: &str,
) -> Result<(), ClientError> {
    let message = validate_message(line)?;
    let json = encode_chat(username, message)?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

async fn read_loop(
    mut read: SplitStream<WsStream>,
    username: String,
) -> Result<SessionEnd, ClientError> {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                print!("{}", MessageFormatter::format_frame(text.as_str(), &username));
                redisplay_prompt(&username);
            }
            Ok(Message::Binary(data)) => {
                print!("{}", MessageFormatter::format_binary_message(data.len()));
                redisplay_prompt(&username);
            }
            Ok(Message::Close(frame)) => {
                tracing::info!("Server closed the connection: {:?}", frame);
                return Ok(SessionEnd::ServerClosed);
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
            _ => {}
        }
    }

    Err(ClientError::ConnectionError(
        "Connection dropped without close handshake".to_string(),
    ))
}
