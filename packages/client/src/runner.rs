//! Client execution logic with reconnection support.

use crate::{
    domain::{ReconnectDecision, SessionEnd, next_reconnect, reconnect_delay, validate_username},
    error::ClientError,
    session::{connect, run_session},
    ui::spawn_input_thread,
};

pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Options for [`run_client`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    pub username: String,
    pub max_reconnect_attempts: u32,
}

/// Run the WebSocket client with reconnection logic
///
/// Returns `Ok` when the user leaves or the server closes cleanly. Lost
/// connections are retried with linear backoff; the attempt counter is reset
/// every time a connection succeeds. The readline thread starts with the first
/// successful connection and is shared by later ones.
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let username = validate_username(&options.username)?;
    let max_attempts = options.max_reconnect_attempts;
    let mut input = None;
    let mut attempts: u32 = 0;

    loop {
        tracing::info!("Connecting to {} as '{}'", options.url, username);

        let (result, connected) = match connect(&options.url).await {
            Ok(stream) => {
                tracing::info!("Connected to chat server!");
                let input = input.get_or_insert_with(|| spawn_input_thread(&username));
                (run_session(stream, &username, input).await, true)
            }
            Err(e) => (Err(e), false),
        };

        match next_reconnect(&result, connected, attempts, max_attempts) {
            ReconnectDecision::Finish => {
                if let Ok(SessionEnd::ServerClosed) = result {
                    println!("\nDisconnected from server.");
                } else {
                    tracing::info!("Client session ended normally");
                }
                return Ok(());
            }
            ReconnectDecision::Retry { attempt } => {
                if let Err(e) = &result {
                    tracing::warn!("Connection lost: {}", e);
                }
                attempts = attempt;
                let delay = reconnect_delay(attempt);
                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    delay.as_secs(),
                    attempt,
                    max_attempts
                );
                tokio::time::sleep(delay).await;
            }
            ReconnectDecision::GiveUp { attempts: tried } => {
                return match result {
                    Err(ClientError::ConnectionError(e)) => {
                        tracing::warn!("Connection lost: {}", e);
                        Err(ClientError::ReconnectExhausted(tried))
                    }
                    Err(other) => Err(other),
                    Ok(_) => Ok(()),
                };
            }
        }
    }
}
