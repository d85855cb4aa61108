//! Frame helpers shared by the use cases.

use hearth_shared::time::Clock;

use crate::{
    domain::{BroadcastReport, ConnectionId, MessagePusher, Timestamp},
    infrastructure::dto::websocket::{ServerMessage, UserCountDto},
};

/// Serialize a frame, logging (and swallowing) the failure.
pub(super) fn encode(frame: &ServerMessage) -> Option<String> {
    match frame.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!("Failed to serialize outbound frame: {}", e);
            None
        }
    }
}

/// Send a frame to one connection; failures are logged only.
pub(super) async fn push_frame(
    message_pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    frame: &ServerMessage,
) -> bool {
    let Some(json) = encode(frame) else {
        return false;
    };
    match message_pusher.push_to(connection_id, &json).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to push frame: {}", e);
            false
        }
    }
}

/// Broadcast the current registry size to every registered connection.
pub(super) async fn broadcast_user_count(
    message_pusher: &dyn MessagePusher,
    clock: &dyn Clock,
) -> (usize, BroadcastReport) {
    let count = message_pusher.count_clients().await;
    let frame = ServerMessage::UserCount(UserCountDto {
        count,
        timestamp: Timestamp::new(clock.now()).to_wire(),
    });
    let report = match encode(&frame) {
        Some(json) => message_pusher.broadcast(&json).await,
        None => BroadcastReport::default(),
    };
    (count, report)
}
