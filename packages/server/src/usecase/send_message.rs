//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信ペイロードの解釈、履歴への追加、送信者を含む全員へのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：chat メッセージの送信
//! - 正常系：username 省略時は Anonymous
//! - 異常系：解釈できないペイロード（履歴・レジストリを変更しない）
//! - エッジケース：未知の type は無視

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::{
    domain::{
        BroadcastReport, ChatMessage, HistoryRepository, MessageId, MessagePusher, Timestamp,
        Username,
    },
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
};

use super::error::InboundMessageError;

/// What happened to one inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// A chat message was stored and fanned out.
    Broadcast {
        message_id: MessageId,
        report: BroadcastReport,
    },
    /// Well-formed, but not a kind the server acts on.
    Ignored,
    /// Unparseable; nothing was changed.
    Dropped,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn HistoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 受信ペイロードを処理
    ///
    /// # Returns
    ///
    /// * `Ok(InboundOutcome::Broadcast)` - 履歴に追加し全員へ送信した
    /// * `Ok(InboundOutcome::Ignored)` - chat 以外の type
    /// * `Err(InboundMessageError)` - 解釈できない（状態は変更しない）
    pub async fn execute(&self, raw: &str) -> Result<InboundOutcome, InboundMessageError> {
        let submission = match serde_json::from_str::<ClientMessage>(raw)? {
            ClientMessage::Chat(submission) => submission,
            ClientMessage::Unknown => return Ok(InboundOutcome::Ignored),
        };

        let message = ChatMessage::new(
            Username::new(submission.username),
            submission.message,
            Timestamp::new(self.clock.now()),
        );
        // エンコードに失敗した場合は履歴にも追加しない
        let json = ServerMessage::from(&message)
            .to_json()
            .map_err(InboundMessageError::Encode)?;
        let message_id = message.id.clone();

        // 1. 履歴に追加
        self.repository.append(message).await;

        // 2. 送信者を含む全員へブロードキャスト
        let report = self.message_pusher.broadcast(&json).await;

        Ok(InboundOutcome::Broadcast { message_id, report })
    }
}
