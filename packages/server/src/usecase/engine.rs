//! Broadcast engine: the single entry point the transport calls on every
//! connection lifecycle event.
//!
//! All state-changing operations run under one sequencer lock, held across
//! both the mutation and the fan-out. Every client therefore observes chat
//! messages in history order, and a joining client's history snapshot is
//! taken atomically with its registration (no message is missed or repeated
//! between the two).

use std::{fmt, sync::Arc};

use hearth_shared::time::Clock;
use tokio::sync::Mutex;

use crate::{
    config::EngineConfig,
    domain::{ConnectionHandle, ConnectionId, HistoryRepository, MessagePusher},
};

use super::{
    ConnectClientUseCase, ConnectOutcome, DisconnectClientUseCase, DisconnectOutcome,
    InboundOutcome, SendMessageUseCase,
};

pub struct BroadcastEngine {
    sequencer: Mutex<()>,
    connect_client: ConnectClientUseCase,
    disconnect_client: DisconnectClientUseCase,
    send_message: SendMessageUseCase,
    repository: Arc<dyn HistoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEngine {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            sequencer: Mutex::new(()),
            connect_client: ConnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                config.history_replay,
            ),
            disconnect_client: DisconnectClientUseCase::new(message_pusher.clone(), clock.clone()),
            send_message: SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            ),
            repository,
            message_pusher,
        }
    }

    /// A connection opened.
    pub async fn on_connect(&self, connection: ConnectionHandle) -> ConnectOutcome {
        let _guard = self.sequencer.lock().await;
        let connection_id = connection.id();
        let outcome = self.connect_client.execute(connection).await;
        tracing::info!(
            "Connection '{}' joined ({} connected, {} replayed)",
            connection_id,
            outcome.client_count,
            outcome.replayed
        );
        outcome
    }

    /// A connection closed.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        let _guard = self.sequencer.lock().await;
        let outcome = self.disconnect_client.execute(connection_id).await;
        tracing::info!(
            "Connection '{}' left ({} connected)",
            connection_id,
            outcome.client_count
        );
        outcome
    }

    /// A connection delivered a payload. Never fails: bad payloads are logged and dropped.
    pub async fn on_inbound_message(
        &self,
        connection_id: &ConnectionId,
        raw: &str,
    ) -> InboundOutcome {
        let _guard = self.sequencer.lock().await;
        match self.send_message.execute(raw).await {
            Ok(outcome) => {
                match &outcome {
                    InboundOutcome::Broadcast { message_id, report } => tracing::info!(
                        "Broadcasted message '{}' from '{}' to {}/{} clients",
                        message_id,
                        connection_id,
                        report.delivered,
                        report.attempted()
                    ),
                    _ => tracing::debug!(
                        "Ignored payload of unknown type from '{}'",
                        connection_id
                    ),
                }
                outcome
            }
            Err(e) => {
                tracing::warn!("Dropping payload from '{}': {}", connection_id, e);
                InboundOutcome::Dropped
            }
        }
    }

    /// The transport reported an error on a connection; handled as a disconnect.
    pub async fn on_transport_error(
        &self,
        connection_id: &ConnectionId,
        error: impl fmt::Display,
    ) -> DisconnectOutcome {
        tracing::error!("Transport error on '{}': {}", connection_id, error);
        self.on_disconnect(connection_id).await
    }

    pub async fn client_count(&self) -> usize {
        self.message_pusher.count_clients().await
    }

    pub async fn history_len(&self) -> usize {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryHistoryRepository,
    };
    use hearth_shared::time::FixedClock;
    use serde_json::Value;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続時の送信順序（system → history → userCount）
    // - chat の全員への配信（送信者を含む）と履歴の上限
    // - 切断・トランスポートエラー時の接続数通知
    // - 不正なペイロードで状態が変わらないこと
    // - 並行送信でも全クライアントが同じ順序で受信すること
    // ========================================

    fn engine() -> Arc<BroadcastEngine> {
        let config = EngineConfig::default();
        Arc::new(BroadcastEngine::new(
            Arc::new(InMemoryHistoryRepository::with_capacity(
                config.history_capacity,
            )),
            Arc::new(WebSocketMessagePusher::default()),
            Arc::new(FixedClock::from_millis(1_704_067_200_000)),
            config,
        ))
    }

    struct TestClient {
        id: ConnectionId,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl TestClient {
        async fn connect(engine: &BroadcastEngine) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let handle = ConnectionHandle::open(tx);
            let id = handle.id();
            engine.on_connect(handle).await;
            Self { id, rx }
        }

        fn drain(&mut self) -> Vec<Value> {
            let mut frames = Vec::new();
            while let Ok(raw) = self.rx.try_recv() {
                frames.push(serde_json::from_str(&raw).unwrap());
            }
            frames
        }
    }

    fn chat(username: &str, message: &str) -> String {
        serde_json::json!({"type": "chat", "username": username, "message": message}).to_string()
    }

    #[tokio::test]
    async fn test_scenario_first_client_connects() {
        // テスト項目: 最初の接続は system(clientCount=1) と userCount(1) を受け取り history は受け取らない
        // given (前提条件):
        let engine = engine();

        // when (操作):
        let mut x = TestClient::connect(&engine).await;

        // then (期待する結果):
        let frames = x.drain();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["type"], "system");
        assert_eq!(frames[0]["message"], "Connected to chat server!");
        assert_eq!(frames[0]["clientCount"], 1);
        assert_eq!(frames[1]["type"], "userCount");
        assert_eq!(frames[1]["count"], 1);
    }

    #[tokio::test]
    async fn test_scenario_chat_is_echoed_and_stored() {
        // テスト項目: chat が送信者に返送され、履歴に 1 件保存される
        // given (前提条件):
        let engine = engine();
        let mut x = TestClient::connect(&engine).await;
        x.drain();

        // when (操作):
        let outcome = engine.on_inbound_message(&x.id, &chat("alice", "hi")).await;

        // then (期待する結果):
        assert!(matches!(outcome, InboundOutcome::Broadcast { .. }));
        let frames = x.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "chat");
        assert_eq!(frames[0]["username"], "alice");
        assert_eq!(frames[0]["message"], "hi");
        assert!(frames[0]["timestamp"].is_string());
        assert!(frames[0]["id"].is_string());
        assert_eq!(engine.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_scenario_disconnect_updates_remaining_count() {
        // テスト項目: Y の切断後、X は count=1 を受け取り、Y は以後の配信対象外になる
        // given (前提条件):
        let engine = engine();
        let mut x = TestClient::connect(&engine).await;
        let mut y = TestClient::connect(&engine).await;
        x.drain();
        y.drain();

        // when (操作):
        let outcome = engine.on_disconnect(&y.id).await;
        engine.on_inbound_message(&x.id, &chat("alice", "after")).await;

        // then (期待する結果):
        assert!(outcome.removed);
        let frames = x.drain();
        assert_eq!(frames[0]["type"], "userCount");
        assert_eq!(frames[0]["count"], 1);
        assert_eq!(frames[1]["message"], "after");
        assert!(y.drain().is_empty());
    }

    #[tokio::test]
    async fn test_join_receives_system_and_history_before_count() {
        // テスト項目: 履歴がある状態で接続すると system → history → userCount の順に 1 回ずつ届く
        // given (前提条件):
        let engine = engine();
        let x = TestClient::connect(&engine).await;
        for n in 1..=12 {
            engine
                .on_inbound_message(&x.id, &chat("alice", &format!("m{n}")))
                .await;
        }

        // when (操作):
        let mut z = TestClient::connect(&engine).await;

        // then (期待する結果):
        let frames = z.drain();
        let kinds: Vec<&str> = frames.iter().map(|f| f["type"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["system", "history", "userCount"]);
        assert_eq!(frames[0]["clientCount"], 2);
        let replayed: Vec<&str> = frames[1]["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["message"].as_str().unwrap())
            .collect();
        let expected: Vec<String> = (3..=12).map(|n| format!("m{n}")).collect();
        assert_eq!(replayed, expected);
        assert_eq!(frames[2]["count"], 2);
    }

    #[tokio::test]
    async fn test_history_is_capped_at_fifty() {
        // テスト項目: 55 件送信後、履歴は 50 件で、新規接続には #46〜#55 が届く
        // given (前提条件):
        let engine = engine();
        let x = TestClient::connect(&engine).await;

        // when (操作):
        for n in 1..=55 {
            engine
                .on_inbound_message(&x.id, &chat("alice", &format!("#{n}")))
                .await;
        }
        let mut z = TestClient::connect(&engine).await;

        // then (期待する結果):
        assert_eq!(engine.history_len().await, 50);
        let frames = z.drain();
        let replayed: Vec<&str> = frames[1]["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["message"].as_str().unwrap())
            .collect();
        let expected: Vec<String> = (46..=55).map(|n| format!("#{n}")).collect();
        assert_eq!(replayed, expected);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dropped_without_side_effects() {
        // テスト項目: 不正なペイロードは破棄され、履歴・レジストリ・送信に影響しない
        // given (前提条件):
        let engine = engine();
        let mut x = TestClient::connect(&engine).await;
        x.drain();

        // when (操作):
        let outcome = engine.on_inbound_message(&x.id, "{\"type\":").await;

        // then (期待する結果):
        assert_eq!(outcome, InboundOutcome::Dropped);
        assert_eq!(engine.history_len().await, 0);
        assert_eq!(engine.client_count().await, 1);
        assert!(x.drain().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_treated_as_disconnect() {
        // テスト項目: トランスポートエラーは切断として扱われ、二重の解除は無害
        // given (前提条件):
        let engine = engine();
        let mut x = TestClient::connect(&engine).await;
        let y = TestClient::connect(&engine).await;
        x.drain();

        // when (操作):
        let first = engine.on_transport_error(&y.id, "connection reset").await;
        let second = engine.on_disconnect(&y.id).await;

        // then (期待する結果):
        assert!(first.removed);
        assert!(!second.removed);
        assert_eq!(engine.client_count().await, 1);
        let counts: Vec<u64> = x
            .drain()
            .iter()
            .map(|f| f["count"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_stale_connection_is_skipped_during_fan_out() {
        // テスト項目: 閉じた接続はスキップされ、他の接続への配信は継続される
        // given (前提条件):
        let engine = engine();
        let mut x = TestClient::connect(&engine).await;
        let y = TestClient::connect(&engine).await;
        x.drain();
        drop(y.rx);

        // when (操作):
        let outcome = engine.on_inbound_message(&x.id, &chat("alice", "hi")).await;

        // then (期待する結果):
        let InboundOutcome::Broadcast { report, .. } = outcome else {
            panic!("expected broadcast, got {outcome:?}");
        };
        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(x.drain()[0]["message"], "hi");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_senders_are_seen_in_one_order() {
        // テスト項目: 複数接続からの並行送信でも、全クライアントが同じ順序・各 1 回で受信する
        // given (前提条件):
        let engine = engine();
        let mut clients = Vec::new();
        for _ in 0..4 {
            clients.push(TestClient::connect(&engine).await);
        }
        for client in clients.iter_mut() {
            client.drain();
        }

        // when (操作):
        let mut tasks = Vec::new();
        for (i, client) in clients.iter().enumerate() {
            let engine = engine.clone();
            let id = client.id;
            tasks.push(tokio::spawn(async move {
                for n in 0..10 {
                    engine
                        .on_inbound_message(&id, &chat(&format!("user{i}"), &format!("{i}-{n}")))
                        .await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        let sequences: Vec<Vec<String>> = clients
            .iter_mut()
            .map(|c| {
                c.drain()
                    .iter()
                    .map(|f| f["message"].as_str().unwrap().to_string())
                    .collect()
            })
            .collect();
        assert_eq!(sequences[0].len(), 40);
        for sequence in &sequences[1..] {
            assert_eq!(sequence, &sequences[0]);
        }
        // 各接続内の送信順序は保たれる
        for i in 0..4 {
            let own: Vec<&String> = sequences[0]
                .iter()
                .filter(|m| m.starts_with(&format!("{i}-")))
                .collect();
            let expected: Vec<String> = (0..10).map(|n| format!("{i}-{n}")).collect();
            assert_eq!(own, expected.iter().collect::<Vec<_>>());
        }
    }
}
