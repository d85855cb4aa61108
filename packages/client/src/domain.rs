//! Domain logic for client-side operations.
//!
//! Pure functions for input validation and the reconnect policy, kept free of
//! I/O so they are easy to test.

use std::time::Duration;

use crate::error::ClientError;

pub const MIN_USERNAME_CHARS: usize = 2;
pub const MAX_MESSAGE_CHARS: usize = 500;
/// Backoff grows linearly: attempt `n` waits `n × RECONNECT_BACKOFF_STEP`.
pub const RECONNECT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// How a session ended without a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user left (EOF / Ctrl+C)
    UserExit,
    /// The server completed a close handshake
    ServerClosed,
}

/// Validate and normalize the username given on the command line.
///
/// Surrounding whitespace is trimmed; the rest must be at least
/// [`MIN_USERNAME_CHARS`] characters long.
pub fn validate_username(raw: &str) -> Result<String, ClientError> {
    let username = raw.trim();
    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(ClientError::InvalidUsername(format!(
            "must be at least {} characters",
            MIN_USERNAME_CHARS
        )));
    }
    Ok(username.to_string())
}

/// Validate and normalize a line typed by the user before sending it.
pub fn validate_message(raw: &str) -> Result<String, ClientError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(ClientError::InvalidMessage("message is empty".to_string()));
    }
    let len = message.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ClientError::InvalidMessage(format!(
            "{} characters (max {})",
            len, MAX_MESSAGE_CHARS
        )));
    }
    Ok(message.to_string())
}

/// Check if the client should attempt to reconnect.
///
/// Only lost or failed connections are retried, and only while
/// `attempts_so_far < max_attempts`.
pub fn should_attempt_reconnect(
    error: &ClientError,
    attempts_so_far: u32,
    max_attempts: u32,
) -> bool {
    matches!(error, ClientError::ConnectionError(_)) && attempts_so_far < max_attempts
}

/// Delay before reconnection attempt `attempt` (1-based).
pub fn reconnect_delay(attempt: u32) -> Duration {
    RECONNECT_BACKOFF_STEP.saturating_mul(attempt)
}

/// What the runner does after a connection attempt ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Clean end; the client exits.
    Finish,
    /// Reconnect; `attempt` is the new attempt count (1-based).
    Retry { attempt: u32 },
    /// Stop retrying after `attempts` reconnection attempts.
    GiveUp { attempts: u32 },
}

/// Decide whether to reconnect after `result`.
///
/// `connected` tells whether the connection was established before it ended;
/// a successful connection resets the attempt count to zero.
pub fn next_reconnect(
    result: &Result<SessionEnd, ClientError>,
    connected: bool,
    attempts_so_far: u32,
    max_attempts: u32,
) -> ReconnectDecision {
    let attempts = if connected { 0 } else { attempts_so_far };
    match result {
        Ok(_) => ReconnectDecision::Finish,
        Err(e) if should_attempt_reconnect(e, attempts, max_attempts) => {
            ReconnectDecision::Retry {
                attempt: attempts + 1,
            }
        }
        Err(_) => ReconnectDecision::GiveUp { attempts },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_trims() {
        // テスト項目: ユーザー名の前後の空白が除去される
        // given (前提条件):
        let raw = "  alice  ";

        // when (操作):
        let result = validate_username(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap(), "alice");
    }

    #[test]
    fn test_validate_username_too_short() {
        // テスト項目: 2 文字未満のユーザー名は拒否される（空白のみも含む）
        // given (前提条件):
        let cases = ["", "   ", "a", " b "];

        for raw in cases {
            // when (操作):
            let result = validate_username(raw);

            // then (期待する結果):
            assert!(
                matches!(result, Err(ClientError::InvalidUsername(_))),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_validate_username_counts_characters_not_bytes() {
        // テスト項目: マルチバイト文字も 1 文字として数えられる
        // given (前提条件):
        let raw = "猫";

        // when (操作):
        let short = validate_username(raw);
        let ok = validate_username("猫又");

        // then (期待する結果):
        assert!(short.is_err());
        assert_eq!(ok.unwrap(), "猫又");
    }

    #[test]
    fn test_validate_message_rejects_blank() {
        // テスト項目: 空白のみのメッセージは送信されない
        // given (前提条件):
        let raw = " \t ";

        // when (操作):
        let result = validate_message(raw);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidMessage(_))));
    }

    #[test]
    fn test_validate_message_length_limit() {
        // テスト項目: 500 文字までは許可され、501 文字は拒否される
        // given (前提条件):
        let at_limit = "x".repeat(MAX_MESSAGE_CHARS);
        let over_limit = "x".repeat(MAX_MESSAGE_CHARS + 1);

        // when (操作):
        let ok = validate_message(&at_limit);
        let too_long = validate_message(&over_limit);

        // then (期待する結果):
        assert_eq!(ok.unwrap().len(), MAX_MESSAGE_CHARS);
        assert!(matches!(too_long, Err(ClientError::InvalidMessage(_))));
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let last = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_on_validation_error() {
        // テスト項目: 入力検証エラーでは再接続しない
        // given (前提条件):
        let error = ClientError::InvalidUsername("too short".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_reconnect_delay_is_linear() {
        // テスト項目: 再接続の待ち時間は 2 秒 × 試行回数
        // given (前提条件):
        let attempts = [1, 2, 5];

        // when (操作):
        let delays: Vec<Duration> = attempts.iter().map(|a| reconnect_delay(*a)).collect();

        // then (期待する結果):
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(10)
            ]
        );
    }

    #[test]
    fn test_clean_end_never_reconnects() {
        // テスト項目: ユーザー終了・サーバーからの正常クローズでは再接続しない
        // given (前提条件):
        let cases = [Ok(SessionEnd::UserExit), Ok(SessionEnd::ServerClosed)];

        for result in cases {
            // when (操作):
            let decision = next_reconnect(&result, true, 0, 5);

            // then (期待する結果):
            assert_eq!(decision, ReconnectDecision::Finish);
        }
    }

    #[test]
    fn test_lost_connection_is_retried() {
        // テスト項目: 接続失敗（未接続）の場合は試行回数を 1 増やして再接続する
        // given (前提条件):
        let result = Err(ClientError::ConnectionError("refused".to_string()));

        // when (操作):
        let decision = next_reconnect(&result, false, 2, 5);

        // then (期待する結果):
        assert_eq!(decision, ReconnectDecision::Retry { attempt: 3 });
    }

    #[test]
    fn test_successful_connection_resets_attempts() {
        // テスト項目: 接続成功後の切断では試行回数が 0 から数え直される
        // given (前提条件):
        let result = Err(ClientError::ConnectionError("dropped".to_string()));

        // when (操作):
        let decision = next_reconnect(&result, true, 4, 5);

        // then (期待する結果):
        assert_eq!(decision, ReconnectDecision::Retry { attempt: 1 });
    }

    #[test]
    fn test_gives_up_when_attempts_exhausted() {
        // テスト項目: 上限に達した接続失敗では再接続を諦める
        // given (前提条件):
        let result = Err(ClientError::ConnectionError("refused".to_string()));

        // when (操作):
        let decision = next_reconnect(&result, false, 5, 5);

        // then (期待する結果):
        assert_eq!(decision, ReconnectDecision::GiveUp { attempts: 5 });
    }

    #[test]
    fn test_dropped_connection_with_zero_budget_gives_up() {
        // テスト項目: 再接続回数 0 の設定では、接続成功後の切断でも再接続しない
        // given (前提条件):
        let result = Err(ClientError::ConnectionError("dropped".to_string()));

        // when (操作):
        let decision = next_reconnect(&result, true, 3, 0);

        // then (期待する結果):
        assert_eq!(decision, ReconnectDecision::GiveUp { attempts: 0 });
    }
}
