//! Message formatting utilities for client display.

use chrono::Local;
use hearth_server::infrastructure::dto::websocket::{
    ChatMessageDto, HistoryDto, HistoryEntry, ServerMessage, SystemMessageDto, UserCountDto,
};
use hearth_shared::time::parse_timestamp;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render one text frame received from the server.
    ///
    /// Frames that do not parse as a known server message are shown raw.
    pub fn format_frame(text: &str, me: &str) -> String {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(ServerMessage::Chat(chat)) => Self::format_chat_message(&chat, me),
            Ok(ServerMessage::System(system)) => Self::format_system_message(&system),
            Ok(ServerMessage::UserCount(count)) => Self::format_user_count(&count),
            Ok(ServerMessage::History(history)) => Self::format_history(&history, me),
            Err(_) => Self::format_raw_message(text),
        }
    }

    /// Format a chat message, marking the user's own messages with "(me)".
    pub fn format_chat_message(chat: &ChatMessageDto, me: &str) -> String {
        format!("\n{}\n", Self::chat_line(chat, me))
    }

    pub fn format_system_message(system: &SystemMessageDto) -> String {
        match system.client_count {
            Some(count) => format!(
                "\n*** {} ({} online) [{}]\n",
                system.message,
                count,
                Self::display_time(&system.timestamp)
            ),
            None => format!(
                "\n*** {} [{}]\n",
                system.message,
                Self::display_time(&system.timestamp)
            ),
        }
    }

    pub fn format_user_count(count: &UserCountDto) -> String {
        let noun = if count.count == 1 { "user" } else { "users" };
        format!("\n# {} {} online\n", count.count, noun)
    }

    /// Format the recent-history replay sent on join.
    pub fn format_history(history: &HistoryDto, me: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str(&format!(
            "Recent messages ({}):\n",
            history.messages.len()
        ));
        for HistoryEntry::Chat(chat) in &history.messages {
            output.push_str(&Self::chat_line(chat, me));
            output.push('\n');
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn chat_line(chat: &ChatMessageDto, me: &str) -> String {
        let me_suffix = if chat.username == me { " (me)" } else { "" };
        format!(
            "[{}] @{}{}: {}",
            Self::display_time(&chat.timestamp),
            chat.username,
            me_suffix,
            chat.message
        )
    }

    /// Wire timestamps are UTC; show them as local wall-clock time.
    fn display_time(timestamp: &str) -> String {
        parse_timestamp(timestamp)
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| timestamp.to_string())
    }
}
