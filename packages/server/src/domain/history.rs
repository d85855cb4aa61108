//! Capacity-bounded chat history.

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// Number of chat messages retained in memory.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
/// Number of recent messages replayed to a client when it joins.
pub const DEFAULT_HISTORY_REPLAY: usize = 10;

/// Append-only window over the most recent chat messages, oldest first.
///
/// Once `capacity` messages are held, each append evicts the oldest one.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            capacity,
        }
    }

    /// Add a message at the tail and return the message evicted from the head, if any.
    pub fn append(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            self.messages.pop_front()
        } else {
            None
        }
    }

    /// Up to the last `n` messages, in arrival order.
    pub fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(n);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
