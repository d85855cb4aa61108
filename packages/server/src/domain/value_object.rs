//! Value objects.

use std::fmt;

use chrono::{DateTime, Utc};
use hearth_shared::time::format_timestamp;
use uuid::Uuid;

/// Display name used when a chat submission carries no username.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// Identity of one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author name attached to a chat message.
///
/// Free-form text; an absent or empty name becomes [`ANONYMOUS_USERNAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: Option<String>) -> Self {
        match raw {
            Some(name) if !name.is_empty() => Self(name),
            _ => Self(ANONYMOUS_USERNAME.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

/// Instant a message was created on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Wire representation (RFC 3339, UTC, milliseconds).
    pub fn to_wire(&self) -> String {
        format_timestamp(&self.0)
    }
}

/// Display key of a chat message: `<unix-millis>-<8 random hex chars>`.
///
/// Sorts roughly by creation time. Two messages created in the same
/// millisecond collide only if their random suffixes also match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn generate(timestamp: &Timestamp) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", timestamp.millis(), &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
