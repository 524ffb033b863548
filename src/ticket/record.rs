//! The ticket record.

use super::canonical::to_canonical_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `strftime` layout of [`Ticket::timestamp`]: UTC with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Username stamped on tickets by the default issuer.
pub const DEFAULT_USERNAME: &str = "John Doe";

/// Privileges granted by the default issuer.
pub const DEFAULT_PRIVS: [&str; 1] = ["read"];

/// An access ticket before encryption.
///
/// `info` is caller-supplied and arbitrary; everything else is set by the
/// issuer. A ticket is built once, serialized, encrypted and dropped.
///
/// # Example
///
/// ```
/// use frankenticket::ticket::Ticket;
/// use serde_json::Value;
///
/// let ticket = Ticket::new("John Doe", Value::Null, vec!["read".into()])
///     .with_timestamp("2021-05-01T12:00:00.000000Z");
/// assert_eq!(
///     ticket.to_canonical_string(),
///     r#"{"info": null, "privs": ["read"], "timestamp": "2021-05-01T12:00:00.000000Z", "username": "John Doe"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Issuer-assigned identity.
    pub username: String,
    /// Caller-supplied data; `null` when absent.
    pub info: Value,
    /// Capability strings, in issue order.
    pub privs: Vec<String>,
    /// Issue time, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
}

impl Ticket {
    /// Creates a ticket stamped with the current time.
    #[must_use]
    pub fn new(username: impl Into<String>, info: Value, privs: Vec<String>) -> Self {
        Self {
            username: username.into(),
            info,
            privs,
            timestamp: format_timestamp(Utc::now()),
        }
    }

    /// Replaces the timestamp text.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Replaces the timestamp with a formatted instant.
    #[must_use]
    pub fn issued_at(self, at: DateTime<Utc>) -> Self {
        self.with_timestamp(format_timestamp(at))
    }

    /// Returns the record as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("username".into(), Value::String(self.username.clone()));
        map.insert("info".into(), self.info.clone());
        map.insert(
            "privs".into(),
            Value::Array(self.privs.iter().cloned().map(Value::String).collect()),
        );
        map.insert("timestamp".into(), Value::String(self.timestamp.clone()));
        Value::Object(map)
    }

    /// Returns the unpadded canonical plaintext.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        to_canonical_string(&self.to_value())
    }
}

/// Formats an instant the way ticket timestamps are written.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
