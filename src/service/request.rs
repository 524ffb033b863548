//! Request envelopes.

use super::error::TransportError;
use serde_json::Value;

/// A parsed `login` or `auth` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Issue a ticket carrying `info`.
    Login {
        /// Caller-supplied data; `null` when the field was absent.
        info: Value,
    },
    /// Check a ticket.
    Auth {
        /// Hex ciphertext exactly as submitted.
        ticket: String,
    },
}

impl Request {
    /// Parses a raw request body.
    ///
    /// ```
    /// use frankenticket::service::Request;
    ///
    /// let req = Request::parse(br#"{"action": "auth", "ticket": "00"}"#).unwrap();
    /// assert_eq!(req, Request::Auth { ticket: "00".into() });
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, TransportError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| TransportError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Interprets an already-parsed body.
    ///
    /// Checks run in a fixed order: object shape, `action` presence, action
    /// name, then the fields that action needs.
    pub fn from_value(value: Value) -> Result<Self, TransportError> {
        let Value::Object(mut map) = value else {
            return Err(TransportError::NotAnObject);
        };
        let action = map.remove("action").ok_or(TransportError::MissingAction)?;

        match action.as_str() {
            Some("login") => Ok(Self::Login {
                info: map.remove("info").unwrap_or(Value::Null),
            }),
            Some("auth") => match map.remove("ticket") {
                None => Err(TransportError::MissingField("ticket")),
                Some(Value::String(ticket)) => Ok(Self::Auth { ticket }),
                Some(other) => Err(TransportError::TicketNotAString(json_type_name(&other))),
            },
            Some(other) => Err(TransportError::UnknownAction(other.to_string())),
            None => Err(TransportError::UnknownAction(action.to_string())),
        }
    }

    /// Action name, for logs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Auth { .. } => "auth",
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
