//! Response bodies and status mapping.

use serde::Serialize;
use serde_json::Value;

/// Value of the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request succeeded.
    Ok,
    /// The ticket decoded but did not validate.
    Failed,
    /// The request or ticket was malformed.
    Error,
}

/// A JSON response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// A freshly issued ticket.
    Login {
        /// Always [`Status::Ok`].
        status: Status,
        /// Hex ciphertext.
        ticket: String,
        /// Padded plaintext that was encrypted.
        decrypted_ticket: String,
    },
    /// The verdict on a submitted ticket.
    Auth {
        /// [`Status::Ok`] or [`Status::Failed`].
        status: Status,
        /// Decrypted plaintext.
        ticket_text: String,
        /// Parsed plaintext, `null` if it was not JSON.
        ticket_data: Option<Value>,
        /// Failure reason, `null` on success.
        text: Option<String>,
    },
    /// A rejected request.
    Error {
        /// Always [`Status::Error`].
        status: Status,
        /// What went wrong.
        text: String,
    },
    /// A status-less notice, such as the reply to a `GET`.
    Notice {
        /// Notice text.
        text: String,
    },
}

/// A response ready for any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status_code: u16,
    /// JSON body.
    pub body: ResponseBody,
}

impl Response {
    /// `200` with a freshly issued ticket.
    #[must_use]
    pub fn login(ticket: String, decrypted_ticket: String) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Login {
                status: Status::Ok,
                ticket,
                decrypted_ticket,
            },
        }
    }

    /// `200` with an auth verdict.
    #[must_use]
    pub fn auth(ticket_text: String, ticket_data: Option<Value>, text: Option<String>) -> Self {
        let status = if text.is_none() {
            Status::Ok
        } else {
            Status::Failed
        };
        Self {
            status_code: 200,
            body: ResponseBody::Auth {
                status,
                ticket_text,
                ticket_data,
                text,
            },
        }
    }

    /// An error response.
    #[must_use]
    pub fn error(status_code: u16, text: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody::Error {
                status: Status::Error,
                text: text.into(),
            },
        }
    }

    /// A status-less notice.
    #[must_use]
    pub fn notice(status_code: u16, text: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody::Notice { text: text.into() },
        }
    }

    /// The body's `status`, if it has one.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match &self.body {
            ResponseBody::Login { status, .. }
            | ResponseBody::Auth { status, .. }
            | ResponseBody::Error { status, .. } => Some(*status),
            ResponseBody::Notice { .. } => None,
        }
    }

    /// The body's `text`, if set.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Auth { text, .. } => text.as_deref(),
            ResponseBody::Error { text, .. } | ResponseBody::Notice { text } => Some(text),
            ResponseBody::Login { .. } => None,
        }
    }

    /// Serializes the body.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Bodies are plain strings and JSON values; serialization cannot fail
        serde_json::to_string(&self.body)
            .unwrap_or_else(|_| r#"{"status": "error", "text": "unserializable response"}"#.into())
    }
}
