//! Envelope errors.

use thiserror::Error;

/// A request that could not be interpreted.
///
/// The texts are part of the public response format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The body is not JSON.
    #[error("Unable to parse JSON: {0}")]
    InvalidJson(String),
    /// The body is JSON but not an object.
    #[error("Unable to interpret JSON: Expected dict data type")]
    NotAnObject,
    /// The object has no `action`.
    #[error("Unable to interpret JSON: No 'action' field present")]
    MissingAction,
    /// The action needs a field that is absent.
    #[error("Unable to interpret JSON: No '{0}' field present")]
    MissingField(&'static str),
    /// The `ticket` field is present but not a string.
    #[error("Unable to parse ticket as hex: expected a string, found {0}")]
    TicketNotAString(&'static str),
    /// The action is not `login` or `auth`.
    #[error("Unknown JSON action: {0}")]
    UnknownAction(String),
    /// A base64-flagged body did not decode.
    #[error("Unable to decode base64: invalid data ({0})")]
    InvalidBase64(String),
}

impl TransportError {
    /// HTTP status to answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }
}
