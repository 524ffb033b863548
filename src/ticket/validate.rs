//! Privilege checks over a decoded ticket.
//!
//! Validation runs a fixed list of checks in order and stops at the first
//! one that fails. Only membership is tested: extra privileges and any
//! ordering are accepted. Nothing here establishes where the ticket came
//! from; it only inspects what decryption produced.

use core::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A capability a ticket must carry to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// `"read"`
    Read,
    /// `"write"`
    Write,
    /// `"execute"`
    Execute,
}

impl Privilege {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Privileges an accepted ticket must hold, in check order.
pub const REQUIRED_PRIVILEGES: [Privilege; 3] =
    [Privilege::Read, Privilege::Write, Privilege::Execute];

/// The first check a ticket failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ValidationFailure {
    /// No data, or JSON `null`.
    #[error("Ticket data was null")]
    Null,
    /// Data is not a JSON object.
    #[error("Ticket data was not a dictionary")]
    NotAMapping,
    /// The object has no `privs` entry.
    #[error("Ticket does not contain a 'privs' key")]
    MissingPrivs,
    /// `privs` is not an array.
    #[error("Ticket 'privs' is not a list")]
    PrivsNotASequence,
    /// A required privilege is absent.
    #[error("Ticket does not have the '{0}' permission")]
    MissingPrivilege(Privilege),
}

/// Result of one validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every check passed.
    Ok,
    /// A check failed.
    Failed(ValidationFailure),
}

impl ValidationOutcome {
    /// Returns `true` if every check passed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns the failed check, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<ValidationFailure> {
        match self {
            Self::Ok => None,
            Self::Failed(failure) => Some(*failure),
        }
    }

    /// Returns the human-readable reason for a failure.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.failure().map(|f| f.to_string())
    }
}

impl From<Result<(), ValidationFailure>> for ValidationOutcome {
    fn from(result: Result<(), ValidationFailure>) -> Self {
        result.map_or_else(Self::Failed, |()| Self::Ok)
    }
}

/// Runs the privilege checks over a decoded candidate.
///
/// # Example
///
/// ```
/// use frankenticket::ticket::{validate, Privilege, ValidationFailure, ValidationOutcome};
/// use serde_json::json;
///
/// let full = json!({"privs": ["execute", "read", "write", "admin"]});
/// assert_eq!(validate(Some(&full)), ValidationOutcome::Ok);
///
/// let read_only = json!({"privs": ["read"]});
/// assert_eq!(
///     validate(Some(&read_only)).failure(),
///     Some(ValidationFailure::MissingPrivilege(Privilege::Write))
/// );
/// ```
#[must_use]
pub fn validate(candidate: Option<&Value>) -> ValidationOutcome {
    check(candidate).into()
}

fn check(candidate: Option<&Value>) -> Result<(), ValidationFailure> {
    let data = match candidate {
        None | Some(Value::Null) => return Err(ValidationFailure::Null),
        Some(data) => data,
    };
    let map = data.as_object().ok_or(ValidationFailure::NotAMapping)?;
    let privs = map.get("privs").ok_or(ValidationFailure::MissingPrivs)?;
    let privs = privs
        .as_array()
        .ok_or(ValidationFailure::PrivsNotASequence)?;

    for required in REQUIRED_PRIVILEGES {
        if !privs.iter().any(|p| p.as_str() == Some(required.as_str())) {
            return Err(ValidationFailure::MissingPrivilege(required));
        }
    }

    Ok(())
}
