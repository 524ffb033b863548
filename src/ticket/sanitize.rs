//! Reserved-key guard for caller-supplied ticket data.
//!
//! The `info` value is embedded verbatim in the ticket. A caller who could
//! place `privs` (or any other record field) inside it would be one step
//! from smuggling privileges into the plaintext, so every object at every
//! depth is checked before a ticket is issued.

use serde_json::Value;
use thiserror::Error;

/// Keys that may not appear in any object inside `info`, in check order.
pub const RESERVED_KEYS: [&str; 4] = ["privs", "username", "info", "timestamp"];

/// Default bound on container nesting inside `info`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Rejection raised by [`InputSanitizer::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// An object inside `info` uses a reserved key.
    #[error("Security alert: The '{key}' key is disallowed in the 'info' dictionary.")]
    ReservedKey {
        /// The offending key.
        key: String,
    },
    /// `info` nests containers deeper than the configured limit.
    #[error("Security alert: The 'info' data is nested deeper than {limit} levels.")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
    },
}

/// Walks `info` and rejects reserved keys and runaway nesting.
///
/// # Example
///
/// ```
/// use frankenticket::ticket::{InputSanitizer, SecurityError};
/// use serde_json::json;
///
/// let sanitizer = InputSanitizer::default();
/// assert!(sanitizer.sanitize(&json!({"a": [1, 2, {"c": "d"}]})).is_ok());
/// assert_eq!(
///     sanitizer.sanitize(&json!({"a": {"b": {"username": "x"}}})),
///     Err(SecurityError::ReservedKey { key: "username".into() })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSanitizer {
    max_depth: usize,
}

impl InputSanitizer {
    /// Creates a sanitizer that allows at most `max_depth` nested containers.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Returns the nesting limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Checks `value`, stopping at the first violation.
    ///
    /// Traversal is depth-first in document order. Within one object the
    /// reserved keys are tested in [`RESERVED_KEYS`] order, so an object
    /// holding both `info` and `privs` is reported as `privs`. Scalars are
    /// always accepted.
    pub fn sanitize(&self, value: &Value) -> Result<(), SecurityError> {
        // Iterative: no recursion over caller-controlled depth
        let mut pending: Vec<(&Value, usize)> = vec![(value, 0)];

        while let Some((node, depth)) = pending.pop() {
            match node {
                Value::Object(map) => {
                    self.enter(depth)?;
                    if let Some(key) = RESERVED_KEYS.iter().find(|k| map.contains_key(**k)) {
                        return Err(SecurityError::ReservedKey {
                            key: (*key).to_string(),
                        });
                    }
                    pending.extend(map.values().rev().map(|v| (v, depth + 1)));
                }
                Value::Array(items) => {
                    self.enter(depth)?;
                    pending.extend(items.iter().rev().map(|v| (v, depth + 1)));
                }
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
            }
        }

        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<(), SecurityError> {
        if depth >= self.max_depth {
            Err(SecurityError::NestingTooDeep {
                limit: self.max_depth,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
