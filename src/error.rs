//! Crate-level error type.
//!
//! Each subsystem has its own error: [`CipherError`] for key and block
//! problems, [`SecurityError`] for rejected `info` data, [`DecodeError`] for
//! tickets that do not decrypt to JSON, [`TransportError`] for malformed
//! requests and [`ConfigError`] for bad settings. [`Error`] wraps them for
//! callers that only need to report and exit, such as the CLI.

use crate::cipher::CipherError;
use crate::config::ConfigError;
use crate::service::TransportError;
use crate::ticket::{DecodeError, SecurityError};
use thiserror::Error;

/// Any error this crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Cipher construction or block processing failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),
    /// Caller data was rejected by the sanitizer.
    #[error(transparent)]
    Security(#[from] SecurityError),
    /// A ticket could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A request envelope was malformed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Socket or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
