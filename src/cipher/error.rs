//! Cipher construction and block-processing errors.
//!
//! These errors are raised while building a cipher from key material or
//! when a buffer handed to the ECB helpers is not block aligned. A bad key
//! is fatal at startup; a misaligned buffer is reported back to the caller.

use core::fmt;

/// The kind of cipher error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherErrorKind {
    /// The key has the wrong length for the selected cipher.
    InvalidKeyLength {
        /// Length the cipher requires, in bytes.
        expected: usize,
        /// Length that was supplied, in bytes.
        actual: usize,
    },
    /// The key text is not valid hex.
    InvalidKeyEncoding,
    /// A buffer is not a whole number of 16-byte blocks.
    InvalidBlockLength {
        /// Length of the rejected buffer, in bytes.
        len: usize,
    },
    /// The cipher name is not recognized.
    UnknownCipher,
    /// The operating system could not supply random bytes.
    EntropyUnavailable,
}

/// An error from cipher operations.
///
/// # Example
///
/// ```
/// use frankenticket::cipher::{CipherError, CipherErrorKind};
///
/// let err = CipherError::invalid_key_length(16, 7).with_context("aes-128-ecb");
///
/// assert!(err.is_invalid_key());
/// assert!(err.to_string().contains("expected 16 bytes"));
/// ```
#[derive(Debug, Clone)]
pub struct CipherError {
    kind: CipherErrorKind,
    context: Option<String>,
}

impl CipherError {
    /// Creates a new cipher error with the given kind.
    #[must_use]
    pub const fn new(kind: CipherErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Creates a key length error.
    #[must_use]
    pub const fn invalid_key_length(expected: usize, actual: usize) -> Self {
        Self::new(CipherErrorKind::InvalidKeyLength { expected, actual })
    }

    /// Creates a key encoding error.
    #[must_use]
    pub const fn invalid_key_encoding() -> Self {
        Self::new(CipherErrorKind::InvalidKeyEncoding)
    }

    /// Creates a block alignment error.
    #[must_use]
    pub const fn invalid_block_length(len: usize) -> Self {
        Self::new(CipherErrorKind::InvalidBlockLength { len })
    }

    /// Creates an unknown cipher error.
    #[must_use]
    pub const fn unknown_cipher() -> Self {
        Self::new(CipherErrorKind::UnknownCipher)
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> CipherErrorKind {
        self.kind
    }

    /// Returns `true` if the key itself was rejected.
    #[must_use]
    pub const fn is_invalid_key(&self) -> bool {
        matches!(
            self.kind,
            CipherErrorKind::InvalidKeyLength { .. } | CipherErrorKind::InvalidKeyEncoding
        )
    }

    /// Adds context to the error.
    #[must_use]
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    /// Returns the error context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CipherErrorKind::InvalidKeyLength { expected, actual } => {
                write!(
                    f,
                    "invalid key length: expected {expected} bytes, found {actual}"
                )?;
            }
            CipherErrorKind::InvalidKeyEncoding => write!(f, "key is not valid hex")?,
            CipherErrorKind::InvalidBlockLength { len } => write!(
                f,
                "input of {len} bytes is not a multiple of the {}-byte block size",
                super::BLOCK_SIZE
            )?,
            CipherErrorKind::UnknownCipher => write!(f, "unknown cipher")?,
            CipherErrorKind::EntropyUnavailable => write!(f, "entropy source unavailable")?,
        }

        if let Some(ctx) = &self.context {
            write!(f, ": {ctx}")?;
        }

        Ok(())
    }
}

impl std::error::Error for CipherError {}

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;
