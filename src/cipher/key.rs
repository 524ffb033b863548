//! Raw cipher key material.
//!
//! A [`CipherKey`] owns the bytes a cipher is initialized from. It never
//! prints its contents and overwrites them when dropped. The AES cipher
//! requires exactly 16 bytes; the Feistel cipher accepts any length,
//! including zero.

use super::error::{CipherError, CipherErrorKind, CipherResult};
use core::fmt;

/// Key material for a [`BlockCipher`](super::BlockCipher).
///
/// # Example
///
/// ```
/// use frankenticket::cipher::CipherKey;
///
/// let key = CipherKey::from_hex("700e262e085f16db8e970db29a6143a2").unwrap();
/// assert_eq!(key.len(), 16);
/// assert!(!format!("{key:?}").contains("700e"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey {
    bytes: Vec<u8>,
}

impl CipherKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Parses a key from hex text.
    ///
    /// Surrounding whitespace is ignored; anything else that is not a hex
    /// digit pair is rejected.
    pub fn from_hex(text: &str) -> CipherResult<Self> {
        hex::decode(text.trim())
            .map(Self::new)
            .map_err(|e| CipherError::invalid_key_encoding().with_context(e.to_string()))
    }

    /// Generates `len` bytes of key material from the operating system.
    pub fn generate(len: usize) -> CipherResult<Self> {
        let mut bytes = vec![0u8; len];
        getrandom::fill(&mut bytes).map_err(|e| {
            CipherError::new(CipherErrorKind::EntropyUnavailable).with_context(e.to_string())
        })?;
        Ok(Self { bytes })
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for the empty key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the key as lowercase hex.
    ///
    /// Only for operator-facing output such as `frankenticket keygen`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Length only; ticket keys are never echoed
        write!(f, "CipherKey(<{} bytes>)", self.bytes.len())
    }
}

impl fmt::Display for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        // Best-effort; the optimizer may elide this
        for byte in &mut self.bytes {
            *byte = 0;
        }
    }
}
