//! Ticket encryption and decryption.
//!
//! ```text
//! Ticket ──sanitize(info)──> canonical text ──pad──> ECB encrypt ──> hex
//! hex ──parse──> length check ──> ECB decrypt ──> ASCII check ──> JSON
//! ```
//!
//! Padding is trailing spaces up to the next block boundary. Text that is
//! already aligned gets no padding, so the padded length does not say how
//! much padding there was. JSON ignores trailing whitespace, which is why
//! the scheme gets away with it.

use super::record::Ticket;
use super::sanitize::{InputSanitizer, SecurityError};
use crate::cipher::{BLOCK_SIZE, Block, BlockCipher, decrypt_ecb};
use crate::tracing_compat::debug;
use core::fmt;
use serde_json::Value;
use thiserror::Error;

/// Output of [`TicketCodec::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTicket {
    /// Lowercase hex of the ciphertext.
    pub ciphertext_hex: String,
    /// Padded plaintext that was encrypted.
    pub plaintext: String,
}

/// Why a ticket could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The ticket is not an even-length string of hex digits.
    #[error("Unable to parse ticket as hex: {message}")]
    InvalidHexEncoding {
        /// Parser diagnostic.
        message: String,
    },
    /// The ciphertext is empty or not a whole number of blocks.
    #[error("Binary ticket length is not a multiple of 16 bytes (found {len} bytes).")]
    InvalidBlockLength {
        /// Ciphertext length in bytes.
        len: usize,
    },
    /// Decryption produced bytes outside 7-bit ASCII.
    #[error("Binary ticket is corrupt, cannot decrypt to pure text.")]
    CorruptPlaintext,
    /// The plaintext is text but not JSON.
    #[error("Cannot decode JSON: {message}")]
    MalformedTicketStructure {
        /// Parser diagnostic.
        message: String,
    },
}

impl DecodeError {
    /// Returns `true` when the ticket never reached the JSON stage.
    ///
    /// Such tickets are answered as request errors rather than as failed
    /// validations.
    #[must_use]
    pub const fn is_transport_level(&self) -> bool {
        !matches!(self, Self::MalformedTicketStructure { .. })
    }
}

/// Output of [`TicketCodec::decode`].
///
/// Decoding never fails outright; whatever stage was reached is reported.
/// `text` is set once decryption yielded ASCII, `data` once it parsed as
/// JSON, and `error` names the stage that stopped it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeResult {
    /// Decrypted plaintext, padding included.
    pub text: Option<String>,
    /// Parsed plaintext.
    pub data: Option<Value>,
    /// Stage that failed, if any.
    pub error: Option<DecodeError>,
}

impl DecodeResult {
    fn failed(error: DecodeError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Returns `true` if the ticket decoded to JSON.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Encrypts and decrypts tickets with one cipher.
///
/// # Example
///
/// ```
/// use frankenticket::cipher::{CipherKey, CipherKind};
/// use frankenticket::ticket::{Ticket, TicketCodec};
/// use serde_json::json;
///
/// let key = CipherKey::from_hex("700e262e085f16db8e970db29a6143a2").unwrap();
/// let codec = TicketCodec::new(CipherKind::BrokenFeistel.build(&key).unwrap());
///
/// let ticket = Ticket::new("John Doe", json!({"team": "blue"}), vec!["read".into()]);
/// let encoded = codec.encode(&ticket).unwrap();
/// let decoded = codec.decode(&encoded.ciphertext_hex);
///
/// assert_eq!(decoded.data, Some(ticket.to_value()));
/// ```
pub struct TicketCodec {
    cipher: Box<dyn BlockCipher>,
    sanitizer: InputSanitizer,
}

impl TicketCodec {
    /// Creates a codec with the default sanitizer.
    #[must_use]
    pub fn new(cipher: Box<dyn BlockCipher>) -> Self {
        Self {
            cipher,
            sanitizer: InputSanitizer::default(),
        }
    }

    /// Replaces the sanitizer.
    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: InputSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Returns the cipher.
    #[must_use]
    pub fn cipher(&self) -> &dyn BlockCipher {
        self.cipher.as_ref()
    }

    /// Returns the sanitizer.
    #[must_use]
    pub const fn sanitizer(&self) -> &InputSanitizer {
        &self.sanitizer
    }

    /// Sanitizes, serializes, pads and encrypts `ticket`.
    pub fn encode(&self, ticket: &Ticket) -> Result<EncodedTicket, SecurityError> {
        self.sanitizer.sanitize(&ticket.info)?;

        let plaintext = pad_plaintext(&ticket.to_canonical_string());
        let ciphertext = self.encrypt_padded(&plaintext);

        debug!(
            cipher = self.cipher.name(),
            blocks = ciphertext.len() / BLOCK_SIZE,
            "ticket encoded"
        );

        Ok(EncodedTicket {
            ciphertext_hex: hex::encode(ciphertext),
            plaintext,
        })
    }

    fn encrypt_padded(&self, plaintext: &str) -> Vec<u8> {
        let blocks = plaintext.as_bytes().chunks_exact(BLOCK_SIZE);
        debug_assert!(blocks.remainder().is_empty());
        let mut out = Vec::with_capacity(plaintext.len());
        for chunk in blocks {
            let mut block: Block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            out.extend_from_slice(&self.cipher.encrypt_block(&block));
        }
        out
    }

    /// Decrypts and parses a hex ticket.
    ///
    /// ASCII whitespace is allowed between byte pairs, not inside one.
    #[must_use]
    pub fn decode(&self, ciphertext_hex: &str) -> DecodeResult {
        let ciphertext = match parse_hex(ciphertext_hex) {
            Ok(bytes) => bytes,
            Err(e) => {
                return DecodeResult::failed(DecodeError::InvalidHexEncoding {
                    message: e.to_string(),
                });
            }
        };

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return DecodeResult::failed(DecodeError::InvalidBlockLength {
                len: ciphertext.len(),
            });
        }

        let plain = match decrypt_ecb(self.cipher(), &ciphertext) {
            Ok(plain) => plain,
            Err(_) => {
                return DecodeResult::failed(DecodeError::InvalidBlockLength {
                    len: ciphertext.len(),
                });
            }
        };

        debug!(
            cipher = self.cipher.name(),
            blocks = plain.len() / BLOCK_SIZE,
            "ticket decrypted"
        );

        if !plain.is_ascii() {
            return DecodeResult::failed(DecodeError::CorruptPlaintext);
        }
        let Ok(text) = String::from_utf8(plain) else {
            return DecodeResult::failed(DecodeError::CorruptPlaintext);
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(data) => DecodeResult {
                text: Some(text),
                data: Some(data),
                error: None,
            },
            Err(e) => DecodeResult {
                text: Some(text),
                data: None,
                error: Some(DecodeError::MalformedTicketStructure {
                    message: e.to_string(),
                }),
            },
        }
    }
}

impl fmt::Debug for TicketCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketCodec")
            .field("cipher", &self.cipher.name())
            .field("sanitizer", &self.sanitizer)
            .finish()
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let mut digits = String::with_capacity(text.len());
    for (index, c) in text.char_indices() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') {
            if digits.len() % 2 != 0 {
                return Err(hex::FromHexError::InvalidHexCharacter { c, index });
            }
        } else {
            digits.push(c);
        }
    }
    hex::decode(digits)
}

/// Right-pads `text` with spaces to a whole number of blocks.
///
/// ```
/// use frankenticket::ticket::pad_plaintext;
///
/// assert_eq!(pad_plaintext("{}").len(), 16);
/// assert_eq!(pad_plaintext(&"x".repeat(32)).len(), 32);
/// ```
#[must_use]
pub fn pad_plaintext(text: &str) -> String {
    let rem = text.len() % BLOCK_SIZE;
    let mut out = String::with_capacity(text.len() + BLOCK_SIZE);
    out.push_str(text);
    if rem != 0 {
        out.extend(std::iter::repeat_n(' ', BLOCK_SIZE - rem));
    }
    out
}
