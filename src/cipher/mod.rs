//! Pluggable 128-bit block ciphers.
//!
//! This module provides the [`BlockCipher`] seam the ticket codec is written
//! against, together with two implementations:
//!
//! - [`FixedKeyBlockCipher`]: AES-128, one block at a time
//! - [`WeakFeistelCipher`]: a 20-round Feistel network over MD5
//!
//! Both are used in electronic-codebook mode through [`encrypt_ecb`] and
//! [`decrypt_ecb`]. Blocks never influence each other.
//!
//! # Example
//!
//! ```
//! use frankenticket::cipher::{decrypt_ecb, encrypt_ecb, CipherKey, CipherKind};
//!
//! let key = CipherKey::from_hex("700e262e085f16db8e970db29a6143a2").unwrap();
//! for kind in [CipherKind::Aes128Ecb, CipherKind::BrokenFeistel] {
//!     let cipher = kind.build(&key).unwrap();
//!     let ct = encrypt_ecb(cipher.as_ref(), b"two identical b.two identical b.").unwrap();
//!     assert_eq!(ct[..16], ct[16..]);
//!     assert_eq!(decrypt_ecb(cipher.as_ref(), &ct).unwrap(), b"two identical b.two identical b.");
//! }
//! ```

mod aes_ecb;
mod error;
mod feistel;
mod key;

pub use aes_ecb::{FixedKeyBlockCipher, KEY_SIZE as AES_KEY_SIZE};
pub use error::{CipherError, CipherErrorKind, CipherResult};
pub use feistel::{ROUNDS as FEISTEL_ROUNDS, WeakFeistelCipher};
pub use key::CipherKey;

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// One cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// A keyed 128-bit block permutation.
///
/// Implementations are pure: the same block under the same key always
/// yields the same output, and `decrypt_block(encrypt_block(b)) == b`.
pub trait BlockCipher: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Encrypts one block.
    fn encrypt_block(&self, block: &Block) -> Block;

    /// Decrypts one block.
    fn decrypt_block(&self, block: &Block) -> Block;
}

impl<C: BlockCipher + ?Sized> BlockCipher for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encrypt_block(&self, block: &Block) -> Block {
        (**self).encrypt_block(block)
    }

    fn decrypt_block(&self, block: &Block) -> Block {
        (**self).decrypt_block(block)
    }
}

impl fmt::Debug for dyn BlockCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCipher")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Encrypts a block-aligned buffer block by block.
pub fn encrypt_ecb<C: BlockCipher + ?Sized>(cipher: &C, data: &[u8]) -> CipherResult<Vec<u8>> {
    apply_ecb(data, |block| cipher.encrypt_block(block))
}

/// Decrypts a block-aligned buffer block by block.
pub fn decrypt_ecb<C: BlockCipher + ?Sized>(cipher: &C, data: &[u8]) -> CipherResult<Vec<u8>> {
    apply_ecb(data, |block| cipher.decrypt_block(block))
}

fn apply_ecb(data: &[u8], transform: impl Fn(&Block) -> Block) -> CipherResult<Vec<u8>> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::invalid_block_length(data.len()));
    }
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        out.extend_from_slice(&transform(&block));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Cipher selection
// ---------------------------------------------------------------------------

/// Which block cipher tickets are encrypted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CipherKind {
    /// AES-128 in ECB mode. Needs a 16-byte key.
    #[serde(rename = "aes-128-ecb", alias = "aes")]
    Aes128Ecb,
    /// The MD5 Feistel cipher. Accepts any key.
    #[default]
    #[serde(rename = "broken-feistel", alias = "feistel")]
    BrokenFeistel,
}

impl CipherKind {
    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aes128Ecb => FixedKeyBlockCipher::NAME,
            Self::BrokenFeistel => WeakFeistelCipher::NAME,
        }
    }

    /// Initializes a cipher of this kind from `key`.
    pub fn build(self, key: &CipherKey) -> CipherResult<Box<dyn BlockCipher>> {
        Ok(match self {
            Self::Aes128Ecb => Box::new(FixedKeyBlockCipher::new(key)?),
            Self::BrokenFeistel => Box::new(WeakFeistelCipher::new(key)),
        })
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherKind {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes" | "aes-128-ecb" | "aes128" => Ok(Self::Aes128Ecb),
            "feistel" | "broken-feistel" => Ok(Self::BrokenFeistel),
            other => Err(CipherError::unknown_cipher().with_context(other.to_string())),
        }
    }
}
