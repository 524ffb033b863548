//! AES-128 applied one block at a time.

use super::error::{CipherError, CipherResult};
use super::key::CipherKey;
use super::{Block, BlockCipher};
use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use core::fmt;

/// Required key length in bytes.
pub const KEY_SIZE: usize = 16;

/// AES-128 with a fixed key, used in electronic-codebook mode.
///
/// Each block is transformed independently: no IV, no chaining, no
/// padding. Equal plaintext blocks always produce equal ciphertext blocks.
#[derive(Clone)]
pub struct FixedKeyBlockCipher {
    inner: Aes128,
}

impl FixedKeyBlockCipher {
    /// Name reported in logs and by [`CipherKind`](super::CipherKind).
    pub const NAME: &'static str = "aes-128-ecb";

    /// Initializes the cipher from exactly [`KEY_SIZE`] bytes of key.
    pub fn new(key: &CipherKey) -> CipherResult<Self> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::invalid_key_length(KEY_SIZE, key.len()).with_context(Self::NAME));
        }
        let inner = Aes128::new_from_slice(key.as_bytes())
            .map_err(|_| CipherError::invalid_key_length(KEY_SIZE, key.len()))?;
        Ok(Self { inner })
    }
}

impl BlockCipher for FixedKeyBlockCipher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encrypt_block(&self, block: &Block) -> Block {
        let mut buf = GenericArray::clone_from_slice(block);
        self.inner.encrypt_block(&mut buf);
        let mut out = [0u8; 16];
        out.copy_from_slice(&buf);
        out
    }

    fn decrypt_block(&self, block: &Block) -> Block {
        let mut buf = GenericArray::clone_from_slice(block);
        self.inner.decrypt_block(&mut buf);
        let mut out = [0u8; 16];
        out.copy_from_slice(&buf);
        out
    }
}

impl fmt::Debug for FixedKeyBlockCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedKeyBlockCipher").finish_non_exhaustive()
    }
}
