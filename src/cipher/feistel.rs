//! A deliberately weak Feistel cipher built from MD5.
//!
//! The construction is a balanced 20-round Feistel network over 64-bit
//! halves. The key schedule is an MD5 hash chain and the round function is a
//! truncated MD5 of the subkey concatenated with the right half. It is a
//! permutation, so it round-trips, but it offers no real security and must
//! keep producing exactly these bytes for existing tickets to decode.
//!
//! ```text
//! k0       = MD5(key)
//! subkey_0 = MD5(k0)
//! subkey_i = MD5(subkey_{i-1})
//!
//! round(k, L, R) = (R, L ^ MD5(k || R)[..8])
//! ```

use super::key::CipherKey;
use super::{Block, BlockCipher};
use core::fmt;
use md5::{Digest, Md5};

/// Number of Feistel rounds.
pub const ROUNDS: usize = 20;

const HALF: usize = 8;

type Half = [u8; HALF];
type Subkey = [u8; 16];

/// The MD5 Feistel cipher.
///
/// Accepts keys of any length. Only the derived subkeys are retained.
///
/// # Example
///
/// ```
/// use frankenticket::cipher::{BlockCipher, CipherKey, WeakFeistelCipher};
///
/// let cipher = WeakFeistelCipher::new(&CipherKey::new(b"foobarx".to_vec()));
/// let block = [7u8; 16];
/// assert_eq!(cipher.decrypt_block(&cipher.encrypt_block(&block)), block);
/// ```
#[derive(Clone)]
pub struct WeakFeistelCipher {
    subkeys: [Subkey; ROUNDS],
}

impl WeakFeistelCipher {
    /// Name reported in logs and by [`CipherKind`](super::CipherKind).
    pub const NAME: &'static str = "broken-feistel";

    /// Derives the round subkeys from `key`.
    #[must_use]
    pub fn new(key: &CipherKey) -> Self {
        let mut subkeys = [[0u8; 16]; ROUNDS];
        let mut prev = md5(&[key.as_bytes()]);
        for subkey in &mut subkeys {
            prev = md5(&[&prev]);
            *subkey = prev;
        }
        Self { subkeys }
    }

    /// Runs the network over `(left, right)` with subkeys in the given order.
    fn run<'a>(
        mut left: Half,
        mut right: Half,
        subkeys: impl Iterator<Item = &'a Subkey>,
    ) -> (Half, Half) {
        for subkey in subkeys {
            let mask = md5(&[subkey, &right]);
            let mut next = left;
            for (byte, m) in next.iter_mut().zip(&mask[..HALF]) {
                *byte ^= m;
            }
            left = right;
            right = next;
        }
        (left, right)
    }
}

impl BlockCipher for WeakFeistelCipher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encrypt_block(&self, block: &Block) -> Block {
        let (left, right) = split(block);
        let (left, right) = Self::run(left, right, self.subkeys.iter());
        join(&left, &right)
    }

    fn decrypt_block(&self, block: &Block) -> Block {
        // Swapped halves in, reversed schedule, swapped halves out
        let (right, left) = split(block);
        let (left, right) = Self::run(left, right, self.subkeys.iter().rev());
        join(&right, &left)
    }
}

impl fmt::Debug for WeakFeistelCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakFeistelCipher")
            .field("rounds", &ROUNDS)
            .finish_non_exhaustive()
    }
}

fn md5(parts: &[&[u8]]) -> Subkey {
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 16];
    out.copy_from_slice(&hasher.finalize());
    out
}

fn split(block: &Block) -> (Half, Half) {
    let mut left = [0u8; HALF];
    let mut right = [0u8; HALF];
    left.copy_from_slice(&block[..HALF]);
    right.copy_from_slice(&block[HALF..]);
    (left, right)
}

fn join(first: &Half, second: &Half) -> Block {
    let mut out = [0u8; 16];
    out[..HALF].copy_from_slice(first);
    out[HALF..].copy_from_slice(second);
    out
}
