//! Frankenticket: encrypted access tickets over pluggable block ciphers.
//!
//! # Overview
//!
//! Frankenticket issues and verifies opaque tickets that carry a set of
//! access privileges. A ticket is a small JSON record, serialized
//! deterministically, padded with spaces and encrypted block-by-block in
//! electronic-codebook mode. Verification decrypts the ticket, parses it and
//! walks an ordered privilege check list.
//!
//! The scheme is confidential but not authenticated. There is no MAC, no
//! expiry and no revocation. Ciphertext blocks are independent, so an
//! attacker who controls part of the plaintext can splice blocks from
//! different tickets into a new one the server accepts. The crate exists to
//! make that failure mode concrete, under both a standard cipher and a
//! deliberately broken one.
//!
//! # Module Structure
//!
//! - [`cipher`]: The [`BlockCipher`] seam, AES-128-ECB and the MD5 Feistel cipher
//! - [`ticket`]: Ticket record, canonical text, sanitizer, codec and validator
//! - [`service`]: `login` / `auth` request dispatch and JSON responses
//! - [`web`]: HTTP server and serverless event adapters
//! - [`config`]: Layered configuration (defaults, TOML, environment)
//! - [`error`](mod@error): Crate-level error type
//! - [`tracing_compat`]: Optional tracing integration (requires `tracing-integration` feature)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod cipher;
pub mod config;
pub mod error;
pub mod service;
pub mod ticket;
pub mod tracing_compat;
pub mod web;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

// Re-exports for convenient access to core types
pub use cipher::{
    BLOCK_SIZE, Block, BlockCipher, CipherError, CipherErrorKind, CipherKey, CipherKind,
    FixedKeyBlockCipher, WeakFeistelCipher,
};
pub use config::{Config, ConfigError, ConfigLoader};
pub use error::{Error, Result};
pub use service::{Response, ResponseBody, Status, TicketService, TransportError};
pub use ticket::{
    DecodeError, DecodeResult, EncodedTicket, InputSanitizer, Privilege, SecurityError, Ticket,
    TicketCodec, ValidationFailure, ValidationOutcome,
};
pub use web::{LambdaResponse, ServerConfig, TicketServer};
