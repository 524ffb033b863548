//! Tickets: the record, its canonical text, and the encode/validate pipeline.
//!
//! # Issuing
//!
//! ```text
//! info ──> InputSanitizer ──> Ticket ──> canonical text ──> TicketCodec ──> hex
//! ```
//!
//! # Verifying
//!
//! ```text
//! hex ──> TicketCodec::decode ──> validate ──> ValidationOutcome
//! ```
//!
//! # Known weaknesses
//!
//! Tickets are encrypted, not authenticated. With ECB, every 16-byte block
//! decrypts on its own, so ciphertext blocks from different tickets can be
//! recombined. A caller who shapes `info` so that block boundaries fall in
//! useful places can splice together a ticket whose `privs` list was never
//! issued, and [`validate`] will accept it.

pub mod canonical;
mod codec;
mod record;
mod sanitize;
mod validate;

pub use codec::{DecodeError, DecodeResult, EncodedTicket, TicketCodec, pad_plaintext};
pub use record::{
    DEFAULT_PRIVS, DEFAULT_USERNAME, TIMESTAMP_FORMAT, Ticket, format_timestamp,
};
pub use sanitize::{DEFAULT_MAX_DEPTH, InputSanitizer, RESERVED_KEYS, SecurityError};
pub use validate::{
    Privilege, REQUIRED_PRIVILEGES, ValidationFailure, ValidationOutcome, validate,
};
