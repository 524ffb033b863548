//! The `login` / `auth` dispatcher.

use super::error::TransportError;
use super::request::Request;
use super::response::Response;
use crate::cipher::CipherKey;
use crate::config::Config;
use crate::ticket::{
    DEFAULT_PRIVS, DEFAULT_USERNAME, EncodedTicket, InputSanitizer, SecurityError, Ticket,
    TicketCodec, validate,
};
use crate::tracing_compat::{info, warn};
use serde_json::Value;

/// Issues and checks tickets for one key and cipher.
///
/// Stateless apart from its configuration; share it behind an `Arc`.
///
/// # Example
///
/// ```
/// use frankenticket::{Config, Status, TicketService};
///
/// let service = TicketService::from_config(&Config::default()).unwrap();
///
/// let login = service.handle_body(br#"{"action": "login"}"#);
/// assert_eq!(login.status(), Some(Status::Ok));
/// ```
#[derive(Debug)]
pub struct TicketService {
    codec: TicketCodec,
    username: String,
    privs: Vec<String>,
}

impl TicketService {
    /// Creates a service that issues the default identity and privileges.
    #[must_use]
    pub fn new(codec: TicketCodec) -> Self {
        Self {
            codec,
            username: DEFAULT_USERNAME.to_string(),
            privs: DEFAULT_PRIVS.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Replaces the identity and privileges stamped on new tickets.
    #[must_use]
    pub fn with_identity(mut self, username: impl Into<String>, privs: Vec<String>) -> Self {
        self.username = username.into();
        self.privs = privs;
        self
    }

    /// Builds the cipher and codec described by `config`.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let key = CipherKey::from_hex(&config.key_hex)?;
        let cipher = config.cipher.build(&key)?;
        let codec = TicketCodec::new(cipher)
            .with_sanitizer(InputSanitizer::new(config.max_info_depth));

        info!(
            cipher = %config.cipher,
            username = %config.username,
            "ticket service ready"
        );

        Ok(Self::new(codec).with_identity(config.username.clone(), config.default_privs.clone()))
    }

    /// Returns the codec.
    #[must_use]
    pub const fn codec(&self) -> &TicketCodec {
        &self.codec
    }

    /// Handles a raw request body.
    #[must_use]
    pub fn handle_body(&self, body: &[u8]) -> Response {
        match Request::parse(body) {
            Ok(request) => self.handle(request),
            Err(err) => reject(&err),
        }
    }

    /// Handles a parsed request.
    #[must_use]
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Login { info } => self.login(info),
            Request::Auth { ticket } => self.auth(&ticket),
        }
    }

    /// Issues a ticket for `info` without building a response.
    pub fn issue(&self, info: Value) -> Result<EncodedTicket, SecurityError> {
        let ticket = Ticket::new(self.username.clone(), info, self.privs.clone());
        self.codec.encode(&ticket)
    }

    /// Issues a ticket and answers with its ciphertext and plaintext.
    #[must_use]
    pub fn login(&self, info: Value) -> Response {
        match self.issue(info) {
            Ok(encoded) => {
                info!(action = "login", status = "ok", "ticket issued");
                Response::login(encoded.ciphertext_hex, encoded.plaintext)
            }
            Err(err) => {
                if let SecurityError::ReservedKey { key } = &err {
                    warn!(action = "login", key = %key, "reserved key in info");
                } else {
                    warn!(action = "login", reason = %err, "info rejected");
                }
                Response::error(400, err.to_string())
            }
        }
    }

    /// Decodes and validates a hex ticket.
    #[must_use]
    pub fn auth(&self, ticket_hex: &str) -> Response {
        let decoded = self.codec.decode(ticket_hex);

        if let Some(err) = decoded.error.as_ref().filter(|e| e.is_transport_level()) {
            info!(action = "auth", status = "error", reason = %err, "ticket undecodable");
            return Response::error(400, err.to_string());
        }

        let reason = match &decoded.error {
            Some(err) => Some(err.to_string()),
            None => validate(decoded.data.as_ref()).reason(),
        };

        match &reason {
            None => info!(action = "auth", status = "ok", "ticket accepted"),
            Some(reason) => info!(action = "auth", status = "failed", reason = %reason, "ticket refused"),
        }

        Response::auth(decoded.text.unwrap_or_default(), decoded.data, reason)
    }
}

fn reject(err: &TransportError) -> Response {
    info!(status = "error", reason = %err, "request rejected");
    Response::error(err.status_code(), err.to_string())
}
