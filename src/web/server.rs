//! HTTP front end for the ticket service.
//!
//! A small HTTP/1.1 server on `std::net::TcpListener`, run from a background
//! thread; no async runtime required. Each connection carries one request
//! and is closed after the response.
//!
//! # Methods
//!
//! - `POST`: body is a `login` / `auth` request, answered with JSON
//! - `GET`: `{"text": "No content."}`
//! - `OPTIONS`: empty `200` for CORS preflight
//! - anything else: `405`
//!
//! Every response allows any origin to `POST` JSON.
//!
//! # Example
//!
//! ```no_run
//! use frankenticket::web::{ServerConfig, TicketServer};
//! use frankenticket::{Config, TicketService};
//! use std::sync::Arc;
//!
//! let service = Arc::new(TicketService::from_config(&Config::default())?);
//! let mut server = TicketServer::with_config(8080, service, ServerConfig::default());
//! server.start()?;
//! println!("listening on {}", server.url());
//! # Ok::<(), frankenticket::Error>(())
//! ```

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::service::{Response, TicketService};
use crate::tracing_compat::{debug, info, warn};

/// Configuration for the ticket server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether to log the URL on startup.
    pub log_url: bool,
    /// Bind address (default: `127.0.0.1`).
    pub bind_addr: String,
    /// Maximum number of requests handled at once.
    pub max_connections: usize,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    /// Largest accepted request line plus headers, in bytes.
    pub max_header_bytes: usize,
    /// Socket read and write timeout.
    pub io_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_url: true,
            bind_addr: "127.0.0.1".to_string(),
            max_connections: 16,
            max_body_bytes: 64 * 1024,
            max_header_bytes: 8 * 1024,
            io_timeout: Duration::from_secs(5),
        }
    }
}

/// Ticket server handle.
///
/// The server runs in a background thread and stops when this handle is
/// dropped.
pub struct TicketServer {
    port: u16,
    service: Arc<TicketService>,
    config: ServerConfig,
    running: Arc<AtomicBool>,
    local_addr: Option<SocketAddr>,
}

impl TicketServer {
    /// Creates a server on the given port with default configuration.
    #[must_use]
    pub fn new(port: u16, service: Arc<TicketService>) -> Self {
        Self::with_config(port, service, ServerConfig::default())
    }

    /// Creates a server with custom configuration.
    #[must_use]
    pub fn with_config(port: u16, service: Arc<TicketService>, config: ServerConfig) -> Self {
        Self {
            port,
            service,
            config,
            running: Arc::new(AtomicBool::new(false)),
            local_addr: None,
        }
    }

    /// Returns the bound address once started.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Returns the base URL.
    #[must_use]
    pub fn url(&self) -> String {
        let addr = self.local_addr.map_or_else(
            || format!("{}:{}", self.config.bind_addr, self.port),
            |a| a.to_string(),
        );
        format!("http://{addr}/")
    }

    /// Returns whether the server is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Starts the server in a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub fn start(&mut self) -> std::io::Result<()> {
        let bind = format!("{}:{}", self.config.bind_addr, self.port);
        let listener = TcpListener::bind(&bind)?;
        listener.set_nonblocking(true)?;

        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);
        self.running.store(true, Ordering::Relaxed);

        if self.config.log_url {
            info!(url = %format!("http://{local_addr}/"), "ticket server started");
        }

        let service = Arc::clone(&self.service);
        let running = Arc::clone(&self.running);
        let config = self.config.clone();

        thread::Builder::new()
            .name("frankenticket-server".to_string())
            .spawn(move || {
                serve_loop(&listener, &service, &running, &config);
            })?;

        Ok(())
    }

    /// Stops the server.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Drop for TicketServer {
    fn drop(&mut self) {
        self.stop();
    }
}

// =========================================================================
// Accept loop
// =========================================================================

fn serve_loop(
    listener: &TcpListener,
    service: &Arc<TicketService>,
    running: &AtomicBool,
    config: &ServerConfig,
) {
    let active = Arc::new(AtomicUsize::new(0));

    while running.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((mut stream, peer)) => {
                // Some platforms hand out accepted sockets in the listener's mode.
                let _ = stream.set_nonblocking(false);
                let _ = stream.set_read_timeout(Some(config.io_timeout));
                let _ = stream.set_write_timeout(Some(config.io_timeout));

                if active.load(Ordering::Acquire) >= config.max_connections {
                    warn!(peer = %peer, "connection limit reached");
                    let _ = write_json(&mut stream, &Response::error(503, "Server busy."));
                    continue;
                }

                active.fetch_add(1, Ordering::AcqRel);
                let service = Arc::clone(service);
                let active_conn = Arc::clone(&active);
                let limits = (config.max_header_bytes, config.max_body_bytes);
                let spawned = thread::Builder::new()
                    .name("frankenticket-conn".to_string())
                    .spawn(move || {
                        handle_connection(stream, &service, limits.0, limits.1);
                        active_conn.fetch_sub(1, Ordering::AcqRel);
                    });
                if spawned.is_err() {
                    active.fetch_sub(1, Ordering::AcqRel);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                // Nonblocking accept lets stop() terminate promptly even with no traffic.
                thread::sleep(Duration::from_millis(25));
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(_) => {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

fn handle_connection(
    mut stream: TcpStream,
    service: &TicketService,
    max_head: usize,
    max_body: usize,
) {
    // The head is read through a byte budget; the body gets its own below.
    let mut reader = BufReader::new((&stream).take(max_head as u64));
    let mut request_line = String::new();
    match reader.read_line(&mut request_line) {
        Ok(0) | Err(_) => return,
        Ok(_) if !request_line.ends_with('\n') => {
            if reader.get_ref().limit() == 0 {
                reject_head(&mut stream, max_head);
            }
            return;
        }
        Ok(_) => {}
    }

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return;
    }
    let method = parts[0].to_ascii_uppercase();
    let Some(headers) = read_headers(&mut reader) else {
        if reader.get_ref().limit() == 0 {
            reject_head(&mut stream, max_head);
        }
        return;
    };
    debug!(method = %method, path = parts[1], "request");

    match method.as_str() {
        "OPTIONS" => {
            let _ = write_response(&mut stream, 200, None, b"");
        }
        "GET" => {
            let _ = write_json(&mut stream, &Response::notice(200, "No content."));
        }
        "POST" => {
            let len = header_value(&headers, "content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if len > max_body {
                let msg = format!("Request body exceeds {max_body} bytes.");
                let _ = write_json(&mut stream, &Response::error(413, msg));
                drain_and_close(&mut stream);
                return;
            }
            reader.get_mut().set_limit(len as u64);
            let mut body = vec![0u8; len];
            if reader.read_exact(&mut body).is_err() {
                let _ = write_json(
                    &mut stream,
                    &Response::error(400, "Request body shorter than Content-Length."),
                );
                return;
            }
            let response = service.handle_body(&body);
            let _ = write_json(&mut stream, &response);
        }
        _ => {
            let _ = write_response(&mut stream, 405, Some("text/plain"), b"Method Not Allowed");
        }
    }
}

/// Reads headers up to the blank line. `None` if the head budget ran out
/// or the peer stopped sending first.
fn read_headers<R: BufRead>(reader: &mut R) -> Option<Vec<(String, String)>> {
    let mut headers = Vec::with_capacity(16);
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) if !line.ends_with('\n') => return None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\r', '\n']);
                if trimmed.is_empty() {
                    return Some(headers);
                }
                if let Some((key, value)) = trimmed.split_once(':') {
                    headers.push((key.trim().to_ascii_lowercase(), value.trim().to_string()));
                }
            }
        }
    }
}

fn reject_head(stream: &mut TcpStream, max_head: usize) {
    warn!(limit = max_head, "request head too large");
    let msg = format!("Request line and headers exceed {max_head} bytes.");
    let _ = write_json(stream, &Response::error(431, msg));
    drain_and_close(stream);
}

/// Half-closes and discards unread input so the peer sees the response
/// before the socket goes away.
fn drain_and_close(stream: &mut TcpStream) {
    let _ = stream.shutdown(Shutdown::Write);
    let _ = stream.set_read_timeout(Some(Duration::from_millis(50)));
    let _ = std::io::copy(&mut Read::take(&*stream, 1 << 20), &mut std::io::sink());
}

fn header_value<'a>(headers: &'a [(String, String)], key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn write_json(stream: &mut TcpStream, response: &Response) -> std::io::Result<()> {
    write_response(
        stream,
        response.status_code,
        Some("application/json"),
        response.to_json().as_bytes(),
    )
}

fn write_response(
    stream: &mut TcpStream,
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
) -> std::io::Result<()> {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    };

    write!(stream, "HTTP/1.1 {status} {status_text}\r\n")?;
    if let Some(content_type) = content_type {
        write!(stream, "Content-Type: {content_type}\r\n")?;
    }
    write!(
        stream,
        "Content-Length: {}\r\n\
         Connection: close\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: POST\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         \r\n",
        body.len(),
    )?;
    stream.write_all(body)?;
    stream.flush()
}

// =========================================================================
// Tests
// =========================================================================
