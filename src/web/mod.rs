//! Transport adapters.
//!
//! - [`server`]: a threaded HTTP/1.1 server with CORS headers
//! - [`lambda`]: a serverless event handler
//!
//! Both hand request bodies to [`TicketService`](crate::TicketService) and
//! only translate its [`Response`](crate::Response) to their wire format.

pub mod lambda;
pub mod server;

pub use lambda::{LambdaResponse, handle_event};
pub use server::{ServerConfig, TicketServer};
