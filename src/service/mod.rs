//! Request dispatch.
//!
//! A request body is a JSON object with an `action`:
//!
//! - `{"action": "login", "info": <any>}` issues a ticket
//! - `{"action": "auth", "ticket": "<hex>"}` checks one
//!
//! [`TicketService`] turns a body into a [`Response`]: a status code and a
//! JSON body. Transports only move bytes in and out.

mod dispatch;
mod error;
mod request;
mod response;

pub use dispatch::TicketService;
pub use error::TransportError;
pub use request::Request;
pub use response::{Response, ResponseBody, Status};
