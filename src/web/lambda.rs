//! Serverless function adapter.
//!
//! Accepts an HTTP-API style event and returns `{"statusCode", "body"}`
//! where `body` is the JSON response as a string:
//!
//! ```json
//! {
//!   "requestContext": { "http": { "method": "POST" } },
//!   "isBase64Encoded": false,
//!   "body": "{\"action\": \"login\"}"
//! }
//! ```
//!
//! Events that are not POSTs get a `200` with an explanatory error body, so
//! health checks and browser probes do not show up as failures.

use crate::service::{Response, TicketService, TransportError};
use crate::tracing_compat::debug;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the function returns to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaResponse {
    /// HTTP status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON response text.
    pub body: String,
}

impl From<Response> for LambdaResponse {
    fn from(response: Response) -> Self {
        Self {
            status_code: response.status_code,
            body: response.to_json(),
        }
    }
}

/// Runs one event through `service`.
///
/// Checks, in order: `requestContext`, `requestContext.http`, its `method`,
/// that the method is POST, and that a base64 body decodes. Missing
/// `isBase64Encoded` means plain text; a missing `body` is empty.
///
/// # Example
///
/// ```
/// use frankenticket::web::lambda::handle_event;
/// use frankenticket::{Config, TicketService};
/// use serde_json::json;
///
/// let service = TicketService::from_config(&Config::default()).unwrap();
/// let event = json!({
///     "requestContext": {"http": {"method": "POST"}},
///     "isBase64Encoded": false,
///     "body": "{\"action\": \"login\"}",
/// });
/// assert_eq!(handle_event(&service, &event).status_code, 200);
/// ```
#[must_use]
pub fn handle_event(service: &TicketService, event: &Value) -> LambdaResponse {
    let Some(context) = event.get("requestContext") else {
        return Response::error(200, "No requestContext request data present.").into();
    };
    let Some(http) = context.get("http") else {
        return Response::error(200, "No http request data present.").into();
    };
    let Some(method) = http.get("method") else {
        return Response::error(200, "No method request data present.").into();
    };
    if !method
        .as_str()
        .is_some_and(|m| m.eq_ignore_ascii_case("post"))
    {
        return Response::error(200, "Not submitted via POST, no content returned.").into();
    }

    let body = event.get("body").and_then(Value::as_str).unwrap_or_default();
    let is_base64 = event
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    debug!(base64 = is_base64, len = body.len(), "lambda event");

    let body = if is_base64 {
        match base64::engine::general_purpose::STANDARD.decode(body) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = TransportError::InvalidBase64(e.to_string());
                return Response::error(err.status_code(), err.to_string()).into();
            }
        }
    } else {
        body.as_bytes().to_vec()
    };

    service.handle_body(&body).into()
}

/// Parses an event from JSON text and runs it.
pub fn handle_event_json(service: &TicketService, event: &str) -> LambdaResponse {
    match serde_json::from_str::<Value>(event) {
        Ok(event) => handle_event(service, &event),
        Err(e) => {
            let err = TransportError::InvalidJson(e.to_string());
            Response::error(err.status_code(), err.to_string()).into()
        }
    }
}
