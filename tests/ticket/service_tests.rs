use crate::service;
use frankenticket::cipher::CipherKind;
use frankenticket::web::lambda::handle_event;
use frankenticket::{Response, Status, TicketServer};
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

fn body(response: &Response) -> Value {
    serde_json::from_str(&response.to_json()).unwrap()
}

#[test]
fn login_returns_ticket_and_plaintext() {
    let service = service(CipherKind::BrokenFeistel);
    let response = service.handle_body(br#"{"action": "login", "info": {"team": "blue"}}"#);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.status(), Some(Status::Ok));

    let body = body(&response);
    let ticket = body["ticket"].as_str().unwrap();
    let plaintext = body["decrypted_ticket"].as_str().unwrap();
    assert_eq!(ticket.len(), plaintext.len() * 2);
    assert_eq!(plaintext.len() % 16, 0);
    assert!(plaintext.starts_with(r#"{"info": {"team": "blue"}, "privs": ["read"], "timestamp": ""#));
}

#[test]
fn login_without_info_stores_null() {
    let service = service(CipherKind::Aes128Ecb);
    let response = service.handle_body(br#"{"action": "login"}"#);
    let plaintext = body(&response)["decrypted_ticket"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(plaintext.starts_with(r#"{"info": null, "#));
}

#[test]
fn login_with_reserved_key_is_400() {
    let service = service(CipherKind::BrokenFeistel);
    let response = service.handle_body(br#"{"action": "login", "info": {"privs": ["write"]}}"#);
    assert_eq!(response.status_code, 400);
    assert_eq!(
        body(&response),
        json!({
            "status": "error",
            "text": "Security alert: The 'privs' key is disallowed in the 'info' dictionary.",
        })
    );
}

#[test]
fn auth_roundtrip_reports_text_and_data() {
    let service = service(CipherKind::BrokenFeistel);
    let login = body(&service.handle_body(br#"{"action": "login", "info": 7}"#));
    let ticket = login["ticket"].as_str().unwrap();

    let request = json!({"action": "auth", "ticket": ticket}).to_string();
    let auth = service.handle_body(request.as_bytes());
    assert_eq!(auth.status(), Some(Status::Failed));

    let auth = body(&auth);
    assert_eq!(auth["ticket_text"], login["decrypted_ticket"]);
    assert_eq!(auth["ticket_data"]["info"], 7);
    assert_eq!(auth["text"], "Ticket does not have the 'write' permission");
}

#[test]
fn envelope_errors() {
    let service = service(CipherKind::BrokenFeistel);
    let cases: [(&[u8], &str); 5] = [
        (b"[1, 2]", "Unable to interpret JSON: Expected dict data type"),
        (b"{}", "Unable to interpret JSON: No 'action' field present"),
        (
            br#"{"action": "auth"}"#,
            "Unable to interpret JSON: No 'ticket' field present",
        ),
        (br#"{"action": "logout"}"#, "Unknown JSON action: logout"),
        (
            br#"{"action": "auth", "ticket": 5}"#,
            "Unable to parse ticket as hex: expected a string, found number",
        ),
    ];
    for (request, expected) in cases {
        let response = service.handle_body(request);
        assert_eq!(response.status_code, 400, "{expected}");
        assert_eq!(response.status(), Some(Status::Error));
        assert_eq!(response.text(), Some(expected));
    }

    let response = service.handle_body(b"{nope");
    assert_eq!(response.status_code, 400);
    assert!(response.text().unwrap().starts_with("Unable to parse JSON: "));
}

#[test]
fn undecodable_ticket_is_400() {
    let service = service(CipherKind::Aes128Ecb);
    let response = service.handle_body(br#"{"action": "auth", "ticket": "zz"}"#);
    assert_eq!(response.status_code, 400);
    assert!(
        response
            .text()
            .unwrap()
            .starts_with("Unable to parse ticket as hex: ")
    );
}

#[test]
fn lambda_event_roundtrip() {
    let service = service(CipherKind::BrokenFeistel);
    let event = json!({
        "requestContext": {"http": {"method": "POST"}},
        "isBase64Encoded": false,
        "body": r#"{"action": "login", "info": "lambda"}"#,
    });
    let response = handle_event(&service, &event);
    assert_eq!(response.status_code, 200);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["decrypted_ticket"].as_str().unwrap().contains(r#""info": "lambda""#));
}

#[test]
fn http_server_issues_and_checks_tickets() {
    let mut server = TicketServer::new(0, Arc::new(service(CipherKind::BrokenFeistel)));
    server.start().expect("bind loopback");
    let addr = server.local_addr().unwrap();

    let post = |payload: &str| -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
            payload.len()
        )
        .unwrap();
        let mut raw = Vec::new();
        let _ = stream.read_to_end(&mut raw);
        String::from_utf8_lossy(&raw).into_owned()
    };

    let login = post(r#"{"action": "login"}"#);
    assert!(login.starts_with("HTTP/1.1 200 OK\r\n"), "{login}");
    assert!(login.contains("Access-Control-Allow-Origin: *\r\n"));
    let (_, json_body) = login.split_once("\r\n\r\n").unwrap();
    let ticket = serde_json::from_str::<Value>(json_body).unwrap()["ticket"]
        .as_str()
        .unwrap()
        .to_string();

    let auth = post(&json!({"action": "auth", "ticket": ticket}).to_string());
    let (_, json_body) = auth.split_once("\r\n\r\n").unwrap();
    let auth: Value = serde_json::from_str(json_body).unwrap();
    assert_eq!(auth["status"], "failed");
    assert_eq!(auth["ticket_data"]["username"], "John Doe");

    server.stop();
}
