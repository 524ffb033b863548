use crate::codec;
use frankenticket::cipher::CipherKind;
use frankenticket::ticket::{InputSanitizer, RESERVED_KEYS, SecurityError, Ticket};
use serde_json::{Value, json};

fn ticket_with(info: Value) -> Ticket {
    Ticket::new("John Doe", info, vec!["read".into()])
}

#[test]
fn every_reserved_key_is_refused_at_depth() {
    let codec = codec(CipherKind::BrokenFeistel);
    for key in RESERVED_KEYS {
        let mut inner = serde_json::Map::new();
        inner.insert(key.to_string(), json!("x"));
        let info = json!({"outer": [1, {"mid": Value::Object(inner)}]});

        let err = codec.encode(&ticket_with(info)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Security alert: The '{key}' key is disallowed in the 'info' dictionary.")
        );
    }
}

#[test]
fn reserved_words_as_values_are_fine() {
    let codec = codec(CipherKind::BrokenFeistel);
    let info = json!({"role": "privs", "list": ["username", "timestamp", "info"]});
    assert!(codec.encode(&ticket_with(info)).is_ok());
}

#[test]
fn key_check_order_is_fixed() {
    let err = InputSanitizer::default()
        .sanitize(&json!({"timestamp": 1, "info": 2, "username": 3, "privs": 4}))
        .unwrap_err();
    assert_eq!(
        err,
        SecurityError::ReservedKey {
            key: "privs".into()
        }
    );
}

#[test]
fn first_violation_in_document_order_wins() {
    let err = InputSanitizer::default()
        .sanitize(&json!([{"a": {"username": 1}}, {"privs": 2}]))
        .unwrap_err();
    assert_eq!(
        err,
        SecurityError::ReservedKey {
            key: "username".into()
        }
    );
}

#[test]
fn sibling_keys_are_checked_in_request_order() {
    let service = crate::service(CipherKind::BrokenFeistel);
    let response = service.handle_body(
        br#"{"action": "login", "info": {"later": {"privs": 1}, "earlier": {"username": 1}}}"#,
    );
    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.text(),
        Some("Security alert: The 'privs' key is disallowed in the 'info' dictionary.")
    );
}

#[test]
fn configured_depth_limit_applies_to_codec() {
    let codec = codec(CipherKind::BrokenFeistel).with_sanitizer(InputSanitizer::new(2));
    assert!(codec.encode(&ticket_with(json!({"a": [1]}))).is_ok());

    let err = codec
        .encode(&ticket_with(json!({"a": [[1]]})))
        .unwrap_err();
    assert_eq!(err, SecurityError::NestingTooDeep { limit: 2 });
}

#[test]
fn scalars_pass() {
    let sanitizer = InputSanitizer::new(1);
    for value in [json!(null), json!(true), json!(3), json!("privs")] {
        assert!(sanitizer.sanitize(&value).is_ok());
    }
}
