//! Block splicing against the ECB ticket format.
//!
//! Two tickets are issued with `info` values chosen so that interesting
//! plaintext falls on block boundaries. The prefix of one and the middle of
//! the other combine into a ticket that was never issued but carries every
//! required privilege.

use crate::service;
use frankenticket::Status;
use frankenticket::cipher::CipherKind;
use frankenticket::ticket::validate;
use serde_json::json;

const BLOCK_HEX: usize = 32;

fn forge(kind: CipherKind) -> String {
    let service = service(kind);

    // Blocks 0..3: {"info": {"a": "aaaaaaaaaaaa"}, "privs": ["read"
    let prefix = service
        .issue(json!({"a": "aaaaaaaaaaaa"}))
        .unwrap();
    // Blocks 2..4: , "write", "execute", "xxxxxx"]}
    let donor = service
        .issue(json!({"k": ["bbbbbbbbbbbbbb", "write", "execute", "xxxxxx"]}))
        .unwrap();

    assert_eq!(
        &prefix.plaintext[..48],
        r#"{"info": {"a": "aaaaaaaaaaaa"}, "privs": ["read""#
    );
    assert_eq!(
        &donor.plaintext[32..64],
        r#", "write", "execute", "xxxxxx"]}"#
    );

    format!(
        "{}{}",
        &prefix.ciphertext_hex[..3 * BLOCK_HEX],
        &donor.ciphertext_hex[2 * BLOCK_HEX..4 * BLOCK_HEX]
    )
}

#[test]
fn spliced_ticket_passes_validation() {
    common_init();
    for kind in [CipherKind::Aes128Ecb, CipherKind::BrokenFeistel] {
        test_section!(kind.as_str());
        let forged = forge(kind);
        let service = service(kind);

        let decoded = service.codec().decode(&forged);
        assert_eq!(
            decoded.text.as_deref(),
            Some(r#"{"info": {"a": "aaaaaaaaaaaa"}, "privs": ["read", "write", "execute", "xxxxxx"]}"#)
        );
        assert!(validate(decoded.data.as_ref()).is_ok());

        let response = service.auth(&forged);
        assert_with_log!(
            response.status() == Some(Status::Ok),
            "forged ticket accepted",
            Some(Status::Ok),
            response.status()
        );
        assert_eq!(response.text(), None);
    }
}

#[test]
fn splicing_works_across_service_instances_sharing_a_key() {
    common_init();
    let forged = forge(CipherKind::BrokenFeistel);
    let other = service(CipherKind::BrokenFeistel);
    assert_eq!(other.auth(&forged).status(), Some(Status::Ok));
}

fn common_init() {
    crate::common::init_test_logging();
}
