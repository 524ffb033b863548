use crate::{codec, key};
use frankenticket::cipher::CipherKind;
use frankenticket::ticket::{DecodeError, Ticket, pad_plaintext};
use serde_json::{Value, json};

const FIXED_PLAINTEXT: &str = concat!(
    r#"{"info": null, "privs": ["read"], "timestamp": "2021-05-01T12:00:00.000000Z", "#,
    r#""username": "John Doe"}           "#
);

const FEISTEL_TICKET: &str = concat!(
    "eee09539a710755eec60199ee7c1dcdb0c587d0fc042c159d8b04dfdf604607c",
    "76330f87f6fc95d5cc18461b9af2d570ecf7bf1503421335c0b9846e91065ee2",
    "c8b2c608690f38bfb8e48bc4d16a0fad315095339e6e08e3901f936c831bc7fb",
    "0b7c4926f573305ec914deafe6af1d73",
);

const AES_TICKET: &str = concat!(
    "043da13ce1301ae560970d5bbd13f7ae0aefdfb9237b605ad4779712996e0923",
    "f024de294b002c2941a73e5a0f06744ffb7cdc8e09d05fe09ee03049b65ac485",
    "cefa3f16d2adfe193419280958135aede02639d500a66e4290936ee74a21713a",
    "826ca41c221240448ed252742e1c1084",
);

// Issued by a deployed instance under the fixture key.
const SAMPLE_TICKET: &str = concat!(
    "eee09539a710755eec60199ee7c1dcdb0c587d0fc042c159d8b04dfdf604607c",
    "76330f87f6fc95d5cc18461b9af2d570876ca59eb571c65b5dd50c9dc1911fd9",
    "abb9fabff7477155aa5781ea6023538a315095339e6e08e3901f936c831bc7fb",
    "0b7c4926f573305ec914deafe6af1d73",
);

fn fixed_ticket() -> Ticket {
    Ticket::new("John Doe", Value::Null, vec!["read".into()])
        .with_timestamp("2021-05-01T12:00:00.000000Z")
}

#[test]
fn fixed_ticket_plaintext_layout() {
    assert_eq!(fixed_ticket().to_canonical_string().len(), 101);
    assert_eq!(pad_plaintext(&fixed_ticket().to_canonical_string()), FIXED_PLAINTEXT);
    assert_eq!(FIXED_PLAINTEXT.len(), 112);
}

#[test]
fn fixed_ticket_encrypts_to_known_hex() {
    for (kind, expected) in [
        (CipherKind::BrokenFeistel, FEISTEL_TICKET),
        (CipherKind::Aes128Ecb, AES_TICKET),
    ] {
        let encoded = codec(kind).encode(&fixed_ticket()).unwrap();
        assert_eq!(encoded.plaintext, FIXED_PLAINTEXT, "{kind}");
        assert_eq!(encoded.ciphertext_hex, expected, "{kind}");
    }
}

#[test]
fn known_hex_decodes_to_fixed_ticket() {
    for (kind, ticket) in [
        (CipherKind::BrokenFeistel, FEISTEL_TICKET),
        (CipherKind::Aes128Ecb, AES_TICKET),
    ] {
        let decoded = codec(kind).decode(ticket);
        assert!(decoded.is_ok(), "{kind}: {:?}", decoded.error);
        assert_eq!(decoded.text.as_deref(), Some(FIXED_PLAINTEXT));
        assert_eq!(decoded.data, Some(fixed_ticket().to_value()));
    }
}

#[test]
fn uppercase_hex_is_accepted() {
    let decoded = codec(CipherKind::BrokenFeistel).decode(&FEISTEL_TICKET.to_uppercase());
    assert!(decoded.is_ok());
}

#[test]
fn hex_may_be_split_into_spaced_byte_pairs() {
    let spaced = FEISTEL_TICKET
        .as_bytes()
        .chunks(8)
        .map(|group| std::str::from_utf8(group).unwrap())
        .collect::<Vec<_>>()
        .join(" ");
    let decoded = codec(CipherKind::BrokenFeistel).decode(&spaced);
    assert_eq!(decoded.data, Some(fixed_ticket().to_value()));

    let split_pair = format!("e ee{}", &FEISTEL_TICKET[3..]);
    assert!(matches!(
        codec(CipherKind::BrokenFeistel).decode(&split_pair).error,
        Some(DecodeError::InvalidHexEncoding { .. })
    ));
}

#[test]
fn sample_ticket_decodes() {
    let decoded = codec(CipherKind::BrokenFeistel).decode(SAMPLE_TICKET);
    let data = decoded.data.expect("sample decodes to JSON");
    assert_eq!(
        data,
        json!({
            "info": null,
            "privs": ["read"],
            "timestamp": "2021-10-16T12:46:29.510185Z",
            "username": "John Doe",
        })
    );
    assert!(decoded.text.unwrap().ends_with("\"}           "));
}

#[test]
fn wrong_cipher_does_not_yield_the_ticket() {
    let decoded = codec(CipherKind::Aes128Ecb).decode(FEISTEL_TICKET);
    assert!(!decoded.is_ok());
    assert_ne!(decoded.data, Some(fixed_ticket().to_value()));
}

#[test]
fn transport_level_failures() {
    let codec = codec(CipherKind::BrokenFeistel);

    let odd = codec.decode("abc");
    assert!(matches!(
        odd.error,
        Some(DecodeError::InvalidHexEncoding { .. })
    ));
    assert!(odd.text.is_none());

    let short = codec.decode(&FEISTEL_TICKET[..FEISTEL_TICKET.len() - 2]);
    assert_eq!(
        short.error,
        Some(DecodeError::InvalidBlockLength { len: 111 })
    );
    assert_eq!(
        short.error.unwrap().to_string(),
        "Binary ticket length is not a multiple of 16 bytes (found 111 bytes)."
    );

    assert_eq!(
        codec.decode("").error,
        Some(DecodeError::InvalidBlockLength { len: 0 })
    );
}

#[test]
fn garbage_blocks_are_corrupt_or_malformed() {
    let codec = codec(CipherKind::BrokenFeistel);
    // Replacing the first block with zeros scrambles it: either a high bit
    // appears or the JSON opener is lost.
    let forged = format!("{}{}", "00".repeat(16), &FEISTEL_TICKET[32..]);
    let decoded = codec.decode(&forged);
    match decoded.error {
        Some(DecodeError::CorruptPlaintext) => assert!(decoded.text.is_none()),
        Some(DecodeError::MalformedTicketStructure { .. }) => assert!(decoded.data.is_none()),
        other => panic!("unexpected decode outcome: {other:?}"),
    }
}

#[test]
fn key_fixture_is_sixteen_bytes() {
    assert_eq!(key().len(), 16);
}
