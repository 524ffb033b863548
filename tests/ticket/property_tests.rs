use crate::codec;
use frankenticket::cipher::{BLOCK_SIZE, BlockCipher, CipherKey, CipherKind};
use frankenticket::ticket::{RESERVED_KEYS, Ticket};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_info() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6).prop_map(|entries| {
                Value::Object(
                    entries
                        .into_iter()
                        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
                        .collect::<Map<String, Value>>(),
                )
            }),
        ]
    })
}

fn arb_kind() -> impl Strategy<Value = CipherKind> {
    prop_oneof![Just(CipherKind::Aes128Ecb), Just(CipherKind::BrokenFeistel)]
}

proptest! {
    #[test]
    fn block_decrypt_inverts_encrypt(
        kind in arb_kind(),
        key in prop::array::uniform16(any::<u8>()),
        block in prop::array::uniform16(any::<u8>()),
    ) {
        let cipher = kind.build(&CipherKey::new(key.to_vec())).unwrap();
        prop_assert_eq!(cipher.decrypt_block(&cipher.encrypt_block(&block)), block);
    }

    #[test]
    fn feistel_accepts_any_key_length(
        key in prop::collection::vec(any::<u8>(), 0..40),
        block in prop::array::uniform16(any::<u8>()),
    ) {
        let cipher = CipherKind::BrokenFeistel.build(&CipherKey::new(key)).unwrap();
        prop_assert_eq!(cipher.decrypt_block(&cipher.encrypt_block(&block)), block);
    }

    #[test]
    fn issued_tickets_decode_to_their_info(kind in arb_kind(), info in arb_info()) {
        let codec = codec(kind);
        let ticket = Ticket::new("John Doe", info.clone(), vec!["read".into()]);
        let encoded = codec.encode(&ticket).unwrap();

        prop_assert!(encoded.plaintext.is_ascii());
        prop_assert_eq!(encoded.plaintext.len() % BLOCK_SIZE, 0);
        prop_assert_eq!(encoded.ciphertext_hex.len(), encoded.plaintext.len() * 2);

        let decoded = codec.decode(&encoded.ciphertext_hex);
        prop_assert!(decoded.is_ok());
        prop_assert_eq!(decoded.text.as_deref(), Some(encoded.plaintext.as_str()));
        prop_assert_eq!(&decoded.data.unwrap()["info"], &info);
    }
}
