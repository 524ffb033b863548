use frankenticket::cipher::{
    BlockCipher, CipherErrorKind, CipherKey, CipherKind, FixedKeyBlockCipher, WeakFeistelCipher,
    decrypt_ecb, encrypt_ecb,
};

fn block(hex_text: &str) -> [u8; 16] {
    hex::decode(hex_text).unwrap().try_into().unwrap()
}

const COUNTING: &str = "000102030405060708090a0b0c0d0e0f";

#[test]
fn aes_matches_fips_197() {
    let key = CipherKey::new(block(COUNTING).to_vec());
    let cipher = FixedKeyBlockCipher::new(&key).unwrap();
    let pt = block("00112233445566778899aabbccddeeff");
    let ct = cipher.encrypt_block(&pt);
    assert_eq!(hex::encode(ct), "69c4e0d86a7b0430d8cdb78070b4c55a");
    assert_eq!(cipher.decrypt_block(&ct), pt);
}

#[test]
fn feistel_matches_reference_vector() {
    let cipher = WeakFeistelCipher::new(&CipherKey::new(b"foobarx".to_vec()));
    let pt = block(COUNTING);
    let ct = cipher.encrypt_block(&pt);
    assert_eq!(hex::encode(ct), "1f81084939ff388f84fa35a58b1be7f1");
    assert_eq!(cipher.decrypt_block(&ct), pt);
}

#[test]
fn feistel_key_changes_output() {
    let a = WeakFeistelCipher::new(&CipherKey::new(b"foobarx".to_vec()));
    let b = WeakFeistelCipher::new(&CipherKey::new(b"foobary".to_vec()));
    let pt = block(COUNTING);
    assert_ne!(a.encrypt_block(&pt), b.encrypt_block(&pt));
}

#[test]
fn aes_rejects_short_key_through_kind() {
    let err = CipherKind::Aes128Ecb
        .build(&CipherKey::new(b"foobarx".to_vec()))
        .unwrap_err();
    assert_eq!(
        err.kind(),
        CipherErrorKind::InvalidKeyLength {
            expected: 16,
            actual: 7
        }
    );
}

#[test]
fn ecb_equal_blocks_encrypt_equally() {
    let key = CipherKey::new(block(COUNTING).to_vec());
    for kind in [CipherKind::Aes128Ecb, CipherKind::BrokenFeistel] {
        let cipher = kind.build(&key).unwrap();
        let data = [0x41u8; 48];
        let ct = encrypt_ecb(&cipher, &data).unwrap();
        assert_eq!(ct[..16], ct[16..32], "{kind}");
        assert_eq!(ct[16..32], ct[32..48], "{kind}");
        assert_eq!(decrypt_ecb(&cipher, &ct).unwrap(), data);
    }
}

#[test]
fn ecb_rejects_partial_blocks() {
    let cipher = CipherKind::BrokenFeistel
        .build(&CipherKey::new(b"k".to_vec()))
        .unwrap();
    let err = encrypt_ecb(&cipher, &[0u8; 17]).unwrap_err();
    assert_eq!(err.kind(), CipherErrorKind::InvalidBlockLength { len: 17 });
}

#[test]
fn kind_names_parse_back() {
    for kind in [CipherKind::Aes128Ecb, CipherKind::BrokenFeistel] {
        assert_eq!(kind.as_str().parse::<CipherKind>().unwrap(), kind);
    }
    assert_eq!("AES".parse::<CipherKind>().unwrap(), CipherKind::Aes128Ecb);
    assert!("des".parse::<CipherKind>().is_err());
}
