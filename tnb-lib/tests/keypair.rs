//! Key files and signature properties.

use proptest::prelude::*;
use tempfile::TempDir;
use tnb_lib::keypair::is_valid_keypair;
use tnb_lib::{Keypair, TnbError};

#[test]
fn test_write_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.key");

    let keypair = Keypair::generate();
    keypair.write_key_file(&path).unwrap();

    let loaded = Keypair::load(&path).unwrap();
    assert_eq!(loaded, keypair);
    assert_eq!(loaded.account_number(), keypair.account_number());
}

#[cfg(unix)]
#[test]
fn test_key_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.key");
    Keypair::generate().write_key_file(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn test_write_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.key");

    let first = Keypair::generate();
    first.write_key_file(&path).unwrap();

    let err = Keypair::generate().write_key_file(&path).unwrap_err();
    assert!(matches!(err, TnbError::KeyfileExists(_)));
    assert_eq!(Keypair::load(&path).unwrap(), first);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Keypair::load(dir.path().join("nope.key")).unwrap_err();
    assert!(matches!(err, TnbError::KeyfileNotFound(_)));

    // A directory is not a key file either.
    let err = Keypair::load(dir.path()).unwrap_err();
    assert!(matches!(err, TnbError::KeyfileNotFound(_)));
}

#[test]
fn test_load_tolerates_whitespace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.key");
    let keypair = Keypair::from_seed(&[9u8; 32]).unwrap();
    std::fs::write(&path, format!("  {}\n", keypair.signing_key_hex().as_str())).unwrap();

    assert_eq!(Keypair::load(&path).unwrap(), keypair);
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("account.key");
    std::fs::write(&path, "definitely not a key").unwrap();

    let err = Keypair::load(&path).unwrap_err();
    assert!(matches!(err, TnbError::SigningKeyLoadFailed(_)));
    assert!(err.is_keysign());
}

#[test]
fn test_known_account_number_is_valid() {
    let keypair = Keypair::from_seed(&[1u8; 32]).unwrap();
    assert!(is_valid_keypair(&keypair.account_number(), &keypair.signing_key_hex()).unwrap());
}

proptest! {
    #[test]
    fn prop_sign_then_verify(seed in any::<[u8; 32]>(), message in proptest::collection::vec(any::<u8>(), 0..512)) {
        let keypair = Keypair::from_seed(&seed).unwrap();
        let signature = keypair.sign(&message);
        prop_assert!(Keypair::verify(&message, &signature, &keypair.public_key_bytes()).is_ok());
    }

    #[test]
    fn prop_seed_is_deterministic(seed in any::<[u8; 32]>(), message in proptest::collection::vec(any::<u8>(), 0..64)) {
        let a = Keypair::from_seed(&seed).unwrap();
        let b = Keypair::from_seed(&seed).unwrap();
        prop_assert_eq!(a.account_number(), b.account_number());
        prop_assert_eq!(a.sign(&message), b.sign(&message));
    }

    #[test]
    fn prop_any_bit_flip_fails(seed in any::<[u8; 32]>(), message in proptest::collection::vec(any::<u8>(), 1..128), bit in 0usize..512) {
        let keypair = Keypair::from_seed(&seed).unwrap();
        let mut signature = keypair.sign(&message);
        signature[bit / 8] ^= 1 << (bit % 8);

        let result = Keypair::verify(&message, &signature, &keypair.public_key_bytes());
        prop_assert!(matches!(result, Err(TnbError::SignatureVerifyFailed(_))));
    }
}
