//! Ed25519 keypairs for signing requests and verifying signed records.
//!
//! A [`Keypair`] stores only the private signing key. The public key (the
//! network account number) is always derived from it, so the two can never
//! diverge. All curve arithmetic is done by `ed25519-dalek`.
//!
//! # Key files
//!
//! A key file holds the 32-byte private key, hex-encoded. Surrounding
//! whitespace is ignored on load. [`Keypair::write_key_file`] never
//! overwrites an existing file.
//!
//! # Example
//!
//! ```
//! use tnb_lib::Keypair;
//!
//! let keypair = Keypair::from_seed(&[7u8; 32]).unwrap();
//! let signature = keypair.sign(b"hello");
//! Keypair::verify(b"hello", &signature, &keypair.public_key_bytes()).unwrap();
//! ```

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use ed25519_dalek::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::{Result, TnbError};

/// Length in bytes of a seed accepted by [`Keypair::from_seed`].
pub const SEED_LENGTH: usize = SECRET_KEY_LENGTH;

/// A local account keypair.
///
/// The account number is the hex-encoded public key. The signing key is the
/// private key and must never be shared.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Derive a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed: &[u8; SEED_LENGTH] = seed.try_into().map_err(|_| {
            TnbError::InvalidKey(format!(
                "seed must be exactly {} bytes, got {}",
                SEED_LENGTH,
                seed.len()
            ))
        })?;

        Ok(Self::from_bytes(seed))
    }

    /// Derive a keypair from a seed whose length is known at compile time.
    pub fn from_bytes(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a keypair from a hex-encoded private key.
    pub fn from_hex(key: &str) -> Result<Self> {
        let raw = Zeroizing::new(hex::decode(key.trim()).map_err(|e| {
            log_error("private key load failed");
            TnbError::SigningKeyLoadFailed(format!(
                "key must be 32 bytes long and hex-encoded: {}",
                e
            ))
        })?);

        Self::from_seed(&raw).map_err(|_| {
            log_error("private key load failed");
            TnbError::SigningKeyLoadFailed("key must be 32 bytes long and hex-encoded".into())
        })
    }

    /// Load a keypair from a key file.
    ///
    /// # Errors
    ///
    /// - [`TnbError::KeyfileNotFound`] if `path` does not exist or is not a file
    /// - [`TnbError::Keysign`] if the file exists but cannot be read
    /// - [`TnbError::SigningKeyLoadFailed`] if the content is not a valid key
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            log_error("keyfile path was not found");
            return Err(TnbError::KeyfileNotFound(path.to_path_buf()));
        }

        let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
            log_error("keyfile could not be read");
            TnbError::Keysign(format!("keyfile could not be read: {}", e))
        })?);

        Self::from_hex(&raw)
    }

    /// Write the private key to `path`, hex-encoded.
    ///
    /// Fails with [`TnbError::KeyfileExists`] rather than overwriting.
    pub fn write_key_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                log_error("keyfile already exists, not overwriting");
                TnbError::KeyfileExists(path.to_path_buf())
            } else {
                log_error("keyfile write failed");
                TnbError::Keysign(format!("keyfile could not be written: {}", e))
            }
        })?;

        file.write_all(self.signing_key_hex().as_bytes())
            .map_err(|e| TnbError::Keysign(format!("keyfile could not be written: {}", e)))
    }

    /// The network account number (hex-encoded public key).
    pub fn account_number(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The hex-encoded private key. Handle with care.
    pub fn signing_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing_key.to_bytes()))
    }

    /// Sign `message`. Deterministic in (private key, message).
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Sign `message` and hex-encode the signature.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        hex::encode(self.sign(message))
    }

    /// Verify that `signature` is a valid signature of `message` under `public_key`.
    ///
    /// # Errors
    ///
    /// - [`TnbError::VerifyKeyLoadFailed`] if `public_key` is not a valid key
    /// - [`TnbError::SignatureVerifyFailed`] if the signature does not match
    pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()> {
        let verifying_key = load_verifying_key(public_key)?;

        let signature = Signature::from_slice(signature).map_err(|_| {
            log_error("verify: signature has the wrong length");
            TnbError::SignatureVerifyFailed(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                signature.len()
            ))
        })?;

        verifying_key.verify(message, &signature).map_err(|_| {
            log_error("verify: signature failed");
            TnbError::SignatureVerifyFailed("verify signature bad".into())
        })
    }

    /// Verify a hex-encoded signature against a hex-encoded account number.
    pub fn verify_hex(message: &[u8], signature_hex: &str, account_number: &str) -> Result<()> {
        let public_key = parse_public_key(account_number)?;
        let signature = hex::decode(signature_hex).map_err(|e| {
            log_error("verify_hex: bad signature data");
            TnbError::SignatureVerifyFailed(format!("signature data is corrupt: {}", e))
        })?;

        Self::verify(message, &signature, &public_key)
    }

    /// Verify where the message itself is also hex-encoded.
    pub fn verify_raw(message_hex: &str, signature_hex: &str, account_number: &str) -> Result<()> {
        let message = hex::decode(message_hex.trim()).map_err(|e| {
            TnbError::SignatureVerifyFailed(format!("message data is corrupt: {}", e))
        })?;

        Self::verify_hex(&message, signature_hex, account_number)
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        let ours = Zeroizing::new(self.signing_key.to_bytes());
        let theirs = Zeroizing::new(other.signing_key.to_bytes());
        *ours == *theirs
    }
}

impl Eq for Keypair {}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("account_number", &self.account_number())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account[{}]", self.account_number())
    }
}

/// Parse a hex-encoded account number or node identifier into key bytes.
pub fn parse_public_key(key: &str) -> Result<[u8; PUBLIC_KEY_LENGTH]> {
    let bytes = hex::decode(key.trim()).map_err(|e| {
        TnbError::VerifyKeyLoadFailed(format!("key must be hex-encoded: {}", e))
    })?;

    let verifying_key = load_verifying_key(&bytes)?;
    Ok(verifying_key.to_bytes())
}

/// Hex-encode raw key bytes.
pub fn key_to_hex(key: &[u8]) -> String {
    hex::encode(key)
}

/// Check whether `account_number` is the public half of `signing_key`.
///
/// Both keys are hex-encoded.
pub fn is_valid_keypair(account_number: &str, signing_key: &str) -> Result<bool> {
    let keypair = Keypair::from_hex(signing_key)?;
    let public_key = parse_public_key(account_number)?;
    Ok(keypair.public_key_bytes() == public_key)
}

fn load_verifying_key(public_key: &[u8]) -> Result<VerifyingKey> {
    let bytes: &[u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        TnbError::VerifyKeyLoadFailed(format!(
            "key must be {} bytes long, got {}",
            PUBLIC_KEY_LENGTH,
            public_key.len()
        ))
    })?;

    VerifyingKey::from_bytes(bytes).map_err(|e| {
        log_error("public key load failed");
        TnbError::VerifyKeyLoadFailed(e.to_string())
    })
}

#[inline]
fn log_error(_message: &str) {
    #[cfg(feature = "tracing")]
    tracing::error!("{}", _message);
}
