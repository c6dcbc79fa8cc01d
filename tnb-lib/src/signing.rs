//! Canonical message encoding and signed request envelopes.
//!
//! Nodes verify a signature over the canonical JSON form of the `message`
//! field: keys sorted, no insignificant whitespace, non-ASCII escaped as
//! `\uXXXX`. [`message_to_bytes`] produces exactly those bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keypair::Keypair;
use crate::models::BlockMessage;
use crate::Result;

/// Encode `message` as canonical JSON bytes for signing.
pub fn message_to_bytes<T: Serialize + ?Sized>(message: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(message)?;
    let compact = serde_json::to_string(&sort_keys(value))?;
    Ok(escape_non_ascii(&compact).into_bytes())
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

// Non-ASCII characters can only occur inside JSON strings, so escaping them
// in the serialized text is equivalent to escaping them at encode time.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// A signed request body as accepted by node mutation endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// The signed payload.
    pub message: Value,
    /// Account number of the signer.
    pub node_identifier: String,
    /// Hex-encoded signature over [`message_to_bytes`] of `message`.
    pub signature: String,
}

impl SignedRequest {
    /// Sign `message` with `keypair`.
    pub fn new<T: Serialize>(message: &T, keypair: &Keypair) -> Result<Self> {
        let message = serde_json::to_value(message)?;
        let signature = keypair.sign_hex(&message_to_bytes(&message)?);

        Ok(Self {
            message,
            node_identifier: keypair.account_number(),
            signature,
        })
    }

    /// Check the signature against `node_identifier`.
    pub fn verify(&self) -> Result<()> {
        let bytes = message_to_bytes(&self.message)?;
        Keypair::verify_hex(&bytes, &self.signature, &self.node_identifier)
    }
}

/// The wire form of a transaction block, as posted to `/blocks`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
    /// Account number of the sender.
    pub account_number: String,
    /// The signed transfers.
    pub message: BlockMessage,
    /// Hex-encoded signature over [`message_to_bytes`] of `message`.
    pub signature: String,
}

impl SignedBlock {
    /// Sign `message` as `keypair`.
    pub fn new(message: BlockMessage, keypair: &Keypair) -> Result<Self> {
        let signature = keypair.sign_hex(&message_to_bytes(&message)?);
        Ok(Self {
            account_number: keypair.account_number(),
            message,
            signature,
        })
    }

    /// Check the signature against `account_number`.
    pub fn verify(&self) -> Result<()> {
        let bytes = message_to_bytes(&self.message)?;
        Keypair::verify_hex(&bytes, &self.signature, &self.account_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TnbError;
    use serde_json::json;

    #[test]
    fn test_keys_are_sorted_and_compact() {
        let bytes = message_to_bytes(&json!({"trust": 1.5, "amount": 3, "b": {"z": 1, "a": 2}}))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"amount":3,"b":{"a":2,"z":1},"trust":1.5}"#
        );
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let bytes = message_to_bytes(&json!({"memo": "café 🚀"})).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"memo":"caf\u00e9 \ud83d\ude80"}"#
        );
    }

    #[test]
    fn test_signed_request_verifies() {
        let keypair = Keypair::generate();
        let request = SignedRequest::new(&json!({"trust": 42.0}), &keypair).unwrap();

        assert_eq!(request.node_identifier, keypair.account_number());
        request.verify().unwrap();
    }

    #[test]
    fn test_tampered_request_fails() {
        let keypair = Keypair::generate();
        let mut request = SignedRequest::new(&json!({"trust": 42.0}), &keypair).unwrap();
        request.message = json!({"trust": 100.0});

        let err = request.verify().unwrap_err();
        assert!(matches!(err, TnbError::SignatureVerifyFailed(_)));
    }
}
