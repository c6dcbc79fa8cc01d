//! Records returned by node endpoints.
//!
//! Keys and signatures stay hex-encoded as they appear on the wire; use
//! [`crate::keypair::parse_public_key`] when raw bytes are needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::keypair::Keypair;
use crate::signing::message_to_bytes;
use crate::{Result, TnbError};

/// The role of a node on the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeType {
    /// A bank node.
    #[serde(rename = "BANK")]
    Bank,
    /// A validator acting as primary validator.
    #[serde(rename = "PRIMARY_VALIDATOR")]
    PrimaryValidator,
    /// A validator acting as confirmation validator.
    #[serde(rename = "CONFIRMATION_VALIDATOR")]
    ConfirmationValidator,
    /// No node type, sent as an empty string.
    #[default]
    #[serde(rename = "")]
    None,
}

impl NodeType {
    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::PrimaryValidator => "PRIMARY_VALIDATOR",
            Self::ConfirmationValidator => "CONFIRMATION_VALIDATOR",
            Self::None => "",
        }
    }
}

/// URL scheme a node accepts connections on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlProtocol {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTPS.
    Https,
}

impl UrlProtocol {
    /// The scheme string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items the node holds for this query.
    pub count: u64,
    /// Link to the following page, if any.
    pub next: Option<String>,
    /// Link to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Whether the node reports a following page.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// An account known to a bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Node-assigned identifier.
    pub id: String,
    /// When the node created the record.
    pub created_date: DateTime<Utc>,
    /// When the node last changed the record.
    pub modified_date: DateTime<Utc>,
    /// Account number, hex-encoded public key.
    pub account_number: String,
    /// Trust this bank assigns to the account, as a percentage.
    #[serde(deserialize_with = "decimal")]
    pub trust: f64,
}

/// A single transfer inside a signed block message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxEntry {
    /// Coins moved.
    pub amount: u64,
    /// Recipient account number.
    pub recipient: String,
    /// Set on fee payments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<NodeType>,
    /// Set on regular payments only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// The signed body of a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockMessage {
    /// Balance lock the sender spent.
    pub balance_key: String,
    /// Transfers in the block.
    pub txs: Vec<TxEntry>,
}

/// A block on the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Node-assigned identifier.
    pub id: String,
    /// When the node created the record.
    pub created_date: DateTime<Utc>,
    /// When the node last changed the record.
    pub modified_date: DateTime<Utc>,
    /// Balance lock the sender spent.
    pub balance_key: String,
    /// Sender account number.
    pub sender: String,
    /// Hex-encoded Ed25519 signature over the message.
    pub signature: String,
    /// Present when the node returns the signed body alongside the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<BlockMessage>,
}

impl Block {
    /// Whether this block carries enough data to check its signature.
    pub fn is_verifiable(&self) -> bool {
        self.message.is_some()
    }

    /// Check the block signature against its sender.
    ///
    /// # Errors
    ///
    /// - [`TnbError::Validation`] if the block has no message, or the message
    ///   balance key does not match the block
    /// - [`TnbError::SignatureVerifyFailed`] if the signature is bad
    pub fn verify_signature(&self) -> Result<()> {
        let message = self
            .message
            .as_ref()
            .ok_or_else(|| TnbError::validation(format!("block {} has no message", self.id)))?;

        if message.balance_key != self.balance_key {
            return Err(TnbError::validation(format!(
                "block {} balance key does not match its message",
                self.id
            )));
        }

        Keypair::verify_hex(&message_to_bytes(message)?, &self.signature, &self.sender)
    }
}

/// A transaction as listed by a bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Node-assigned identifier.
    pub id: String,
    /// The block carrying this transaction.
    pub block: Block,
    /// Coins moved.
    pub amount: u64,
    /// Node type the fee was paid to, `None` for regular payments.
    #[serde(default)]
    pub fee: NodeType,
    /// Free-form note, empty when unset.
    #[serde(default)]
    pub memo: String,
    /// Recipient account number.
    pub recipient: String,
}

impl BankTransaction {
    /// The node type this transaction paid a fee to, if it is a fee.
    pub fn fee_paid_to(&self) -> Option<NodeType> {
        match self.fee {
            NodeType::None => None,
            other => Some(other),
        }
    }
}

/// A bank as listed by another bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    /// Account number, hex-encoded public key.
    pub account_number: String,
    /// Host name or IP address.
    pub ip_address: String,
    /// Node identifier, hex-encoded public key.
    pub node_identifier: String,
    /// Port, when not the scheme default.
    pub port: Option<u16>,
    /// URL scheme.
    pub protocol: UrlProtocol,
    /// Node software version.
    pub version: String,
    /// Fee charged per block.
    pub default_transaction_fee: u64,
    /// Trust the listing node assigns, as a percentage.
    #[serde(default, deserialize_with = "decimal")]
    pub trust: f64,
}

impl BankDetails {
    /// Base URL of this bank.
    pub fn address(&self) -> String {
        node_address(self.protocol, &self.ip_address, self.port)
    }
}

/// A validator as listed by a bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatorDetails {
    /// Account number, hex-encoded public key.
    pub account_number: String,
    /// Host name or IP address.
    pub ip_address: String,
    /// Node identifier, hex-encoded public key.
    pub node_identifier: String,
    /// Port, when not the scheme default.
    pub port: Option<u16>,
    /// URL scheme.
    pub protocol: UrlProtocol,
    /// Node software version.
    pub version: String,
    /// Fee charged per block.
    pub default_transaction_fee: u64,
    /// URL of the root account file.
    pub root_account_file: String,
    /// Hash of the root account file.
    pub root_account_file_hash: String,
    /// Identifier of the seed block.
    pub seed_block_identifier: String,
    /// Coins charged per day of confirmation service.
    pub daily_confirmation_rate: Option<u64>,
    /// Trust the listing node assigns, as a percentage.
    #[serde(default, deserialize_with = "decimal")]
    pub trust: f64,
}

impl ValidatorDetails {
    /// Base URL of this validator.
    pub fn address(&self) -> String {
        node_address(self.protocol, &self.ip_address, self.port)
    }
}

/// The `/config` document of a bank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    /// The bank's primary validator, when it has one.
    pub primary_validator: Option<ValidatorDetails>,
    /// Account number, hex-encoded public key.
    pub account_number: String,
    /// Host name or IP address.
    pub ip_address: String,
    /// Node identifier, hex-encoded public key.
    pub node_identifier: String,
    /// Port, when not the scheme default.
    pub port: Option<u16>,
    /// URL scheme.
    pub protocol: UrlProtocol,
    /// Node software version.
    pub version: String,
    /// Fee charged per block.
    pub default_transaction_fee: u64,
    /// Role of the node.
    pub node_type: NodeType,
}

/// A confirmation block issued by a validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationBlock {
    /// Node-assigned identifier.
    pub id: String,
    /// When the node created the record.
    pub created_date: DateTime<Utc>,
    /// When the node last changed the record.
    pub modified_date: DateTime<Utc>,
    /// Identifier of the block this record refers to.
    pub block_identifier: String,
    /// Identifier of the confirmed block.
    pub block: String,
    /// Node identifier of the confirming validator.
    pub validator: String,
}

/// A block rejected by a validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvalidBlock {
    /// Node-assigned identifier.
    pub id: String,
    /// When the node created the record.
    pub created_date: DateTime<Utc>,
    /// When the node last changed the record.
    pub modified_date: DateTime<Utc>,
    /// Identifier of the block this record refers to.
    pub block_identifier: String,
    /// Identifier of the rejected block.
    pub block: String,
    /// Node identifier of the rejecting confirmation validator.
    pub confirmation_validator: String,
    /// Node identifier of the primary validator that accepted it.
    pub primary_validator: String,
}

/// A paid confirmation service window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationService {
    /// Node-assigned identifier.
    pub id: String,
    /// When the node created the record.
    pub created_date: DateTime<Utc>,
    /// When the node last changed the record.
    pub modified_date: DateTime<Utc>,
    /// Start of the service window.
    pub start: DateTime<Utc>,
    /// End of the service window.
    pub end: DateTime<Utc>,
    /// Node identifier of the validator.
    pub validator: String,
}

/// Result of a `/clean` status request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanStatus {
    /// When the last clean finished.
    pub clean_last_completed: Option<DateTime<Utc>>,
    /// Current clean state, if one is running.
    pub clean_status: Option<String>,
    /// Host name or IP address.
    pub ip_address: String,
    /// Port, when not the scheme default.
    pub port: Option<u16>,
    /// URL scheme.
    pub protocol: UrlProtocol,
}

/// Result of a `/crawl` status request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrawlStatus {
    /// When the last crawl finished.
    pub crawl_last_completed: Option<DateTime<Utc>>,
    /// Current crawl state, if one is running.
    pub crawl_status: Option<String>,
    /// Host name or IP address.
    pub ip_address: String,
    /// Port, when not the scheme default.
    pub port: Option<u16>,
    /// URL scheme.
    pub protocol: UrlProtocol,
}

fn node_address(protocol: UrlProtocol, host: &str, port: Option<u16>) -> String {
    match port {
        Some(port) => format!("{}://{}:{}", protocol.as_str(), host, port),
        None => format!("{}://{}", protocol.as_str(), host),
    }
}

// Decimal fields arrive as either JSON numbers or strings like "100.00".
fn decimal<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_json(message: Option<serde_json::Value>) -> serde_json::Value {
        let mut block = json!({
            "id": "b1",
            "created_date": "2021-03-01T10:00:00.123456Z",
            "modified_date": "2021-03-01T10:00:00Z",
            "balance_key": "aa",
            "sender": "bb",
            "signature": "cc"
        });
        if let Some(message) = message {
            block["message"] = message;
        }
        block
    }

    #[test]
    fn test_account_trust_from_string() {
        let account: Account = serde_json::from_value(json!({
            "id": "1",
            "created_date": "2021-03-01T10:00:00Z",
            "modified_date": "2021-03-01T10:00:00+00:00",
            "account_number": "ab",
            "trust": "12.50"
        }))
        .unwrap();
        assert_eq!(account.trust, 12.5);
    }

    #[test]
    fn test_node_type_empty_string() {
        let tx: BankTransaction = serde_json::from_value(json!({
            "id": "t1",
            "block": block_json(None),
            "amount": 5,
            "fee": "",
            "memo": "",
            "recipient": "dd"
        }))
        .unwrap();
        assert_eq!(tx.fee_paid_to(), None);

        let tx: BankTransaction = serde_json::from_value(json!({
            "id": "t2",
            "block": block_json(None),
            "amount": 1,
            "fee": "PRIMARY_VALIDATOR",
            "recipient": "dd"
        }))
        .unwrap();
        assert_eq!(tx.fee_paid_to(), Some(NodeType::PrimaryValidator));
    }

    #[test]
    fn test_block_without_message_is_not_verifiable() {
        let block: Block = serde_json::from_value(block_json(None)).unwrap();
        assert!(!block.is_verifiable());
        assert!(matches!(
            block.verify_signature(),
            Err(TnbError::Validation(_))
        ));
    }

    #[test]
    fn test_block_signature() {
        let sender = Keypair::generate();
        let message = BlockMessage {
            balance_key: "aa".into(),
            txs: vec![TxEntry {
                amount: 10,
                recipient: "dd".into(),
                fee: None,
                memo: Some("hi".into()),
            }],
        };
        let signature = sender.sign_hex(&message_to_bytes(&message).unwrap());

        let mut block: Block = serde_json::from_value(block_json(Some(
            serde_json::to_value(&message).unwrap(),
        )))
        .unwrap();
        block.sender = sender.account_number();
        block.signature = signature;
        block.verify_signature().unwrap();

        block.message.as_mut().unwrap().txs[0].amount = 11;
        assert!(matches!(
            block.verify_signature(),
            Err(TnbError::SignatureVerifyFailed(_))
        ));
    }

    #[test]
    fn test_node_address() {
        let bank: BankDetails = serde_json::from_value(json!({
            "account_number": "a",
            "ip_address": "10.0.0.1",
            "node_identifier": "n",
            "port": null,
            "protocol": "http",
            "version": "v1.0",
            "default_transaction_fee": 1,
            "trust": "0.00"
        }))
        .unwrap();
        assert_eq!(bank.address(), "http://10.0.0.1");
    }
}
