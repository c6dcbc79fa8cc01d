//! Node-shaped JSON fixtures.

use serde_json::{json, Value};

use crate::keypair::Keypair;
use crate::models::{BlockMessage, TxEntry};
use crate::signing::SignedBlock;
use crate::Result;

/// Deterministic keypair number `i`.
pub fn test_keypair(i: usize) -> Keypair {
    let mut seed = [0x5au8; 32];
    seed[..8].copy_from_slice(&(i as u64).to_be_bytes());
    Keypair::from_bytes(&seed)
}

fn timestamp(i: usize) -> String {
    format!("2021-03-01T{:02}:{:02}:00Z", (i / 60) % 24, i % 60)
}

/// An account whose trust equals `i`.
pub fn account_json(i: usize) -> Value {
    json!({
        "id": format!("00000000-0000-4000-8000-{:012}", i),
        "created_date": timestamp(i),
        "modified_date": timestamp(i),
        "account_number": test_keypair(i).account_number(),
        "trust": format!("{}.00", i),
    })
}

/// A block without its message, as the list endpoint returns it.
pub fn unsigned_block_json(i: usize) -> Value {
    json!({
        "id": format!("b-{}", i),
        "created_date": timestamp(i),
        "modified_date": timestamp(i),
        "balance_key": format!("{:064x}", i),
        "sender": test_keypair(i).account_number(),
        "signature": "00".repeat(64),
    })
}

/// A block carrying a message signed by `sender`.
pub fn signed_block_json(sender: &Keypair, i: usize) -> Result<Value> {
    let message = BlockMessage {
        balance_key: format!("{:064x}", i),
        txs: vec![TxEntry {
            amount: i as u64 + 1,
            recipient: test_keypair(i + 1).account_number(),
            fee: None,
            memo: Some(format!("payment {}", i)),
        }],
    };
    let signed = SignedBlock::new(message, sender)?;

    Ok(json!({
        "id": format!("b-{}", i),
        "created_date": timestamp(i),
        "modified_date": timestamp(i),
        "balance_key": signed.message.balance_key,
        "sender": signed.account_number,
        "signature": signed.signature,
        "message": signed.message,
    }))
}

/// A bank transaction wrapping [`unsigned_block_json`].
pub fn bank_transaction_json(i: usize) -> Value {
    json!({
        "id": format!("t-{}", i),
        "block": unsigned_block_json(i),
        "amount": i + 1,
        "fee": "",
        "memo": "",
        "recipient": test_keypair(i + 1).account_number(),
    })
}

/// A bank `/config` document for the bank whose node key is `node`.
pub fn bank_config_json(node: &Keypair) -> Value {
    json!({
        "primary_validator": {
            "account_number": test_keypair(900).account_number(),
            "ip_address": "10.0.0.2",
            "node_identifier": test_keypair(901).account_number(),
            "port": null,
            "protocol": "http",
            "version": "v1.0",
            "default_transaction_fee": 1,
            "root_account_file": "http://10.0.0.2/media/root_account_file.json",
            "root_account_file_hash": "00".repeat(32),
            "seed_block_identifier": "",
            "daily_confirmation_rate": null,
            "trust": "100.00",
        },
        "account_number": test_keypair(902).account_number(),
        "ip_address": "10.0.0.1",
        "node_identifier": node.account_number(),
        "port": null,
        "protocol": "http",
        "version": "v1.0",
        "default_transaction_fee": 1,
        "node_type": "BANK",
    })
}
