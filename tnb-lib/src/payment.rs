//! Building and signing transaction blocks.
//!
//! A block sends coins from one account to any number of recipients. Banks
//! and primary validators expect their fee as part of the same block, so a
//! typical block holds one [`Payment`] plus two [`FeePayment`]s.

use serde::{Deserialize, Serialize};

use crate::keypair::Keypair;
use crate::models::{BankConfig, BlockMessage, NodeType, TxEntry, ValidatorDetails};
use crate::signing::SignedBlock;
use crate::{Result, TnbError};

/// A transfer to a regular account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Coins to send.
    pub amount: u64,
    /// Recipient account number.
    pub recipient: String,
    /// Free-form note, empty when unset.
    #[serde(default)]
    pub memo: String,
}

impl Payment {
    /// Pay `amount` to `recipient` with an empty memo.
    pub fn new(amount: u64, recipient: impl Into<String>) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            memo: String::new(),
        }
    }

    /// Attach a memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

impl From<Payment> for TxEntry {
    fn from(payment: Payment) -> Self {
        TxEntry {
            amount: payment.amount,
            recipient: payment.recipient,
            fee: None,
            memo: Some(payment.memo),
        }
    }
}

/// A fee paid to a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayment {
    /// Fee in coins.
    pub amount: u64,
    /// Account number of the node collecting the fee.
    pub recipient: String,
    /// Role the node is paid for.
    pub fee: NodeType,
}

impl FeePayment {
    /// Pay `amount` to the node account `recipient` acting as `fee`.
    pub fn new(amount: u64, recipient: impl Into<String>, fee: NodeType) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            fee,
        }
    }

    /// The fee a bank charges, taken from its `/config`.
    pub fn for_bank(config: &BankConfig) -> Self {
        Self::new(
            config.default_transaction_fee,
            config.account_number.clone(),
            NodeType::Bank,
        )
    }

    /// The fee a primary validator charges.
    pub fn for_primary_validator(validator: &ValidatorDetails) -> Self {
        Self::new(
            validator.default_transaction_fee,
            validator.account_number.clone(),
            NodeType::PrimaryValidator,
        )
    }
}

impl From<FeePayment> for TxEntry {
    fn from(fee: FeePayment) -> Self {
        TxEntry {
            amount: fee.amount,
            recipient: fee.recipient,
            fee: Some(fee.fee),
            memo: None,
        }
    }
}

/// An unsigned block under construction.
#[derive(Clone, Debug)]
pub struct TransactionBlock {
    sender: Keypair,
    balance_key: String,
    txs: Vec<TxEntry>,
}

impl TransactionBlock {
    /// Start a block sent by `sender`.
    ///
    /// `balance_key` is the sender's current balance lock as reported by the
    /// primary validator.
    pub fn new(sender: &Keypair, balance_key: impl Into<String>) -> Self {
        Self {
            sender: sender.clone(),
            balance_key: balance_key.into(),
            txs: Vec::new(),
        }
    }

    /// Add a regular payment.
    pub fn add_payment(&mut self, payment: Payment) -> &mut Self {
        self.txs.push(payment.into());
        self
    }

    /// Add a node fee.
    pub fn add_fee(&mut self, fee: FeePayment) -> &mut Self {
        self.txs.push(fee.into());
        self
    }

    /// Transfers added so far.
    pub fn txs(&self) -> &[TxEntry] {
        &self.txs
    }

    /// Sum of all transfer amounts, fees included. `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.txs
            .iter()
            .try_fold(0u64, |sum, tx| sum.checked_add(tx.amount))
    }

    /// Sign the block.
    ///
    /// # Errors
    ///
    /// - [`TnbError::Validation`] if the block is empty, moves zero coins, or
    ///   its total does not fit in a `u64`
    pub fn finalize(&self) -> Result<SignedBlock> {
        if self.txs.is_empty() {
            return Err(TnbError::validation("block has no transactions"));
        }
        if let Some(tx) = self.txs.iter().find(|tx| tx.amount == 0) {
            return Err(TnbError::validation(format!(
                "payment to {} has a zero amount",
                tx.recipient
            )));
        }
        if self.total().is_none() {
            return Err(TnbError::validation("block total overflows"));
        }

        let message = BlockMessage {
            balance_key: self.balance_key.clone(),
            txs: self.txs.clone(),
        };
        SignedBlock::new(message, &self.sender)
    }
}
