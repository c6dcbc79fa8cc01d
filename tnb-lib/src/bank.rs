//! Client for a bank node.
//!
//! List endpoints return a [`Paginator`]; nothing is fetched until the
//! iterator is advanced. Trust updates are signed with the node keypair of
//! the bank operator.

use std::sync::Arc;

use serde_json::json;

use crate::config::ClientConfig;
use crate::http::HttpClient;
use crate::keypair::{parse_public_key, Keypair};
use crate::models::{
    Account, BankConfig, BankDetails, BankTransaction, Block, CleanStatus, ConfirmationBlock,
    ConfirmationService, CrawlStatus, InvalidBlock, NodeType, ValidatorDetails,
};
use crate::ordering::{
    AccountOrder, BankOrder, BlockOrder, ConfirmationBlockOrder, InvalidBlockOrder, Ordering,
    TransactionOrder, ValidatorOrder,
};
use crate::pagination::{PageRequest, PageSource, Paginator};
use crate::payment::TransactionBlock;
use crate::signing::SignedRequest;
use crate::{Result, TnbError};

/// Offset, cap, ordering and page size for a list endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListOptions<O> {
    /// Index of the first item to return.
    pub offset: usize,
    /// Stop after this many items.
    pub limit: Option<usize>,
    /// Sort order.
    pub ordering: O,
    /// Items per request; the client default when unset.
    pub page_limit: Option<usize>,
}

impl<O: Ordering + Default> Default for ListOptions<O> {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: None,
            ordering: O::default(),
            page_limit: None,
        }
    }
}

impl<O: Ordering> ListOptions<O> {
    /// Start at `offset`.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Stop after `limit` items.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort by `ordering`.
    pub fn with_ordering(mut self, ordering: O) -> Self {
        self.ordering = ordering;
        self
    }

    /// Request `page_limit` items per page.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = Some(page_limit);
        self
    }

    fn into_request(self, path: &str, default_page_limit: usize) -> PageRequest {
        PageRequest::new(path, self.ordering)
            .with_offset(self.offset)
            .with_limit(self.limit)
            .with_page_limit(self.page_limit.unwrap_or(default_page_limit))
    }
}

/// Filters for [`Bank::fetch_transactions`]. Unset fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Sender account number.
    pub sender: Option<String>,
    /// Only fees paid to this node type.
    pub fee: Option<NodeType>,
    /// Recipient account number.
    pub recipient: Option<String>,
    /// Either sender or recipient.
    pub account_number: Option<String>,
}

impl TransactionFilter {
    fn apply(&self, mut request: PageRequest) -> Result<PageRequest> {
        if let Some(sender) = &self.sender {
            parse_public_key(sender)?;
            request = request.with_filter("block__sender", sender.trim());
        }
        if let Some(fee) = self.fee {
            request = request.with_filter("fee", fee.as_str());
        }
        if let Some(recipient) = &self.recipient {
            parse_public_key(recipient)?;
            request = request.with_filter("recipient", recipient.trim());
        }
        if let Some(account) = &self.account_number {
            parse_public_key(account)?;
            request = request.with_filter("account_number", account.trim());
        }
        Ok(request)
    }
}

/// A connected bank node.
#[derive(Debug)]
pub struct Bank {
    client: Arc<HttpClient>,
    config: BankConfig,
}

impl Bank {
    /// Connect to the bank described by `config` and load its `/config`.
    ///
    /// # Errors
    ///
    /// - [`TnbError::Validation`] if the node is not a bank
    /// - any transport or status error from the request
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(config), fields(address = %config.address)))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Arc::new(HttpClient::new(&config)?);
        let node_config = fetch_bank_config(&client).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            node_identifier = %node_config.node_identifier,
            version = %node_config.version,
            "connected to bank"
        );

        Ok(Self {
            client,
            config: node_config,
        })
    }

    /// The `/config` document loaded at connect time.
    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// The bank's node identifier.
    pub fn node_identifier(&self) -> &str {
        &self.config.node_identifier
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Reload `/config`.
    pub async fn refresh(&mut self) -> Result<&BankConfig> {
        self.config = fetch_bank_config(&self.client).await?;
        Ok(&self.config)
    }

    /// The bank's primary validator.
    ///
    /// Uses the cached config, fetching `/config` again only when it did not
    /// name one.
    pub async fn primary_validator(&self) -> Result<ValidatorDetails> {
        if let Some(validator) = &self.config.primary_validator {
            return Ok(validator.clone());
        }

        fetch_bank_config(&self.client)
            .await?
            .primary_validator
            .ok_or_else(|| TnbError::validation("bank reports no primary validator"))
    }

    fn paginate<T, O>(&self, path: &str, options: ListOptions<O>) -> Paginator<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
        O: Ordering,
    {
        let request = options.into_request(path, self.client.config().page_limit);
        Paginator::new(self.source(), request)
    }

    fn source(&self) -> Arc<dyn PageSource> {
        self.client.clone()
    }

    /// Accounts known to this bank.
    pub fn fetch_accounts(&self, options: ListOptions<AccountOrder>) -> Paginator<Account> {
        self.paginate("accounts", options)
    }

    /// Transactions processed by this bank.
    ///
    /// Fails before any request if a filter key is not a valid account number.
    pub fn fetch_transactions(
        &self,
        options: ListOptions<TransactionOrder>,
        filter: &TransactionFilter,
    ) -> Result<Paginator<BankTransaction>> {
        let request = options.into_request("bank_transactions", self.client.config().page_limit);
        Ok(Paginator::new(self.source(), filter.apply(request)?))
    }

    /// Banks this bank is connected to.
    pub fn fetch_banks(&self, options: ListOptions<BankOrder>) -> Paginator<BankDetails> {
        self.paginate("banks", options)
    }

    /// Blocks received by this bank, optionally only those from `sender`.
    ///
    /// Blocks that carry their signed message are verified as they are
    /// yielded; a bad signature surfaces as
    /// [`TnbError::SignatureVerifyFailed`] for that block.
    pub fn fetch_blocks(
        &self,
        options: ListOptions<BlockOrder>,
        sender: Option<&str>,
    ) -> Result<Paginator<Block>> {
        let mut request = options.into_request("blocks", self.client.config().page_limit);
        if let Some(sender) = sender {
            parse_public_key(sender)?;
            request = request.with_filter("sender", sender.trim());
        }

        Ok(Paginator::new(self.source(), request).with_validator(|block: &Block| {
            if block.is_verifiable() {
                block.verify_signature()
            } else {
                Ok(())
            }
        }))
    }

    /// Validators known to this bank.
    pub fn fetch_validators(
        &self,
        options: ListOptions<ValidatorOrder>,
    ) -> Paginator<ValidatorDetails> {
        self.paginate("validators", options)
    }

    /// Confirmation blocks received by this bank.
    pub fn fetch_confirmation_blocks(
        &self,
        options: ListOptions<ConfirmationBlockOrder>,
    ) -> Paginator<ConfirmationBlock> {
        self.paginate("confirmation_blocks", options)
    }

    /// Blocks rejected by validators.
    pub fn fetch_invalid_blocks(
        &self,
        options: ListOptions<InvalidBlockOrder>,
    ) -> Paginator<InvalidBlock> {
        self.paginate("invalid_blocks", options)
    }

    /// Confirmation services this bank has paid for.
    pub fn fetch_confirmation_services(
        &self,
        options: ListOptions<ConfirmationBlockOrder>,
    ) -> Paginator<ConfirmationService> {
        self.paginate("validator_confirmation_services", options)
    }

    /// Set the trust this bank assigns to an account.
    ///
    /// `node_keypair` must be the bank's own node key.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, node_keypair)))]
    pub async fn set_account_trust(
        &self,
        account_number: &str,
        trust: f64,
        node_keypair: &Keypair,
    ) -> Result<Account> {
        parse_public_key(account_number)?;
        let request = SignedRequest::new(&json!({ "trust": trust }), node_keypair)?;
        self.client
            .patch_json(&format!("accounts/{}", account_number.trim()), &request)
            .await
    }

    /// Set the trust this bank assigns to another bank.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, node_keypair)))]
    pub async fn set_bank_trust(
        &self,
        node_identifier: &str,
        trust: f64,
        node_keypair: &Keypair,
    ) -> Result<BankDetails> {
        parse_public_key(node_identifier)?;
        let request = SignedRequest::new(&json!({ "trust": trust }), node_keypair)?;
        self.client
            .patch_json(&format!("banks/{}", node_identifier.trim()), &request)
            .await
    }

    /// Sign `block` and submit it.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, block)))]
    pub async fn add_block(&self, block: &TransactionBlock) -> Result<Block> {
        let signed = block.finalize()?;
        self.client.post_json("blocks", &signed).await
    }

    /// Status of the bank's clean process.
    pub async fn clean_status(&self) -> Result<CleanStatus> {
        self.client.get("clean").await
    }

    /// Status of the bank's network crawl.
    pub async fn crawl_status(&self) -> Result<CrawlStatus> {
        self.client.get("crawl").await
    }
}

async fn fetch_bank_config(client: &HttpClient) -> Result<BankConfig> {
    let config: BankConfig = client.get("config").await?;
    if config.node_type != NodeType::Bank {
        return Err(TnbError::validation(format!(
            "node at {} is not a bank: {:?}",
            client.base_url(),
            config.node_type
        )));
    }
    Ok(config)
}
