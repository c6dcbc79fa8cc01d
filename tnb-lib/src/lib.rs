//! Client library for thenewboston network nodes.
//!
//! The crate holds no global state: a [`Bank`] owns its HTTP client, list
//! endpoints hand back independent [`Paginator`]s, and signing is done with
//! caller-supplied [`Keypair`]s.
//!
//! # Features
//!
//! - **Keypairs**: Ed25519 account keys, key files, signing and verification
//! - **Pagination**: async iterators over list endpoints with lazy `map`/`filter`
//! - **Bank API**: typed list endpoints, signed trust updates, block submission
//!
//! # Example
//!
//! ```ignore
//! use tnb_lib::prelude::*;
//!
//! let bank = Bank::connect(ClientConfig::new("54.177.121.3")).await?;
//! let mut accounts = bank.fetch_accounts(ListOptions::default().with_limit(50));
//!
//! while let Some(account) = accounts.find(|a| std::future::ready(a.trust > 0.0)).await? {
//!     println!("{} {}", account.account_number, account.trust);
//! }
//! ```

pub mod bank;
pub mod config;
pub mod errors;
pub mod http;
pub mod keypair;
pub mod models;
pub mod ordering;
pub mod pagination;
pub mod payment;
pub mod prelude;
pub mod signing;

/// Test utilities: an in-memory page source and node-shaped fixtures.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bank::{Bank, ListOptions, TransactionFilter};
pub use config::ClientConfig;
pub use errors::{TnbError, TnbErrorCode};
pub use keypair::Keypair;
pub use pagination::{PaginatedIterator, Paginator};

/// Common result alias for client operations.
pub type Result<T> = std::result::Result<T, TnbError>;
