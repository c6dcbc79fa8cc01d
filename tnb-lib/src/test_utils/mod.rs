//! Test utilities for tnb-lib.
//!
//! - [`MockPageSource`]: an in-memory [`PageSource`](crate::pagination::PageSource)
//!   with scripted failures and call recording
//! - fixtures producing node-shaped JSON for accounts, blocks and configs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tnb_lib::test_utils::{account_json, MockPageSource};
//!
//! let source = Arc::new(MockPageSource::new((0..24).map(account_json).collect()));
//! source.fail_next(1);
//! ```

mod fixtures;
mod mock_source;

pub use fixtures::{
    account_json, bank_config_json, bank_transaction_json, signed_block_json, test_keypair,
    unsigned_block_json,
};
pub use mock_source::MockPageSource;
