//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use tnb_lib::prelude::*;
//! ```

// Error handling
pub use crate::errors::{TnbError, TnbErrorCode};
pub use crate::Result;

// Keys and signing
pub use crate::keypair::Keypair;
pub use crate::signing::{message_to_bytes, SignedBlock, SignedRequest};

// Pagination
pub use crate::pagination::{PageRequest, PageSource, PaginatedIterator, Paginator};

// Node access
pub use crate::bank::{Bank, ListOptions, TransactionFilter};
pub use crate::config::ClientConfig;
pub use crate::http::HttpClient;
pub use crate::ordering::{
    AccountOrder, BankOrder, BlockOrder, ConfirmationBlockOrder, InvalidBlockOrder,
    Ordering as ListOrdering, TransactionOrder, ValidatorOrder,
};

// Records and payments
pub use crate::models::{
    Account, BankConfig, BankDetails, BankTransaction, Block, NodeType, ValidatorDetails,
};
pub use crate::payment::{FeePayment, Payment, TransactionBlock};

#[cfg(test)]
mod tests {
    // Both globs in scope must not make `Ordering` ambiguous.
    #[allow(unused_imports)]
    use super::*;
    #[allow(unused_imports)]
    use std::cmp::*;

    #[test]
    fn test_prelude_coexists_with_std_ordering() {
        assert_eq!(1.cmp(&2), Ordering::Less);
        assert_eq!(AccountOrder::default().as_query(), "created_date");
        fn takes_list_ordering<O: ListOrdering>(order: O) -> &'static str {
            order.as_query()
        }
        assert_eq!(takes_list_ordering(BlockOrder::CreatedDesc), "-created_date");
    }
}
