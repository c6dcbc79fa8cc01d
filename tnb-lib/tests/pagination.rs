//! Paginator behaviour against an in-memory page source.

use std::future::ready;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tnb_lib::models::{Account, Block, Page};
use tnb_lib::ordering::{AccountOrder, BlockOrder};
use tnb_lib::pagination::{PageRequest, PageSource, PaginatedIterator, Paginator};
use tnb_lib::test_utils::{
    account_json, signed_block_json, test_keypair, unsigned_block_json, MockPageSource,
};
use tnb_lib::{Result, TnbError};

fn accounts(n: usize) -> Arc<MockPageSource> {
    Arc::new(MockPageSource::new((0..n).map(account_json).collect()))
}

fn paginator(source: Arc<MockPageSource>, page_limit: usize) -> Paginator<Account> {
    let request = PageRequest::new("accounts", AccountOrder::default()).with_page_limit(page_limit);
    Paginator::new(source, request)
}

fn number(i: usize) -> String {
    test_keypair(i).account_number()
}

#[tokio::test]
async fn test_three_pages_yield_every_item_in_order() {
    let source = accounts(24);
    let mut iter = paginator(source.clone(), 10);

    for i in 0..24 {
        let account = iter.next().await.unwrap();
        assert_eq!(account.account_number, number(i), "item {}", i);
    }

    assert!(iter.next().await.unwrap_err().is_iterator_empty());
    assert!(iter.is_exhausted());
    assert_eq!(source.offsets(), vec![0, 10, 20]);

    // Exhausted iterators never fetch again.
    for _ in 0..3 {
        assert!(matches!(iter.next().await, Err(TnbError::IteratorEmpty)));
    }
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn test_flatten_matches_repeated_next() {
    let mut stepped = Vec::new();
    let mut iter = paginator(accounts(24), 10);
    loop {
        match iter.next().await {
            Ok(account) => stepped.push(account),
            Err(TnbError::IteratorEmpty) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let flattened = paginator(accounts(24), 10).flatten().await.unwrap();
    assert_eq!(flattened, stepped);
}

#[tokio::test]
async fn test_filter_then_map_matches_eager_pipeline() {
    let eager: Vec<String> = paginator(accounts(24), 7)
        .flatten()
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.trust >= 5.0 && a.trust < 18.0)
        .map(|a| a.account_number)
        .collect();

    let lazy = paginator(accounts(24), 7)
        .filter(|a| ready(a.trust >= 5.0 && a.trust < 18.0))
        .map(|a| async move { a.account_number })
        .flatten()
        .await
        .unwrap();

    assert_eq!(lazy.len(), 13);
    assert_eq!(lazy, eager);
}

#[tokio::test]
async fn test_find_stops_at_first_match() {
    let source = accounts(24);
    let mut iter = paginator(source.clone(), 10);

    let found = iter.find(|a| ready(a.trust == 3.0)).await.unwrap();
    assert_eq!(found.unwrap().account_number, number(3));
    assert_eq!(source.calls(), 1);

    assert!(iter.find(|a| ready(a.trust > 100.0)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_fetch_resumes_without_loss() {
    let source = accounts(24);
    let mut iter = paginator(source.clone(), 10);

    let mut seen = Vec::new();
    for _ in 0..10 {
        seen.push(iter.next().await.unwrap().account_number);
    }

    source.fail_next(1);
    let err = iter.next().await.unwrap_err();
    assert!(matches!(err, TnbError::Transport(_)));
    assert!(err.is_retryable());
    assert_eq!(iter.offset(), 10);
    assert_eq!(iter.buffered(), 0);
    assert!(!iter.is_exhausted());

    seen.extend(
        iter.flatten()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.account_number),
    );

    let expected: Vec<String> = (0..24).map(number).collect();
    assert_eq!(seen, expected);
    assert_eq!(source.offsets(), vec![0, 10, 10, 20]);
}

#[tokio::test]
async fn test_empty_endpoint() {
    let source = accounts(0);
    let mut iter = paginator(source.clone(), 10);

    assert!(iter.next().await.unwrap_err().is_iterator_empty());
    assert!(iter.next().await.unwrap_err().is_iterator_empty());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_limit_caps_total_items() {
    let source = accounts(24);
    let request = PageRequest::new("accounts", AccountOrder::default())
        .with_page_limit(10)
        .with_limit(Some(15));
    let mut iter: Paginator<Account> = Paginator::new(source.clone(), request);

    let items = iter.flatten().await.unwrap();
    assert_eq!(items.len(), 15);
    assert_eq!(items[14].account_number, number(14));
    assert_eq!(source.offsets(), vec![0, 10]);
}

#[tokio::test]
async fn test_short_page_with_next_link_continues() {
    let source = Arc::new(
        MockPageSource::new((0..24).map(account_json).collect()).with_max_page_size(3),
    );
    let items = paginator(source.clone(), 10).flatten().await.unwrap();

    assert_eq!(items.len(), 24);
    assert_eq!(source.calls(), 8);
}

#[tokio::test]
async fn test_missing_next_link_ends_iteration() {
    let source =
        Arc::new(MockPageSource::new((0..24).map(account_json).collect()).without_next_links());
    let items = paginator(source.clone(), 10).flatten().await.unwrap();

    assert_eq!(items.len(), 10);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_undecodable_page_leaves_state_unchanged() {
    let source = Arc::new(MockPageSource::new(vec![account_json(0), json!({"id": 1})]));
    let mut iter = paginator(source.clone(), 10);

    let err = iter.next().await.unwrap_err();
    assert!(matches!(err, TnbError::Validation(_)));
    assert_eq!(iter.offset(), 0);
    assert_eq!(iter.buffered(), 0);
    assert!(!iter.is_exhausted());
}

#[tokio::test]
async fn test_validator_rejects_forged_block() {
    let sender = test_keypair(7);
    let mut items: Vec<Value> = (0..4)
        .map(|i| signed_block_json(&sender, i).unwrap())
        .collect();
    items[2]["message"]["txs"][0]["amount"] = json!(1_000_000);
    items.push(unsigned_block_json(4));

    let source = Arc::new(MockPageSource::new(items));
    let request = PageRequest::new("blocks", BlockOrder::default()).with_page_limit(3);
    let mut iter: Paginator<Block> = Paginator::new(source, request).with_validator(|block: &Block| {
        if block.is_verifiable() {
            block.verify_signature()
        } else {
            Ok(())
        }
    });

    assert_eq!(iter.next().await.unwrap().id, "b-0");
    assert_eq!(iter.next().await.unwrap().id, "b-1");
    let err = iter.next().await.unwrap_err();
    assert!(matches!(err, TnbError::SignatureVerifyFailed(_)));
    assert!(!err.is_retryable());
    assert_eq!(iter.next().await.unwrap().id, "b-3");
    assert_eq!(iter.next().await.unwrap().id, "b-4");
    assert!(iter.next().await.unwrap_err().is_iterator_empty());
}

#[tokio::test]
async fn test_independent_iterators_share_a_source() {
    let source = accounts(24);
    let mut a = paginator(source.clone(), 5);
    let mut b = paginator(source.clone(), 8);

    let (a, b) = tokio::join!(a.flatten(), b.flatten());
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.calls(), 5 + 3);
}

/// Sleeps on its first call so the caller can drop the future mid-fetch.
struct SlowOnce {
    inner: MockPageSource,
    slept: AtomicBool,
}

#[async_trait]
impl PageSource for SlowOnce {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>> {
        if !self.slept.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        self.inner.fetch_page(request).await
    }
}

#[tokio::test]
async fn test_cancelled_fetch_leaves_state_unchanged() {
    let source = Arc::new(SlowOnce {
        inner: MockPageSource::new((0..3).map(account_json).collect()),
        slept: AtomicBool::new(false),
    });
    let request = PageRequest::new("accounts", AccountOrder::default());
    let mut iter: Paginator<Account> = Paginator::new(source, request);

    let timed_out = tokio::time::timeout(Duration::from_millis(20), iter.next()).await;
    assert!(timed_out.is_err());
    assert_eq!(iter.offset(), 0);
    assert_eq!(iter.buffered(), 0);
    assert!(!iter.is_exhausted());

    assert_eq!(iter.flatten().await.unwrap().len(), 3);
}

/// Serves every item in one page, whatever size was asked for.
struct IgnoresPageSize {
    items: Vec<Value>,
}

#[async_trait]
impl PageSource for IgnoresPageSize {
    async fn fetch_page(&self, _request: &PageRequest) -> Result<Page<Value>> {
        Ok(Page {
            count: self.items.len() as u64,
            next: None,
            previous: None,
            results: self.items.clone(),
        })
    }
}

#[tokio::test]
async fn test_oversized_final_page_is_yielded_in_full() {
    let source = Arc::new(IgnoresPageSize {
        items: (0..10).map(account_json).collect(),
    });
    let request = PageRequest::new("accounts", AccountOrder::default()).with_page_limit(5);
    let mut iter: Paginator<Account> = Paginator::new(source, request);

    let items = iter.flatten().await.unwrap();
    let numbers: Vec<String> = items.into_iter().map(|a| a.account_number).collect();
    assert_eq!(numbers, (0..10).map(number).collect::<Vec<_>>());
    assert_eq!(iter.offset(), 10);
    assert!(iter.is_exhausted());
}

#[tokio::test]
async fn test_oversized_page_still_honours_limit() {
    let source = Arc::new(IgnoresPageSize {
        items: (0..10).map(account_json).collect(),
    });
    let request = PageRequest::new("accounts", AccountOrder::default())
        .with_page_limit(5)
        .with_limit(Some(4));
    let mut iter: Paginator<Account> = Paginator::new(source, request);

    let items = iter.flatten().await.unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[3].account_number, number(3));
}
