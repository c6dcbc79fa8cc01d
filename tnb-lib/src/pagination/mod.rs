//! Async iteration over paginated list endpoints.
//!
//! [`PaginatedIterator`] is the consumer-facing trait. [`Paginator`] drives a
//! [`PageSource`] one page at a time; [`Map`] and [`Filter`] are lazy adapters
//! that wrap any iterator by value.
//!
//! ```rust,ignore
//! use std::future::ready;
//! use tnb_lib::pagination::{PageRequest, PaginatedIterator, Paginator};
//! use tnb_lib::ordering::AccountOrder;
//!
//! let request = PageRequest::new("accounts", AccountOrder::TrustDesc).with_page_limit(50);
//! let trusted: Vec<String> = Paginator::<Account>::new(source, request)
//!     .filter(|account| ready(account.trust > 1.0))
//!     .map(|account| ready(account.account_number))
//!     .flatten()
//!     .await?;
//! ```

mod paginator;

pub use paginator::{PageRequest, PageSource, Paginator, Validator, DEFAULT_PAGE_LIMIT};

use std::future::Future;

use async_trait::async_trait;

use crate::{Result, TnbError};

/// An async, single-consumer sequence of items backed by remote pages.
///
/// `next` yields [`TnbError::IteratorEmpty`] once the sequence is finished,
/// and keeps yielding it on every later call.
#[async_trait]
pub trait PaginatedIterator: Send {
    /// The yielded item type.
    type Item: Send;

    /// Advance the iterator.
    async fn next(&mut self) -> Result<Self::Item>;

    /// Return the first item for which `predicate` resolves to true.
    ///
    /// Reaching the end yields `Ok(None)`. Other errors propagate, and items
    /// consumed before the error are gone.
    async fn find<P, Fut>(&mut self, mut predicate: P) -> Result<Option<Self::Item>>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        loop {
            match self.next().await {
                Ok(item) => {
                    if predicate(&item).await {
                        return Ok(Some(item));
                    }
                }
                Err(TnbError::IteratorEmpty) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }

    /// Drain every remaining item, in order.
    async fn flatten(&mut self) -> Result<Vec<Self::Item>> {
        let mut items = Vec::new();
        loop {
            match self.next().await {
                Ok(item) => items.push(item),
                Err(TnbError::IteratorEmpty) => return Ok(items),
                Err(e) => return Err(e),
            }
        }
    }

    /// Lazily transform every item with an async function.
    fn map<F, Fut, R>(self, func: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Fut + Send,
        Fut: Future<Output = R> + Send,
        R: Send,
    {
        Map { inner: self, func }
    }

    /// Lazily skip items for which `predicate` resolves to false.
    fn filter<P, Fut>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = bool> + Send,
    {
        Filter {
            inner: self,
            predicate,
        }
    }
}

/// Iterator returned by [`PaginatedIterator::map`].
#[must_use = "iterator adapters are lazy and do nothing unless advanced"]
pub struct Map<I, F> {
    inner: I,
    func: F,
}

impl<I, F> Map<I, F> {
    /// Unwrap the upstream iterator.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

#[async_trait]
impl<I, F, Fut, R> PaginatedIterator for Map<I, F>
where
    I: PaginatedIterator,
    F: FnMut(I::Item) -> Fut + Send,
    Fut: Future<Output = R> + Send,
    R: Send,
{
    type Item = R;

    async fn next(&mut self) -> Result<R> {
        let item = self.inner.next().await?;
        Ok((self.func)(item).await)
    }
}

/// Iterator returned by [`PaginatedIterator::filter`].
#[must_use = "iterator adapters are lazy and do nothing unless advanced"]
pub struct Filter<I, P> {
    inner: I,
    predicate: P,
}

impl<I, P> Filter<I, P> {
    /// Unwrap the upstream iterator.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

#[async_trait]
impl<I, P, Fut> PaginatedIterator for Filter<I, P>
where
    I: PaginatedIterator,
    P: FnMut(&I::Item) -> Fut + Send,
    Fut: Future<Output = bool> + Send,
{
    type Item = I::Item;

    async fn next(&mut self) -> Result<I::Item> {
        loop {
            let item = self.inner.next().await?;
            if (self.predicate)(&item).await {
                return Ok(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::ready;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        items: VecDeque<u32>,
        fail_at: Option<u32>,
    }

    impl Counting {
        fn new(n: u32) -> Self {
            Self {
                items: (0..n).collect(),
                fail_at: None,
            }
        }
    }

    #[async_trait]
    impl PaginatedIterator for Counting {
        type Item = u32;

        async fn next(&mut self) -> Result<u32> {
            match self.items.pop_front() {
                Some(n) if Some(n) == self.fail_at => Err(TnbError::Transport("boom".into())),
                Some(n) => Ok(n),
                None => Err(TnbError::IteratorEmpty),
            }
        }
    }

    #[tokio::test]
    async fn test_find_first_match() {
        let mut iter = Counting::new(10);
        let found = iter.find(|n| ready(*n > 3 && n % 2 == 1)).await.unwrap();
        assert_eq!(found, Some(5));
        assert_eq!(iter.next().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_find_swallows_empty() {
        let mut iter = Counting::new(3);
        assert_eq!(iter.find(|n| ready(*n > 100)).await.unwrap(), None);
        assert!(iter.next().await.unwrap_err().is_iterator_empty());
    }

    #[tokio::test]
    async fn test_find_propagates_other_errors() {
        let mut iter = Counting::new(10);
        iter.fail_at = Some(2);
        let err = iter.find(|n| ready(*n == 8)).await.unwrap_err();
        assert!(matches!(err, TnbError::Transport(_)));
    }

    #[tokio::test]
    async fn test_map_and_filter_are_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut iter = Counting::new(10)
            .filter(|n| ready(n % 3 == 0))
            .map(move |n| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { n * 10 }
            });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(iter.next().await.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(iter.flatten().await.unwrap(), vec![30, 60, 90]);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(iter.next().await.unwrap_err().is_iterator_empty());
    }

    #[tokio::test]
    async fn test_flatten_on_empty() {
        let mut iter = Counting::new(0);
        assert!(iter.flatten().await.unwrap().is_empty());
    }
}
