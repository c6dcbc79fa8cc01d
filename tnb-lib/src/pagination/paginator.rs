use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::PaginatedIterator;
use crate::models::Page;
use crate::ordering::Ordering;
use crate::{Result, TnbError};

/// Page size used when the caller does not set one.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Per-item check run before an item is handed out.
pub type Validator<T> = Arc<dyn Fn(&T) -> Result<()> + Send + Sync>;

/// Query state for one list endpoint.
///
/// Only a [`Paginator`] advances `offset` and `limit`, and only after a page
/// has been received and decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint path relative to the node base URL, e.g. `"accounts"`.
    pub path: String,
    /// Wire value of the ordering criterion.
    pub ordering: &'static str,
    /// Maximum number of items requested per page.
    pub page_limit: usize,
    /// Offset of the next page to fetch.
    pub offset: usize,
    /// Items still allowed before the iterator stops, if capped.
    pub limit: Option<usize>,
    /// Extra query filters, sent verbatim.
    pub filters: Vec<(String, String)>,
}

impl PageRequest {
    /// A request for `path` starting at offset zero.
    pub fn new(path: impl Into<String>, ordering: impl Ordering) -> Self {
        Self {
            path: path.into(),
            ordering: ordering.as_query(),
            page_limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            limit: None,
            filters: Vec::new(),
        }
    }

    /// Set the per-page size. Zero is treated as one.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// Start at `offset` instead of zero.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Stop after `limit` items in total.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Add a query filter such as `("sender", "<account number>")`.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Number of items the next fetch asks for.
    pub fn page_size(&self) -> usize {
        match self.limit {
            Some(remaining) => remaining.min(self.page_limit),
            None => self.page_limit,
        }
    }

    /// Query parameters for the next fetch.
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("offset".to_string(), self.offset.to_string()),
            ("limit".to_string(), self.page_size().to_string()),
            ("ordering".to_string(), self.ordering.to_string()),
        ];
        query.extend(self.filters.iter().cloned());
        query
    }
}

/// Something that can serve one page of a list endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page described by `request`.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>>;
}

/// A [`PaginatedIterator`] that pulls pages from a [`PageSource`] on demand.
///
/// Buffered items are handed out without touching the network. When the
/// buffer runs dry a single page is fetched, decoded in full, and only then
/// committed; a failed or cancelled fetch leaves the iterator unchanged.
pub struct Paginator<T> {
    source: Arc<dyn PageSource>,
    request: PageRequest,
    buffer: VecDeque<T>,
    exhausted: bool,
    validator: Option<Validator<T>>,
}

impl<T> Paginator<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Create an idle iterator. Nothing is fetched until the first `next`.
    pub fn new(source: Arc<dyn PageSource>, request: PageRequest) -> Self {
        Self {
            source,
            request,
            buffer: VecDeque::new(),
            exhausted: false,
            validator: None,
        }
    }

    /// Run `validator` on every item before it is yielded.
    ///
    /// An item that fails is consumed and its error returned from `next`.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&T) -> Result<()> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Whether the remote sequence has ended. Buffered items may remain.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Offset of the next page to fetch.
    pub fn offset(&self) -> usize {
        self.request.offset
    }

    /// Number of decoded items waiting in the buffer.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Current request state.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    fn yield_item(&self, item: T) -> Result<T> {
        if let Some(validator) = &self.validator {
            validator(&item)?;
        }
        Ok(item)
    }

    async fn fill(&mut self) -> Result<()> {
        if self.request.limit == Some(0) {
            self.exhausted = true;
            return Ok(());
        }

        let page = self.source.fetch_page(&self.request).await?;

        let mut items = page
            .results
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                TnbError::validation(format!(
                    "{} page at offset {} did not decode: {}",
                    self.request.path, self.request.offset, e
                ))
            })?;
        // Nodes may ignore the page size; keep the whole page unless capped.
        if let Some(remaining) = self.request.limit {
            items.truncate(remaining);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %self.request.path,
            offset = self.request.offset,
            items = items.len(),
            "fetched page"
        );

        let received = items.len();
        self.request.offset += received;
        if let Some(remaining) = self.request.limit.as_mut() {
            *remaining -= received;
        }
        if received == 0 || page.next.is_none() || self.request.limit == Some(0) {
            self.exhausted = true;
        }
        self.buffer.extend(items);

        Ok(())
    }
}

#[async_trait]
impl<T> PaginatedIterator for Paginator<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn next(&mut self) -> Result<T> {
        if let Some(item) = self.buffer.pop_front() {
            return self.yield_item(item);
        }

        if !self.exhausted {
            self.fill().await?;
            if let Some(item) = self.buffer.pop_front() {
                return self.yield_item(item);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(path = %self.request.path, "paginator exhausted");
        Err(TnbError::IteratorEmpty)
    }
}

impl<T> fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("request", &self.request)
            .field("buffered", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::{AccountOrder, BlockOrder};

    #[test]
    fn test_query_parameters() {
        let request = PageRequest::new("blocks", BlockOrder::CreatedDesc)
            .with_page_limit(50)
            .with_offset(20)
            .with_filter("sender", "abc");

        assert_eq!(
            request.query(),
            vec![
                ("offset".to_string(), "20".to_string()),
                ("limit".to_string(), "50".to_string()),
                ("ordering".to_string(), "-created_date".to_string()),
                ("sender".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_size_respects_cap() {
        let request = PageRequest::new("accounts", AccountOrder::default())
            .with_page_limit(10)
            .with_limit(Some(4));
        assert_eq!(request.page_size(), 4);

        let request = request.with_limit(None).with_page_limit(0);
        assert_eq!(request.page_size(), 1);
    }
}
