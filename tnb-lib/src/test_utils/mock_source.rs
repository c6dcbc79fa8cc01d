//! In-memory page source.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::Page;
use crate::pagination::{PageRequest, PageSource};
use crate::{Result, TnbError};

#[derive(Debug, Default)]
struct State {
    offsets: Vec<usize>,
    fail_remaining: usize,
}

/// Serves slices of a fixed item list by offset, like a list endpoint.
#[derive(Debug)]
pub struct MockPageSource {
    items: Vec<Value>,
    max_page_size: Option<usize>,
    report_next: bool,
    state: Mutex<State>,
}

impl MockPageSource {
    /// Serve `items` in order.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            max_page_size: None,
            report_next: true,
            state: Mutex::new(State::default()),
        }
    }

    /// Never return more than `max` items per page, whatever was asked for.
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max);
        self
    }

    /// Always report `next: null`, even when more items remain.
    pub fn without_next_links(mut self) -> Self {
        self.report_next = false;
        self
    }

    /// Fail the next `count` fetches with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().unwrap().fail_remaining = count;
    }

    /// Offsets of every fetch so far, failed ones included.
    pub fn offsets(&self) -> Vec<usize> {
        self.state.lock().unwrap().offsets.clone()
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().offsets.len()
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>> {
        {
            let mut state = self.state.lock().unwrap();
            state.offsets.push(request.offset);
            if state.fail_remaining > 0 {
                state.fail_remaining -= 1;
                return Err(TnbError::Transport(format!(
                    "scripted failure at offset {}",
                    request.offset
                )));
            }
        }

        let mut size = request.page_size();
        if let Some(max) = self.max_page_size {
            size = size.min(max);
        }

        let start = request.offset.min(self.items.len());
        let end = (start + size).min(self.items.len());
        let next = (self.report_next && end < self.items.len()).then(|| {
            format!(
                "http://mock/{}?limit={}&offset={}",
                request.path, size, end
            )
        });
        let previous = (start > 0).then(|| {
            format!(
                "http://mock/{}?limit={}&offset={}",
                request.path,
                size,
                start.saturating_sub(size)
            )
        });

        Ok(Page {
            count: self.items.len() as u64,
            next,
            previous,
            results: self.items[start..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::AccountOrder;
    use serde_json::json;

    #[tokio::test]
    async fn test_serves_slices() {
        let source = MockPageSource::new((0..5).map(|i| json!(i)).collect());
        let request = PageRequest::new("n", AccountOrder::default())
            .with_page_limit(2)
            .with_offset(4);

        let page = source.fetch_page(&request).await.unwrap();
        assert_eq!(page.results, vec![json!(4)]);
        assert!(page.next.is_none());
        assert_eq!(page.count, 5);
        assert_eq!(source.offsets(), vec![4]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let source = MockPageSource::new(vec![json!(1)]);
        source.fail_next(1);
        let request = PageRequest::new("n", AccountOrder::default());

        assert!(source.fetch_page(&request).await.is_err());
        assert!(source.fetch_page(&request).await.is_ok());
        assert_eq!(source.calls(), 2);
    }
}
