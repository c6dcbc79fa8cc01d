//! Client configuration.
//!
//! # Environment Variables
//!
//! [`ClientConfig::from_env`] reads:
//! - `TNB_BANK_ADDRESS` - bank host, `host:port`, or full URL (required)
//! - `TNB_USE_HTTPS` - `1`/`true` to use HTTPS when the address has no scheme
//! - `TNB_TIMEOUT` - request timeout in seconds
//! - `TNB_PAGE_LIMIT` - items requested per page
//!
//! Values that fail to parse are ignored and the default is kept.

use serde::{Deserialize, Serialize};

use crate::{Result, TnbError};

/// Connection settings for a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node address: a host, `host:port`, or a full `http(s)://` URL.
    pub address: String,

    /// Use HTTPS when `address` carries no scheme.
    #[serde(default)]
    pub use_https: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Items requested per page by list endpoints.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// User agent override.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Proxy URL for all requests.
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_page_limit() -> usize {
    crate::pagination::DEFAULT_PAGE_LIMIT
}

impl ClientConfig {
    /// Create a configuration for the node at `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            use_https: false,
            timeout_secs: default_timeout(),
            page_limit: default_page_limit(),
            user_agent: None,
            proxy: None,
        }
    }

    /// Load from `TNB_*` environment variables.
    ///
    /// Returns `None` when `TNB_BANK_ADDRESS` is not set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup("TNB_BANK_ADDRESS").filter(|a| !a.trim().is_empty())?;
        let mut config = Self::new(address.trim());

        if let Some(https) = lookup("TNB_USE_HTTPS") {
            config.use_https = matches!(
                https.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        if let Some(timeout) = lookup("TNB_TIMEOUT").and_then(|t| t.trim().parse().ok()) {
            config.timeout_secs = timeout;
        }
        if let Some(limit) = lookup("TNB_PAGE_LIMIT").and_then(|l| l.trim().parse().ok()) {
            config.page_limit = limit;
        }

        Some(config)
    }

    /// Use HTTPS.
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the page size for list endpoints.
    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Base URL with scheme and no trailing slash.
    pub fn base_url(&self) -> String {
        let address = self.address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else if self.use_https {
            format!("https://{}", address)
        } else {
            format!("http://{}", address)
        }
    }

    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(TnbError::Config("node address is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(TnbError::Config("timeout must be at least one second".into()));
        }
        if self.page_limit == 0 {
            return Err(TnbError::Config("page limit must be positive".into()));
        }
        Ok(())
    }
}
