//! JSON-over-HTTP access to a node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::models::Page;
use crate::pagination::{PageRequest, PageSource};
use crate::{Result, TnbError};

/// User agent sent when the configuration does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("tnbkit/", env!("CARGO_PKG_VERSION"));

/// A `reqwest` client bound to one node.
pub struct HttpClient {
    config: ClientConfig,
    base_url: String,
    client: reqwest::Client,
    requests: AtomicU64,
}

impl HttpClient {
    /// Build a client for the node described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| TnbError::Config(format!("invalid proxy '{}': {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| TnbError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url(),
            config: config.clone(),
            client,
            requests: AtomicU64::new(0),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests sent so far, including failed ones.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.client.get(self.url(path)), "GET", path).await
    }

    /// GET `path` with query parameters and decode the JSON body.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        self.send(self.client.get(self.url(path)).query(query), "GET", path)
            .await
    }

    /// PATCH a JSON body to `path` and decode the JSON response.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, body)))]
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.patch(self.url(path)).json(body), "PATCH", path)
            .await
    }

    /// POST a JSON body to `path` and decode the JSON response.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, body)))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.post(self.url(path)).json(body), "POST", path)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<T> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let response = request
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, method, path))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e, method, path))?;

        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = status.as_u16(), method, path, "node returned an error");
            return Err(TnbError::from_status(status.as_u16(), error_message(&text)));
        }

        serde_json::from_str(&text).map_err(|e| {
            TnbError::validation(format!("{} {} returned an unexpected body: {}", method, path, e))
        })
    }

    fn map_reqwest_error(&self, e: reqwest::Error, method: &str, path: &str) -> TnbError {
        if e.is_timeout() {
            TnbError::ConnectionTimeout {
                operation: format!("{} {}", method, path),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            TnbError::ConnectionFailed {
                target: self.base_url.clone(),
                reason: e.to_string(),
            }
        } else {
            TnbError::Transport(format!("{} {} failed: {}", method, path, e))
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>> {
        self.get_query(&request.path, &request.query()).await
    }
}

// JSON error bodies are compacted; anything else is passed through as text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = HttpClient::new(&ClientConfig::new("bank.example/")).unwrap();
        assert_eq!(client.base_url(), "http://bank.example");
        assert_eq!(client.url("accounts"), "http://bank.example/accounts");
        assert_eq!(client.url("/config"), "http://bank.example/config");
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = HttpClient::new(&ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, TnbError::Config(_)));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message("{\"detail\": \"nope\"}"), r#"{"detail":"nope"}"#);
        assert_eq!(error_message("<html>down</html>\n"), "<html>down</html>");
        assert_eq!(error_message(""), "no response body");
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("tnbkit/"));
    }
}
