use async_trait::async_trait;

use super::types::ResultRecord;
use super::Category;

/// Default smart-search endpoint (KOSHA proxy)
pub const DEFAULT_ENDPOINT: &str = "https://kosha-proxy.vercel.app/api/proxy";

/// Source of per-category search results.
///
/// Implementations fail soft: any failure is reported as an empty list so a
/// single category can never abort a multi-category search.
#[async_trait]
pub trait CategoryFetcher: Send + Sync {
    /// Search one category for `keyword`
    async fn fetch(&self, keyword: &str, category: Category) -> Vec<ResultRecord>;
}

/// Extra query parameters understood by the proxy endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOptions {
    /// Upper bound on pages the proxy walks (`maxPage`); shrinks with `numOfRows`
    pub max_page: u32,
    /// Strip heavy fields from each item (`lightMode`)
    pub light_mode: bool,
    /// Let the proxy drop duplicate documents (`dedup`)
    pub dedup: bool,
    /// Proxy failure policy (`onError`)
    pub on_error: String,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            max_page: 5,
            light_mode: true,
            dedup: true,
            on_error: "fallback".to_string(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service key; `None` disables every request
    pub api_key: Option<String>,
    /// Search endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Maximum number of requests per fetch
    pub max_attempts: u32,
    /// Pause before retrying with a smaller page (milliseconds)
    pub retry_backoff_ms: u64,
    /// Starting `numOfRows`
    pub page_size: u32,
    /// User agent string
    pub user_agent: String,
    /// Proxy-only parameters, omitted when `None`
    pub proxy: Option<ProxyOptions>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: 20,
            max_attempts: 3,
            retry_backoff_ms: 1000,
            page_size: 7,
            user_agent: format!("kosha-cli/{}", env!("CARGO_PKG_VERSION")),
            proxy: Some(ProxyOptions::default()),
        }
    }
}

impl ClientConfig {
    /// Service key, treating a blank string as missing
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
