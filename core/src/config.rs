//! Client configuration.
//!
//! The frontend fills a [`HubConfig`] from build-time values; everything
//! here is plain data so it can be tested without a browser.

use std::time::Duration;

/// Default API base path (proxied to the backend in development).
pub const DEFAULT_API_URL: &str = "/api";

/// Results per search page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Neighbours shown in the related-images panel.
pub const DEFAULT_RELATED_COUNT: usize = 6;

/// Upper bound on a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay before the single retry of a transient search failure.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Retry policy for read requests.
///
/// Uploads never retry; searches retry at most `max_retries` times, and only
/// for errors classified as transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        backoff: Duration::ZERO,
    };

    /// Delay before retry number `attempt` (1-based), doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }

    /// Whether a failed attempt (0-based count of retries already made)
    /// should be retried.
    pub fn should_retry(&self, retries_done: u32, error: &crate::ApiError) -> bool {
        retries_done < self.max_retries && error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Everything the client needs to reach the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct HubConfig {
    /// Base path or URL of the API, without trailing slash
    pub api_url: String,
    /// Origin that serves relative image URLs, without trailing slash
    pub asset_url: String,
    pub page_size: usize,
    pub related_count: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Headers sent with every request
    pub default_headers: Vec<(String, String)>,
}

impl HubConfig {
    /// Build a config for an API base. The asset origin defaults to the
    /// origin part of `api_url` (empty for a relative path).
    pub fn new(api_url: &str) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        let asset_url = origin_of(&api_url).to_string();
        Self {
            api_url,
            asset_url,
            page_size: DEFAULT_PAGE_SIZE,
            related_count: DEFAULT_RELATED_COUNT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            default_headers: vec![("Accept".to_string(), "application/json".to_string())],
        }
    }

    /// Override the asset origin.
    pub fn with_asset_url(mut self, asset_url: &str) -> Self {
        self.asset_url = asset_url.trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL for an API path such as `/search/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Resolve a record's display URL against the asset origin.
    pub fn asset(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return url.to_string();
        }
        format!("{}/{}", self.asset_url, url.trim_start_matches('/'))
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// `scheme://host[:port]` of an absolute URL, or `""` for a relative one.
fn origin_of(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return "";
    };
    let rest = &url[scheme_end + 3..];
    match rest.find('/') {
        Some(path_start) => &url[..scheme_end + 3 + path_start],
        None => url,
    }
}
