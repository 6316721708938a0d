//! Application configuration.
//!
//! Values are fixed at build time. `IMAGEHUB_API_URL` and
//! `IMAGEHUB_ASSET_URL` come from the environment or a `.env` file (see
//! `build.rs`); the rest are tunables.

use std::time::Duration;

use imagehub::{HubConfig, RetryPolicy};

/// API base path or URL.
///
/// The development server proxies `/api` to the backend.
pub const API_URL: &str = match option_env!("IMAGEHUB_API_URL") {
    Some(url) => url,
    None => imagehub::config::DEFAULT_API_URL,
};

/// Origin serving image files, when it differs from the API's.
pub const ASSET_URL: Option<&str> = option_env!("IMAGEHUB_ASSET_URL");

/// Application name shown in the header and the tab title.
pub const APP_NAME: &str = "Image Hub";

/// Results per search page.
pub const PAGE_SIZE: usize = 20;

/// Images in the related panel.
pub const RELATED_COUNT: usize = 6;

/// Upper bound on a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay before the one retry of a failed search.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Retries for search and related reads. Uploads never retry.
pub const MAX_RETRIES: u32 = 1;

/// Distance below the viewport at which the next page starts loading.
pub const SCROLL_ROOT_MARGIN: &str = "0px 0px 400px 0px";

/// Build the client configuration from the constants above.
pub fn hub_config() -> HubConfig {
    let mut config = HubConfig::new(API_URL);
    if let Some(asset_url) = ASSET_URL.filter(|url| !url.trim().is_empty()) {
        config = config.with_asset_url(asset_url);
    }
    config.page_size = PAGE_SIZE;
    config.related_count = RELATED_COUNT;
    config.request_timeout = REQUEST_TIMEOUT;
    config.retry = RetryPolicy {
        max_retries: MAX_RETRIES,
        backoff: RETRY_BACKOFF,
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_uses_tunables() {
        let config = hub_config();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.related_count, 6);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.backoff, Duration::from_millis(500));
    }
}
