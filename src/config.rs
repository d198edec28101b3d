use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
pub const PRICE_HISTORY_PATH: &str = "/api/price_history";

/// Item loaded when the dashboard starts without an explicit query.
pub const DEFAULT_ITEM: &str = "伊甸币";

/// Namespace prefix for every cache key written to the local store.
pub const CACHE_PREFIX: &str = "eve_price_cache_";
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// Large-series hints forwarded to the chart engine.
pub const SAMPLING: &str = "lttb";
pub const PROGRESSIVE: u32 = 1000;
pub const PROGRESSIVE_THRESHOLD: u32 = 5000;
/// Upper bound on the number of x-axis labels drawn.
pub const MAX_AXIS_LABELS: usize = 20;

pub fn price_history_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PRICE_HISTORY_PATH)
}

pub fn cache_key(name: &str) -> String {
    format!("{}{}", CACHE_PREFIX, name)
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("eve-price-history")
    } else {
        PathBuf::from(".eve-price-history-cache")
    }
}
