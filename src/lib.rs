//! EVE market price history SDK for Rust.
//!
//! Fetches an item's daily price history from the `/api/price_history`
//! backend, memoizes responses locally for 30 minutes, reshapes the rows into
//! per-item series and produces an ECharts line chart option plus HTML
//! fragments for the title and info bars.
//!
//! # Quick start
//!
//! ```no_run
//! use eve_price_history::{JsonSurface, PriceHistorySdk};
//!
//! let surface = JsonSurface::new();
//! let mut sdk = PriceHistorySdk::builder()
//!     .base_url("http://127.0.0.1:5001")
//!     .surface(surface.clone())
//!     .build()
//!     .unwrap();
//!
//! sdk.search("  PLEX ").unwrap();
//! println!("{}", sdk.title_bar());
//! println!("{}", surface.option().unwrap());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod chart;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod format;
pub mod labels;
pub mod models;
pub mod reshape;
pub mod store;
pub mod summary;

#[cfg(feature = "async")]
pub use async_client::AsyncPriceHistorySdk;
pub use cache::{Clock, ManualClock, PriceCache, SystemClock, WriteOutcome};
pub use chart::{ChartOption, ChartRenderer, ChartSurface, JsonSurface};
pub use client::{HttpPriceSource, PriceSource};
pub use debounce::Debouncer;
pub use error::{ErrorKind, PriceError, Result};
pub use format::{format_price, truncate_date};
pub use labels::Labels;
pub use models::{ItemSeries, PriceRecord, PriceSummary, UnifiedAxis};
pub use reshape::reshape;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use summary::{render_info_bar, render_title_bar, ScaledDisplayRule, SCALED_DISPLAY_RULES};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// PriceHistorySdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceHistorySdk`] instance.
///
/// Use [`PriceHistorySdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceHistorySdkBuilder::build) to create the SDK.
pub struct PriceHistorySdkBuilder {
    base_url: String,
    cache_dir: Option<PathBuf>,
    cache_enabled: bool,
    timeout: Duration,
    labels: Labels,
    source: Option<Arc<dyn PriceSource>>,
    store: Option<Box<dyn KeyValueStore>>,
    clock: Option<Box<dyn Clock>>,
    surface: Option<Box<dyn ChartSurface>>,
}

impl Default for PriceHistorySdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            cache_enabled: true,
            timeout: config::HTTP_TIMEOUT,
            labels: Labels::default(),
            source: None,
            store: None,
            clock: None,
            surface: None,
        }
    }
}

impl PriceHistorySdkBuilder {
    /// Root URL of the backend serving `/api/price_history`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/eve-price-history` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable the response cache. Defaults to `true`.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Use `source` instead of the HTTP backend.
    pub fn source<S: PriceSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Back the cache with `store` instead of files under the cache directory.
    pub fn store<S: KeyValueStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Chart engine the options are handed to. Defaults to a [`JsonSurface`].
    pub fn surface<S: ChartSurface + 'static>(mut self, surface: S) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Build the SDK.
    ///
    /// Opens the cache store and purges expired entries, but does not fetch
    /// anything. A cache directory that cannot be opened disables the cache
    /// instead of failing the build.
    pub fn build(self) -> Result<PriceHistorySdk> {
        let source: Arc<dyn PriceSource> = match self.source {
            Some(source) => source,
            None => Arc::new(HttpPriceSource::new(&self.base_url, self.timeout)?),
        };

        let store: Option<Box<dyn KeyValueStore>> = match (self.cache_enabled, self.store) {
            (false, _) => None,
            (true, Some(store)) => Some(store),
            (true, None) => {
                let dir = self.cache_dir.unwrap_or_else(config::default_cache_dir);
                match FileStore::new(&dir) {
                    Ok(store) => Some(Box::new(store)),
                    Err(e) => {
                        warn!(
                            "Cache directory {} unusable, running without cache: {}",
                            dir.display(),
                            e
                        );
                        None
                    }
                }
            }
        };
        let mut cache = match store {
            Some(store) => {
                let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
                PriceCache::with_clock(store, clock)
            }
            None => PriceCache::disabled(),
        };
        cache.purge_expired();

        let surface = self
            .surface
            .unwrap_or_else(|| Box::new(JsonSurface::new()));

        Ok(PriceHistorySdk {
            source,
            cache,
            chart: ChartRenderer::new(surface, self.labels.clone()),
            labels: self.labels,
            title_bar: String::new(),
            info_bar: String::new(),
            loading: false,
            notifications: Vec::new(),
            last_issued: 0,
            resize: Debouncer::default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// Handle for one search, issued by [`PriceHistorySdk::begin_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub name: String,
}

/// What a completed search did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was drawn; `items` is the number of item series.
    Rendered { items: usize },
    /// A newer search was issued meanwhile, so this result was discarded.
    Superseded,
}

/// A user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: ErrorKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// PriceHistorySdk
// ---------------------------------------------------------------------------

/// The main entry point: owns the price source, the cache, the chart and
/// the title/info bar contents of one dashboard.
///
/// Created via [`PriceHistorySdk::builder()`].
pub struct PriceHistorySdk {
    source: Arc<dyn PriceSource>,
    cache: PriceCache,
    chart: ChartRenderer,
    labels: Labels,
    title_bar: String,
    info_bar: String,
    loading: bool,
    notifications: Vec<Notification>,
    last_issued: u64,
    resize: Debouncer,
}

impl PriceHistorySdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> PriceHistorySdkBuilder {
        PriceHistorySdkBuilder::default()
    }

    // -- Searching ---------------------------------------------------------

    /// Search for `query` as typed by the user.
    ///
    /// Surrounding whitespace is trimmed; an empty query does nothing and
    /// returns `Ok(None)`.
    pub fn search(&mut self, query: &str) -> Result<Option<LoadOutcome>> {
        let name = query.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.load(name).map(Some)
    }

    /// Load the item shown when the dashboard first opens.
    pub fn load_default(&mut self) -> Result<LoadOutcome> {
        self.load(config::DEFAULT_ITEM)
    }

    /// Load and display the price history of `name`, from the cache when a
    /// fresh entry exists.
    ///
    /// On failure the chart and both bars are cleared, one notification is
    /// queued and the error is returned.
    pub fn load(&mut self, name: &str) -> Result<LoadOutcome> {
        info!("Loading price chart for '{}'", name);
        let ticket = self.begin_request(name);
        let result = match self.cached(name) {
            Some(records) => Ok(records),
            None => {
                debug!("Fetching '{}' from the backend", name);
                let fetched = self.source.fetch_price_history(name);
                if let Ok(records) = &fetched {
                    self.remember(name, records);
                }
                fetched
            }
        };
        self.complete(ticket, result)
    }

    /// Start a search: marks the dashboard as loading and returns the ticket
    /// to pass to [`complete`](Self::complete).
    pub fn begin_request(&mut self, name: &str) -> RequestTicket {
        self.last_issued += 1;
        self.loading = true;
        RequestTicket {
            id: self.last_issued,
            name: name.to_string(),
        }
    }

    /// Fresh cached records for `name`, if any.
    pub fn cached(&mut self, name: &str) -> Option<Vec<PriceRecord>> {
        self.cache.get(name)
    }

    /// Store freshly fetched records for `name` in the cache.
    pub fn remember(&mut self, name: &str, records: &[PriceRecord]) -> WriteOutcome {
        self.cache.put(name, records)
    }

    /// Apply the result of the search identified by `ticket`.
    ///
    /// Only the most recently issued search updates the display; older ones
    /// return [`LoadOutcome::Superseded`] whatever their result.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<PriceRecord>>,
    ) -> Result<LoadOutcome> {
        if ticket.id < self.last_issued {
            debug!(
                "Discarding result of request #{} for '{}', #{} is newer",
                ticket.id, ticket.name, self.last_issued
            );
            return Ok(LoadOutcome::Superseded);
        }
        self.loading = false;

        let applied = result.and_then(|records| self.apply(&ticket.name, &records));
        match applied {
            Ok(items) => Ok(LoadOutcome::Rendered { items }),
            Err(e) => {
                error!("Failed to load price data for '{}': {}", ticket.name, e);
                self.clear_display();
                self.notifications.push(Notification {
                    kind: e.kind(),
                    message: e.user_message().to_string(),
                });
                Err(e)
            }
        }
    }

    fn apply(&mut self, name: &str, records: &[PriceRecord]) -> Result<usize> {
        let series = reshape(records);
        if series.is_empty() {
            return Err(PriceError::NotFound(format!(
                "no price history for '{}'",
                name
            )));
        }
        self.chart.render(&series)?;
        self.info_bar = render_info_bar(&series, &self.labels);
        self.title_bar = render_title_bar(&series, &self.labels);
        Ok(series.len())
    }

    fn clear_display(&mut self) {
        self.chart.clear();
        self.title_bar.clear();
        self.info_bar.clear();
    }

    // -- Display state -----------------------------------------------------

    /// True between [`begin_request`](Self::begin_request) and the completion
    /// of the newest request.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn title_bar(&self) -> &str {
        &self.title_bar
    }

    pub fn info_bar(&self) -> &str {
        &self.info_bar
    }

    pub fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    /// Series currently displayed.
    pub fn series(&self) -> &[ItemSeries] {
        self.chart.current()
    }

    /// Pending error notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Close the error dialog, returning what it showed.
    pub fn dismiss_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -- Resize ------------------------------------------------------------

    /// Report a window resize at `now`.
    pub fn notify_resize(&mut self, now: Instant) {
        self.resize.trigger(now);
    }

    /// Resize the chart once resize events have been quiet for the debounce
    /// delay. Returns `true` when the chart was resized.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        let fire = self.resize.poll(now);
        if fire {
            self.chart.resize();
        }
        fire
    }

    // -- Cache -------------------------------------------------------------

    /// Remove expired cache entries, returning how many were removed.
    pub fn purge_expired_cache(&mut self) -> usize {
        self.cache.purge_expired()
    }

    /// Remove every cache entry.
    pub fn clear_cache(&mut self) -> usize {
        self.cache.clear()
    }

    /// The price source used for cache misses.
    pub fn source(&self) -> Arc<dyn PriceSource> {
        Arc::clone(&self.source)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceHistorySdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .series()
            .iter()
            .map(|s| s.item_name.as_str())
            .collect();
        write!(
            f,
            "PriceHistorySdk(items=[{}], loading={}, cache={})",
            names.join(", "),
            self.loading,
            if self.cache.is_enabled() { "on" } else { "off" }
        )
    }
}
