//! Async wrapper around [`PriceHistorySdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free. The
//! network fetch of a search runs without holding the SDK lock, so several
//! searches may be in flight at once; only the most recently started one
//! updates the display.
//!
//! # Example
//!
//! ```no_run
//! use eve_price_history::{AsyncPriceHistorySdk, PriceHistorySdk};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncPriceHistorySdk::build(PriceHistorySdk::builder()).await.unwrap();
//!     sdk.search("PLEX").await.unwrap();
//!     let title = sdk.run(|s| Ok(s.title_bar().to_string())).await.unwrap();
//!     println!("{title}");
//!     sdk.close().await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{PriceError, Result};
use crate::{LoadOutcome, PriceHistorySdk, PriceHistorySdkBuilder, PriceSource};

fn lock(sdk: &Mutex<PriceHistorySdk>) -> Result<MutexGuard<'_, PriceHistorySdk>> {
    sdk.lock()
        .map_err(|_| PriceError::InvalidArgument("SDK lock poisoned".into()))
}

fn join_error(e: tokio::task::JoinError) -> PriceError {
    PriceError::InvalidArgument(format!("Task join error: {e}"))
}

/// Async wrapper around [`PriceHistorySdk`].
///
/// Cheap to clone; clones share the same dashboard.
#[derive(Clone)]
pub struct AsyncPriceHistorySdk {
    inner: Arc<Mutex<PriceHistorySdk>>,
    source: Arc<dyn PriceSource>,
}

impl AsyncPriceHistorySdk {
    /// Build the SDK from a configured builder.
    ///
    /// Construction runs on the blocking thread pool since it opens the cache
    /// store and creates a blocking HTTP client.
    pub async fn build(builder: PriceHistorySdkBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let sdk = builder.build()?;
            Ok(Self::from_sdk(sdk))
        })
        .await
        .map_err(join_error)?
    }

    /// Wrap an already built SDK.
    pub fn from_sdk(sdk: PriceHistorySdk) -> Self {
        let source = sdk.source();
        Self {
            inner: Arc::new(Mutex::new(sdk)),
            source,
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PriceHistorySdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&sdk)?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }

    /// Search for `query` as typed by the user. See [`PriceHistorySdk::search`].
    pub async fn search(&self, query: &str) -> Result<Option<LoadOutcome>> {
        let name = query.trim().to_string();
        if name.is_empty() {
            return Ok(None);
        }
        self.load(&name).await.map(Some)
    }

    /// Load `name`, fetching outside the SDK lock.
    pub async fn load(&self, name: &str) -> Result<LoadOutcome> {
        let sdk = self.inner.clone();
        let source = self.source.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let (ticket, cached) = {
                let mut guard = lock(&sdk)?;
                let ticket = guard.begin_request(&name);
                (ticket, guard.cached(&name))
            };

            let from_cache = cached.is_some();
            let result = match cached {
                Some(records) => Ok(records),
                None => source.fetch_price_history(&name),
            };

            let mut guard = lock(&sdk)?;
            if let (false, Ok(records)) = (from_cache, &result) {
                guard.remember(&name, records);
            }
            guard.complete(ticket, result)
        })
        .await
        .map_err(join_error)?
    }

    /// Close the SDK, releasing the HTTP client off the async thread.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self);
            Ok(())
        })
        .await
        .map_err(join_error)?
    }
}
