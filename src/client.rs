//! HTTP client for the `/api/price_history` endpoint.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;

use crate::config;
use crate::error::{PriceError, Result};
use crate::models::PriceRecord;

/// Anything that can produce the price history of a named item.
///
/// Implemented by [`HttpPriceSource`] for the real backend; tests and hosts
/// can plug in their own.
pub trait PriceSource: Send + Sync {
    fn fetch_price_history(&self, name: &str) -> Result<Vec<PriceRecord>>;
}

/// Fetches price history from the backend with a single GET per call.
///
/// No retries are attempted; the only timeout is the one configured on the
/// underlying HTTP client.
pub struct HttpPriceSource {
    url: String,
    client: Client,
}

impl HttpPriceSource {
    /// Create a source for the backend rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            url: config::price_history_url(base_url),
            client,
        })
    }

    /// Full endpoint URL, without the query string.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PriceSource for HttpPriceSource {
    /// GET `{base}/api/price_history?name=<name>`.
    ///
    /// A non-success status, an empty array, `null` or an undecodable body is
    /// [`PriceError::NotFound`]; a transport failure is [`PriceError::Network`].
    fn fetch_price_history(&self, name: &str) -> Result<Vec<PriceRecord>> {
        if name.is_empty() {
            return Err(PriceError::InvalidArgument(
                "item name must not be empty".into(),
            ));
        }
        debug!("Fetching price history for '{}' from {}", name, self.url);

        let resp = self
            .client
            .get(&self.url)
            .query(&[("name", name)])
            .send()
            .map_err(|e| {
                warn!("Price history request for '{}' failed: {}", name, e);
                PriceError::Network(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Price history for '{}' returned HTTP {}", name, status);
            return Err(PriceError::NotFound(format!(
                "no price history for '{}' (HTTP {})",
                name, status
            )));
        }

        let data: Option<Vec<PriceRecord>> = resp.json().map_err(|e| {
            warn!("Unreadable price history for '{}': {}", name, e);
            if e.is_decode() {
                PriceError::NotFound(format!("no price history for '{}'", name))
            } else {
                PriceError::Network(e.to_string())
            }
        })?;

        match data {
            Some(records) if !records.is_empty() => {
                debug!("Received {} records for '{}'", records.len(), name);
                Ok(records)
            }
            _ => Err(PriceError::NotFound(format!(
                "no price history for '{}'",
                name
            ))),
        }
    }
}
