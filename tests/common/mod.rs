//! Shared test fixtures for the price history SDK integration tests.
//!
//! Provides record builders, `StubSource`, an in-memory price source that
//! counts how often it is called, and `BrokenStore`, a key-value store whose
//! operations fail.

#![allow(dead_code)]

use eve_price_history::{KeyValueStore, PriceError, PriceRecord, PriceSource, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One daily row for `name`.
pub fn record(name: &str, date: &str, highest: f64, lowest: f64) -> PriceRecord {
    serde_json::from_value(serde_json::json!({
        "item_name": name,
        "date": date,
        "highest": highest,
        "lowest": lowest,
        "average": (highest + lowest) / 2.0,
        "volume": 100,
        "order_count": 10,
        "icon_url": format!("https://images.evetech.net/types/{}/icon", name.len()),
        "max_buy_price": lowest,
        "min_sell_price": highest,
        "middle_price": (highest + lowest) / 2.0
    }))
    .unwrap()
}

/// Attach set prices to `record`.
pub fn with_set(mut record: PriceRecord, buy: f64, sell: f64, middle: f64) -> PriceRecord {
    record.max_buy_price_set = Some(buy);
    record.min_sell_price_set = Some(sell);
    record.middle_price_set = Some(middle);
    record.unit = Some("一套".to_string());
    record
}

/// Two items with three overlapping dates each; item A carries set prices.
///
/// A: 01-01, 01-02, 01-03; B: 01-02, 01-03, 01-04.
pub fn set_result() -> Vec<PriceRecord> {
    vec![
        with_set(record("A", "2024-01-01", 10.0, 8.0), 1000.0, 2000.0, 1500.0),
        with_set(record("A", "2024-01-02", 11.0, 9.0), 1000.0, 2000.0, 1500.0),
        with_set(record("A", "2024-01-03", 12.0, 10.0), 1000.0, 2000.0, 1500.0),
        record("B", "2024-01-04", 23.0, 21.0),
        record("B", "2024-01-02", 21.0, 19.0),
        record("B", "2024-01-03", 22.0, 20.0),
    ]
}

/// Price source serving canned responses; unknown names are not found.
#[derive(Clone, Default)]
pub struct StubSource {
    responses: Arc<HashMap<String, Vec<PriceRecord>>>,
    delays: Arc<HashMap<String, Duration>>,
    calls: Arc<AtomicUsize>,
}

impl StubSource {
    pub fn new(responses: Vec<(&str, Vec<PriceRecord>)>) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Make fetches of `name` take `delay`.
    pub fn with_delays(mut self, delays: Vec<(&str, Duration)>) -> Self {
        self.delays = Arc::new(
            delays
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PriceSource for StubSource {
    fn fetch_price_history(&self, name: &str) -> Result<Vec<PriceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(name) {
            std::thread::sleep(*delay);
        }
        match self.responses.get(name) {
            Some(records) if !records.is_empty() => Ok(records.clone()),
            _ => Err(PriceError::NotFound(format!("no price history for '{}'", name))),
        }
    }
}

/// Store whose reads, writes and listings all fail. Removal fails too, except
/// that `seeded` values can be read back.
#[derive(Default)]
pub struct BrokenStore {
    seeded: HashMap<String, String>,
}

impl BrokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` for `key` while every other operation keeps failing.
    pub fn seeded(key: &str, value: &str) -> Self {
        Self {
            seeded: HashMap::from([(key.to_string(), value.to_string())]),
        }
    }
}

fn broken(op: &str) -> PriceError {
    PriceError::Storage(format!("{} failed: storage unavailable", op))
}

impl KeyValueStore for BrokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.seeded.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => Err(broken("get")),
        }
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(broken("set"))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(broken("remove"))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Err(broken("keys"))
    }
}
