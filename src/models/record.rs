use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceRecord — One daily market-history row for one item
// ---------------------------------------------------------------------------

/// A single `(item, date)` row as returned by `/api/price_history`.
///
/// The summary prices (`max_buy_price`, `min_sell_price`, `middle_price`) and
/// the icon are repeated on every row of the same item. The `*_set` fields are
/// only present when the query matched several items priced together as a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceRecord {
    pub item_name: String,
    pub date: String,
    #[serde(default)]
    pub highest: Option<f64>,
    #[serde(default)]
    pub lowest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_count: Option<i64>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub max_buy_price: Option<f64>,
    #[serde(default)]
    pub min_sell_price: Option<f64>,
    #[serde(default)]
    pub middle_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buy_price_set: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sell_price_set: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_price_set: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

// ---------------------------------------------------------------------------
// CacheEntry — Stored form of a fetched payload
// ---------------------------------------------------------------------------

/// A cached response, stored as `{"timestamp": <ms since epoch>, "data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub data: Vec<PriceRecord>,
}
