//! Turns the flat record list returned by the backend into per-item series
//! aligned on a shared date axis.

use std::collections::HashMap;

use crate::models::{ItemSeries, PriceRecord, PriceSummary, UnifiedAxis};

/// Group `records` by item name and build one date-ordered [`ItemSeries`] per item.
///
/// Items appear in the order their names were first seen. Summary and set
/// prices come from the earliest record of each item; set prices that are all
/// absent or zero mean the item is not part of a set. Rows missing either the
/// highest or the lowest price are left out of the series; nothing is
/// interpolated.
pub fn reshape(records: &[PriceRecord]) -> Vec<ItemSeries> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&PriceRecord>> = HashMap::new();

    for record in records {
        let name = record.item_name.as_str();
        groups
            .entry(name)
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .filter_map(|name| groups.remove(name).map(|rows| build_series(name, rows)))
        .collect()
}

fn build_series(name: &str, mut rows: Vec<&PriceRecord>) -> ItemSeries {
    // Vec::sort_by is stable: rows sharing a date keep their response order.
    rows.sort_by(|a, b| a.date.cmp(&b.date));
    let first = rows[0];

    let set = PriceSummary {
        buy: first.max_buy_price_set,
        sell: first.min_sell_price_set,
        middle: first.middle_price_set,
    };

    let mut dates = Vec::with_capacity(rows.len());
    let mut highest = Vec::with_capacity(rows.len());
    let mut lowest = Vec::with_capacity(rows.len());
    for row in &rows {
        if let (Some(hi), Some(lo)) = (row.highest, row.lowest) {
            dates.push(row.date.clone());
            highest.push(hi);
            lowest.push(lo);
        }
    }

    ItemSeries {
        item_name: name.to_string(),
        icon_url: first.icon_url.clone(),
        summary: PriceSummary {
            buy: first.max_buy_price,
            sell: first.min_sell_price,
            middle: first.middle_price,
        },
        set_summary: set.has_nonzero().then_some(set),
        dates,
        highest,
        lowest,
    }
}

/// True when any series carries aggregate set prices.
pub fn has_set_prices(series: &[ItemSeries]) -> bool {
    series.iter().any(|s| s.set_summary.is_some())
}

/// The set prices to display: those of the first series that has them.
pub fn set_summary(series: &[ItemSeries]) -> Option<PriceSummary> {
    series.iter().find_map(|s| s.set_summary)
}

/// Highest prices of `series` laid out on `axis`; `None` where the item has no row.
pub fn align_highest(series: &ItemSeries, axis: &UnifiedAxis) -> Vec<Option<f64>> {
    axis.dates.iter().map(|d| series.highest_at(d)).collect()
}

/// Lowest prices of `series` laid out on `axis`; `None` where the item has no row.
pub fn align_lowest(series: &ItemSeries, axis: &UnifiedAxis) -> Vec<Option<f64>> {
    axis.dates.iter().map(|d| series.lowest_at(d)).collect()
}

/// Per-date sum of every item's highest price.
///
/// Unlike [`align_highest`], an item without a row on a date contributes `0`.
pub fn set_total(series: &[ItemSeries], axis: &UnifiedAxis) -> Vec<f64> {
    axis.dates
        .iter()
        .map(|d| series.iter().map(|s| s.highest_at(d).unwrap_or(0.0)).sum())
        .collect()
}
