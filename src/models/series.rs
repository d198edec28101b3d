use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceSummary — Current buy / sell / middle quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub buy: Option<f64>,
    pub sell: Option<f64>,
    pub middle: Option<f64>,
}

impl PriceSummary {
    /// Multiply every present price by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            buy: self.buy.map(|p| p * factor),
            sell: self.sell.map(|p| p * factor),
            middle: self.middle.map(|p| p * factor),
        }
    }

    /// True when at least one price is present and non-zero.
    pub fn has_nonzero(&self) -> bool {
        [self.buy, self.sell, self.middle]
            .into_iter()
            .flatten()
            .any(|p| p != 0.0)
    }
}

// ---------------------------------------------------------------------------
// ItemSeries — Per-item date-ordered price history
// ---------------------------------------------------------------------------

/// Price history of one item, ordered by ascending date.
///
/// `dates`, `highest` and `lowest` always have the same length; index `i` in
/// each refers to the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSeries {
    pub item_name: String,
    pub icon_url: Option<String>,
    pub summary: PriceSummary,
    /// Aggregate prices of the whole set, when the query matched a set.
    pub set_summary: Option<PriceSummary>,
    pub dates: Vec<String>,
    pub highest: Vec<f64>,
    pub lowest: Vec<f64>,
}

impl ItemSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Highest price recorded on `date`, if any.
    pub fn highest_at(&self, date: &str) -> Option<f64> {
        self.index_of(date).map(|i| self.highest[i])
    }

    /// Lowest price recorded on `date`, if any.
    pub fn lowest_at(&self, date: &str) -> Option<f64> {
        self.index_of(date).map(|i| self.lowest[i])
    }

    fn index_of(&self, date: &str) -> Option<usize> {
        self.dates
            .binary_search_by(|d| d.as_str().cmp(date))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// UnifiedAxis — Shared date axis across all series of one result
// ---------------------------------------------------------------------------

/// Sorted, deduplicated union of every date across a result's series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedAxis {
    pub dates: Vec<String>,
}

impl UnifiedAxis {
    pub fn from_series(series: &[ItemSeries]) -> Self {
        let mut dates: Vec<String> = series
            .iter()
            .flat_map(|s| s.dates.iter().cloned())
            .collect();
        dates.sort();
        dates.dedup();
        Self { dates }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
