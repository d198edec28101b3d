//! Reshaping backend rows into per-item series on a shared date axis.

mod common;

use common::{record, with_set};
use eve_price_history::reshape::{
    align_highest, align_lowest, has_set_prices, reshape, set_summary, set_total,
};
use eve_price_history::UnifiedAxis;

// ---------------------------------------------------------------------------
// Grouping and ordering
// ---------------------------------------------------------------------------

#[test]
fn groups_by_name_in_first_seen_order() {
    let records = vec![
        record("B", "2024-01-02", 2.0, 1.0),
        record("A", "2024-01-01", 5.0, 4.0),
        record("B", "2024-01-01", 3.0, 2.0),
    ];
    let series = reshape(&records);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].item_name, "B");
    assert_eq!(series[1].item_name, "A");
}

#[test]
fn sorts_each_group_by_date() {
    let records = vec![
        record("A", "2024-01-03", 3.0, 2.5),
        record("A", "2024-01-01", 1.0, 0.5),
        record("A", "2024-01-02", 2.0, 1.5),
    ];
    let series = reshape(&records);
    assert_eq!(series[0].dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(series[0].highest, [1.0, 2.0, 3.0]);
    assert_eq!(series[0].lowest, [0.5, 1.5, 2.5]);
}

#[test]
fn summary_comes_from_earliest_row() {
    let mut late = record("A", "2024-01-05", 9.0, 8.0);
    late.max_buy_price = Some(100.0);
    let early = record("A", "2024-01-01", 1.0, 0.5);
    let series = reshape(&[late, early]);
    assert_eq!(series[0].summary.buy, Some(0.5));
}

#[test]
fn rows_without_prices_are_skipped() {
    let mut gap = record("A", "2024-01-02", 0.0, 0.0);
    gap.highest = None;
    let series = reshape(&[record("A", "2024-01-01", 1.0, 0.5), gap]);
    assert_eq!(series[0].dates, ["2024-01-01"]);
    assert_eq!(series[0].highest.len(), series[0].lowest.len());
}

#[test]
fn empty_input_yields_no_series() {
    assert!(reshape(&[]).is_empty());
}

// ---------------------------------------------------------------------------
// Set prices
// ---------------------------------------------------------------------------

#[test]
fn set_prices_detected_on_any_item() {
    let series = reshape(&[
        record("B", "2024-01-01", 1.0, 0.5),
        with_set(record("A", "2024-01-01", 1.0, 0.5), 10.0, 20.0, 15.0),
    ]);
    assert!(has_set_prices(&series));
    assert_eq!(set_summary(&series).and_then(|s| s.buy), Some(10.0));
}

#[test]
fn zero_set_prices_mean_no_set() {
    let series = reshape(&[
        with_set(record("A", "2024-01-01", 1.0, 0.5), 0.0, 0.0, 0.0),
        record("B", "2024-01-01", 2.0, 1.5),
    ]);
    assert!(series[0].set_summary.is_none());
    assert!(!has_set_prices(&series));
    assert!(set_summary(&series).is_none());
}

#[test]
fn partial_set_prices_still_count() {
    let series = reshape(&[with_set(
        record("A", "2024-01-01", 1.0, 0.5),
        0.0,
        2000.0,
        0.0,
    )]);
    assert_eq!(set_summary(&series).and_then(|s| s.sell), Some(2000.0));
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

#[test]
fn alignment_uses_missing_marker_not_zero() {
    let series = reshape(&[
        record("A", "2024-01-01", 1.0, 0.5),
        record("A", "2024-01-03", 3.0, 2.5),
        record("B", "2024-01-02", 7.0, 6.0),
    ]);
    let axis = UnifiedAxis::from_series(&series);
    assert_eq!(axis.dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(
        align_highest(&series[0], &axis),
        [Some(1.0), None, Some(3.0)]
    );
    assert_eq!(align_lowest(&series[1], &axis), [None, Some(6.0), None]);
}

#[test]
fn set_total_substitutes_zero() {
    let series = reshape(&[
        record("A", "2024-01-01", 1.0, 0.5),
        record("A", "2024-01-03", 3.0, 2.5),
        record("B", "2024-01-02", 7.0, 6.0),
        record("B", "2024-01-03", 4.0, 3.0),
    ]);
    let axis = UnifiedAxis::from_series(&series);
    assert_eq!(set_total(&series, &axis), [1.0, 7.0, 7.0]);
}
