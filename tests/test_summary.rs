//! Title bar and info bar markup.

use eve_price_history::summary::render_info_bar_with_rules;
use eve_price_history::{
    render_info_bar, render_title_bar, ItemSeries, Labels, PriceSummary, ScaledDisplayRule,
};

fn item(name: &str, buy: f64, sell: f64) -> ItemSeries {
    ItemSeries {
        item_name: name.to_string(),
        icon_url: Some(format!("https://images.example/{}.png", name)),
        summary: PriceSummary {
            buy: Some(buy),
            sell: Some(sell),
            middle: Some((buy + sell) / 2.0),
        },
        set_summary: None,
        dates: vec![],
        highest: vec![],
        lowest: vec![],
    }
}

// ---------------------------------------------------------------------------
// Info bar
// ---------------------------------------------------------------------------

#[test]
fn one_block_per_item() {
    let html = render_info_bar(&[item("A", 1.0, 2.0), item("B", 3.0, 4.0)], &Labels::default());
    assert_eq!(html.matches("class=\"item-info\"").count(), 2);
    assert!(!html.contains("total-info"));
    assert!(html.contains("Sell <b style=\"color:#1976d2\">2.00</b>"));
}

#[test]
fn missing_prices_show_placeholder() {
    let mut a = item("A", 1.0, 2.0);
    a.summary.buy = None;
    let html = render_info_bar(&[a], &Labels::default());
    assert!(html.contains("Buy <b style=\"color:#43a047\">-</b>"));
}

#[test]
fn set_prices_add_total_block() {
    let mut a = item("A", 1.0, 2.0);
    a.set_summary = Some(PriceSummary {
        buy: Some(1000.0),
        sell: Some(2000.0),
        middle: Some(1500.0),
    });
    let html = render_info_bar(&[a, item("B", 3.0, 4.0)], &Labels::default());
    assert_eq!(html.matches("class=\"total-info\"").count(), 1);
    assert!(html.contains("1,500.00"));
}

// ---------------------------------------------------------------------------
// Scaled display rules
// ---------------------------------------------------------------------------

#[test]
fn scaled_rule_fires_for_single_trigger_item() {
    let html = render_info_bar(&[item("伊甸币", 4_000_000.0, 4_100_000.0)], &Labels::zh_cn());
    assert!(html.contains(">500个</span>"));
    assert!(html.contains("2,050,000,000.00"));
    assert!(html.contains("2,000,000,000.00"));
}

#[test]
fn scaled_rule_title_follows_labels() {
    let html = render_info_bar(&[item("伊甸币", 1.0, 2.0)], &Labels::default());
    assert!(html.contains(">500 units</span>"));
    assert!(!html.contains("个"));
}

#[test]
fn scaled_rule_needs_exactly_one_item() {
    let html = render_info_bar(
        &[item("伊甸币", 1.0, 2.0), item("B", 3.0, 4.0)],
        &Labels::default(),
    );
    assert!(!html.contains("total-info"));
}

#[test]
fn custom_rules_table() {
    let rules = [ScaledDisplayRule {
        trigger: "Tritanium",
        multiplier: 1000.0,
    }];
    let html =
        render_info_bar_with_rules(&[item("Tritanium", 4.0, 5.0)], &Labels::default(), &rules);
    assert!(html.contains("1,000 units"));
    assert!(html.contains("5,000.00"));
}

// ---------------------------------------------------------------------------
// Title bar
// ---------------------------------------------------------------------------

#[test]
fn title_for_single_item() {
    let html = render_title_bar(&[item("PLEX", 1.0, 2.0)], &Labels::default());
    assert!(html.contains("https://images.example/PLEX.png"));
    assert!(html.contains(">PLEX</span>"));
}

#[test]
fn title_for_many_items() {
    let html = render_title_bar(&[item("A", 1.0, 2.0), item("B", 1.0, 2.0)], &Labels::default());
    assert!(html.contains("Search results"));
    assert!(!html.contains("<img"));
    assert_eq!(render_title_bar(&[], &Labels::default()), "");
}

#[test]
fn names_are_escaped() {
    let html = render_title_bar(&[item("<script>", 1.0, 2.0)], &Labels::default());
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}
