//! HTML fragments for the title bar and the info bar.

use crate::format::{escape_html, format_price};
use crate::labels::Labels;
use crate::models::{ItemSeries, PriceSummary};
use crate::reshape::set_summary;

// ---------------------------------------------------------------------------
// Scaled display rules
// ---------------------------------------------------------------------------

/// Extra summary block shown for one specific item, with its prices scaled.
///
/// The block is titled by [`Labels::scaled_name`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledDisplayRule {
    /// Item name that activates the rule.
    pub trigger: &'static str,
    pub multiplier: f64,
}

/// Rules applied by [`render_info_bar`].
///
/// A rule fires when the result holds exactly one item named `trigger`.
pub const SCALED_DISPLAY_RULES: &[ScaledDisplayRule] = &[ScaledDisplayRule {
    trigger: "伊甸币",
    multiplier: 500.0,
}];

fn matching_rules<'a>(
    series: &[ItemSeries],
    rules: &'a [ScaledDisplayRule],
) -> impl Iterator<Item = &'a ScaledDisplayRule> {
    let single = match series {
        [only] => Some(only.item_name.clone()),
        _ => None,
    };
    rules
        .iter()
        .filter(move |r| single.as_deref() == Some(r.trigger))
}

// ---------------------------------------------------------------------------
// Info bar
// ---------------------------------------------------------------------------

fn price_spans(out: &mut String, prices: &PriceSummary, labels: &Labels) {
    for (label, value, color) in [
        (&labels.sell, prices.sell, "#1976d2"),
        (&labels.buy, prices.buy, "#43a047"),
        (&labels.middle, prices.middle, "#ffb300"),
    ] {
        out.push_str(&format!(
            "<span style=\"margin:0 30px;\">{} <b style=\"color:{}\">{}</b></span>",
            escape_html(label),
            color,
            format_price(value)
        ));
    }
}

fn name_span(out: &mut String, name: &str) {
    out.push_str(&format!(
        "<span style=\"font-size:1.2em;margin-right:20px;\">{}</span>",
        escape_html(name)
    ));
}

fn total_block(out: &mut String, title: &str, prices: &PriceSummary, labels: &Labels) {
    out.push_str("<div class=\"total-info\">");
    name_span(out, title);
    price_spans(out, prices, labels);
    out.push_str("</div>");
}

/// Info bar markup using the built-in [`SCALED_DISPLAY_RULES`].
pub fn render_info_bar(series: &[ItemSeries], labels: &Labels) -> String {
    render_info_bar_with_rules(series, labels, SCALED_DISPLAY_RULES)
}

/// Info bar markup: one `item-info` block per item, a `total-info` block for
/// set prices when present, then one `total-info` block per matching rule.
pub fn render_info_bar_with_rules(
    series: &[ItemSeries],
    labels: &Labels,
    rules: &[ScaledDisplayRule],
) -> String {
    let mut out = String::new();

    for item in series {
        out.push_str("<div class=\"item-info\">");
        if let Some(icon) = &item.icon_url {
            out.push_str(&format!(
                "<img src=\"{}\" style=\"width:32px;height:32px;vertical-align:middle;margin-right:10px;\">",
                escape_html(icon)
            ));
        }
        name_span(&mut out, &item.item_name);
        price_spans(&mut out, &item.summary, labels);
        out.push_str("</div>");
    }

    if let Some(set) = set_summary(series) {
        total_block(&mut out, &labels.set_summary, &set, labels);
    }

    for rule in matching_rules(series, rules) {
        let scaled = series[0].summary.scaled(rule.multiplier);
        total_block(&mut out, &labels.scaled_name(rule.multiplier), &scaled, labels);
    }

    out
}

// ---------------------------------------------------------------------------
// Title bar
// ---------------------------------------------------------------------------

/// Title bar markup: the item's icon and name for a single item, the "search
/// results" label otherwise, nothing for an empty result.
pub fn render_title_bar(series: &[ItemSeries], labels: &Labels) -> String {
    match series {
        [] => String::new(),
        [item] => {
            let icon = item
                .icon_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| {
                    format!(
                        "<img src=\"{}\" style=\"width:48px;height:48px;vertical-align:middle;margin-right:10px;\">",
                        escape_html(u)
                    )
                })
                .unwrap_or_default();
            format!(
                "{}<span style=\"font-size:36px;font-weight:bold;vertical-align:middle;\">{}</span>",
                icon,
                escape_html(&item.item_name)
            )
        }
        _ => format!(
            "<span style=\"font-size:36px;font-weight:bold;\">{}</span>",
            escape_html(&labels.search_results)
        ),
    }
}
