//! Number and date formatting shared by the chart and the info bars.

/// Shown in place of a price that is absent or not a number.
pub const PLACEHOLDER: &str = "-";

/// Format a price with two decimals and `,` thousands separators.
///
/// `format_price(Some(1234.5))` gives `"1,234.50"`; `None`, NaN and infinities
/// give [`PLACEHOLDER`].
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.is_finite() => group_thousands(&format!("{:.2}", p)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Axis tick label: thousands separators and at most three decimals, trailing
/// zeros dropped.
pub fn format_axis_value(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let fixed = format!("{:.3}", value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    let grouped = group_thousands(trimmed);
    if grouped == "-0" {
        "0".to_string()
    } else {
        grouped
    }
}

/// Calendar-day part of an ISO-8601 timestamp (`"2024-05-01T00:00:00"` → `"2024-05-01"`).
pub fn truncate_date(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

/// Escape text for interpolation into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = format!("{}{}", sign, grouped);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}
