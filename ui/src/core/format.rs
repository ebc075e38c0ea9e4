//! Formatting helpers for chart labels.

/// Prefix some exports put in front of category ids.
pub const CATEGORY_PREFIX: &str = "R0-%-";

/// Tick, point and limit labels all use two decimals.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

pub fn category_label(category_id: &str) -> &str {
    category_id
        .strip_prefix(CATEGORY_PREFIX)
        .unwrap_or(category_id)
}

/// Escape text for inclusion in SVG markup.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
