//! Chart colours.

pub const AXIS: &str = "#009dff";
pub const TEXT: &str = "#ffffff";
pub const MARKER_FILL: &str = "#ffffff";

pub const CENTER_LINE: &str = "#ffff00";
pub const UPPER_LIMIT: &str = "#008000";
pub const LOWER_LIMIT: &str = "#ff0000";

/// Used for any group name without a dedicated colour.
pub const FALLBACK_GROUP: &str = "#808080";

/// Highlight colour for the data line and markers of `group`.
pub fn group_color(group: &str) -> &'static str {
    match group {
        "NO_GROUP" => "#4682b4",
        "TOTAL_GROUP" => "#ff6347",
        "AVERAGE_GROUP" => "#008000",
        _ => FALLBACK_GROUP,
    }
}
