use std::collections::HashMap;

/// Custom border colors persisted by the settings layer, keyed by status
/// name (`"connected"` / `"disconnected"`).
pub type ColorMap = HashMap<String, String>;

pub const KEY_CONNECTED: &str = "connected";
pub const KEY_DISCONNECTED: &str = "disconnected";

pub const DEFAULT_CONNECTED: &str = "#00ff4cff";
pub const DEFAULT_DISCONNECTED: &str = "#000000ff";

/// Parse `#rrggbb` or `#rrggbbaa` into (r, g, b). A trailing alpha byte is
/// accepted and ignored; opacity comes from the dedicated preference.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }
    let byte = |range| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((byte(0..2)?, byte(2..4)?, byte(4..6)?))
}

/// Format a hex color as a CSS `rgba()` string at the given opacity (0..=1).
pub fn rgba(hex: &str, opacity: f64) -> Option<String> {
    let (r, g, b) = parse_hex(hex)?;
    Some(format!("rgba({r}, {g}, {b}, {opacity})"))
}

/// Border color for a connection status: custom override if one parses,
/// otherwise the built-in default, at the configured opacity percentage.
pub fn color_for_status(custom: &ColorMap, connected: bool, opacity_pct: u32) -> String {
    let (key, default) = if connected {
        (KEY_CONNECTED, DEFAULT_CONNECTED)
    } else {
        (KEY_DISCONNECTED, DEFAULT_DISCONNECTED)
    };
    let opacity = f64::from(opacity_pct.min(100)) / 100.0;
    custom
        .get(key)
        .and_then(|hex| rgba(hex, opacity))
        .or_else(|| rgba(default, opacity))
        .unwrap_or_else(|| format!("rgba(0, 0, 0, {opacity})"))
}
