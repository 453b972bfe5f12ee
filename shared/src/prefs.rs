//! Persisted preferences: a raw string key/value store plus typed, clamped
//! accessors. Values are string-serialized so any storage backend that can
//! hold strings works; out-of-range numbers clamp on read.

use crate::colors::ColorMap;

pub const KEY_BADGES_ENABLED: &str = "pion_badges_enabled";
pub const KEY_ACTION_ICONS_ENABLED: &str = "pion_action_icons_enabled";
pub const KEY_BADGE_SIZE: &str = "pion_badge_size";
pub const KEY_ACTION_ICON_SIZE: &str = "pion_action_icon_size";
pub const KEY_CUSTOM_COLORS: &str = "pion_custom_colors";
pub const KEY_COLOR_OPACITY: &str = "pion_color_opacity";

// Badge size, percent of the host's own pawn size.
pub const BADGE_SIZE_DEFAULT: u32 = 100;
pub const BADGE_SIZE_MIN: u32 = 75;
pub const BADGE_SIZE_MAX: u32 = 150;

// Action icon size, pixels.
pub const ACTION_ICON_SIZE_DEFAULT: u32 = 12;
pub const ACTION_ICON_SIZE_MIN: u32 = 12;
pub const ACTION_ICON_SIZE_MAX: u32 = 28;

// Border color opacity, percent.
pub const OPACITY_DEFAULT: u32 = 100;
pub const OPACITY_MIN: u32 = 0;
pub const OPACITY_MAX: u32 = 100;

/// Raw string key/value store. Reads happen at the start of each operation
/// that depends on a preference; there are no change notifications.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

fn load_bool(store: &dyn PreferenceStore, key: &str, default: bool) -> bool {
    match store.get(key).as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

fn load_clamped(store: &dyn PreferenceStore, key: &str, default: u32, min: u32, max: u32) -> u32 {
    store
        .get(key)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .map_or(default, |value| value.clamp(min, max))
}

pub fn badges_enabled(store: &dyn PreferenceStore) -> bool {
    load_bool(store, KEY_BADGES_ENABLED, true)
}

pub fn save_badges_enabled(store: &dyn PreferenceStore, enabled: bool) {
    store.set(KEY_BADGES_ENABLED, if enabled { "true" } else { "false" });
}

pub fn action_icons_enabled(store: &dyn PreferenceStore) -> bool {
    load_bool(store, KEY_ACTION_ICONS_ENABLED, true)
}

pub fn save_action_icons_enabled(store: &dyn PreferenceStore, enabled: bool) {
    store.set(
        KEY_ACTION_ICONS_ENABLED,
        if enabled { "true" } else { "false" },
    );
}

pub fn badge_size(store: &dyn PreferenceStore) -> u32 {
    load_clamped(
        store,
        KEY_BADGE_SIZE,
        BADGE_SIZE_DEFAULT,
        BADGE_SIZE_MIN,
        BADGE_SIZE_MAX,
    )
}

pub fn save_badge_size(store: &dyn PreferenceStore, size: u32) {
    store.set(
        KEY_BADGE_SIZE,
        &size.clamp(BADGE_SIZE_MIN, BADGE_SIZE_MAX).to_string(),
    );
}

pub fn action_icon_size(store: &dyn PreferenceStore) -> u32 {
    load_clamped(
        store,
        KEY_ACTION_ICON_SIZE,
        ACTION_ICON_SIZE_DEFAULT,
        ACTION_ICON_SIZE_MIN,
        ACTION_ICON_SIZE_MAX,
    )
}

pub fn save_action_icon_size(store: &dyn PreferenceStore, size: u32) {
    store.set(
        KEY_ACTION_ICON_SIZE,
        &size
            .clamp(ACTION_ICON_SIZE_MIN, ACTION_ICON_SIZE_MAX)
            .to_string(),
    );
}

pub fn color_opacity(store: &dyn PreferenceStore) -> u32 {
    load_clamped(
        store,
        KEY_COLOR_OPACITY,
        OPACITY_DEFAULT,
        OPACITY_MIN,
        OPACITY_MAX,
    )
}

pub fn save_color_opacity(store: &dyn PreferenceStore, opacity: u32) {
    store.set(
        KEY_COLOR_OPACITY,
        &opacity.clamp(OPACITY_MIN, OPACITY_MAX).to_string(),
    );
}

pub fn custom_colors(store: &dyn PreferenceStore) -> ColorMap {
    store
        .get(KEY_CUSTOM_COLORS)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_custom_colors(store: &dyn PreferenceStore, colors: &ColorMap) {
    if let Ok(json) = serde_json::to_string(colors) {
        store.set(KEY_CUSTOM_COLORS, &json);
    }
}
