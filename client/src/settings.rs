//! Engine-facing entry points for the external configuration surface.
//! Exported on the wasm module so page-side UI code can drive the overlay
//! without reaching into its internals.

use wasm_bindgen::prelude::wasm_bindgen;

use crate::with_engine;

#[wasm_bindgen]
pub fn pion_set_badges_enabled(enabled: bool) {
    with_engine(|engine| engine.set_badges_enabled(enabled));
}

#[wasm_bindgen]
pub fn pion_set_action_icons_enabled(enabled: bool) {
    with_engine(|engine| engine.set_action_icons_enabled(enabled));
}

#[wasm_bindgen]
pub fn pion_set_badge_size(size: u32) {
    with_engine(|engine| engine.set_badge_size(size));
}

#[wasm_bindgen]
pub fn pion_set_action_icon_size(size: u32) {
    with_engine(|engine| engine.set_action_icon_size(size));
}

#[wasm_bindgen]
pub fn pion_set_status_color(connected: bool, hex: &str) {
    with_engine(|engine| engine.set_status_color(connected, hex));
}

#[wasm_bindgen]
pub fn pion_set_color_opacity(opacity: u32) {
    with_engine(|engine| engine.set_color_opacity(opacity));
}

#[wasm_bindgen]
pub fn pion_open_configuration() {
    with_engine(|engine| engine.open_configuration());
}
