//! Compile-time tunables: host-page selectors, overlay class/attribute
//! names, timing, z-order, composite geometry and the sizing stylesheet.

// Host-page structure the overlay anchors to.
pub const SELECTOR_CONTAINERS: &str = ".personnages .icon_perso";
pub const SELECTOR_ICON: &str = ".le_icon_perso";
pub const SELECTOR_INFO: &str = ".info_a_afficher";
pub const SELECTOR_COMBAT: &str = "#combat_carte";
pub const CLASS_CONNECTED: &str = "connecte";

// Engine-owned overlay node classes.
pub const CLASS_BADGE: &str = "pion-badge";
pub const CLASS_ACTION_ICON: &str = "pion-action-icon";
pub const CLASS_COMPOSITE: &str = "pion-composite";
pub const CLASS_COMPOSITE_CENTER: &str = "pion-composite-center";
pub const CLASS_COMPOSITE_COUNT: &str = "pion-composite-count";
pub const CLASS_ROSTER_POPUP: &str = "pion-roster-popup";

// Engine-owned bookkeeping attributes.
pub const ATTR_STATUS: &str = "data-pion-status";
pub const ATTR_NAME: &str = "data-pion-name";
pub const ATTR_ACTION: &str = "data-pion-action";
pub const ATTR_COMPOSITE: &str = "data-pion-composite";
pub const ATTR_STYLE_SAVED: &str = "data-pion-style-saved";
pub const ATTR_ORIGINAL_STYLE: &str = "data-pion-original-style";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

pub const STYLESHEET_ID: &str = "pion-sizing-style";

// Timing (milliseconds).
pub const REAPPLY_INTERVAL_MS: u32 = 50;
pub const FRAME_THROTTLE_MS: f64 = 0.0;
pub const INIT_DELAY_MS: u32 = 2_000;
pub const SECONDARY_DELAY_MS: u32 = 5_000;
pub const COMBAT_POLL_MS: u32 = 200;
pub const CLASSIFICATION_TTL_MS: f64 = 500.0;
pub const HOVER_DWELL_MS: u32 = 300;
pub const POPUP_FADE_MS: u32 = 200;

// Z-order.
pub const Z_BADGE: u32 = 999;
pub const Z_ACTION_ICON: u32 = 1_001;
pub const Z_POPUP: u32 = 1_000_000;

// Composite ("pie") geometry on a 100x100 viewBox.
pub const PIE_SIZE_PX: u32 = 30;
pub const PIE_RADIUS: f64 = 50.0;
pub const PIE_CENTER_X: f64 = 50.0;
pub const PIE_CENTER_Y: f64 = 50.0;
pub const PIE_CENTER_RADIUS: f64 = 15.0;
pub const PIE_STROKE_WIDTH: f64 = 2.0;

pub const PORTRAIT_BASE_URL: &str = "https://www.dreadcast.net/images/avatars/";

/// Portrait URLs are name-addressed: `{base}{urlencoded name}.png`.
pub fn portrait_url(name: &str) -> String {
    format!("{PORTRAIT_BASE_URL}{}.png", urlencoding::encode(name))
}

/// Sizing stylesheet injected into the host page's head. Scales containers
/// by the badge-size preference and pins the overlay node visuals that must
/// win against host styles.
pub fn sizing_stylesheet(badge_size_pct: u32, action_icon_size_px: u32) -> String {
    let scale = f64::from(badge_size_pct) / 100.0;
    let icon = action_icon_size_px;
    let icon_box = f64::from(action_icon_size_px) * 0.56;
    format!(
        "\
{SELECTOR_CONTAINERS} {{
  transform: scale({scale}) !important;
  transform-origin: center center !important;
}}

{SELECTOR_CONTAINERS} {SELECTOR_ICON} {{
  transform: scale(1) !important;
  position: relative !important;
}}

.{CLASS_BADGE} {{
  pointer-events: none !important;
  width: 70px !important;
  height: 70px !important;
  object-fit: cover !important;
  border-radius: 50% !important;
  border: 2px solid rgba(255, 255, 255, 0.8) !important;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3) !important;
  position: absolute !important;
  top: 50% !important;
  left: 50% !important;
  transform: translate(-50%, -50%) !important;
  z-index: {Z_BADGE} !important;
  display: block !important;
  visibility: visible !important;
  opacity: 1 !important;
  transition: border-color 0.3s ease !important;
}}

{SELECTOR_CONTAINERS} {SELECTOR_ICON} > * {{
  position: relative !important;
}}

{SELECTOR_CONTAINERS} {SELECTOR_ICON} > .{CLASS_BADGE} {{
  z-index: {Z_BADGE} !important;
}}

{SELECTOR_CONTAINERS} {SELECTOR_ICON} > svg,
{SELECTOR_CONTAINERS} {SELECTOR_ICON} > use {{
  z-index: 1 !important;
}}

.{CLASS_ACTION_ICON} {{
  position: absolute !important;
  top: -5px !important;
  right: -15px !important;
  font-size: {icon}px !important;
  border-radius: 50% !important;
  width: {icon_box}px !important;
  height: {icon_box}px !important;
  display: flex !important;
  align-items: center !important;
  justify-content: center !important;
  box-shadow: 0 2px 6px rgba(0, 0, 0, 0.3) !important;
  z-index: {Z_ACTION_ICON} !important;
  pointer-events: none !important;
  border: 2px solid rgba(0, 0, 0, 0.1) !important;
  transition: opacity 0.2s ease !important;
}}
"
    )
}
