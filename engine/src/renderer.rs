//! The apply ladder. Each pass walks every container and does the cheapest
//! thing that keeps its overlay correct: skip, patch the border, or run a
//! full apply with name extraction and a portrait probe.

use pion_shared::config::{
    ATTR_ACTION, ATTR_COMPOSITE, ATTR_NAME, ATTR_STATUS, STATUS_FAILED, STATUS_SUCCESS, Z_BADGE,
    portrait_url,
};
use pion_shared::{ActionTag, color_for_status, prefs};

use crate::cache::ApplyStatus;
use crate::combat::OverlayMode;
use crate::context::Engine;
use crate::host::{HostTree, OverlayKind};

/// Inline style for a fresh badge. The sizing stylesheet overrides the
/// dimensions; these keep the badge presentable before it lands and on
/// hosts that drop the stylesheet.
fn badge_style(border_color: &str) -> [(&'static str, String); 13] {
    [
        ("display", "block".to_string()),
        ("pointer-events", "none".to_string()),
        ("width", "20px".to_string()),
        ("height", "20px".to_string()),
        ("border-radius", "50%".to_string()),
        ("object-fit", "cover".to_string()),
        ("border", format!("2px solid {border_color}")),
        ("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.3)".to_string()),
        ("position", "absolute".to_string()),
        ("top", "50%".to_string()),
        ("left", "50%".to_string()),
        ("transform", "translate(-50%, -50%)".to_string()),
        ("z-index", Z_BADGE.to_string()),
    ]
}

impl<H: HostTree + 'static> Engine<H> {
    /// One pass over every container. Disabled badges degrade the pass to
    /// a removal sweep so a stale timer can never repaint.
    pub async fn apply_all(&self, force: bool) {
        // A pass queued before suspension must not repaint a combat page.
        if self.mode.get() == OverlayMode::Suspended {
            return;
        }
        if !prefs::badges_enabled(self.store.as_ref()) {
            self.remove_all();
            return;
        }
        for container in self.host.containers() {
            self.apply(&container, force).await;
        }
    }

    /// Apply (or cheaply re-validate) the overlay for one container.
    pub async fn apply(&self, container: &H::Node, force: bool) {
        if !prefs::badges_enabled(self.store.as_ref()) {
            self.remove_container_overlay(container);
            return;
        }
        let icons = self.host.icon_nodes(container);
        if icons.len() >= 2 {
            self.apply_composite(container, &icons, force);
            return;
        }
        let key = self.host.node_key(container);
        let cached = self.caches.borrow().status(key);
        if !force {
            match cached {
                Some(ApplyStatus::Success) if self.badge_valid(container) => {
                    // Cheap path: the badge is fine, only the mutable bits
                    // (border color, action glyph) get a look.
                    self.update_border(container);
                    if let Some(icon) = icons.first() {
                        self.refresh_action(container, icon, false);
                    }
                    return;
                }
                Some(ApplyStatus::Failed) => return,
                _ => {}
            }
        }

        // A group that shrank back to one occupant may still carry its
        // composite; the single badge replaces it.
        self.clear_composite(container);

        let Some(name) = self.occupant_name(container) else {
            self.caches.borrow_mut().set_status(key, ApplyStatus::Failed);
            self.host.set_attr(container, ATTR_STATUS, STATUS_FAILED);
            return;
        };
        let url = portrait_url(&name);

        let known = self.caches.borrow().resource(&name).map(|e| e.exists);
        let exists = match known {
            Some(exists) if !force => exists,
            _ => self.probe_resource(&name, &url).await,
        };
        if !exists {
            self.caches.borrow_mut().set_status(key, ApplyStatus::Failed);
            self.host.set_attr(container, ATTR_STATUS, STATUS_FAILED);
            return;
        }

        // Structural absence is transient (the host may still be building
        // the node); leave the status unset so the next pass retries.
        let Some(icon) = icons.first() else { return };

        let badge = match self.host.overlay_node(icon, OverlayKind::Badge) {
            Some(existing) => {
                if self.host.image_source(&existing).as_deref() != Some(url.as_str()) {
                    self.host.set_image_source(&existing, &url, &name);
                }
                existing
            }
            None => self.host.create_badge(icon, &url, &name),
        };
        let border = self.border_color(icon);
        for (property, value) in badge_style(&border) {
            self.host.set_style_property(&badge, property, &value);
        }

        self.host.set_attr(container, ATTR_STATUS, STATUS_SUCCESS);
        self.host.set_attr(container, ATTR_NAME, &name);
        self.caches.borrow_mut().set_status(key, ApplyStatus::Success);

        self.refresh_action(container, icon, force);
    }

    /// Bring the action glyph in line with the current classification. The
    /// container's action attribute records what was last rendered, so an
    /// unchanged action is free.
    fn refresh_action(&self, container: &H::Node, icon: &H::Node, force: bool) {
        let action = self.classify(container, icon);
        let recorded = self.host.attr(container, ATTR_ACTION);
        let current = action.map_or("", ActionTag::name);
        if force || recorded.as_deref() != Some(current) {
            self.update_action_icon(icon, action);
            self.host.set_attr(container, ATTR_ACTION, current);
        }
    }

    /// Probe the portrait behind `name`, sharing any in-flight probe, and
    /// cache the verdict.
    async fn probe_resource(&self, name: &str, url: &str) -> bool {
        let pending = self.probes.resolve(name, url, self.probe.as_ref());
        let exists = pending.await;
        self.probes.complete(name);
        self.caches
            .borrow_mut()
            .set_resource(name, url.to_string(), exists);
        if !exists {
            log::debug!("no portrait found for {name}");
        }
        exists
    }

    /// Occupant name: the name attribute written by an earlier apply wins,
    /// else the first non-empty trimmed line of the info node. The host
    /// rewrites info nodes freely; the attribute keeps the name across that.
    fn occupant_name(&self, container: &H::Node) -> Option<String> {
        if let Some(cached) = self.host.attr(container, ATTR_NAME) {
            if !cached.is_empty() {
                return Some(cached);
            }
        }
        self.host
            .info_lines(container)?
            .into_iter()
            .map(|line| line.trim().to_string())
            .find(|line| !line.is_empty())
    }

    /// Action classification for a container's icon, via the short-TTL
    /// cache so a burst of passes reads the tags once.
    pub(crate) fn classify(&self, container: &H::Node, icon: &H::Node) -> Option<ActionTag> {
        let key = self.host.node_key(container);
        let now = self.platform.now();
        if let Some(cached) = self.caches.borrow().classification(key, now) {
            return cached;
        }
        let tags = self.host.action_tags(icon);
        let tag = ActionTag::classify(&tags);
        self.caches.borrow_mut().set_classification(key, tag, now);
        tag
    }

    /// Create, update or remove the glyph bubble to match the action.
    fn update_action_icon(&self, icon: &H::Node, action: Option<ActionTag>) {
        if !prefs::action_icons_enabled(self.store.as_ref()) {
            self.host.remove_overlay(icon, OverlayKind::ActionIcon);
            return;
        }
        let Some(glyph) = action.and_then(ActionTag::glyph) else {
            self.host.remove_overlay(icon, OverlayKind::ActionIcon);
            return;
        };
        let bubble = match self.host.overlay_node(icon, OverlayKind::ActionIcon) {
            Some(existing) => existing,
            None => self.host.create_action_icon(icon),
        };
        if self.host.text(&bubble).as_deref() != Some(glyph) {
            self.host.set_text(&bubble, glyph);
        }
    }

    /// A cached success only counts while its badge is attached and not
    /// suppressed by host styles.
    pub(crate) fn badge_valid(&self, container: &H::Node) -> bool {
        let icons = self.host.icon_nodes(container);
        let Some(icon) = icons.first() else {
            return false;
        };
        let Some(badge) = self.host.overlay_node(icon, OverlayKind::Badge) else {
            return false;
        };
        self.host.is_attached(&badge) && !self.host.is_suppressed(&badge)
    }

    /// Cheap repaint: border color only, from current connectivity.
    pub(crate) fn update_border(&self, container: &H::Node) {
        let icons = self.host.icon_nodes(container);
        let Some(icon) = icons.first() else { return };
        let Some(badge) = self.host.overlay_node(icon, OverlayKind::Badge) else {
            return;
        };
        let color = self.border_color(icon);
        self.host
            .set_style_property(&badge, "border", &format!("2px solid {color}"));
    }

    /// Restyle every existing badge after a color preference change, with
    /// a heavier accent border and matching glow.
    pub fn refresh_all_borders(&self) {
        for container in self.host.containers() {
            for icon in self.host.icon_nodes(&container) {
                let Some(badge) = self.host.overlay_node(&icon, OverlayKind::Badge) else {
                    continue;
                };
                let color = self.border_color(&icon);
                self.host
                    .set_style_property(&badge, "border", &format!("3px solid {color}"));
                self.host
                    .set_style_property(&badge, "box-shadow", &format!("0 2px 8px {color}"));
            }
        }
    }

    fn border_color(&self, icon: &H::Node) -> String {
        let custom = prefs::custom_colors(self.store.as_ref());
        let opacity = prefs::color_opacity(self.store.as_ref());
        color_for_status(&custom, self.host.is_connected(icon), opacity)
    }

    /// Remove every engine-owned node and bookkeeping attribute. Style
    /// snapshots stay; they belong to the restore path, not the sweep.
    pub fn remove_all(&self) {
        for container in self.host.containers() {
            self.remove_container_overlay(&container);
        }
    }

    pub(crate) fn remove_container_overlay(&self, container: &H::Node) {
        for icon in self.host.icon_nodes(container) {
            self.host.remove_overlay(&icon, OverlayKind::Badge);
            self.host.remove_overlay(&icon, OverlayKind::ActionIcon);
            self.host.remove_overlay(&icon, OverlayKind::Composite);
        }
        for attr in [ATTR_STATUS, ATTR_NAME, ATTR_ACTION, ATTR_COMPOSITE] {
            self.host.remove_attr(container, attr);
        }
    }

    /// Drop a stale composite before a single badge takes the container.
    fn clear_composite(&self, container: &H::Node) {
        if self.host.attr(container, ATTR_COMPOSITE).is_none() {
            return;
        }
        for icon in self.host.icon_nodes(container) {
            self.host.remove_overlay(&icon, OverlayKind::Composite);
        }
        self.host.remove_attr(container, ATTR_COMPOSITE);
    }
}
