//! `HostTree` over the real page. All board-structure selectors live in
//! `pion_shared::config`; this module is the only place that touches
//! `web_sys` nodes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use pion_engine::{CompositeSpec, HostTree, NodeKey, OverlayKind, RosterRow};
use pion_shared::color_for_status;
use pion_shared::colors::ColorMap;
use pion_shared::config::{
    CLASS_ACTION_ICON, CLASS_BADGE, CLASS_COMPOSITE, CLASS_COMPOSITE_CENTER,
    CLASS_COMPOSITE_COUNT, CLASS_CONNECTED, CLASS_ROSTER_POPUP, HOVER_DWELL_MS, PIE_CENTER_RADIUS,
    PIE_SIZE_PX, PIE_STROKE_WIDTH, POPUP_FADE_MS, SELECTOR_COMBAT, SELECTOR_CONTAINERS,
    SELECTOR_ICON, SELECTOR_INFO, Z_BADGE, Z_POPUP,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const KEY_PROP: &str = "__pionKey";

fn class_for(kind: OverlayKind) -> &'static str {
    match kind {
        OverlayKind::Badge => CLASS_BADGE,
        OverlayKind::ActionIcon => CLASS_ACTION_ICON,
        OverlayKind::Composite => CLASS_COMPOSITE,
    }
}

/// Classes the host puts on every icon node regardless of action, plus our
/// own overlay classes; everything else on the node is an action tag.
fn is_structural_class(class: &str) -> bool {
    class == SELECTOR_ICON.trim_start_matches('.')
        || class == CLASS_CONNECTED
        || class.starts_with("pion-")
}

#[derive(Default)]
struct HoverTimers {
    show: Option<Timeout>,
    hide: Option<Timeout>,
}

/// Listener pair keeping a composite's roster popup alive. Dropping the
/// binding unhooks the listeners before the closures go away.
struct PopupBinding {
    target: Element,
    enter: Closure<dyn FnMut()>,
    leave: Closure<dyn FnMut()>,
    _timers: Rc<RefCell<HoverTimers>>,
}

impl Drop for PopupBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("mouseenter", self.enter.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("mouseleave", self.leave.as_ref().unchecked_ref());
    }
}

pub struct DomTree {
    window: web_sys::Window,
    document: web_sys::Document,
    next_key: Cell<u64>,
    clip_serial: Cell<u64>,
    popups: RefCell<HashMap<u64, PopupBinding>>,
}

impl DomTree {
    pub fn new(window: web_sys::Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self {
            window,
            document,
            next_key: Cell::new(1),
            clip_serial: Cell::new(0),
            popups: RefCell::new(HashMap::new()),
        })
    }

    fn select_all(&self, root: Option<&Element>, selector: &str) -> Vec<Element> {
        let list = match root {
            Some(root) => root.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = list else { return Vec::new() };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn create_svg(&self, name: &str) -> Result<Element, JsValue> {
        self.document.create_element_ns(Some(SVG_NS), name)
    }

    fn build_composite(&self, icon: &Element, spec: &CompositeSpec) -> Result<Element, JsValue> {
        let svg = self.create_svg("svg")?;
        svg.set_attribute("class", CLASS_COMPOSITE)?;
        svg.set_attribute("viewBox", "0 0 100 100")?;
        svg.set_attribute("width", &PIE_SIZE_PX.to_string())?;
        svg.set_attribute("height", &PIE_SIZE_PX.to_string())?;
        svg.set_attribute(
            "style",
            &format!(
                "position: absolute; top: 50%; left: 50%; \
                 transform: translate(-50%, -50%); z-index: {Z_BADGE}; pointer-events: auto;"
            ),
        )?;

        let defs = self.create_svg("defs")?;
        svg.append_child(&defs)?;

        let serial = self.clip_serial.get();
        self.clip_serial.set(serial + 1);

        for (index, slice) in spec.slices.iter().enumerate() {
            let clip_id = format!("pion-clip-{serial}-{index}");
            let clip = self.create_svg("clipPath")?;
            clip.set_attribute("id", &clip_id)?;
            let clip_shape = self.create_svg("path")?;
            clip_shape.set_attribute("d", &slice.path)?;
            clip.append_child(&clip_shape)?;
            defs.append_child(&clip)?;

            let image = self.create_svg("image")?;
            image.set_attribute("href", &slice.image_url)?;
            image.set_attribute("x", "0")?;
            image.set_attribute("y", "0")?;
            image.set_attribute("width", "100")?;
            image.set_attribute("height", "100")?;
            image.set_attribute("preserveAspectRatio", "xMidYMid slice")?;
            image.set_attribute("clip-path", &format!("url(#{clip_id})"))?;
            svg.append_child(&image)?;

            let seam = self.create_svg("path")?;
            seam.set_attribute("d", &slice.path)?;
            seam.set_attribute("fill", "none")?;
            seam.set_attribute("stroke", "#ffffff")?;
            seam.set_attribute("stroke-width", &PIE_STROKE_WIDTH.to_string())?;
            svg.append_child(&seam)?;
        }

        let disc = self.create_svg("circle")?;
        disc.set_attribute("class", CLASS_COMPOSITE_CENTER)?;
        disc.set_attribute("cx", "50")?;
        disc.set_attribute("cy", "50")?;
        disc.set_attribute("r", &PIE_CENTER_RADIUS.to_string())?;
        disc.set_attribute("fill", "rgba(0, 0, 0, 0.75)")?;
        disc.set_attribute("stroke", "#ffffff")?;
        disc.set_attribute("stroke-width", &PIE_STROKE_WIDTH.to_string())?;
        svg.append_child(&disc)?;

        let count = self.create_svg("text")?;
        count.set_attribute("class", CLASS_COMPOSITE_COUNT)?;
        count.set_attribute("x", "50")?;
        count.set_attribute("y", "50")?;
        count.set_attribute("text-anchor", "middle")?;
        count.set_attribute("dominant-baseline", "central")?;
        count.set_attribute("fill", "#ffffff")?;
        count.set_attribute("font-size", "16")?;
        count.set_text_content(Some(&spec.count.to_string()));
        svg.append_child(&count)?;

        icon.append_child(&svg)?;

        let popup = self.build_popup(&spec.roster)?;
        icon.append_child(&popup)?;
        self.wire_popup(&svg, &popup);

        Ok(svg)
    }

    fn build_popup(&self, roster: &[RosterRow]) -> Result<Element, JsValue> {
        let popup = self.document.create_element("div")?;
        popup.set_attribute("class", CLASS_ROSTER_POPUP)?;
        popup.set_attribute(
            "style",
            &format!(
                "display: none; opacity: 0; position: absolute; left: 105%; top: 0; \
                 z-index: {Z_POPUP}; background: rgba(20, 20, 20, 0.95); \
                 border: 1px solid rgba(255, 255, 255, 0.2); border-radius: 6px; \
                 padding: 6px; white-space: nowrap; \
                 transition: opacity {POPUP_FADE_MS}ms ease;"
            ),
        )?;
        for row in roster {
            let line = self.document.create_element("div")?;
            line.set_attribute(
                "style",
                "display: flex; align-items: center; gap: 6px; padding: 2px 4px;",
            )?;

            let portrait = self.document.create_element("img")?;
            portrait.set_attribute("src", &row.portrait_url)?;
            portrait.set_attribute("alt", &row.name)?;
            let border = color_for_status(&ColorMap::new(), row.connected, 100);
            portrait.set_attribute(
                "style",
                &format!(
                    "width: 24px; height: 24px; border-radius: 50%; object-fit: cover; \
                     border: 2px solid {border};"
                ),
            )?;
            line.append_child(&portrait)?;

            let name = self.document.create_element("span")?;
            name.set_attribute("style", "color: #ffffff; font-size: 12px;")?;
            name.set_text_content(Some(&row.name));
            line.append_child(&name)?;

            if let Some(glyph) = row.glyph {
                let action = self.document.create_element("span")?;
                action.set_attribute("style", "font-size: 12px;")?;
                action.set_text_content(Some(glyph));
                line.append_child(&action)?;
            }
            popup.append_child(&line)?;
        }
        Ok(popup)
    }

    /// Hover dwell before the roster shows, debounced fade on leave.
    fn wire_popup(&self, svg: &Element, popup: &Element) {
        let timers = Rc::new(RefCell::new(HoverTimers::default()));

        let enter = {
            let timers = Rc::clone(&timers);
            let popup = popup.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut timers_ref = timers.borrow_mut();
                timers_ref.hide.take();
                let popup = popup.clone();
                timers_ref.show = Some(Timeout::new(HOVER_DWELL_MS, move || {
                    if let Some(el) = popup.dyn_ref::<HtmlElement>() {
                        let style = el.style();
                        let _ = style.set_property("display", "block");
                        let _ = style.set_property("opacity", "1");
                    }
                }));
            })
        };

        let leave = {
            let timers = Rc::clone(&timers);
            let popup = popup.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut timers_ref = timers.borrow_mut();
                timers_ref.show.take();
                if let Some(el) = popup.dyn_ref::<HtmlElement>() {
                    let _ = el.style().set_property("opacity", "0");
                }
                let popup = popup.clone();
                timers_ref.hide = Some(Timeout::new(POPUP_FADE_MS, move || {
                    if let Some(el) = popup.dyn_ref::<HtmlElement>() {
                        let _ = el.style().set_property("display", "none");
                    }
                }));
            })
        };

        let _ = svg
            .add_event_listener_with_callback("mouseenter", enter.as_ref().unchecked_ref());
        let _ = svg
            .add_event_listener_with_callback("mouseleave", leave.as_ref().unchecked_ref());

        let key = self.node_key_of(svg).0;
        self.popups.borrow_mut().insert(
            key,
            PopupBinding {
                target: svg.clone(),
                enter,
                leave,
                _timers: timers,
            },
        );
    }

    fn node_key_of(&self, node: &Element) -> NodeKey {
        let prop = JsValue::from_str(KEY_PROP);
        if let Ok(value) = js_sys::Reflect::get(node, &prop) {
            if let Some(id) = value.as_f64() {
                return NodeKey(id as u64);
            }
        }
        let id = self.next_key.get();
        self.next_key.set(id + 1);
        let _ = js_sys::Reflect::set(node, &prop, &JsValue::from_f64(id as f64));
        NodeKey(id)
    }
}

impl HostTree for DomTree {
    type Node = Element;

    fn node_key(&self, node: &Self::Node) -> NodeKey {
        self.node_key_of(node)
    }

    fn containers(&self) -> Vec<Self::Node> {
        self.select_all(None, SELECTOR_CONTAINERS)
    }

    fn icon_nodes(&self, container: &Self::Node) -> Vec<Self::Node> {
        self.select_all(Some(container), SELECTOR_ICON)
    }

    fn info_lines(&self, container: &Self::Node) -> Option<Vec<String>> {
        let info = container.query_selector(SELECTOR_INFO).ok().flatten()?;
        let text = info.text_content().unwrap_or_default();
        Some(text.lines().map(str::to_string).collect())
    }

    fn is_visible(&self, node: &Self::Node) -> bool {
        let rect = node.get_bounding_client_rect();
        rect.width() > 0.0 && rect.height() > 0.0
    }

    fn is_attached(&self, node: &Self::Node) -> bool {
        node.is_connected()
    }

    fn is_suppressed(&self, node: &Self::Node) -> bool {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return false;
        };
        let style = el.style();
        let prop = |name: &str| style.get_property_value(name).unwrap_or_default();
        prop("display") == "none" || prop("visibility") == "hidden" || prop("opacity") == "0"
    }

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&self, node: &Self::Node, name: &str, value: &str) {
        if node.get_attribute(name).as_deref() != Some(value) {
            let _ = node.set_attribute(name, value);
        }
    }

    fn remove_attr(&self, node: &Self::Node, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn action_tags(&self, icon: &Self::Node) -> Vec<String> {
        let classes = icon.class_list();
        (0..classes.length())
            .filter_map(|i| classes.get(i))
            .filter(|class| !is_structural_class(class))
            .collect()
    }

    fn is_connected(&self, icon: &Self::Node) -> bool {
        icon.class_list().contains(CLASS_CONNECTED)
    }

    fn inline_style(&self, node: &Self::Node) -> Option<String> {
        node.get_attribute("style")
    }

    fn set_inline_style(&self, node: &Self::Node, style: Option<&str>) {
        match style {
            Some(style) => {
                let _ = node.set_attribute("style", style);
            }
            None => {
                let _ = node.remove_attribute("style");
            }
        }
    }

    fn set_style_property(&self, node: &Self::Node, property: &str, value: &str) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        if style.get_property_value(property).is_ok_and(|v| v == value) {
            return;
        }
        let _ = style.set_property_with_priority(property, value, "important");
    }

    fn ensure_positioned(&self, node: &Self::Node) {
        let Ok(Some(computed)) = self.window.get_computed_style(node) else {
            return;
        };
        let position = computed.get_property_value("position").unwrap_or_default();
        if position.is_empty() || position == "static" {
            self.set_style_property(node, "position", "relative");
        }
    }

    fn overlay_node(&self, anchor: &Self::Node, kind: OverlayKind) -> Option<Self::Node> {
        anchor
            .query_selector(&format!(":scope > .{}", class_for(kind)))
            .ok()
            .flatten()
    }

    fn remove_overlay(&self, anchor: &Self::Node, kind: OverlayKind) {
        let Some(node) = self.overlay_node(anchor, kind) else {
            return;
        };
        if kind == OverlayKind::Composite {
            self.popups.borrow_mut().remove(&self.node_key_of(&node).0);
            if let Ok(Some(popup)) =
                anchor.query_selector(&format!(":scope > .{CLASS_ROSTER_POPUP}"))
            {
                popup.remove();
            }
        }
        node.remove();
    }

    fn create_badge(&self, icon: &Self::Node, src: &str, alt: &str) -> Self::Node {
        let Ok(badge) = self.document.create_element("img") else {
            return icon.clone();
        };
        let _ = badge.set_attribute("class", CLASS_BADGE);
        let _ = badge.set_attribute("src", src);
        let _ = badge.set_attribute("alt", alt);
        let _ = icon.insert_before(&badge, icon.first_child().as_ref());
        badge
    }

    fn image_source(&self, node: &Self::Node) -> Option<String> {
        node.get_attribute("src")
    }

    fn set_image_source(&self, node: &Self::Node, src: &str, alt: &str) {
        self.set_attr(node, "src", src);
        self.set_attr(node, "alt", alt);
    }

    fn create_action_icon(&self, icon: &Self::Node) -> Self::Node {
        let Ok(bubble) = self.document.create_element("span") else {
            return icon.clone();
        };
        let _ = bubble.set_attribute("class", CLASS_ACTION_ICON);
        let _ = bubble.set_attribute("style", "background: rgba(255, 255, 255, 0.92);");
        let _ = icon.append_child(&bubble);
        bubble
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        node.text_content()
    }

    fn set_text(&self, node: &Self::Node, text: &str) {
        if node.text_content().as_deref() != Some(text) {
            node.set_text_content(Some(text));
        }
    }

    fn insert_composite(&self, icon: &Self::Node, spec: &CompositeSpec) -> Self::Node {
        match self.build_composite(icon, spec) {
            Ok(svg) => svg,
            Err(err) => {
                log::warn!("composite build failed: {err:?}");
                icon.clone()
            }
        }
    }

    fn inject_stylesheet(&self, id: &str, css: &str) {
        if let Some(existing) = self.document.get_element_by_id(id) {
            if existing.text_content().as_deref() != Some(css) {
                existing.set_text_content(Some(css));
            }
            return;
        }
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        if let Some(head) = self.document.head() {
            let _ = head.append_child(&style);
        }
    }

    fn remove_stylesheet(&self, id: &str) {
        if let Some(style) = self.document.get_element_by_id(id) {
            style.remove();
        }
    }

    fn combat_active(&self) -> bool {
        self.document
            .query_selector(SELECTOR_COMBAT)
            .ok()
            .flatten()
            .is_some()
    }
}
