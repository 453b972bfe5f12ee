//! Host-tree capability. The engine never touches the DOM directly; it
//! observes and mutates the host page through this trait, which keeps the
//! core testable against an in-memory tree.

/// Stable identity for a host node, used as a cache key. Keys survive
/// attribute and style mutations but not node replacement: a host that
/// tears a node down and rebuilds it yields a fresh key, which is exactly
/// what invalidates the per-node caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(pub u64);

/// The overlay node families the engine owns inside the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Circular portrait image anchored inside an icon node.
    Badge,
    /// Small glyph bubble next to the badge.
    ActionIcon,
    /// Multi-occupant pie composite (and its hover roster popup).
    Composite,
}

/// One angular portrait slice of a composite.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSpec {
    /// SVG path of the slice on a 100x100 viewBox.
    pub path: String,
    pub image_url: String,
}

/// One line of the composite's hover roster.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub name: String,
    pub portrait_url: String,
    pub connected: bool,
    pub glyph: Option<&'static str>,
}

/// Complete description of a multi-occupant composite, already laid out.
/// The host only has to turn this into nodes; no layout decisions remain.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSpec {
    pub count: usize,
    pub slices: Vec<SliceSpec>,
    pub roster: Vec<RosterRow>,
}

/// Everything the engine needs from the page it decorates.
///
/// Read operations must be cheap; they run on every pass. Write operations
/// must be no-ops when the requested state already holds, so that a steady
/// pass over an unchanged tree performs zero mutations.
pub trait HostTree {
    /// Host node handle. Cloning is cheap (a reference, not a subtree copy).
    type Node: Clone;

    fn node_key(&self, node: &Self::Node) -> NodeKey;

    /// All occupant containers currently in the tree, in document order.
    fn containers(&self) -> Vec<Self::Node>;

    /// The occupant icon nodes inside a container, in source order.
    fn icon_nodes(&self, container: &Self::Node) -> Vec<Self::Node>;

    /// Occupant names from the container's info node, one per line in source
    /// order. `None` when the container has no info node at all.
    fn info_lines(&self, container: &Self::Node) -> Option<Vec<String>>;

    fn is_visible(&self, node: &Self::Node) -> bool;

    /// Whether the node is still attached to the tree.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Whether the node's own inline style hides it (`display: none`,
    /// `visibility: hidden` or `opacity: 0`).
    fn is_suppressed(&self, node: &Self::Node) -> bool;

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attr(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attr(&self, node: &Self::Node, name: &str);

    /// Action-slot tags on an icon node, structural classes already
    /// filtered out by the host.
    fn action_tags(&self, icon: &Self::Node) -> Vec<String>;

    /// Whether the occupant behind this icon is flagged as connected.
    fn is_connected(&self, icon: &Self::Node) -> bool;

    /// The raw inline style attribute, `None` when absent.
    fn inline_style(&self, node: &Self::Node) -> Option<String>;

    /// Replace the whole inline style attribute (`None` removes it).
    fn set_inline_style(&self, node: &Self::Node, style: Option<&str>);

    /// Set one inline style property, overriding host stylesheets.
    fn set_style_property(&self, node: &Self::Node, property: &str, value: &str);

    /// Give the node a positioning context if it has none, so absolutely
    /// positioned overlay children anchor to it.
    fn ensure_positioned(&self, node: &Self::Node);

    /// The overlay node of the given kind anchored at `anchor`, if present.
    fn overlay_node(&self, anchor: &Self::Node, kind: OverlayKind) -> Option<Self::Node>;

    /// Remove the overlay node of the given kind anchored at `anchor`,
    /// including any satellite nodes it owns (the composite's popup).
    fn remove_overlay(&self, anchor: &Self::Node, kind: OverlayKind);

    /// Create a badge image inside the icon node and return it.
    fn create_badge(&self, icon: &Self::Node, src: &str, alt: &str) -> Self::Node;

    fn image_source(&self, node: &Self::Node) -> Option<String>;
    fn set_image_source(&self, node: &Self::Node, src: &str, alt: &str);

    /// Create an empty action-icon bubble inside the icon node.
    fn create_action_icon(&self, icon: &Self::Node) -> Self::Node;

    fn text(&self, node: &Self::Node) -> Option<String>;
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Build a composite from the spec, anchor it at the icon node and wire
    /// its hover roster. Replaces nothing; the caller removes stale
    /// composites first.
    fn insert_composite(&self, icon: &Self::Node, spec: &CompositeSpec) -> Self::Node;

    /// Install (or replace the content of) a page-level stylesheet.
    fn inject_stylesheet(&self, id: &str, css: &str);

    fn remove_stylesheet(&self, id: &str);

    /// Whether the host page is currently in its combat view.
    fn combat_active(&self) -> bool;
}
