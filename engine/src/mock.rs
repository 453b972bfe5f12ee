//! In-memory host tree, hand-cranked platform and scripted probe for
//! exercising the engine without a browser. The tree counts mutations so
//! tests can assert that steady-state passes touch nothing.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use pion_shared::prefs::PreferenceStore;

use crate::context::Engine;
use crate::host::{CompositeSpec, HostTree, NodeKey, OverlayKind};
use crate::platform::{CancelHandle, Platform};
use crate::probe::ResourceProbe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNode(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Container,
    Icon,
    Badge,
    ActionIcon,
    Composite,
}

fn kind_of(kind: OverlayKind) -> Kind {
    match kind {
        OverlayKind::Badge => Kind::Badge,
        OverlayKind::ActionIcon => Kind::ActionIcon,
        OverlayKind::Composite => Kind::Composite,
    }
}

#[derive(Default)]
struct NodeData {
    kind: Option<Kind>,
    parent: Option<u64>,
    children: Vec<u64>,
    attrs: BTreeMap<String, String>,
    style: Option<Vec<(String, String)>>,
    tags: Vec<String>,
    connected: bool,
    visible: bool,
    detached: bool,
    positioned: bool,
    text: Option<String>,
    image_src: Option<String>,
    image_alt: Option<String>,
    composite: Option<CompositeSpec>,
    info_lines: Option<Vec<String>>,
}

#[derive(Default)]
struct TreeData {
    nodes: HashMap<u64, NodeData>,
    containers: Vec<u64>,
    next_id: u64,
    mutations: u64,
    stylesheets: BTreeMap<String, String>,
    combat: bool,
}

impl TreeData {
    fn alloc(&mut self, kind: Kind, parent: Option<u64>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeData {
                kind: Some(kind),
                parent,
                visible: true,
                ..NodeData::default()
            },
        );
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.push(id);
            }
        }
        id
    }

    fn detach(&mut self, id: u64) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|child| *child != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.detached = true;
        }
    }
}

fn render_style(props: &[(String, String)]) -> String {
    props
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn parse_style(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[derive(Clone, Default)]
pub struct MockTree {
    inner: Rc<RefCell<TreeData>>,
}

impl MockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&self) -> MockNode {
        let mut data = self.inner.borrow_mut();
        let id = data.alloc(Kind::Container, None);
        data.containers.push(id);
        MockNode(id)
    }

    pub fn add_icon(&self, container: &MockNode) -> MockNode {
        let id = self.inner.borrow_mut().alloc(Kind::Icon, Some(container.0));
        MockNode(id)
    }

    pub fn set_info_lines(&self, container: &MockNode, lines: &[&str]) {
        self.with_node(container, |node| {
            node.info_lines = Some(lines.iter().map(|l| l.to_string()).collect());
        });
    }

    pub fn set_tags(&self, icon: &MockNode, tags: &[&str]) {
        self.with_node(icon, |node| {
            node.tags = tags.iter().map(|t| t.to_string()).collect();
        });
    }

    pub fn set_connected(&self, icon: &MockNode, connected: bool) {
        self.with_node(icon, |node| node.connected = connected);
    }

    pub fn set_visible(&self, node: &MockNode, visible: bool) {
        self.with_node(node, |node| node.visible = visible);
    }

    pub fn set_combat(&self, active: bool) {
        self.inner.borrow_mut().combat = active;
    }

    /// Host-side vandalism: drop the node from the tree without going
    /// through the engine (does not count as a mutation).
    pub fn detach(&self, node: &MockNode) {
        self.inner.borrow_mut().detach(node.0);
    }

    pub fn remove_node(&self, node: &MockNode) {
        self.detach(node);
    }

    pub fn mutation_count(&self) -> u64 {
        self.inner.borrow().mutations
    }

    pub fn stylesheet(&self, id: &str) -> Option<String> {
        self.inner.borrow().stylesheets.get(id).cloned()
    }

    pub fn badge_of(&self, icon: &MockNode) -> Option<MockNode> {
        self.overlay_node(icon, OverlayKind::Badge)
    }

    pub fn action_icon_of(&self, icon: &MockNode) -> Option<MockNode> {
        self.overlay_node(icon, OverlayKind::ActionIcon)
    }

    pub fn composite_of(&self, icon: &MockNode) -> Option<MockNode> {
        self.overlay_node(icon, OverlayKind::Composite)
    }

    pub fn composite_spec_of(&self, node: &MockNode) -> Option<CompositeSpec> {
        self.inner.borrow().nodes.get(&node.0)?.composite.clone()
    }

    pub fn style_prop(&self, node: &MockNode, property: &str) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.0)?
            .style
            .as_ref()?
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    fn with_node<R>(&self, node: &MockNode, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        self.inner.borrow_mut().nodes.get_mut(&node.0).map(f)
    }

    fn read_node<R>(&self, node: &MockNode, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.inner.borrow().nodes.get(&node.0).map(f)
    }

    fn count_mutation(&self) {
        self.inner.borrow_mut().mutations += 1;
    }
}

impl HostTree for MockTree {
    type Node = MockNode;

    fn node_key(&self, node: &Self::Node) -> NodeKey {
        NodeKey(node.0)
    }

    fn containers(&self) -> Vec<Self::Node> {
        let data = self.inner.borrow();
        data.containers
            .iter()
            .filter(|id| data.nodes.get(id).is_some_and(|n| !n.detached))
            .map(|id| MockNode(*id))
            .collect()
    }

    fn icon_nodes(&self, container: &Self::Node) -> Vec<Self::Node> {
        let data = self.inner.borrow();
        let Some(node) = data.nodes.get(&container.0) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|id| {
                data.nodes
                    .get(id)
                    .is_some_and(|n| n.kind == Some(Kind::Icon) && !n.detached)
            })
            .map(|id| MockNode(*id))
            .collect()
    }

    fn info_lines(&self, container: &Self::Node) -> Option<Vec<String>> {
        self.read_node(container, |n| n.info_lines.clone()).flatten()
    }

    fn is_visible(&self, node: &Self::Node) -> bool {
        self.read_node(node, |n| n.visible && !n.detached)
            .unwrap_or(false)
    }

    fn is_attached(&self, node: &Self::Node) -> bool {
        self.read_node(node, |n| !n.detached).unwrap_or(false)
    }

    fn is_suppressed(&self, node: &Self::Node) -> bool {
        self.read_node(node, |n| {
            n.style.as_ref().is_some_and(|style| {
                style.iter().any(|(k, v)| {
                    (k == "display" && v == "none")
                        || (k == "visibility" && v == "hidden")
                        || (k == "opacity" && v == "0")
                })
            })
        })
        .unwrap_or(false)
    }

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String> {
        self.read_node(node, |n| n.attrs.get(name).cloned()).flatten()
    }

    fn set_attr(&self, node: &Self::Node, name: &str, value: &str) {
        let changed = self
            .with_node(node, |n| {
                if n.attrs.get(name).map(String::as_str) == Some(value) {
                    false
                } else {
                    n.attrs.insert(name.to_string(), value.to_string());
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn remove_attr(&self, node: &Self::Node, name: &str) {
        let removed = self
            .with_node(node, |n| n.attrs.remove(name).is_some())
            .unwrap_or(false);
        if removed {
            self.count_mutation();
        }
    }

    fn action_tags(&self, icon: &Self::Node) -> Vec<String> {
        self.read_node(icon, |n| n.tags.clone()).unwrap_or_default()
    }

    fn is_connected(&self, icon: &Self::Node) -> bool {
        self.read_node(icon, |n| n.connected).unwrap_or(false)
    }

    fn inline_style(&self, node: &Self::Node) -> Option<String> {
        self.read_node(node, |n| n.style.as_deref().map(render_style))
            .flatten()
    }

    fn set_inline_style(&self, node: &Self::Node, style: Option<&str>) {
        let next = style.map(parse_style);
        let changed = self
            .with_node(node, |n| {
                if n.style == next {
                    false
                } else {
                    n.style = next;
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn set_style_property(&self, node: &Self::Node, property: &str, value: &str) {
        let changed = self
            .with_node(node, |n| {
                let style = n.style.get_or_insert_with(Vec::new);
                match style.iter_mut().find(|(k, _)| k == property) {
                    Some((_, existing)) if existing.as_str() == value => false,
                    Some((_, existing)) => {
                        *existing = value.to_string();
                        true
                    }
                    None => {
                        style.push((property.to_string(), value.to_string()));
                        true
                    }
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn ensure_positioned(&self, node: &Self::Node) {
        let changed = self
            .with_node(node, |n| {
                if n.positioned {
                    false
                } else {
                    n.positioned = true;
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn overlay_node(&self, anchor: &Self::Node, kind: OverlayKind) -> Option<Self::Node> {
        let want = kind_of(kind);
        let data = self.inner.borrow();
        let anchor = data.nodes.get(&anchor.0)?;
        anchor
            .children
            .iter()
            .find(|id| {
                data.nodes
                    .get(id)
                    .is_some_and(|n| n.kind == Some(want) && !n.detached)
            })
            .map(|id| MockNode(*id))
    }

    fn remove_overlay(&self, anchor: &Self::Node, kind: OverlayKind) {
        if let Some(node) = self.overlay_node(anchor, kind) {
            self.inner.borrow_mut().detach(node.0);
            self.count_mutation();
        }
    }

    fn create_badge(&self, icon: &Self::Node, src: &str, alt: &str) -> Self::Node {
        let mut data = self.inner.borrow_mut();
        let id = data.alloc(Kind::Badge, Some(icon.0));
        if let Some(node) = data.nodes.get_mut(&id) {
            node.image_src = Some(src.to_string());
            node.image_alt = Some(alt.to_string());
        }
        data.mutations += 1;
        MockNode(id)
    }

    fn image_source(&self, node: &Self::Node) -> Option<String> {
        self.read_node(node, |n| n.image_src.clone()).flatten()
    }

    fn set_image_source(&self, node: &Self::Node, src: &str, alt: &str) {
        let changed = self
            .with_node(node, |n| {
                if n.image_src.as_deref() == Some(src) && n.image_alt.as_deref() == Some(alt) {
                    false
                } else {
                    n.image_src = Some(src.to_string());
                    n.image_alt = Some(alt.to_string());
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn create_action_icon(&self, icon: &Self::Node) -> Self::Node {
        let mut data = self.inner.borrow_mut();
        let id = data.alloc(Kind::ActionIcon, Some(icon.0));
        data.mutations += 1;
        MockNode(id)
    }

    fn text(&self, node: &Self::Node) -> Option<String> {
        self.read_node(node, |n| n.text.clone()).flatten()
    }

    fn set_text(&self, node: &Self::Node, text: &str) {
        let changed = self
            .with_node(node, |n| {
                if n.text.as_deref() == Some(text) {
                    false
                } else {
                    n.text = Some(text.to_string());
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.count_mutation();
        }
    }

    fn insert_composite(&self, icon: &Self::Node, spec: &CompositeSpec) -> Self::Node {
        let mut data = self.inner.borrow_mut();
        let id = data.alloc(Kind::Composite, Some(icon.0));
        if let Some(node) = data.nodes.get_mut(&id) {
            node.composite = Some(spec.clone());
        }
        data.mutations += 1;
        MockNode(id)
    }

    fn inject_stylesheet(&self, id: &str, css: &str) {
        let mut data = self.inner.borrow_mut();
        if data.stylesheets.get(id).map(String::as_str) == Some(css) {
            return;
        }
        data.stylesheets.insert(id.to_string(), css.to_string());
        data.mutations += 1;
    }

    fn remove_stylesheet(&self, id: &str) {
        let mut data = self.inner.borrow_mut();
        if data.stylesheets.remove(id).is_some() {
            data.mutations += 1;
        }
    }

    fn combat_active(&self) -> bool {
        self.inner.borrow().combat
    }
}

struct DeadOnDrop {
    alive: Rc<Cell<bool>>,
}

impl CancelHandle for DeadOnDrop {}

impl Drop for DeadOnDrop {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// Platform whose clocks only tick when the test cranks them.
pub struct MockPlatform {
    now: Cell<f64>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    intervals: RefCell<Vec<(Rc<dyn Fn()>, Rc<Cell<bool>>)>>,
    frames: RefCell<Vec<(Box<dyn FnOnce()>, Rc<Cell<bool>>)>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            now: Cell::new(100_000.0),
            pool: RefCell::new(pool),
            spawner,
            intervals: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Fire every live interval once, in registration order.
    pub fn fire_intervals(&self) {
        self.intervals.borrow_mut().retain(|(_, alive)| alive.get());
        let snapshot: Vec<(Rc<dyn Fn()>, Rc<Cell<bool>>)> = self.intervals.borrow().clone();
        for (callback, alive) in snapshot {
            if alive.get() {
                callback();
            }
        }
    }

    /// Fire every live pending frame callback once.
    pub fn fire_frame(&self) {
        let pending: Vec<(Box<dyn FnOnce()>, Rc<Cell<bool>>)> =
            self.frames.borrow_mut().drain(..).collect();
        for (callback, alive) in pending {
            if alive.get() {
                callback();
            }
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames
            .borrow()
            .iter()
            .filter(|(_, alive)| alive.get())
            .count()
    }

    pub fn live_timer_count(&self) -> usize {
        self.intervals
            .borrow()
            .iter()
            .filter(|(_, alive)| alive.get())
            .count()
    }

    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl Platform for MockPlatform {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        let _ = self.spawner.spawn_local(task);
    }

    fn interval(&self, _period_ms: u32, callback: Box<dyn Fn()>) -> Box<dyn CancelHandle> {
        let alive = Rc::new(Cell::new(true));
        self.intervals
            .borrow_mut()
            .push((Rc::from(callback), alive.clone()));
        Box::new(DeadOnDrop { alive })
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Box<dyn CancelHandle> {
        let alive = Rc::new(Cell::new(true));
        self.frames.borrow_mut().push((callback, alive.clone()));
        Box::new(DeadOnDrop { alive })
    }
}

/// Scripted existence probe keyed by occupant name. Unscripted names
/// resolve to `true` immediately; manual names park until released.
#[derive(Default)]
pub struct MockProbe {
    verdicts: RefCell<HashMap<String, bool>>,
    manual: RefCell<HashSet<String>>,
    parked: RefCell<HashMap<String, Vec<oneshot::Sender<bool>>>>,
    calls: RefCell<Vec<String>>,
}

impl MockProbe {
    pub fn script(&self, name: &str, exists: bool) {
        self.verdicts.borrow_mut().insert(name.to_string(), exists);
    }

    pub fn script_manual(&self, name: &str) {
        self.manual.borrow_mut().insert(name.to_string());
    }

    /// Resolve every parked probe for `name`.
    pub fn release(&self, name: &str, exists: bool) {
        let senders = self.parked.borrow_mut().remove(name).unwrap_or_default();
        for sender in senders {
            let _ = sender.send(exists);
        }
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|n| *n == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    fn name_from_url(url: &str) -> String {
        url.rsplit('/')
            .next()
            .unwrap_or(url)
            .trim_end_matches(".png")
            .to_string()
    }
}

impl ResourceProbe for MockProbe {
    fn probe(&self, url: &str) -> LocalBoxFuture<'static, bool> {
        let name = Self::name_from_url(url);
        self.calls.borrow_mut().push(name.clone());
        if self.manual.borrow().contains(&name) {
            let (sender, receiver) = oneshot::channel();
            self.parked.borrow_mut().entry(name).or_default().push(sender);
            return Box::pin(async move { receiver.await.unwrap_or(false) });
        }
        let exists = self.verdicts.borrow().get(&name).copied().unwrap_or(true);
        Box::pin(future::ready(exists))
    }
}

#[derive(Default)]
pub struct MockStore {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MockStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Fully wired engine over mocks.
pub struct Harness {
    pub tree: MockTree,
    pub probe: Rc<MockProbe>,
    pub store: Rc<MockStore>,
    pub platform: Rc<MockPlatform>,
    pub engine: Rc<Engine<MockTree>>,
}

impl Harness {
    pub fn new() -> Self {
        let tree = MockTree::new();
        let probe = Rc::new(MockProbe::default());
        let store = Rc::new(MockStore::default());
        let platform = Rc::new(MockPlatform::new());
        let engine = Engine::new(
            tree.clone(),
            probe.clone(),
            store.clone(),
            platform.clone(),
        );
        Self {
            tree,
            probe,
            store,
            platform,
            engine,
        }
    }

    /// Queue one pass and drive it to completion.
    pub fn run_pass(&self, force: bool) {
        self.engine.spawn_pass(force);
        self.platform.run_until_stalled();
    }
}
