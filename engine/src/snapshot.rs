//! Inline-style snapshots. Before the engine rewrites a host node's inline
//! style it stashes the original in attributes on the node itself, so the
//! snapshot survives engine restarts and can be restored exactly once.

use pion_shared::config::{ATTR_ORIGINAL_STYLE, ATTR_STYLE_SAVED};

use crate::host::HostTree;

/// Record the node's current inline style if no snapshot exists yet.
/// Re-saving over an existing snapshot would capture engine-written styles,
/// so a second save is a no-op.
pub fn save_original_style<H: HostTree>(host: &H, node: &H::Node) {
    if has_snapshot(host, node) {
        return;
    }
    let style = host.inline_style(node).unwrap_or_default();
    host.set_attr(node, ATTR_ORIGINAL_STYLE, &style);
    host.set_attr(node, ATTR_STYLE_SAVED, "true");
}

/// Put the snapshotted inline style back and drop the snapshot. Returns
/// `false` (and logs) when no snapshot exists; the node is left untouched.
pub fn restore_original_style<H: HostTree>(host: &H, node: &H::Node) -> bool {
    if !has_snapshot(host, node) {
        log::warn!("style restore requested for a node without a snapshot");
        return false;
    }
    let original = host.attr(node, ATTR_ORIGINAL_STYLE).unwrap_or_default();
    if original.is_empty() {
        host.set_inline_style(node, None);
    } else {
        host.set_inline_style(node, Some(&original));
    }
    host.remove_attr(node, ATTR_STYLE_SAVED);
    host.remove_attr(node, ATTR_ORIGINAL_STYLE);
    true
}

pub fn has_snapshot<H: HostTree>(host: &H, node: &H::Node) -> bool {
    host.attr(node, ATTR_STYLE_SAVED).as_deref() == Some("true")
}
