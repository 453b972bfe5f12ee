//! Multi-occupant layout: when a container holds several icon nodes, the
//! single badge gives way to one pie composite whose slices rank the
//! occupants by prominence.

use std::cmp::Reverse;

use pion_shared::config::{ATTR_COMPOSITE, portrait_url};
use pion_shared::geometry::{compute_slices, pie_path};
use pion_shared::{ActionTag, occupant_priority};

use crate::context::Engine;
use crate::host::{CompositeSpec, HostTree, OverlayKind, RosterRow, SliceSpec};
use crate::snapshot;

/// One occupant of a multi-occupant container, extracted and ready to rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupant {
    pub name: String,
    pub portrait_url: String,
    pub connected: bool,
    pub action: Option<ActionTag>,
    /// Position among the container's icon nodes, the tie-breaker that
    /// keeps equal-priority occupants in source order.
    pub source_index: usize,
}

/// Lay a ranked occupant list out as a composite: equal slices clockwise
/// from 12 o'clock, most prominent occupant first.
pub fn composite_spec(occupants: &[Occupant]) -> CompositeSpec {
    let slices = compute_slices(occupants.len());
    CompositeSpec {
        count: occupants.len(),
        slices: occupants
            .iter()
            .zip(slices)
            .map(|(occupant, slice)| SliceSpec {
                path: pie_path(slice),
                image_url: occupant.portrait_url.clone(),
            })
            .collect(),
        roster: occupants
            .iter()
            .map(|occupant| RosterRow {
                name: occupant.name.clone(),
                portrait_url: occupant.portrait_url.clone(),
                connected: occupant.connected,
                glyph: occupant.action.and_then(ActionTag::glyph),
            })
            .collect(),
    }
}

impl<H: HostTree + 'static> Engine<H> {
    /// Extract the container's occupants and sort them by prominence:
    /// combatants, then connected occupants, then the rest. The sort is
    /// stable, so ties keep source order.
    pub fn ranked_occupants(&self, container: &H::Node, icons: &[H::Node]) -> Vec<Occupant> {
        let names = self.host.info_lines(container).unwrap_or_default();
        let mut occupants: Vec<Occupant> = icons
            .iter()
            .enumerate()
            .map(|(index, icon)| {
                let name = names
                    .get(index)
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .unwrap_or_else(|| format!("Occupant {}", index + 1));
                let action = ActionTag::classify(&self.host.action_tags(icon));
                Occupant {
                    portrait_url: portrait_url(&name),
                    name,
                    connected: self.host.is_connected(icon),
                    action,
                    source_index: index,
                }
            })
            .collect();
        occupants.sort_by_key(|occupant| Reverse(occupant_priority(occupant.action, occupant.connected)));
        occupants
    }

    /// Build (or rebuild) the composite for a multi-occupant container.
    /// The container's marker attribute records the occupant count; while
    /// the count is unchanged and the composite node survives, the call is
    /// a no-op unless forced.
    pub(crate) fn apply_composite(&self, container: &H::Node, icons: &[H::Node], force: bool) {
        if !self.host.is_visible(container) {
            return;
        }
        let Some(primary) = icons.first() else { return };

        let count_marker = self.host.attr(container, ATTR_COMPOSITE);
        let existing = self.host.overlay_node(primary, OverlayKind::Composite);
        let current = icons.len().to_string();
        if !force && existing.is_some() && count_marker.as_deref() == Some(current.as_str()) {
            return;
        }

        // A container that just grew past one occupant may still carry a
        // badge and glyph; the composite replaces everything.
        for icon in icons {
            self.host.remove_overlay(icon, OverlayKind::Badge);
            self.host.remove_overlay(icon, OverlayKind::ActionIcon);
            self.host.remove_overlay(icon, OverlayKind::Composite);
        }

        let occupants = self.ranked_occupants(container, icons);
        log::debug!("compositing {} occupants", occupants.len());

        snapshot::save_original_style(&self.host, primary);
        self.host.ensure_positioned(primary);
        self.host.insert_composite(primary, &composite_spec(&occupants));

        for icon in icons.iter().skip(1) {
            snapshot::save_original_style(&self.host, icon);
            self.host.set_style_property(icon, "display", "none");
        }

        self.host.set_attr(container, ATTR_COMPOSITE, &current);
    }
}
