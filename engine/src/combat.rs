//! Combat suspension. While the host page is in its combat view the
//! overlay must vanish completely and give the page its original styles
//! back; when combat ends the overlay rebuilds from scratch.

use pion_shared::config::{COMBAT_POLL_MS, STYLESHEET_ID};

use crate::context::Engine;
use crate::host::HostTree;
use crate::snapshot;

/// Whether the overlay is currently rendering or standing aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    Active,
    Suspended,
}

impl<H: HostTree + 'static> Engine<H> {
    pub fn mode(&self) -> OverlayMode {
        self.mode.get()
    }

    /// Start polling the host's combat flag. Restarting replaces the
    /// previous watcher.
    pub fn start_combat_watcher(&self) {
        self.stop_combat_watcher();
        let Some(engine) = self.strong() else { return };
        let handle = self
            .platform
            .interval(COMBAT_POLL_MS, Box::new(move || engine.poll_combat()));
        *self.combat_watch.borrow_mut() = Some(handle);
    }

    pub fn stop_combat_watcher(&self) {
        self.combat_watch.borrow_mut().take();
    }

    pub fn combat_watcher_running(&self) -> bool {
        self.combat_watch.borrow().is_some()
    }

    /// One edge-triggered look at the combat flag.
    pub fn poll_combat(&self) {
        let active = self.host.combat_active();
        match (self.mode.get(), active) {
            (OverlayMode::Active, true) => self.enter_combat(),
            (OverlayMode::Suspended, false) => self.exit_combat(),
            _ => {}
        }
    }

    /// Stand aside: stop repainting, put borrowed styles back, pull the
    /// sizing stylesheet and sweep every overlay node out of the tree.
    pub(crate) fn enter_combat(&self) {
        log::info!("combat started, suspending overlay");
        self.mode.set(OverlayMode::Suspended);
        self.stop_scheduler();
        for container in self.host.containers() {
            for icon in self.host.icon_nodes(&container) {
                if snapshot::has_snapshot(&self.host, &icon) {
                    snapshot::restore_original_style(&self.host, &icon);
                }
            }
        }
        self.host.remove_stylesheet(STYLESHEET_ID);
        self.remove_all();
    }

    /// Come back: stylesheet first so the forced rebuild lands styled,
    /// then one forced pass and the clocks.
    pub(crate) fn exit_combat(&self) {
        log::info!("combat over, rebuilding overlay");
        self.mode.set(OverlayMode::Active);
        self.refresh_stylesheet();
        self.spawn_pass(true);
        self.start_scheduler();
    }
}
