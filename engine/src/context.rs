//! The engine context: one object owning the caches, probe registry and
//! timer handles, with the injected capabilities threaded through it.
//! Everything the overlay does hangs off an `Rc<Engine<H>>`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use pion_shared::colors::{KEY_CONNECTED, KEY_DISCONNECTED};
use pion_shared::config::{STYLESHEET_ID, sizing_stylesheet};
use pion_shared::prefs::{self, PreferenceStore};

use crate::cache::OverlayCaches;
use crate::combat::OverlayMode;
use crate::host::HostTree;
use crate::platform::{CancelHandle, Platform};
use crate::probe::{ProbeRegistry, ResourceProbe};

pub struct Engine<H: HostTree> {
    pub(crate) host: H,
    pub(crate) probe: Rc<dyn ResourceProbe>,
    pub(crate) store: Rc<dyn PreferenceStore>,
    pub(crate) platform: Rc<dyn Platform>,
    pub(crate) caches: RefCell<OverlayCaches>,
    pub(crate) probes: ProbeRegistry,
    pub(crate) interval_tick: RefCell<Option<Box<dyn CancelHandle>>>,
    pub(crate) frame_tick: RefCell<Option<Box<dyn CancelHandle>>>,
    pub(crate) last_frame_pass: Cell<f64>,
    pub(crate) combat_watch: RefCell<Option<Box<dyn CancelHandle>>>,
    pub(crate) mode: Cell<OverlayMode>,
    open_configuration: RefCell<Option<Box<dyn Fn()>>>,
    weak_self: RefCell<Weak<Self>>,
}

impl<H: HostTree + 'static> Engine<H> {
    pub fn new(
        host: H,
        probe: Rc<dyn ResourceProbe>,
        store: Rc<dyn PreferenceStore>,
        platform: Rc<dyn Platform>,
    ) -> Rc<Self> {
        let engine = Rc::new(Self {
            host,
            probe,
            store,
            platform,
            caches: RefCell::new(OverlayCaches::default()),
            probes: ProbeRegistry::new(),
            interval_tick: RefCell::new(None),
            frame_tick: RefCell::new(None),
            last_frame_pass: Cell::new(f64::MIN),
            combat_watch: RefCell::new(None),
            mode: Cell::new(OverlayMode::Active),
            open_configuration: RefCell::new(None),
            weak_self: RefCell::new(Weak::new()),
        });
        *engine.weak_self.borrow_mut() = Rc::downgrade(&engine);
        engine
    }

    /// Install the sizing stylesheet and start the reapply and combat
    /// clocks. Safe to call again after `dispose`.
    pub fn init(&self) {
        log::info!("overlay engine starting");
        self.refresh_stylesheet();
        self.start_scheduler();
        self.start_combat_watcher();
    }

    /// Cancel every timer and frame source and drop all cached state.
    /// Overlay nodes already in the tree are left as they are; call
    /// `remove_all` first for a clean page.
    pub fn dispose(&self) {
        self.stop_scheduler();
        self.stop_combat_watcher();
        self.caches.borrow_mut().clear_all();
        self.probes.clear();
        log::info!("overlay engine stopped");
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn strong(&self) -> Option<Rc<Self>> {
        self.weak_self.borrow().upgrade()
    }

    /// Queue one full pass over the tree on the platform's task queue.
    pub fn spawn_pass(&self, force: bool) {
        let Some(engine) = self.strong() else { return };
        self.platform.spawn_local(Box::pin(async move {
            engine.apply_all(force).await;
        }));
    }

    /// Rebuild the sizing stylesheet from the current size preferences.
    pub fn refresh_stylesheet(&self) {
        let css = sizing_stylesheet(
            prefs::badge_size(self.store.as_ref()),
            prefs::action_icon_size(self.store.as_ref()),
        );
        self.host.inject_stylesheet(STYLESHEET_ID, &css);
    }

    pub fn set_badges_enabled(&self, enabled: bool) {
        prefs::save_badges_enabled(self.store.as_ref(), enabled);
        if enabled {
            self.spawn_pass(true);
        } else {
            self.remove_all();
        }
    }

    pub fn set_action_icons_enabled(&self, enabled: bool) {
        prefs::save_action_icons_enabled(self.store.as_ref(), enabled);
        self.spawn_pass(true);
    }

    pub fn set_badge_size(&self, size: u32) {
        prefs::save_badge_size(self.store.as_ref(), size);
        self.refresh_stylesheet();
    }

    pub fn set_action_icon_size(&self, size: u32) {
        prefs::save_action_icon_size(self.store.as_ref(), size);
        self.refresh_stylesheet();
    }

    /// Persist a custom border color for one connection status and restyle
    /// existing badges in place.
    pub fn set_status_color(&self, connected: bool, hex: &str) {
        let mut colors = prefs::custom_colors(self.store.as_ref());
        let key = if connected { KEY_CONNECTED } else { KEY_DISCONNECTED };
        colors.insert(key.to_string(), hex.to_string());
        prefs::save_custom_colors(self.store.as_ref(), &colors);
        self.refresh_all_borders();
    }

    pub fn set_color_opacity(&self, opacity: u32) {
        prefs::save_color_opacity(self.store.as_ref(), opacity);
        self.refresh_all_borders();
    }

    /// Register the external configuration surface. The engine only holds
    /// the hook; what it opens is not its concern.
    pub fn on_open_configuration(&self, callback: Box<dyn Fn()>) {
        *self.open_configuration.borrow_mut() = Some(callback);
    }

    pub fn open_configuration(&self) {
        if let Some(callback) = self.open_configuration.borrow().as_ref() {
            callback();
        }
    }
}
