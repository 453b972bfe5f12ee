//! The reapply clocks. Two sources drive passes: a fixed interval that
//! survives throttled or hidden pages, and a paint-aligned frame loop that
//! catches host mutations with no visible lag. Passes are cheap by
//! construction (the apply ladder), so the overlap is harmless.

use pion_shared::config::{FRAME_THROTTLE_MS, REAPPLY_INTERVAL_MS};
use pion_shared::prefs;

use crate::context::Engine;
use crate::host::HostTree;

impl<H: HostTree + 'static> Engine<H> {
    /// Start both clocks. Any previous scheduler generation is cancelled
    /// first, so restarts never stack timers.
    pub fn start_scheduler(&self) {
        self.stop_scheduler();
        let Some(engine) = self.strong() else { return };
        let handle = self.platform.interval(
            REAPPLY_INTERVAL_MS,
            Box::new(move || engine.interval_pass()),
        );
        *self.interval_tick.borrow_mut() = Some(handle);
        self.arm_frame();
    }

    /// Cancel both clocks. Dropping the handles cancels anything pending.
    pub fn stop_scheduler(&self) {
        self.interval_tick.borrow_mut().take();
        self.frame_tick.borrow_mut().take();
    }

    pub fn scheduler_running(&self) -> bool {
        self.interval_tick.borrow().is_some() || self.frame_tick.borrow().is_some()
    }

    fn interval_pass(&self) {
        if !prefs::badges_enabled(self.store.as_ref()) {
            return;
        }
        self.spawn_pass(false);
    }

    fn arm_frame(&self) {
        let Some(engine) = self.strong() else { return };
        let handle = self.platform.request_frame(Box::new(move || {
            engine.frame_tick.borrow_mut().take();
            if prefs::badges_enabled(engine.store.as_ref()) {
                let now = engine.platform.now();
                if now - engine.last_frame_pass.get() >= FRAME_THROTTLE_MS {
                    engine.last_frame_pass.set(now);
                    engine.spawn_pass(false);
                }
            }
            engine.arm_frame();
        }));
        *self.frame_tick.borrow_mut() = Some(handle);
    }
}
