//! Browser clocks for the engine: performance.now, setInterval and
//! requestAnimationFrame, each wrapped in a binding that cancels itself
//! and releases its JS callback on drop.

use futures::future::LocalBoxFuture;
use pion_engine::{CancelHandle, Platform};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub struct WebPlatform {
    window: web_sys::Window,
}

impl WebPlatform {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

struct IntervalBinding {
    window: web_sys::Window,
    interval_id: Option<i32>,
    _callback: Closure<dyn Fn()>,
}

impl CancelHandle for IntervalBinding {}

impl Drop for IntervalBinding {
    fn drop(&mut self) {
        if let Some(id) = self.interval_id.take() {
            self.window.clear_interval_with_handle(id);
        }
    }
}

struct FrameBinding {
    window: web_sys::Window,
    raf_id: Option<i32>,
    // Closure::once hands back the FnMut-typed wrapper.
    _callback: Closure<dyn FnMut()>,
}

impl CancelHandle for FrameBinding {}

impl Drop for FrameBinding {
    fn drop(&mut self) {
        // Harmless after the frame has already fired.
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

impl Platform for WebPlatform {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |perf| perf.now())
    }

    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn interval(&self, period_ms: u32, callback: Box<dyn Fn()>) -> Box<dyn CancelHandle> {
        let callback = Closure::wrap(callback);
        let interval_id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .ok();
        if interval_id.is_none() {
            log::warn!("setInterval refused; periodic reapply disabled");
        }
        Box::new(IntervalBinding {
            window: self.window.clone(),
            interval_id,
            _callback: callback,
        })
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Box<dyn CancelHandle> {
        let callback = Closure::once(callback);
        let raf_id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok();
        Box::new(FrameBinding {
            window: self.window.clone(),
            raf_id,
            _callback: callback,
        })
    }
}
