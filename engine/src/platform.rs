//! Timer and task plumbing, injected so the scheduler runs the same against
//! browser timers and against a hand-cranked test platform.

use futures::future::LocalBoxFuture;

/// Handle to a scheduled timer or frame callback. Dropping the handle
/// cancels the callback if it has not fired yet.
pub trait CancelHandle {}

pub trait Platform {
    /// Monotonic milliseconds. Only differences are meaningful.
    fn now(&self) -> f64;

    /// Run a future to completion on the current thread's task queue.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);

    /// Invoke `callback` every `period_ms` until the handle is dropped.
    fn interval(&self, period_ms: u32, callback: Box<dyn Fn()>) -> Box<dyn CancelHandle>;

    /// Invoke `callback` once on the next paint-aligned tick.
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Box<dyn CancelHandle>;
}
