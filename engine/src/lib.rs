//! Platform-independent overlay engine: observes an abstract host tree,
//! keeps portrait badges, action glyphs and multi-occupant composites in
//! sync with it, and repairs anything the host wipes out. The browser
//! adapter lives in the client crate; tests drive the engine against an
//! in-memory tree.

pub mod cache;
pub mod combat;
pub mod context;
pub mod host;
pub mod layout;
pub mod platform;
pub mod probe;
pub mod renderer;
pub mod scheduler;
pub mod snapshot;

#[cfg(test)]
mod mock;

pub use cache::{ApplyStatus, OverlayCaches};
pub use combat::OverlayMode;
pub use context::Engine;
pub use host::{CompositeSpec, HostTree, NodeKey, OverlayKind, RosterRow, SliceSpec};
pub use layout::{Occupant, composite_spec};
pub use platform::{CancelHandle, Platform};
pub use probe::{ProbeRegistry, ResourceProbe};
