pub mod actions;
pub mod colors;
pub mod config;
pub mod geometry;
pub mod prefs;

pub use actions::{ActionTag, occupant_priority};
pub use colors::color_for_status;
pub use geometry::Slice;
pub use prefs::PreferenceStore;
