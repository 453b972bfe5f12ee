//! The three validity caches behind the apply ladder: per-container apply
//! status, per-name resource existence, and a short-TTL classification
//! cache that absorbs the cost of re-reading action tags on every pass.

use std::collections::HashMap;

use pion_shared::ActionTag;
use pion_shared::config::CLASSIFICATION_TTL_MS;

use crate::host::NodeKey;

/// Outcome of the last full apply attempt on a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    Success,
    Failed,
}

/// Cached existence verdict for one occupant's portrait.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    pub url: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Copy)]
struct ClassificationEntry {
    tag: Option<ActionTag>,
    stamp: f64,
}

#[derive(Default)]
pub struct OverlayCaches {
    status: HashMap<NodeKey, ApplyStatus>,
    resources: HashMap<String, ResourceEntry>,
    classifications: HashMap<NodeKey, ClassificationEntry>,
}

impl OverlayCaches {
    pub fn status(&self, key: NodeKey) -> Option<ApplyStatus> {
        self.status.get(&key).copied()
    }

    pub fn set_status(&mut self, key: NodeKey, status: ApplyStatus) {
        self.status.insert(key, status);
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceEntry> {
        self.resources.get(name)
    }

    pub fn set_resource(&mut self, name: &str, url: String, exists: bool) {
        self.resources.insert(name.to_string(), ResourceEntry { url, exists });
    }

    /// Cached classification for a container, or `None` when the entry is
    /// missing or older than the TTL. The inner option is the verdict
    /// itself (a node with no action tags classifies to `None`).
    pub fn classification(&self, key: NodeKey, now: f64) -> Option<Option<ActionTag>> {
        let entry = self.classifications.get(&key)?;
        if now - entry.stamp >= CLASSIFICATION_TTL_MS {
            return None;
        }
        Some(entry.tag)
    }

    pub fn set_classification(&mut self, key: NodeKey, tag: Option<ActionTag>, now: f64) {
        self.classifications
            .insert(key, ClassificationEntry { tag, stamp: now });
    }

    pub fn clear_all(&mut self) {
        self.status.clear();
        self.resources.clear();
        self.classifications.clear();
    }
}
