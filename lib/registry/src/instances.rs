use dashmap::DashMap;
use graphsync_model::NamedOrBlankNode;
use rustc_hash::{FxHashSet, FxHasher};
use std::hash::BuildHasherDefault;

/// Tracks the known instances of every indexed class.
///
/// Seeded by the registry during model extraction and kept current by the
/// mapping manager whenever it documents an instance. The index is advisory:
/// a resource missing here is still picked up through the membership query,
/// so stale state never loses updates.
#[derive(Debug, Default)]
pub struct InstanceIndex {
    classes: DashMap<String, FxHashSet<NamedOrBlankNode>, BuildHasherDefault<FxHasher>>,
}

impl InstanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `instance` as a member of `class_uri`.
    pub fn record(&self, class_uri: &str, instance: NamedOrBlankNode) {
        self.classes
            .entry(class_uri.to_owned())
            .or_default()
            .insert(instance);
    }

    /// Returns the recorded instances of `class_uri`.
    pub fn instances_of(&self, class_uri: &str) -> Vec<NamedOrBlankNode> {
        self.classes
            .get(class_uri)
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_instance_of(&self, class_uri: &str, instance: &NamedOrBlankNode) -> bool {
        self.classes
            .get(class_uri)
            .is_some_and(|entry| entry.contains(instance))
    }

    pub fn is_instance_of_any(&self, instance: &NamedOrBlankNode) -> bool {
        self.classes
            .iter()
            .any(|entry| entry.value().contains(instance))
    }

    pub fn clear(&self) {
        self.classes.clear();
    }
}
