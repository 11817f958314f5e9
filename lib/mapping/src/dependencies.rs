use dashmap::DashMap;
use graphsync_model::NamedOrBlankNode;
use rustc_hash::{FxHashSet, FxHasher};
use std::hash::BuildHasherDefault;

/// Inverse-dependency adjacency: sub-resource -> documents embedding it.
///
/// Entries are created during document assembly and consulted during change
/// classification. There is no eviction beyond explicit clearing: the edges
/// are re-derived on every rebuild of the dependent, so a stale entry costs
/// at most one unnecessary re-index and never a missed update. Cyclic
/// dependencies are representable; cascade expansion is responsible for
/// terminating on them.
#[derive(Debug, Default)]
pub struct DependencyTracker {
    dependents: DashMap<NamedOrBlankNode, FxHashSet<NamedOrBlankNode>, BuildHasherDefault<FxHasher>>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a document for `dependent` embeds a value reachable
    /// through `sub_resource`.
    pub fn add(&self, sub_resource: NamedOrBlankNode, dependent: NamedOrBlankNode) {
        self.dependents
            .entry(sub_resource)
            .or_default()
            .insert(dependent);
    }

    /// The resources whose documents embed `sub_resource`.
    pub fn dependents_of(&self, sub_resource: &NamedOrBlankNode) -> Vec<NamedOrBlankNode> {
        self.dependents
            .get(sub_resource)
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_dependents(&self, sub_resource: &NamedOrBlankNode) -> bool {
        self.dependents
            .get(sub_resource)
            .is_some_and(|entry| !entry.is_empty())
    }

    /// Forgets every dependent of `sub_resource`.
    pub fn clear_sub_resource(&self, sub_resource: &NamedOrBlankNode) {
        self.dependents.remove(sub_resource);
    }

    pub fn clear(&self) {
        self.dependents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsync_model::NamedNode;

    fn node(uri: &str) -> NamedOrBlankNode {
        NamedOrBlankNode::NamedNode(NamedNode::new(uri).unwrap())
    }

    #[test]
    fn records_shared_sub_resources() {
        let tracker = DependencyTracker::new();
        tracker.add(node("http://e.com/author#1"), node("http://e.com/article#1"));
        tracker.add(node("http://e.com/author#1"), node("http://e.com/article#2"));

        let mut dependents = tracker.dependents_of(&node("http://e.com/author#1"));
        dependents.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        assert_eq!(dependents.len(), 2);
        assert!(tracker.has_dependents(&node("http://e.com/author#1")));
        assert!(!tracker.has_dependents(&node("http://e.com/author#2")));
    }

    #[test]
    fn tolerates_cycles() {
        let tracker = DependencyTracker::new();
        tracker.add(node("http://e.com/a"), node("http://e.com/b"));
        tracker.add(node("http://e.com/b"), node("http://e.com/a"));

        assert_eq!(tracker.dependents_of(&node("http://e.com/a")), vec![node("http://e.com/b")]);
        assert_eq!(tracker.dependents_of(&node("http://e.com/b")), vec![node("http://e.com/a")]);
    }

    #[test]
    fn clearing_a_sub_resource_only_affects_it() {
        let tracker = DependencyTracker::new();
        tracker.add(node("http://e.com/a"), node("http://e.com/b"));
        tracker.add(node("http://e.com/c"), node("http://e.com/d"));

        tracker.clear_sub_resource(&node("http://e.com/a"));
        assert!(!tracker.has_dependents(&node("http://e.com/a")));
        assert!(tracker.has_dependents(&node("http://e.com/c")));
    }
}
