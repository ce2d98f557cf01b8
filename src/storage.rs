//! Arena storage for heap nodes
//!
//! Every node of a heap lives in a [`slotmap`] arena and is addressed by a
//! [`NodeId`] instead of a pointer. Links between nodes (parent, child, ring
//! neighbours) are plain ids, so the cyclic sibling rings carry no ownership
//! and a parent link is just a lookup.
//!
//! # Generational keys
//!
//! Slotmap keys carry a version, so a key whose node has been removed never
//! resolves again, even after the slot is reused. This is what turns a stale
//! [`NodeRef`](crate::NodeRef) into [`HeapError::InvalidHandle`](crate::HeapError)
//! instead of silently aliasing another node.
//!
//! # Segments
//!
//! A storage owns one or more arenas ("segments"), each tagged with a
//! process-unique [`ArenaId`]. New nodes always go into the first (home)
//! segment. [`NodeStorage::merge`] moves whole segments from one storage into
//! another without touching any node, which keeps union O(1) per segment and
//! keeps every handle issued by either heap valid.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::node::Node;

new_key_type! {
    /// Slot key inside a single arena segment
    pub(crate) struct NodeKey;
}

/// Identifies one arena segment across the whole process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable address of a node: its segment plus its slot in that segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    arena: ArenaId,
    slot: NodeKey,
}

#[derive(Debug)]
struct Segment<K> {
    id: ArenaId,
    nodes: SlotMap<NodeKey, Node<K>>,
}

impl<K> Segment<K> {
    fn new() -> Self {
        Self {
            id: ArenaId::fresh(),
            nodes: SlotMap::with_key(),
        }
    }
}

/// Owner of every node in one heap
#[derive(Debug)]
pub(crate) struct NodeStorage<K> {
    /// `segments[0]` is the home segment that receives new nodes
    segments: Vec<Segment<K>>,
    /// Arena id -> position in `segments`
    positions: FxHashMap<ArenaId, usize>,
}

impl<K> Default for NodeStorage<K> {
    fn default() -> Self {
        let home = Segment::new();
        let mut positions = FxHashMap::default();
        positions.insert(home.id, 0);
        Self {
            segments: vec![home],
            positions,
        }
    }
}

impl<K> NodeStorage<K> {
    /// Stores a node built from its own id. The id is needed up front because
    /// a fresh node is a one-element ring that links to itself.
    pub(crate) fn insert_with(&mut self, make: impl FnOnce(NodeId) -> Node<K>) -> NodeId {
        let home = &mut self.segments[0];
        let arena = home.id;
        let slot = home
            .nodes
            .insert_with_key(|slot| make(NodeId { arena, slot }));
        NodeId { arena, slot }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        let position = *self.positions.get(&id.arena)?;
        self.segments[position].nodes.get(id.slot)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K>> {
        let position = *self.positions.get(&id.arena)?;
        self.segments[position].nodes.get_mut(id.slot)
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Removes a live node and hands it back.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live, like indexing does.
    pub(crate) fn take(&mut self, id: NodeId) -> Node<K> {
        let position = self.positions[&id.arena];
        let segment = &mut self.segments[position];
        let node = match segment.nodes.remove(id.slot) {
            Some(node) => node,
            None => panic!("node {id:?} is not stored in this heap"),
        };
        if position != 0 && segment.nodes.is_empty() {
            self.drop_segment(position);
        }
        node
    }

    /// Number of nodes stored across all segments
    pub(crate) fn node_count(&self) -> usize {
        self.segments.iter().map(|s| s.nodes.len()).sum()
    }

    pub(crate) fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node<K>> + '_ {
        self.segments.iter().flat_map(|s| s.nodes.values())
    }

    /// Moves every non-empty segment of the smaller storage into the larger
    /// one. No node moves, so all ids from both sides stay valid.
    pub(crate) fn merge(self, other: Self) -> Self {
        let (mut base, extra) = if self.segments.len() >= other.segments.len() {
            (self, other)
        } else {
            (other, self)
        };
        for segment in extra.segments {
            if segment.nodes.is_empty() {
                continue;
            }
            base.positions.insert(segment.id, base.segments.len());
            base.segments.push(segment);
        }
        base
    }

    fn drop_segment(&mut self, position: usize) {
        let removed = self.segments.swap_remove(position);
        self.positions.remove(&removed.id);
        if let Some(moved) = self.segments.get(position) {
            self.positions.insert(moved.id, position);
        }
    }
}

impl<K> Index<NodeId> for NodeStorage<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not stored in this heap"),
        }
    }
}

impl<K> IndexMut<NodeId> for NodeStorage<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not stored in this heap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(storage: &mut NodeStorage<i32>, key: i32) -> NodeId {
        storage.insert_with(|id| Node::singleton(key, id))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut storage = NodeStorage::default();
        let id = store(&mut storage, 42);

        assert_eq!(storage[id].key, 42);
        assert_eq!(storage[id].left, id);
        assert_eq!(storage[id].right, id);

        storage[id].key = 100;
        assert_eq!(storage.get(id).map(|n| n.key), Some(100));
        assert_eq!(storage.node_count(), 1);
    }

    #[test]
    fn test_removed_id_never_resolves() {
        let mut storage = NodeStorage::default();
        let id = store(&mut storage, 1);
        assert_eq!(storage.take(id).key, 1);
        assert!(!storage.contains(id));

        // The slot is reused, but the old id has the old generation
        let reused = store(&mut storage, 2);
        assert!(!storage.contains(id));
        assert_eq!(storage[reused].key, 2);
    }

    #[test]
    fn test_ids_from_other_storage_are_rejected() {
        let mut a = NodeStorage::default();
        let mut b = NodeStorage::default();
        let in_a = store(&mut a, 1);
        let in_b = store(&mut b, 2);

        assert!(a.contains(in_a));
        assert!(!a.contains(in_b));
        assert!(!b.contains(in_a));
    }

    #[test]
    fn test_merge_keeps_ids_valid() {
        let mut a = NodeStorage::default();
        let mut b = NodeStorage::default();
        let in_a = store(&mut a, 1);
        let in_b = store(&mut b, 2);

        let merged = a.merge(b);
        assert_eq!(merged.segment_count(), 2);
        assert_eq!(merged[in_a].key, 1);
        assert_eq!(merged[in_b].key, 2);
        assert_eq!(merged.node_count(), 2);
    }

    #[test]
    fn test_merge_skips_empty_segments() {
        let mut a = NodeStorage::default();
        store(&mut a, 1);
        let merged = a.merge(NodeStorage::default());
        assert_eq!(merged.segment_count(), 1);
    }

    #[test]
    fn test_empty_foreign_segment_is_dropped() {
        let mut a = NodeStorage::default();
        let mut b = NodeStorage::default();
        let mut c = NodeStorage::default();
        store(&mut a, 1);
        let in_b = store(&mut b, 2);
        let in_c = store(&mut c, 3);

        let mut merged = a.merge(b).merge(c);
        assert_eq!(merged.segment_count(), 3);

        merged.take(in_b);
        assert_eq!(merged.segment_count(), 2);
        assert!(!merged.contains(in_b));
        // The segment swapped into the freed position is still reachable
        assert_eq!(merged[in_c].key, 3);
    }
}
