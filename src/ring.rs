//! Circular doubly-linked sibling rings
//!
//! The root list and every child list are rings threaded through the nodes'
//! `left`/`right` ids. A ring is named by any one of its members (its head).
//! A single node points to itself in both directions, and two rings can be
//! spliced into one in O(1).
//!
//! Nothing here looks at keys; keeping heap order is the caller's job.

use smallvec::SmallVec;

use crate::storage::{NodeId, NodeStorage};

/// Snapshot of ring members, taken before the ring is mutated
pub(crate) type RingSnapshot = SmallVec<[NodeId; 16]>;

/// Splices `node` into the ring named by `head`, immediately to the left of
/// the head, and returns the ring's head. An absent head means an empty ring:
/// `node` becomes a ring of one and is returned as the new head.
///
/// Whatever `node` was linked to before is overwritten, so it must already be
/// detached.
pub(crate) fn insert_into_ring<K>(
    nodes: &mut NodeStorage<K>,
    head: Option<NodeId>,
    node: NodeId,
) -> NodeId {
    match head {
        None => {
            let n = &mut nodes[node];
            n.left = node;
            n.right = node;
            node
        }
        Some(head) => {
            let head_left = nodes[head].left;
            {
                let n = &mut nodes[node];
                n.left = head_left;
                n.right = head;
            }
            nodes[head_left].right = node;
            nodes[head].left = node;
            head
        }
    }
}

/// Unlinks `node` from the ring named by `head` and returns the ring's new
/// head: absent if the ring is now empty, `node.right` if `node` was the head,
/// otherwise `head` unchanged. The removed node is left as a ring of one.
pub(crate) fn remove_from_ring<K>(
    nodes: &mut NodeStorage<K>,
    head: NodeId,
    node: NodeId,
) -> Option<NodeId> {
    let (left, right) = (nodes[node].left, nodes[node].right);
    if right == node {
        debug_assert_eq!(head, node, "sole ring member must be the head");
        return None;
    }
    nodes[left].right = right;
    nodes[right].left = left;
    let n = &mut nodes[node];
    n.left = node;
    n.right = node;
    Some(if head == node { right } else { head })
}

/// Splices two disjoint rings into one.
///
/// ```text
/// a_left <-> a ...   b_left <-> b ...
///            becomes
/// a_left <-> b ... b_left <-> a ...
/// ```
pub(crate) fn concatenate_rings<K>(nodes: &mut NodeStorage<K>, a: NodeId, b: NodeId) {
    let a_left = nodes[a].left;
    let b_left = nodes[b].left;
    nodes[a_left].right = b;
    nodes[b].left = a_left;
    nodes[b_left].right = a;
    nodes[a].left = b_left;
}

/// Collects the ring starting at `head`, following `right`
pub(crate) fn ring_members<K>(nodes: &NodeStorage<K>, head: NodeId) -> RingSnapshot {
    let mut members = RingSnapshot::new();
    let mut current = head;
    loop {
        members.push(current);
        current = nodes[current].right;
        if current == head {
            break;
        }
    }
    members
}

/// Every node reachable from the ring at `head`, children before parents.
///
/// Walks with an explicit stack so deep trees cannot overflow the call stack.
/// Each ring is snapshotted exactly once.
pub(crate) fn post_order<K>(nodes: &NodeStorage<K>, head: Option<NodeId>) -> Vec<NodeId> {
    let mut order = Vec::new();
    let Some(head) = head else {
        return order;
    };

    let mut stack: Vec<(NodeId, bool)> = ring_members(nodes, head)
        .into_iter()
        .map(|id| (id, false))
        .collect();
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        stack.push((id, true));
        if let Some(child) = nodes[id].child {
            stack.extend(ring_members(nodes, child).into_iter().map(|c| (c, false)));
        }
    }
    order
}

/// Borrowing iterator over one ring, starting at its head
pub struct RingIter<'a, K> {
    nodes: &'a NodeStorage<K>,
    head: Option<NodeId>,
    next: Option<NodeId>,
}

impl<'a, K> RingIter<'a, K> {
    pub(crate) fn new(nodes: &'a NodeStorage<K>, head: Option<NodeId>) -> Self {
        Self {
            nodes,
            head,
            next: head,
        }
    }
}

impl<'a, K> Iterator for RingIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let current = self.next?;
        let node = &self.nodes[current];
        self.next = Some(node.right).filter(|&right| Some(right) != self.head);
        Some(&node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn ring_of(nodes: &mut NodeStorage<i32>, keys: &[i32]) -> Option<NodeId> {
        let mut head = None;
        for &key in keys {
            let id = nodes.insert_with(|id| Node::singleton(key, id));
            head = Some(insert_into_ring(nodes, head, id));
        }
        head
    }

    fn keys(nodes: &NodeStorage<i32>, head: Option<NodeId>) -> Vec<i32> {
        RingIter::new(nodes, head).copied().collect()
    }

    fn assert_consistent(nodes: &NodeStorage<i32>, head: NodeId) {
        for id in ring_members(nodes, head) {
            assert_eq!(nodes[nodes[id].left].right, id);
            assert_eq!(nodes[nodes[id].right].left, id);
        }
    }

    #[test]
    fn test_insert_into_empty_ring() {
        let mut nodes = NodeStorage::default();
        let head = ring_of(&mut nodes, &[7]);
        assert_eq!(keys(&nodes, head), vec![7]);
        let head = head.unwrap();
        assert_eq!(nodes[head].left, head);
        assert_eq!(nodes[head].right, head);
    }

    #[test]
    fn test_insert_keeps_head_and_order() {
        let mut nodes = NodeStorage::default();
        let head = ring_of(&mut nodes, &[1, 2, 3, 4]);
        // Each insert lands just left of the head, i.e. at the ring's end
        assert_eq!(keys(&nodes, head), vec![1, 2, 3, 4]);
        assert_consistent(&nodes, head.unwrap());
    }

    #[test]
    fn test_remove_head_moves_head_right() {
        let mut nodes = NodeStorage::default();
        let head = ring_of(&mut nodes, &[1, 2, 3]).unwrap();
        let new_head = remove_from_ring(&mut nodes, head, head);
        assert_eq!(keys(&nodes, new_head), vec![2, 3]);
        assert_consistent(&nodes, new_head.unwrap());
        assert_eq!(nodes[head].right, head);
    }

    #[test]
    fn test_remove_non_head_keeps_head() {
        let mut nodes = NodeStorage::default();
        let head = ring_of(&mut nodes, &[1, 2, 3]).unwrap();
        let middle = nodes[head].right;
        assert_eq!(remove_from_ring(&mut nodes, head, middle), Some(head));
        assert_eq!(keys(&nodes, Some(head)), vec![1, 3]);
    }

    #[test]
    fn test_remove_last_member_empties_ring() {
        let mut nodes = NodeStorage::default();
        let head = ring_of(&mut nodes, &[1]).unwrap();
        assert_eq!(remove_from_ring(&mut nodes, head, head), None);
    }

    #[test]
    fn test_concatenate_rings() {
        let mut nodes = NodeStorage::default();
        let a = ring_of(&mut nodes, &[1, 2]).unwrap();
        let b = ring_of(&mut nodes, &[3, 4, 5]).unwrap();
        concatenate_rings(&mut nodes, a, b);
        assert_eq!(keys(&nodes, Some(a)), vec![1, 2, 3, 4, 5]);
        assert_consistent(&nodes, a);
    }

    #[test]
    fn test_concatenate_singletons() {
        let mut nodes = NodeStorage::default();
        let a = ring_of(&mut nodes, &[1]).unwrap();
        let b = ring_of(&mut nodes, &[2]).unwrap();
        concatenate_rings(&mut nodes, a, b);
        assert_eq!(keys(&nodes, Some(b)), vec![2, 1]);
        assert_consistent(&nodes, a);
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let mut nodes = NodeStorage::default();
        let root = ring_of(&mut nodes, &[1]).unwrap();
        let children = ring_of(&mut nodes, &[2, 3]).unwrap();
        for id in ring_members(&nodes, children) {
            nodes[id].parent = Some(root);
        }
        nodes[root].child = Some(children);
        nodes[root].degree = 2;

        let order = post_order(&nodes, Some(root));
        assert_eq!(order.len(), 3);
        assert_eq!(order.last(), Some(&root));
    }

    #[test]
    fn test_empty_ring_iterates_nothing() {
        let nodes = NodeStorage::<i32>::default();
        assert!(keys(&nodes, None).is_empty());
        assert!(post_order(&nodes, None).is_empty());
    }
}
