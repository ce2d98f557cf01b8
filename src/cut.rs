//! Cut and cascading cut
//!
//! When a decrease-key breaks heap order, the node is cut from its parent and
//! becomes a root. A parent that loses a child gets marked; losing a second
//! child cuts the parent too, and so on up the ancestor chain. Each marked
//! node pays for its own later cut, which keeps decrease-key O(1) amortized.

use tracing::trace;

use crate::fibonacci::FibonacciHeap;
use crate::ring;
use crate::storage::NodeId;

impl<K: Ord> FibonacciHeap<K> {
    /// Moves `x` out of the child ring of its parent `y` and into the root
    /// ring, unmarked. The cached minimum is left where it was.
    pub(crate) fn cut(&mut self, x: NodeId, y: NodeId) {
        debug_assert_eq!(self.nodes[x].parent, Some(y));

        let rest = match self.nodes[y].child {
            Some(head) => ring::remove_from_ring(&mut self.nodes, head, x),
            None => None,
        };
        {
            let parent = &mut self.nodes[y];
            parent.child = rest;
            parent.degree -= 1;
        }
        {
            let node = &mut self.nodes[x];
            node.parent = None;
            node.mark = false;
        }
        self.min = Some(ring::insert_into_ring(&mut self.nodes, self.min, x));
        trace!("cut");
    }

    /// Walks up from `y`, which just lost a child: marks the first unmarked
    /// non-root ancestor and cuts every marked one on the way there.
    pub(crate) fn cascading_cut(&mut self, mut y: NodeId) {
        let mut cuts = 0usize;
        while let Some(parent) = self.nodes[y].parent {
            if !self.nodes[y].mark {
                self.nodes[y].mark = true;
                break;
            }
            self.cut(y, parent);
            cuts += 1;
            y = parent;
        }
        if cuts > 0 {
            trace!(cuts, "cascading cut");
        }
    }
}
