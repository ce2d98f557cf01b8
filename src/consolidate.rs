//! Root-list consolidation
//!
//! Runs after every extract-min that leaves roots behind. Roots of equal
//! degree are linked pairwise (larger key under smaller) until all root
//! degrees are distinct, which leaves at most O(log n) trees. This is where
//! the work deferred by insert and union is paid for.

use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::fibonacci::FibonacciHeap;
use crate::ring;
use crate::storage::NodeId;

/// Initial degree-table size: `floor(log2(n)) + 2`.
///
/// Trees built only by linking have degree at most `log2(n)`; decrease-key
/// can push this up to `log_phi(n)`, so the table still grows on demand.
pub(crate) fn degree_table_capacity(len: usize) -> usize {
    len.max(1).ilog2() as usize + 2
}

impl<K: Ord> FibonacciHeap<K> {
    /// Links equal-degree roots until every root degree is distinct, then
    /// rebuilds the root ring and recomputes the minimum.
    ///
    /// `self.min` must name some root on entry; it need not be the smallest.
    pub(crate) fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };

        // Linking unhooks roots as we go, so fix the set up front.
        let roots = ring::ring_members(&self.nodes, start);
        let mut table: SmallVec<[Option<NodeId>; 32]> =
            smallvec![None; degree_table_capacity(self.len)];
        let mut links = 0usize;

        for &root in &roots {
            let mut x = root;
            let mut d = self.nodes[x].degree;
            while let Some(mut y) = table.get_mut(d).and_then(Option::take) {
                // On equal keys the root being processed stays on top.
                if self.nodes[y].key < self.nodes[x].key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                links += 1;
                d += 1;
            }
            if d >= table.len() {
                table.resize(d + 1, None);
            }
            table[d] = Some(x);
        }

        self.min = None;
        let mut head = None;
        for root in table.into_iter().flatten() {
            head = Some(ring::insert_into_ring(&mut self.nodes, head, root));
            match self.min {
                Some(min) if self.nodes[min].key <= self.nodes[root].key => {}
                _ => self.min = Some(root),
            }
        }

        debug!(
            roots_before = roots.len(),
            roots_after = self.root_count(),
            links,
            "consolidate"
        );
    }

    /// Makes root `child` a child of root `parent`.
    ///
    /// `child` is not unlinked from the root ring; consolidation rebuilds that
    /// ring from its table afterwards.
    fn link(&mut self, child: NodeId, parent: NodeId) {
        let head = self.nodes[parent].child;
        let head = ring::insert_into_ring(&mut self.nodes, head, child);
        {
            let c = &mut self.nodes[child];
            c.parent = Some(parent);
            c.mark = false;
        }
        let p = &mut self.nodes[parent];
        p.child = Some(head);
        p.degree += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_table_capacity() {
        assert_eq!(degree_table_capacity(0), 2);
        assert_eq!(degree_table_capacity(1), 2);
        assert_eq!(degree_table_capacity(2), 3);
        assert_eq!(degree_table_capacity(7), 4);
        assert_eq!(degree_table_capacity(8), 5);
        assert_eq!(degree_table_capacity(1 << 20), 22);
    }

    #[test]
    fn test_consolidate_leaves_distinct_degrees() {
        let mut heap: FibonacciHeap<i32> = (0..33).collect();
        heap.extract_min();

        // 32 nodes left: a single binomial tree of degree 5
        assert_eq!(heap.root_count(), 1);
        assert_eq!(heap.max_degree(), 5);
        assert_eq!(heap.find_min(), Some(&1));
        heap.validate().unwrap();
    }

    #[test]
    fn test_consolidate_root_degrees_follow_binary_size() {
        let mut heap: FibonacciHeap<i32> = (0..12).collect();
        heap.extract_min();

        // 11 = 0b1011 -> trees of degree 0, 1 and 3
        let mut degrees: Vec<_> = ring::ring_members(&heap.nodes, heap.min.unwrap())
            .iter()
            .map(|&id| heap.nodes[id].degree)
            .collect();
        degrees.sort_unstable();
        assert_eq!(degrees, vec![0, 1, 3]);
    }

    #[test]
    fn test_equal_keys_link_under_processed_root() {
        let mut heap = FibonacciHeap::new();
        heap.insert(0);
        let a = heap.insert(5);
        let b = heap.insert(5);
        heap.extract_min();

        // The root ring after removing 0 is [a, b]; b is processed second
        // and wins the tie.
        assert_eq!(heap.parent(a), Ok(Some(b)));
        assert_eq!(heap.degree(b), Ok(1));
        heap.validate().unwrap();
    }

    #[test]
    fn test_table_grows_past_initial_capacity() {
        // Hand-build a root whose degree is beyond floor(log2(7)) + 2 slots.
        let mut heap = FibonacciHeap::new();
        let root = heap.insert(1).0;
        for key in 2..8 {
            let leaf = heap.insert(key).0;
            heap.min = ring::remove_from_ring(&mut heap.nodes, root, leaf);
            heap.link(leaf, root);
        }
        heap.validate().unwrap();
        assert_eq!(degree_table_capacity(heap.len()), 4);

        heap.consolidate();
        assert_eq!(heap.root_count(), 1);
        assert_eq!(heap.min, Some(root));
        assert_eq!(heap.max_degree(), 6);
        heap.validate().unwrap();
    }
}
