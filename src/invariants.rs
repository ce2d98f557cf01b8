//! Structural validation
//!
//! [`FibonacciHeap::validate`] walks every ring and checks the invariants
//! that must hold between public operations:
//!
//! 1. every ring is circular and doubly consistent
//! 2. heap order: no child has a smaller key than its parent
//! 3. each node's degree equals the size of its child ring
//! 4. roots are unmarked
//! 5. the cached minimum is a root with the smallest root key
//! 6. the recorded size equals the number of reachable nodes
//! 7. nothing is stored that is not reachable
//!
//! The walk is iterative and O(n). With the `invariant-checks` feature it runs
//! after every mutating operation.

use crate::error::InvariantViolation;
use crate::fibonacci::FibonacciHeap;
use crate::node::{Node, NodeRef};
use crate::storage::NodeId;

impl<K: Ord> FibonacciHeap<K> {
    /// Checks every structural invariant of the heap.
    ///
    /// A violation is always an engine bug, never the result of API misuse.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let stored = self.nodes.node_count();
        let Some(min) = self.min else {
            if self.len != 0 {
                return Err(InvariantViolation::SizeMismatch {
                    recorded: self.len,
                    reachable: 0,
                });
            }
            if stored != 0 {
                return Err(InvariantViolation::LeakedNodes {
                    stored,
                    reachable: 0,
                });
            }
            return Ok(());
        };

        let min_node = self
            .nodes
            .get(min)
            .ok_or(InvariantViolation::StaleMinimum)?;
        if min_node.parent.is_some() {
            return Err(InvariantViolation::StaleMinimum);
        }

        let mut reachable = 0usize;
        // (any ring member, owner of the ring; None for the root ring)
        let mut pending: Vec<(NodeId, Option<NodeId>)> = vec![(min, None)];
        while let Some((head, owner)) = pending.pop() {
            let mut count = 0usize;
            let mut current = head;
            loop {
                let node = self.lookup(current)?;
                self.check_neighbours(current, node)?;

                if node.parent != owner {
                    return Err(InvariantViolation::ParentMismatch(NodeRef(current)));
                }
                match owner {
                    None => {
                        if node.mark {
                            return Err(InvariantViolation::MarkedRoot(NodeRef(current)));
                        }
                        if node.key < min_node.key {
                            return Err(InvariantViolation::StaleMinimum);
                        }
                    }
                    Some(parent) => {
                        if node.key < self.lookup(parent)?.key {
                            return Err(InvariantViolation::HeapOrder(NodeRef(current)));
                        }
                    }
                }

                match node.child {
                    Some(child) => pending.push((child, Some(current))),
                    None if node.degree != 0 => {
                        return Err(InvariantViolation::DegreeMismatch {
                            node: NodeRef(current),
                            degree: node.degree,
                            children: 0,
                        });
                    }
                    None => {}
                }

                count += 1;
                reachable += 1;
                // More nodes than are stored means some ring never closes.
                if reachable > stored {
                    return Err(InvariantViolation::BrokenRing(NodeRef(head)));
                }
                current = node.right;
                if current == head {
                    break;
                }
            }

            if let Some(parent) = owner {
                let degree = self.lookup(parent)?.degree;
                if degree != count {
                    return Err(InvariantViolation::DegreeMismatch {
                        node: NodeRef(parent),
                        degree,
                        children: count,
                    });
                }
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.len,
                reachable,
            });
        }
        if reachable != stored {
            return Err(InvariantViolation::LeakedNodes { stored, reachable });
        }
        Ok(())
    }

    #[cfg(feature = "invariant-checks")]
    pub(crate) fn check_invariants(&self) {
        if let Err(violation) = self.validate() {
            panic!("heap invariant violated: {violation}");
        }
    }

    #[cfg(not(feature = "invariant-checks"))]
    #[inline(always)]
    pub(crate) fn check_invariants(&self) {}

    fn lookup(&self, id: NodeId) -> Result<&Node<K>, InvariantViolation> {
        self.nodes
            .get(id)
            .ok_or(InvariantViolation::DanglingLink(NodeRef(id)))
    }

    fn check_neighbours(&self, id: NodeId, node: &Node<K>) -> Result<(), InvariantViolation> {
        let consistent =
            self.lookup(node.right)?.left == id && self.lookup(node.left)?.right == id;
        if consistent {
            Ok(())
        } else {
            Err(InvariantViolation::BrokenRing(NodeRef(id)))
        }
    }
}
