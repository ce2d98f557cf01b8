//! Fibonacci heap priority-queue engine
//!
//! A mergeable min-priority queue with the classical Fibonacci heap costs:
//!
//! | operation      | cost               |
//! |----------------|--------------------|
//! | `insert`       | O(1)               |
//! | `find_min`     | O(1)               |
//! | `union`        | O(1) amortized     |
//! | `decrease_key` | O(1) amortized     |
//! | `extract_min`  | O(log n) amortized |
//! | `delete`       | O(log n) amortized |
//!
//! Nodes are kept in a generational arena and referenced through [`NodeRef`]
//! handles. A handle whose node has been extracted or deleted is detected and
//! rejected with [`HeapError::InvalidHandle`].
//!
//! The heap never searches for a node by key value. Callers that want to
//! address nodes by key keep their own key → [`NodeRef`] index, as the
//! [`cli`] front end does.
//!
//! # Example
//!
//! ```rust
//! use fibheap_engine::FibonacciHeap;
//!
//! let mut a = FibonacciHeap::new();
//! let seven = a.insert(7);
//! a.insert(4);
//!
//! let mut b = FibonacciHeap::new();
//! b.insert(9);
//! b.insert(2);
//!
//! let mut heap = a.union(b);
//! heap.decrease_key(seven, 1).unwrap();
//!
//! let keys: Vec<_> = std::iter::from_fn(|| heap.extract_min().map(|(_, k)| k)).collect();
//! assert_eq!(keys, vec![1, 2, 4, 9]);
//! ```
//!
//! # Features
//!
//! - `invariant-checks`: validate the whole structure after every mutating
//!   operation and panic on the first violation. O(n) per operation.

pub mod cli;
mod consolidate;
mod cut;
pub mod error;
pub mod fibonacci;
mod invariants;
mod node;
mod ring;
mod storage;
pub mod traits;

pub use error::{HeapError, InvariantViolation};
pub use fibonacci::FibonacciHeap;
pub use node::NodeRef;
pub use ring::RingIter;
pub use traits::{DecreaseKeyHeap, Handle, Heap};
