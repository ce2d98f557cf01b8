//! Common traits for mergeable heaps
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait for min-heaps of keys, shaped like `BinaryHeap`
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based `decrease_key`
//!   and removal
//!
//! Code written against these traits (tests, benchmarks, graph algorithms)
//! does not care which heap sits underneath.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::HeapError;

/// A handle to an element in the heap, used for decrease_key operations
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Copy + Eq + Hash + Debug {}

/// Base trait for heap/priority queue data structures
///
/// - `push` inserts a key
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
///
/// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
///
/// # Example
///
/// ```rust
/// use fibheap_engine::{FibonacciHeap, Heap};
///
/// let mut heap: FibonacciHeap<u32> = Heap::new();
/// heap.push(3);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// ```
pub trait Heap<K: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts a key
    ///
    /// # Time Complexity
    /// O(1) for Fibonacci heaps.
    fn push(&mut self, key: K);

    /// Returns the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&K>;

    /// Removes and returns the minimum key
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn pop(&mut self) -> Option<K>;

    /// Merges another heap into this one, consuming the other heap
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` support
///
/// - `push_with_handle` returns a handle that can be used with `decrease_key`
/// - `decrease_key` efficiently lowers an element's key
/// - `remove` deletes an arbitrary element
///
/// These operations are essential for algorithms like Dijkstra's shortest path
/// that need to update keys of elements already in the heap.
///
/// # Example
///
/// ```rust
/// use fibheap_engine::{DecreaseKeyHeap, FibonacciHeap, Heap};
///
/// let mut heap: FibonacciHeap<i32> = Heap::new();
/// let handle = heap.push_with_handle(10);
/// DecreaseKeyHeap::decrease_key(&mut heap, &handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some(&5));
/// ```
pub trait DecreaseKeyHeap<K: Ord>: Heap<K> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Inserts a key, returning a handle
    ///
    /// # Time Complexity
    /// O(1) for Fibonacci heaps.
    fn push_with_handle(&mut self, key: K) -> Self::Handle;

    /// Decreases the key of an element identified by the handle
    ///
    /// # Errors
    /// - [`HeapError::KeyIncrease`] if the new key is greater than the
    ///   current key; nothing is changed
    /// - [`HeapError::InvalidHandle`] if the element is no longer in the heap
    ///
    /// # Time Complexity
    /// O(1) amortized for Fibonacci heaps.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Removes the element identified by the handle and returns its key
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element is no longer in the heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized for Fibonacci heaps.
    fn remove(&mut self, handle: &Self::Handle) -> Result<K, HeapError>;
}
