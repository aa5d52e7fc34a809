//! Fixed-capacity binary min-heap with a caller-supplied ordering.
//!
//! The tree builder never holds more than one entry per byte value, so the
//! queue is sized to the alphabet once and never grows past it.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// A binary min-heap holding at most `capacity` elements.
///
/// `cmp` decides the order: [`BoundedHeap::pop`] returns an element `x` such
/// that `cmp(x, y) != Ordering::Greater` for every other element `y`.
pub struct BoundedHeap<T, C> {
    elements: Vec<T>,
    capacity: usize,
    cmp: C,
}

impl<T, C> BoundedHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap that accepts up to `capacity` elements.
    pub fn new(capacity: usize, cmp: C) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            capacity,
            cmp,
        }
    }

    /// Number of elements in the heap.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The minimum element, without removing it.
    pub fn top(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Insert `value`.
    ///
    /// # Errors
    /// Returns `Error::QueueFull` if the heap already holds `capacity` elements.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.elements.len() == self.capacity {
            return Err(Error::QueueFull {
                capacity: self.capacity,
            });
        }
        self.elements.push(value);
        self.sift_up(self.elements.len() - 1);
        Ok(())
    }

    /// Remove and return the minimum element.
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop();
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        min
    }

    fn less(&self, i: usize, j: usize) -> bool {
        (self.cmp)(&self.elements[i], &self.elements[j]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.elements.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let mut smallest = i;
            if l < n && self.less(l, smallest) {
                smallest = l;
            }
            if r < n && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}
