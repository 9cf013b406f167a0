//! Fixed-capacity ring buffer with overwrite-on-full semantics.
//!
//! Every tier of the history cascade stores its samples in one of these. The
//! buffer never grows: once `N` elements are held, pushing a new one silently
//! evicts the oldest. Positions are always counted from the oldest element.

use core::fmt;
use core::ops::Index;

use heapless::Deque;

/// Bounded circular buffer backed by a [`heapless::Deque`].
#[derive(Clone)]
pub struct RingBuffer<T, const N: usize> {
    items: Deque<T, N>,
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Create an empty buffer. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    /// Append `value`, evicting and returning the oldest element if full.
    pub fn push_overwrite(&mut self, value: T) -> Option<T> {
        let evicted = if self.items.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        // Cannot fail: there is always room after the eviction above.
        let _ = self.items.push_back(value);
        evicted
    }

    /// Number of elements currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Maximum number of elements the buffer can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Element at `index`, where 0 is the oldest.
    pub fn get(&self, index: usize) -> Option<&T> {
        let (front, back) = self.items.as_slices();
        match index.checked_sub(front.len()) {
            None => front.get(index),
            Some(offset) => back.get(offset),
        }
    }

    /// Most recently pushed element.
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest element still held.
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        let (front, back) = self.items.as_slices();
        front.iter().chain(back.iter())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Index<usize> for RingBuffer<T, N> {
    type Output = T;

    /// Panics when `index >= len()`; indexing past the end is a logic error.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "ring buffer index {} out of range (len {})",
                index,
                self.len()
            ),
        }
    }
}

impl<T: PartialEq, const N: usize> PartialEq for RingBuffer<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const N: usize> Eq for RingBuffer<T, N> {}

impl<T: fmt::Debug, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders as `[a, b, c] (3 / N)` for diagnostic dumps.
impl<T: fmt::Display, const N: usize> fmt::Display for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "] ({} / {})", self.len(), N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut buffer: RingBuffer<i16, 3> = RingBuffer::new();
        assert!(buffer.is_empty());

        assert_eq!(buffer.push_overwrite(1), None);
        assert_eq!(buffer.push_overwrite(2), None);
        assert!(!buffer.is_full());
        assert_eq!(buffer.push_overwrite(3), None);

        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    fn test_overwrite_evicts_oldest() {
        let mut buffer: RingBuffer<i16, 3> = RingBuffer::new();
        for value in 1..=3 {
            buffer.push_overwrite(value);
        }

        assert_eq!(buffer.push_overwrite(4), Some(1));
        assert_eq!(buffer.push_overwrite(5), Some(2));

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer[0], 3);
        assert_eq!(buffer[1], 4);
        assert_eq!(buffer[2], 5);
        assert_eq!(buffer.oldest(), Some(&3));
        assert_eq!(buffer.newest(), Some(&5));
    }

    #[test]
    fn test_get_across_wraparound() {
        let mut buffer: RingBuffer<i16, 4> = RingBuffer::new();
        for value in 0..7 {
            buffer.push_overwrite(value);
        }

        // Internally split in two slices after wrapping; indices stay logical.
        assert_eq!(buffer.get(0), Some(&3));
        assert_eq!(buffer.get(3), Some(&6));
        assert_eq!(buffer.get(4), None);

        let mut collected = [0i16; 4];
        for (slot, value) in collected.iter_mut().zip(buffer.iter()) {
            *slot = *value;
        }
        assert_eq!(collected, [3, 4, 5, 6]);
        assert_eq!(buffer.iter().rev().next(), Some(&6));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_end_panics() {
        let mut buffer: RingBuffer<i16, 4> = RingBuffer::new();
        buffer.push_overwrite(1);
        let _ = buffer[1];
    }

    #[test]
    fn test_clear() {
        let mut buffer: RingBuffer<i16, 2> = RingBuffer::new();
        buffer.push_overwrite(1);
        buffer.push_overwrite(2);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.newest(), None);
    }

    #[test]
    fn test_equality_ignores_internal_layout() {
        let mut wrapped: RingBuffer<i16, 3> = RingBuffer::new();
        for value in 0..5 {
            wrapped.push_overwrite(value);
        }
        let mut straight: RingBuffer<i16, 3> = RingBuffer::new();
        for value in 2..5 {
            straight.push_overwrite(value);
        }

        assert_eq!(wrapped, straight);
    }
}
