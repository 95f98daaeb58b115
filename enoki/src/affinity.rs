//! A first-in, first-out queue that holds at most one entry per caller.
//!
//! See the [`AffinityQueue`] type's documentation for details.
use alloc::collections::{btree_map::Entry, BTreeMap, VecDeque};
use core::fmt;


/// A first-in, first-out queue holding at most one entry per key.
///
/// An `AffinityQueue` associates each *caller* (identified by a key of type
/// `K`) with a single value. Inserting for a caller that is already present
/// returns the existing value rather than enqueueing a second one, and does not
/// move that caller in the queue. Values are removed in the order in which
/// their callers were first inserted.
///
/// This is the registry that backs [`AutoResetEvent`]: a task that waits on
/// the event twice before being signaled keeps its original place in line,
/// and is only woken once.
///
/// An `AffinityQueue` is a plain data structure with no internal
/// synchronization. The events in this crate only access it while holding
/// their own lock.
///
/// [`AutoResetEvent`]: crate::AutoResetEvent
pub struct AffinityQueue<K, T> {
    /// Keys in the order they were first inserted.
    order: VecDeque<K>,
    entries: BTreeMap<K, T>,
}

/// Iterator over the values in an [`AffinityQueue`], in insertion order.
///
/// Returned by [`AffinityQueue::iter`].
pub struct Iter<'a, K, T> {
    order: alloc::collections::vec_deque::Iter<'a, K>,
    entries: &'a BTreeMap<K, T>,
}

impl<K, T> AffinityQueue<K, T> {
    /// Returns a new, empty `AffinityQueue`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order: VecDeque::new(),
            entries: BTreeMap::new(),
        }
    }

    /// Returns the number of callers currently in the queue.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns an iterator over the values in the queue, oldest first.
    ///
    /// This does not remove anything from the queue.
    pub fn iter(&self) -> Iter<'_, K, T> {
        Iter {
            order: self.order.iter(),
            entries: &self.entries,
        }
    }
}

impl<K: Ord + Clone, T> AffinityQueue<K, T> {
    /// Returns the value queued for `key`, inserting the value returned by
    /// `make` at the back of the queue if `key` has no value yet.
    ///
    /// If `key` is already in the queue, its value is returned unchanged,
    /// `make` is not called, and `key` keeps its current position.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> T) -> &T {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push_back(entry.key().clone());
                entry.insert(make())
            }
        }
    }

    /// Removes and returns the value at the front of the queue.
    ///
    /// # Panics
    ///
    /// If the queue is empty. Use [`try_dequeue`](Self::try_dequeue) when
    /// the queue may be empty.
    #[track_caller]
    pub fn dequeue(&mut self) -> T {
        match self.try_dequeue() {
            Some(value) => value,
            None => panic!("AffinityQueue::dequeue called on an empty queue"),
        }
    }

    /// Removes and returns the value at the front of the queue, or `None` if
    /// the queue is empty.
    pub fn try_dequeue(&mut self) -> Option<T> {
        let key = self.order.pop_front()?;
        let value = self.entries.remove(&key);
        debug_assert!(
            value.is_some(),
            "every queued key must have an entry in the map"
        );
        value
    }

    /// Returns the value queued for `key`, if there is one.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&T> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` has a value in the queue.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}

impl<K, T> Default for AffinityQueue<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, T: fmt::Debug> fmt::Debug for AffinityQueue<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.order
                    .iter()
                    .filter_map(|key| Some((key, self.entries.get(key)?))),
            )
            .finish()
    }
}

impl<'a, K: Ord, T> IntoIterator for &'a AffinityQueue<K, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, K, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// === impl Iter ===

impl<'a, K: Ord, T> Iterator for Iter<'a, K, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.order.next()?;
        self.entries.get(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K: Ord, T> ExactSizeIterator for Iter<'_, K, T> {}

impl<K: fmt::Debug, T> fmt::Debug for Iter<'_, K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.order)
            .finish()
    }
}
