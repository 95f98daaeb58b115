//! An asynchronous manual-reset event.
//!
//! See the [`ManualResetEvent`] type's documentation for details.
use crate::{
    slot::{Slot, Wait},
    CallerId,
};
use alloc::collections::BTreeMap;
use core::{fmt, mem};
use maitake_sync::blocking::{DefaultMutex, Mutex, ScopedRawMutex};

#[cfg(test)]
mod tests;

/// An asynchronous manual-reset event.
///
/// A `ManualResetEvent` is either *signaled* or *unsignaled*. While it is
/// unsignaled, calls to [`wait`] return futures that stay pending. Calling
/// [`signal`] releases **every** waiting task at once, and leaves the event
/// signaled: until [`reset`] is called, every subsequent [`wait`] completes
/// immediately.
///
/// Like [`AutoResetEvent`], waits are deduplicated by *caller*: a caller that
/// waits again while the event is unsignaled gets a future waiting on the same
/// slot it already holds. Since a signal releases everyone together, no
/// ordering is kept between callers.
///
/// Slots are completed after the event's lock has been released.
///
/// [`wait`]: Self::wait
/// [`signal`]: Self::signal
/// [`reset`]: Self::reset
/// [`AutoResetEvent`]: crate::AutoResetEvent
pub struct ManualResetEvent<K = CallerId, Lock: ScopedRawMutex = DefaultMutex> {
    state: Mutex<State<K>, Lock>,
}

struct State<K> {
    signaled: bool,
    /// Always empty while `signaled` is set.
    waiters: BTreeMap<K, Slot>,
}

// === impl ManualResetEvent ===

impl<K> ManualResetEvent<K> {
    loom_const_fn! {
        /// Returns a new, unsignaled `ManualResetEvent`.
        ///
        /// This constructor returns an event that uses a [`DefaultMutex`] as
        /// the [`ScopedRawMutex`] implementation. To use a different
        /// [`ScopedRawMutex`], use the
        /// [`new_with_raw_mutex`](Self::new_with_raw_mutex) constructor
        /// instead.
        ///
        /// The caller key type `K` is not defaulted by this constructor: it
        /// must either be named, as in `ManualResetEvent::<CallerId>::new()`, or be
        /// inferred from a later call to [`wait`](Self::wait).
        #[must_use]
        pub fn new() -> Self {
            Self::make(false, DefaultMutex::new())
        }
    }

    loom_const_fn! {
        /// Returns a new `ManualResetEvent` that starts out signaled.
        #[must_use]
        pub fn new_signaled() -> Self {
            Self::make(true, DefaultMutex::new())
        }
    }
}

impl<K, Lock> ManualResetEvent<K, Lock>
where
    Lock: ScopedRawMutex,
{
    loom_const_fn! {
        /// Returns a new, unsignaled `ManualResetEvent`, using the provided
        /// [`ScopedRawMutex`] implementation to protect its state.
        #[must_use]
        pub fn new_with_raw_mutex(lock: Lock) -> Self {
            Self::make(false, lock)
        }
    }

    loom_const_fn! {
        #[must_use]
        fn make(signaled: bool, lock: Lock) -> Self {
            Self {
                state: Mutex::new_with_raw_mutex(
                    State {
                        signaled,
                        waiters: BTreeMap::new(),
                    },
                    lock,
                ),
            }
        }
    }

    /// Returns `true` if the event is currently signaled.
    #[must_use]
    pub fn is_signaled(&self) -> bool {
        self.state.with_lock(|state| state.signaled)
    }

    /// Returns the number of distinct callers currently waiting on the event.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.state.with_lock(|state| state.waiters.len())
    }

    /// Resets the event to the unsignaled state.
    ///
    /// Tasks that wait on the event after this returns will wait for the next
    /// call to [`signal`](Self::signal).
    ///
    /// Returns `true` if the event was signaled before it was reset.
    pub fn reset(&self) -> bool {
        let was_signaled = self
            .state
            .with_lock(|state| mem::replace(&mut state.signaled, false));
        debug!(was_signaled, "ManualResetEvent::reset");
        was_signaled
    }
}

impl<K, Lock> ManualResetEvent<K, Lock>
where
    K: Ord,
    Lock: ScopedRawMutex,
{
    /// Waits for the event to be signaled.
    ///
    /// If the event is signaled, the returned future is already complete, and
    /// nothing is registered. Otherwise, the future waits on the slot held by
    /// `caller`, creating one if `caller` is not already waiting.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future does not unregister `caller`; its slot is
    /// released by the next [`signal`](Self::signal) like any other.
    pub fn wait(&self, caller: K) -> Wait {
        self.state.with_lock(|state| {
            if state.signaled {
                debug_assert!(
                    state.waiters.is_empty(),
                    "a signaled manual-reset event must not have waiters"
                );
                trace!("ManualResetEvent::wait -> already signaled");
                return Wait::ready();
            }

            let wait = state.waiters.entry(caller).or_insert_with(Slot::new).wait();
            trace!(
                waiters = state.waiters.len(),
                "ManualResetEvent::wait -> waiting"
            );
            wait
        })
    }

    /// Signals the event, releasing every waiting task.
    ///
    /// The event stays signaled until [`reset`](Self::reset) is called, so
    /// any [`wait`](Self::wait) in the meantime completes immediately.
    /// Signaling an event that is already signaled does nothing.
    ///
    /// Returns the number of callers that were released.
    pub fn signal(&self) -> usize {
        let released = self.state.with_lock(|state| {
            state.signaled = true;
            mem::take(&mut state.waiters)
        });

        let n = released.len();
        debug!(released = n, "ManualResetEvent::signal");
        for slot in released.into_values() {
            slot.complete();
        }
        n
    }
}

impl<K> Default for ManualResetEvent<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Lock: ScopedRawMutex> fmt::Debug for ManualResetEvent<K, Lock> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (signaled, waiters) = self
            .state
            .with_lock(|state| (state.signaled, state.waiters.len()));
        f.debug_struct("ManualResetEvent")
            .field("signaled", &signaled)
            .field("waiters", &waiters)
            .finish()
    }
}
