//! An asynchronous auto-reset event.
//!
//! See the [`AutoResetEvent`] type's documentation for details.
use crate::{
    affinity::AffinityQueue,
    slot::{Slot, Wait},
    CallerId,
};
use core::fmt;
use maitake_sync::blocking::{DefaultMutex, Mutex, ScopedRawMutex};


/// An asynchronous auto-reset event.
///
/// Each call to [`signal`] releases **at most one** waiting task. Tasks are
/// released in the order in which they started waiting. If no task is waiting
/// when the event is signaled, the signal is stored, and the next call to
/// [`wait`] completes immediately, consuming it. Signals do not accumulate:
/// signaling an event that already holds a stored signal does nothing.
///
/// Waiting never blocks the current thread. [`wait`] returns a [`Wait`]
/// future, which yields to the scheduler until the event releases it.
///
/// # Caller affinity
///
/// Every call to [`wait`] takes a *caller* key identifying the logical waiter
/// (by default, a [`CallerId`]). If a caller waits again before it has been
/// released, the second call returns a future waiting on the *same* slot as
/// the first: the caller keeps its original place in line and is only counted
/// once. This makes loops like the following behave as a single waiter, even
/// though each iteration calls `wait` again:
///
/// ```
/// # async fn compute() {}
/// # async fn timeout() {}
/// use enoki::{AutoResetEvent, CallerId};
/// use futures::{future, pin_mut};
///
/// async fn worker(event: &AutoResetEvent) {
///     let me = CallerId::next();
///     loop {
///         compute().await;
///         let wait = event.wait(me);
///         let timeout = timeout();
///         pin_mut!(wait, timeout);
///         // if the timeout wins, our slot stays queued, and the next
///         // iteration's `wait(me)` picks it back up.
///         if let future::Either::Left(_) = future::select(wait, timeout).await {
///             break;
///         }
///     }
/// }
/// ```
///
/// Two *different* logical waiters must never share a caller key, or they
/// will be merged into a single slot.
///
/// # Implementation notes
///
/// The event's state is protected by a blocking [`Mutex`]. Released slots are
/// taken out of the queue while the lock is held, but they are only completed
/// after the lock has been released, so a woken task's waker can safely call
/// back into the same event.
///
/// [`signal`]: Self::signal
/// [`wait`]: Self::wait
pub struct AutoResetEvent<K = CallerId, Lock: ScopedRawMutex = DefaultMutex> {
    state: Mutex<State<K>, Lock>,
}

struct State<K> {
    /// Set if a signal arrived while nobody was waiting.
    ///
    /// If this is `true`, `waiters` is empty.
    signaled: bool,
    waiters: AffinityQueue<K, Slot>,
}

// === impl AutoResetEvent ===

impl<K> AutoResetEvent<K> {
    loom_const_fn! {
        /// Returns a new `AutoResetEvent` with no stored signal.
        ///
        /// This constructor returns an event that uses a [`DefaultMutex`] as
        /// the [`ScopedRawMutex`] implementation. To use a different
        /// [`ScopedRawMutex`], use the
        /// [`new_with_raw_mutex`](Self::new_with_raw_mutex) constructor
        /// instead.
        ///
        /// The caller key type `K` is not defaulted by this constructor: it
        /// must either be named, as in `AutoResetEvent::<CallerId>::new()`, or be
        /// inferred from a later call to [`wait`](Self::wait).
        #[must_use]
        pub fn new() -> Self {
            Self::make(false, DefaultMutex::new())
        }
    }

    loom_const_fn! {
        /// Returns a new `AutoResetEvent` holding a stored signal.
        ///
        /// The first call to [`wait`](Self::wait) on this event completes
        /// immediately.
        #[must_use]
        pub fn new_signaled() -> Self {
            Self::make(true, DefaultMutex::new())
        }
    }
}

impl<K, Lock> AutoResetEvent<K, Lock>
where
    Lock: ScopedRawMutex,
{
    loom_const_fn! {
        /// Returns a new `AutoResetEvent` with no stored signal, using the
        /// provided [`ScopedRawMutex`] implementation to protect its state.
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
                        waiters: AffinityQueue::new(),
                    },
                    lock,
                ),
            }
        }
    }

    /// Returns `true` if the event is holding a stored signal.
    ///
    /// If this returns `true`, the next call to [`wait`](Self::wait) will
    /// complete immediately. Since other tasks may wait on or signal the event
    /// concurrently, the result may be stale by the time it is observed.
    #[must_use]
    pub fn is_signaled(&self) -> bool {
        self.state.with_lock(|state| state.signaled)
    }

    /// Returns the number of distinct callers currently waiting on the event.
    #[must_use]
    pub fn waiters(&self) -> usize {
        self.state.with_lock(|state| state.waiters.len())
    }
}

impl<K, Lock> AutoResetEvent<K, Lock>
where
    K: Ord + Clone,
    Lock: ScopedRawMutex,
{
    /// Waits for the event to be signaled.
    ///
    /// If the event holds a stored signal, the signal is consumed and the
    /// returned future is already complete. Otherwise, `caller` is added to
    /// the back of the wait queue, unless it is already waiting, in which case
    /// the returned future waits on the slot `caller` already holds.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future does **not** remove `caller` from the
    /// wait queue. A later [`signal`](Self::signal) may therefore release a
    /// caller that is no longer listening, and that signal is spent. Waiting
    /// again with the same `caller` resumes waiting on the queued slot.
    pub fn wait(&self, caller: K) -> Wait {
        self.state.with_lock(|state| {
            if state.signaled {
                debug_assert!(
                    state.waiters.is_empty(),
                    "an auto-reset event must not store a signal while tasks are waiting"
                );
                state.signaled = false;
                trace!("AutoResetEvent::wait -> consumed stored signal");
                return Wait::ready();
            }

            let wait = state.waiters.get_or_insert_with(caller, Slot::new).wait();
            trace!(
                waiters = state.waiters.len(),
                "AutoResetEvent::wait -> waiting"
            );
            wait
        })
    }

    /// Signals the event, releasing the task that has been waiting longest.
    ///
    /// If no task is waiting, the signal is stored and consumed by the next
    /// call to [`wait`](Self::wait). At most one signal is stored at a time.
    ///
    /// Returns `true` if a waiting caller was released, or `false` if the
    /// signal was stored (or dropped, because a signal was already stored).
    pub fn signal(&self) -> bool {
        let released = self.state.with_lock(|state| {
            let slot = state.waiters.try_dequeue();
            if slot.is_none() {
                state.signaled = true;
            }
            test_dbg!(slot)
        });

        // complete the slot outside of the lock, in case the woken task's
        // waker re-enters the event.
        match released {
            Some(slot) => {
                debug!("AutoResetEvent::signal -> released waiter");
                slot.complete();
                true
            }
            None => {
                debug!("AutoResetEvent::signal -> stored signal");
                false
            }
        }
    }
}

impl<K> Default for AutoResetEvent<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Lock: ScopedRawMutex> fmt::Debug for AutoResetEvent<K, Lock> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (signaled, waiters) = self
            .state
            .with_lock(|state| (state.signaled, state.waiters.len()));
        f.debug_struct("AutoResetEvent")
            .field("signaled", &signaled)
            .field("waiters", &waiters)
            .finish()
    }
}
