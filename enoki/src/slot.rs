//! One-shot waiter slots and the [`Wait`] future.
//!
//! A [`Slot`] represents a single pending wait. It can be completed exactly
//! once, by any party, from any context; completing it wakes every [`Wait`]
//! future that is waiting on it. The events in this crate hand out [`Wait`]
//! futures and keep the corresponding [`Slot`]s registered until they are
//! signaled.
use alloc::sync::Arc;
use core::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use maitake_sync::{wait_queue::WaitOwned, WaitQueue};
use pin_project::pin_project;


/// A shared, one-shot completion.
///
/// Cloning a `Slot` returns another handle to the *same* completion. Once
/// [`complete`](Self::complete) has been called through any handle, every
/// current and future [`Wait`] on that slot resolves immediately.
///
/// Internally, a slot is a [`WaitQueue`] that is never woken, only
/// [closed](WaitQueue::close): closing a queue wakes every task waiting on it
/// and causes all later waits to complete immediately, which is exactly the
/// behavior of a one-shot completion.
#[derive(Clone)]
pub struct Slot {
    queue: Arc<WaitQueue>,
}

/// Future returned by [`Slot::wait`], [`AutoResetEvent::wait`], and
/// [`ManualResetEvent::wait`].
///
/// Resolves to `()` once the slot it waits on has been completed.
///
/// Dropping a `Wait` future does **not** unregister the caller from the event
/// it came from. The slot stays registered until it is signaled, or until the
/// same caller waits again and picks it back up.
///
/// [`AutoResetEvent::wait`]: crate::AutoResetEvent::wait
/// [`ManualResetEvent::wait`]: crate::ManualResetEvent::wait
#[pin_project]
#[must_use = "futures do nothing unless `.await`ed or `poll`ed"]
pub struct Wait {
    /// `None` if this future was created already completed.
    slot: Option<Slot>,
    #[pin]
    wait: Option<WaitOwned>,
}

// === impl Slot ===

impl Slot {
    /// Returns a new, pending slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Arc::new(WaitQueue::new()),
        }
    }

    /// Returns a slot that has already been completed.
    #[must_use]
    pub fn completed() -> Self {
        let slot = Self::new();
        slot.complete();
        slot
    }

    /// Completes this slot, waking every task waiting on it.
    ///
    /// Completing a slot that is already complete does nothing.
    #[inline]
    pub fn complete(&self) {
        trace!(slot = ?Arc::as_ptr(&self.queue), "Slot::complete");
        self.queue.close();
    }

    /// Returns `true` if this slot has been completed.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.queue.is_closed()
    }

    /// Returns a future that resolves when this slot is completed.
    pub fn wait(&self) -> Wait {
        Wait {
            wait: Some(self.queue.wait_owned()),
            slot: Some(self.clone()),
        }
    }

    /// Returns `true` if `self` and `other` are handles to the same slot.
    #[inline]
    #[must_use]
    pub fn same_slot(&self, other: &Slot) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("addr", &Arc::as_ptr(&self.queue))
            .field("complete", &self.is_complete())
            .finish()
    }
}

// === impl Wait ===

impl Wait {
    /// Returns a `Wait` future that is already complete, without allocating a
    /// slot.
    pub(crate) const fn ready() -> Self {
        Self {
            slot: None,
            wait: None,
        }
    }

    /// Returns `true` if the slot this future waits on has been completed.
    ///
    /// If this returns `true`, the next `poll` of this future will return
    /// [`Poll::Ready`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slot.as_ref().map_or(true, Slot::is_complete)
    }

    /// Returns `true` if `self` and `other` wait on the same [`Slot`].
    ///
    /// Two waits by the same caller on an event that has not been signaled in
    /// between return futures waiting on the same slot. Futures created
    /// already completed never share a slot with anything.
    #[must_use]
    pub fn same_slot(&self, other: &Wait) -> bool {
        match (&self.slot, &other.slot) {
            (Some(this), Some(that)) => this.same_slot(that),
            _ => false,
        }
    }

    /// Returns the [`Slot`] this future waits on, or `None` if it was created
    /// already completed.
    #[must_use]
    pub fn slot(&self) -> Option<&Slot> {
        self.slot.as_ref()
    }
}

impl Future for Wait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.wait.as_pin_mut() {
            // a slot is only ever closed, never woken, so both `Ok` and
            // `Err(Closed)` mean the slot completed.
            Some(wait) => wait.poll(cx).map(|_| ()),
            None => Poll::Ready(()),
        }
    }
}

impl fmt::Debug for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait")
            .field("slot", &self.slot)
            .field("complete", &self.is_complete())
            .finish()
    }
}
