use core::fmt;

/// An explicit token identifying a logical waiter.
///
/// Events in this crate deduplicate waits by *caller*: if the same caller
/// waits again before its previous wait was signaled, it gets back the slot it
/// already holds rather than taking a second place in line. A `CallerId` is the
/// default key used for this purpose.
///
/// Each call to [`CallerId::next`] returns a new identifier that is guaranteed
/// not to be reused for the lifetime of the program. A task, actor, or other
/// scheduling unit should allocate one `CallerId` when it is created and pass
/// the same value to every `wait` call it makes. Identifiers are *not* derived
/// from the current thread, since a thread pool may run many unrelated tasks on
/// the same worker thread.
///
/// Runtimes that already have stable task IDs can use those as the key
/// instead; see the `K` type parameter on [`AutoResetEvent`] and
/// [`ManualResetEvent`].
///
/// [`AutoResetEvent`]: crate::AutoResetEvent
/// [`ManualResetEvent`]: crate::ManualResetEvent
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CallerId(u64);

impl CallerId {
    /// Returns a new, never-before-seen `CallerId`.
    #[must_use]
    pub fn next() -> Self {
        // Don't use loom atomics, since this has to go in a static.
        use portable_atomic::{AtomicU64, Ordering::Relaxed};

        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Relaxed);

        debug_assert!(id > 0, "64-bit caller ID counter should not overflow!");
        Self(id)
    }

    /// Returns a `CallerId` wrapping an identifier assigned by the caller.
    ///
    /// IDs created this way are not checked against IDs returned by
    /// [`CallerId::next`]; mixing the two in a single event may make unrelated
    /// callers share a slot.
    #[must_use]
    #[inline]
    pub const fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value of this ID.
    #[must_use]
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CallerId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallerId(")?;
        fmt::Debug::fmt(&self.0, f)?;
        f.write_str(")")
    }
}

impl fmt::Display for CallerId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for CallerId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn next_is_unique() {
        let a = CallerId::next();
        let b = CallerId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn fmt() {
        let id = CallerId::from_u64(42);
        assert_eq!(format!("{id:?}"), "CallerId(42)");
        assert_eq!(format!("{id}"), "42");
        assert_eq!(CallerId::from(42), id);
    }
}
