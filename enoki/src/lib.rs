#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, doc(cfg_hide(docsrs, loom)))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs, missing_debug_implementations)]

extern crate alloc;

pub(crate) mod loom;

#[macro_use]
mod util;

pub mod affinity;
pub mod auto_reset;
mod caller;
pub mod manual_reset;
pub mod slot;

#[doc(inline)]
pub use self::affinity::AffinityQueue;
#[doc(inline)]
pub use self::auto_reset::AutoResetEvent;
pub use self::caller::CallerId;
#[doc(inline)]
pub use self::manual_reset::ManualResetEvent;
#[doc(inline)]
pub use self::slot::{Slot, Wait};

/// Re-exported so that users can name the mutex types used by the
/// `new_with_raw_mutex` constructors without depending on `maitake-sync`
/// directly.
pub mod blocking {
    pub use maitake_sync::blocking::{DefaultMutex, ScopedRawMutex};
}
